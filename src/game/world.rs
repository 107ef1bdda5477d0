use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Options;
use crate::game::entity::{Bullet, BulletKind, Entity, EntitySizes, Player};
use crate::game::formation::Formation;
use crate::game::{
    ALIEN_BULLET_SPEED, ALIEN_POINTS, FIELD_HEIGHT, FIELD_WIDTH, MAX_PLAYER_BULLETS, PLAYER_Y,
};

/// Buttons held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    LivesExhausted,
    AlienBreach,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// A new formation was spawned; carries the new wave number.
    WaveCleared(u32),
    GameOver(GameOverReason),
}

/// Headless simulation of one session. Deterministic for a given seed,
/// input sequence and dt sequence.
pub struct World {
    options: Options,
    sizes: EntitySizes,
    player: Player,
    formation: Formation,
    bullets: Vec<Bullet>,
    score: u32,
    fire_cooldown: f32,
    alien_fire_timer: f32,
    rng: StdRng,
    game_over: Option<GameOverReason>,
    ticks: u64,
}

impl World {
    pub fn new(options: &Options, sizes: EntitySizes, seed: u64) -> Self {
        let player = Player::new(
            (FIELD_WIDTH - sizes.player.width) / 2.0,
            PLAYER_Y,
            sizes.player,
            options.starting_lives,
        );
        let formation = Formation::spawn(1, sizes.alien, options);
        let mut world = World {
            options: options.clone(),
            sizes,
            player,
            formation,
            bullets: Vec::new(),
            score: 0,
            fire_cooldown: 0.0,
            alien_fire_timer: 0.0,
            rng: StdRng::seed_from_u64(seed),
            game_over: None,
            ticks: 0,
        };
        world.alien_fire_timer = world.alien_fire_interval();
        world
    }

    /// Picks up new speeds and timers mid-session. Lives only change on restart.
    pub fn apply_options(&mut self, options: &Options) {
        self.options = options.clone();
        self.formation.retune(options);
        self.fire_cooldown = self.fire_cooldown.min(options.fire_cooldown);
        self.alien_fire_timer = self.alien_fire_timer.min(self.alien_fire_interval());
        self.player.invulnerable = self.player.invulnerable.min(options.invulnerable_secs);
        for bullet in self.bullets.iter_mut().filter(|b| b.kind == BulletKind::Player) {
            bullet.vy = -options.missile_speed;
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }

    pub fn wave(&self) -> u32 {
        self.formation.wave
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn player_bullets_in_flight(&self) -> usize {
        self.bullets.iter().filter(|b| b.kind == BulletKind::Player).count()
    }

    /// Seconds between alien shots. Shrinks as the block thins out and as
    /// waves go by.
    pub fn alien_fire_interval(&self) -> f32 {
        let total = self.formation.total().max(1) as f32;
        let alive = self.formation.alive_count() as f32 / total;
        let wave = self.formation.wave.saturating_sub(1) as f32;
        self.options.alien_fire_interval * (0.25 + 0.75 * alive) / (1.0 + 0.15 * wave)
    }

    #[cfg(test)]
    pub(crate) fn inject_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    pub fn advance(&mut self, dt: f32, input: Input) -> TickOutcome {
        if let Some(reason) = self.game_over {
            return TickOutcome::GameOver(reason);
        }
        self.ticks += 1;

        let mut outcome = TickOutcome::Continue;
        if self.formation.is_cleared() {
            self.next_wave();
            outcome = TickOutcome::WaveCleared(self.formation.wave);
        }

        self.update_player(dt, input);
        self.update_bullets(dt);
        self.formation.advance(dt, FIELD_WIDTH);
        self.update_alien_fire(dt);
        self.resolve_collisions();
        self.bullets.retain(|b| b.alive);

        match self.game_over {
            Some(reason) => {
                tracing::info!(?reason, score = self.score, wave = self.formation.wave, "game over");
                TickOutcome::GameOver(reason)
            }
            None => outcome,
        }
    }

    fn next_wave(&mut self) {
        let wave = self.formation.wave + 1;
        self.formation = Formation::spawn(wave, self.sizes.alien, &self.options);
        self.bullets.clear();
        self.alien_fire_timer = self.alien_fire_interval();
        tracing::info!(wave, score = self.score, "wave cleared");
    }

    fn update_player(&mut self, dt: f32, input: Input) {
        let player = &mut self.player;
        player.invulnerable = (player.invulnerable - dt).max(0.0);
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);

        let mut dir = 0.0;
        if input.left {
            dir -= 1.0;
        }
        if input.right {
            dir += 1.0;
        }
        let max_x = (FIELD_WIDTH - player.width).max(0.0);
        player.x = (player.x + dir * self.options.player_speed * dt).clamp(0.0, max_x);

        if input.fire
            && self.fire_cooldown <= 0.0
            && self.player_bullets_in_flight() < MAX_PLAYER_BULLETS
        {
            let size = self.sizes.bullet;
            let bullet = Bullet::new(
                BulletKind::Player,
                self.player.center_x() - size.width / 2.0,
                self.player.y - size.height,
                size,
                -self.options.missile_speed,
            );
            self.bullets.push(bullet);
            self.fire_cooldown = self.options.fire_cooldown;
        }
    }

    fn update_bullets(&mut self, dt: f32) {
        for bullet in self.bullets.iter_mut().filter(|b| b.alive) {
            bullet.y += bullet.vy * dt;
            let b = bullet.bounds();
            if b.bottom() <= 0.0 || b.y >= FIELD_HEIGHT {
                bullet.alive = false;
            }
        }
    }

    fn update_alien_fire(&mut self, dt: f32) {
        self.alien_fire_timer -= dt;
        if self.alien_fire_timer > 0.0 {
            return;
        }
        self.alien_fire_timer = self.alien_fire_interval();

        let shooters = self.formation.shooters();
        if shooters.is_empty() {
            return;
        }
        let pick = shooters[self.rng.gen_range(0..shooters.len())];
        let alien = self.formation.aliens[pick].bounds();
        let size = self.sizes.bullet;
        self.bullets.push(Bullet::new(
            BulletKind::Alien,
            alien.x + alien.width / 2.0 - size.width / 2.0,
            alien.bottom(),
            size,
            ALIEN_BULLET_SPEED,
        ));
    }

    fn resolve_collisions(&mut self) {
        // Player bullets in spawn order against aliens in grid order. A bullet
        // kills at most one alien and a dead alien cannot be hit again.
        for bullet in self
            .bullets
            .iter_mut()
            .filter(|b| b.alive && b.kind == BulletKind::Player)
        {
            let b = bullet.bounds();
            if let Some(alien) = self
                .formation
                .aliens
                .iter_mut()
                .find(|a| a.alive && a.bounds().intersects(&b))
            {
                alien.alive = false;
                bullet.alive = false;
                self.score += ALIEN_POINTS;
            }
        }

        for bullet in self
            .bullets
            .iter_mut()
            .filter(|b| b.alive && b.kind == BulletKind::Alien)
        {
            if self.game_over.is_some() || self.player.is_invulnerable() {
                break;
            }
            if bullet.bounds().intersects(&self.player.bounds()) {
                bullet.alive = false;
                if hit_player(&mut self.player, self.options.invulnerable_secs) {
                    self.game_over = Some(GameOverReason::LivesExhausted);
                }
            }
        }

        let line = self.player.y;
        if self.game_over.is_none()
            && self
                .formation
                .aliens
                .iter()
                .any(|a| a.alive && a.bounds().bottom() >= line)
        {
            self.game_over = Some(GameOverReason::AlienBreach);
        }
    }
}

/// Takes a life. Returns true when none are left; otherwise respawns the ship
/// at the centre behind a shield.
fn hit_player(player: &mut Player, invulnerable_secs: f32) -> bool {
    player.lives = player.lives.saturating_sub(1);
    if player.lives == 0 {
        player.alive = false;
        return true;
    }
    player.x = (FIELD_WIDTH - player.width) / 2.0;
    player.invulnerable = invulnerable_secs;
    tracing::debug!(lives = player.lives, "player hit");
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Alien, ALIEN_STEP_DOWN, FIXED_DT};

    fn options() -> Options {
        Options {
            invulnerable_secs: 0.0,
            // Keep the aliens quiet unless a test wants them to shoot.
            alien_fire_interval: 3.0,
            ..Options::default()
        }
    }

    fn world() -> World {
        World::new(&options(), EntitySizes::default(), 7)
    }

    fn idle() -> Input {
        Input::default()
    }

    fn alien_bullet_on_player(world: &mut World) {
        let p = world.player.bounds();
        world.bullets.push(Bullet::new(
            BulletKind::Alien,
            p.x + 5.0,
            p.y + 5.0,
            EntitySizes::default().bullet,
            0.0,
        ));
    }

    fn player_bullet_on(alien: &Alien) -> Bullet {
        let a = alien.bounds();
        Bullet::new(BulletKind::Player, a.x + 5.0, a.y + 5.0, EntitySizes::default().bullet, 0.0)
    }

    #[test]
    fn player_stays_in_bounds_under_extreme_input() {
        let mut w = world();
        let right = Input { right: true, ..idle() };
        let left = Input { left: true, ..idle() };
        let max_x = FIELD_WIDTH - w.player.width;

        w.advance(10.0, right);
        assert_eq!(w.player.x, max_x);
        for _ in 0..200 {
            w.advance(FIXED_DT, right);
            assert!(w.player.x >= 0.0 && w.player.x <= max_x);
        }

        let mut w = world();
        w.advance(10.0, left);
        assert_eq!(w.player.x, 0.0);
        w.advance(FIXED_DT, Input { left: true, right: true, fire: true });
        assert_eq!(w.player.x, 0.0);
    }

    #[test]
    fn fire_cooldown_allows_one_shot() {
        let mut w = World::new(
            &Options { fire_cooldown: 0.5, ..options() },
            EntitySizes::default(),
            1,
        );
        // Fire up an empty lane so no shot lands.
        w.player.x = 0.0;
        let fire = Input { fire: true, ..idle() };

        w.advance(0.1, fire);
        assert_eq!(w.player_bullets_in_flight(), 1);
        w.advance(0.1, fire);
        assert_eq!(w.player_bullets_in_flight(), 1);

        for _ in 0..4 {
            w.advance(0.1, idle());
        }
        w.advance(0.1, fire);
        assert_eq!(w.player_bullets_in_flight(), 2);
    }

    #[test]
    fn idle_cooldown_bottoms_out_at_zero() {
        let mut w = World::new(
            &Options { fire_cooldown: 0.5, ..options() },
            EntitySizes::default(),
            1,
        );
        w.player.x = 0.0;
        for _ in 0..60 {
            w.advance(FIXED_DT, idle());
        }
        assert_eq!(w.fire_cooldown, 0.0);

        let fire = Input { fire: true, ..idle() };
        w.advance(FIXED_DT, fire);
        assert_eq!(w.player_bullets_in_flight(), 1);
        assert_eq!(w.fire_cooldown, 0.5);
    }

    #[test]
    fn player_bullets_are_capped() {
        let mut w = World::new(
            &Options { fire_cooldown: 0.05, missile_speed: 300.0, ..options() },
            EntitySizes::default(),
            1,
        );
        // Move under an empty lane so no bullet hits anything.
        w.player.x = 0.0;
        let fire = Input { fire: true, ..idle() };
        let mut most = 0;
        for _ in 0..40 {
            w.advance(0.05, fire);
            most = most.max(w.player_bullets_in_flight());
        }
        assert_eq!(most, MAX_PLAYER_BULLETS);
    }

    #[test]
    fn bullets_leave_the_field() {
        let mut w = world();
        w.advance(FIXED_DT, Input { fire: true, ..idle() });
        assert_eq!(w.player_bullets_in_flight(), 1);
        w.player.x = 0.0;
        w.bullets[0].x = 0.0;
        for _ in 0..120 {
            w.advance(FIXED_DT, idle());
        }
        assert_eq!(w.player_bullets_in_flight(), 0);
    }

    #[test]
    fn bullet_hit_kills_alien_and_scores() {
        let mut w = world();
        let bullet = player_bullet_on(&w.formation.aliens[0]);
        w.bullets.push(bullet);

        assert_eq!(w.advance(FIXED_DT, idle()), TickOutcome::Continue);
        assert!(!w.formation.aliens[0].alive);
        assert_eq!(w.score, ALIEN_POINTS);
        assert_eq!(w.player_bullets_in_flight(), 0);
    }

    #[test]
    fn two_bullets_on_one_alien_score_once() {
        let mut w = world();
        let target = w.formation.aliens[12].clone();
        w.bullets.push(player_bullet_on(&target));
        w.bullets.push(player_bullet_on(&target));

        w.advance(FIXED_DT, idle());
        assert!(!w.formation.aliens[12].alive);
        assert_eq!(w.formation.alive_count(), w.formation.total() - 1);
        assert_eq!(w.score, ALIEN_POINTS);
        // The losing bullet keeps flying.
        assert_eq!(w.player_bullets_in_flight(), 1);
    }

    #[test]
    fn disjoint_hits_resolve_regardless_of_bullet_order() {
        let run = |reverse: bool| {
            let mut w = world();
            let mut shots = vec![
                player_bullet_on(&w.formation.aliens[3]),
                player_bullet_on(&w.formation.aliens[27]),
            ];
            if reverse {
                shots.reverse();
            }
            w.bullets.extend(shots);
            w.advance(FIXED_DT, idle());
            let alive: Vec<bool> = w.formation.aliens.iter().map(|a| a.alive).collect();
            (alive, w.score)
        };
        assert_eq!(run(false), run(true));
        assert_eq!(run(false).1, 2 * ALIEN_POINTS);
    }

    #[test]
    fn three_hits_end_the_game_on_the_third() {
        let mut w = world();
        assert_eq!(w.lives(), 3);

        alien_bullet_on_player(&mut w);
        assert_eq!(w.advance(FIXED_DT, idle()), TickOutcome::Continue);
        assert_eq!(w.lives(), 2);

        alien_bullet_on_player(&mut w);
        assert_eq!(w.advance(FIXED_DT, idle()), TickOutcome::Continue);
        assert_eq!(w.lives(), 1);
        assert!(w.game_over().is_none());

        alien_bullet_on_player(&mut w);
        assert_eq!(
            w.advance(FIXED_DT, idle()),
            TickOutcome::GameOver(GameOverReason::LivesExhausted)
        );
        assert_eq!(w.lives(), 0);
        assert!(!w.player.alive);
    }

    #[test]
    fn hit_respawns_player_with_shield() {
        let mut w = World::new(&Options { invulnerable_secs: 2.0, ..options() }, EntitySizes::default(), 3);
        w.player.x = 0.0;
        alien_bullet_on_player(&mut w);
        w.advance(FIXED_DT, idle());
        assert_eq!(w.lives(), 2);
        assert_eq!(w.player.x, (FIELD_WIDTH - w.player.width) / 2.0);
        assert!(w.player.is_invulnerable());

        alien_bullet_on_player(&mut w);
        w.advance(FIXED_DT, idle());
        assert_eq!(w.lives(), 2, "shielded player must not lose a life");
    }

    #[test]
    fn last_kill_triggers_next_wave_on_following_tick() {
        let mut w = world();
        for alien in w.formation.aliens.iter_mut().skip(1) {
            alien.alive = false;
        }
        let bullet = player_bullet_on(&w.formation.aliens[0]);
        w.bullets.push(bullet);

        assert_eq!(w.advance(FIXED_DT, idle()), TickOutcome::Continue);
        assert!(w.formation.is_cleared());
        assert_eq!(w.score, ALIEN_POINTS);
        assert_eq!(w.wave(), 1);

        assert_eq!(w.advance(FIXED_DT, idle()), TickOutcome::WaveCleared(2));
        assert_eq!(w.wave(), 2);
        assert_eq!(w.formation.alive_count(), w.formation.total());
        assert!(w.formation.speed() > options().alien_speed_base);
    }

    #[test]
    fn alien_breach_ends_game_with_lives_left() {
        let mut w = world();
        let line = w.player.y;
        let alien = &mut w.formation.aliens[45];
        alien.y = line - alien.height + ALIEN_STEP_DOWN;

        assert_eq!(
            w.advance(FIXED_DT, idle()),
            TickOutcome::GameOver(GameOverReason::AlienBreach)
        );
        assert_eq!(w.lives(), 3);
        // Further ticks are inert.
        let before = w.player.clone();
        assert_eq!(
            w.advance(FIXED_DT, Input { right: true, ..idle() }),
            TickOutcome::GameOver(GameOverReason::AlienBreach)
        );
        assert_eq!(w.player, before);
    }

    #[test]
    fn aliens_fire_from_the_bottom_row() {
        let mut w = World::new(&Options { alien_fire_interval: 0.25, ..options() }, EntitySizes::default(), 11);
        let mut ticks = 0;
        while w.bullets.iter().all(|b| b.kind != BulletKind::Alien) {
            w.advance(FIXED_DT, idle());
            ticks += 1;
            assert!(ticks < 60, "no alien fired");
        }
        let bullet = w.bullets.iter().find(|b| b.kind == BulletKind::Alien).unwrap();
        assert!(bullet.vy > 0.0);
        let shooter = w
            .formation
            .shooters()
            .into_iter()
            .map(|i| w.formation.aliens[i].bounds())
            .find(|a| ((a.x + a.width / 2.0) - (bullet.x + bullet.width / 2.0)).abs() < 1e-3)
            .expect("bullet should leave from a shooter");
        assert_eq!(bullet.y, shooter.bottom());
    }

    #[test]
    fn fire_interval_shrinks_with_losses_and_waves() {
        let mut w = world();
        let full = w.alien_fire_interval();
        for alien in w.formation.aliens.iter_mut().take(40) {
            alien.alive = false;
        }
        assert!(w.alien_fire_interval() < full);

        let mut later = world();
        later.formation = Formation::spawn(4, EntitySizes::default().alien, &options());
        assert!(later.alien_fire_interval() < full);
    }

    #[test]
    fn apply_options_keeps_lives() {
        let mut w = world();
        let faster = Options {
            starting_lives: 5,
            alien_speed_base: 240.0,
            ..options()
        };
        w.apply_options(&faster);
        assert_eq!(w.lives(), 3);
        assert_eq!(w.formation.speed(), 240.0);
    }
}
