use invaders::config::Options;
use invaders::game::{
    BulletKind, EntitySizes, Input, TickOutcome, World, ALIEN_POINTS, FIELD_WIDTH, FIXED_DT,
};

/// Deterministic input script: sweep left and right while firing in bursts.
fn scripted_input(tick: u64) -> Input {
    let phase = (tick / 90) % 4;
    Input {
        left: phase == 1 || phase == 2,
        right: phase == 0 || phase == 3,
        fire: tick % 7 < 3,
    }
}

#[test]
fn same_seed_same_run() {
    let options = Options::default();
    let mut a = World::new(&options, EntitySizes::default(), 0xC0FFEE);
    let mut b = World::new(&options, EntitySizes::default(), 0xC0FFEE);

    for tick in 0..3_000 {
        let input = scripted_input(tick);
        let out_a = a.advance(FIXED_DT, input);
        let out_b = b.advance(FIXED_DT, input);
        assert_eq!(out_a, out_b, "outcome diverged at tick {tick}");
        assert_eq!(a.player(), b.player());
        assert_eq!(a.formation(), b.formation());
        assert_eq!(a.bullets(), b.bullets());
        assert_eq!(a.score(), b.score());
    }
}

#[test]
fn invariants_hold_over_a_long_session() {
    let options = Options {
        starting_lives: 5,
        ..Options::default()
    };
    let mut world = World::new(&options, EntitySizes::default(), 99);
    let mut lives = world.lives();
    let mut wave = world.wave();

    for tick in 0..20_000 {
        let outcome = world.advance(FIXED_DT, scripted_input(tick));

        let player = world.player();
        assert!(player.x >= 0.0 && player.x <= FIELD_WIDTH - player.width);
        assert!(world.lives() <= lives, "lives went up");
        assert_eq!(world.score() % ALIEN_POINTS, 0);
        assert!(world.wave() >= wave);
        assert!(world.formation().alive_count() <= world.formation().total());
        assert!(world.bullets().iter().all(|b| b.alive));
        assert!(
            world
                .bullets()
                .iter()
                .filter(|b| b.kind == BulletKind::Player)
                .all(|b| b.vy < 0.0)
        );
        if let TickOutcome::WaveCleared(n) = outcome {
            assert_eq!(n, wave + 1);
        }
        lives = world.lives();
        wave = world.wave();

        if let TickOutcome::GameOver(_) = outcome {
            // Finished sessions stay finished.
            let score = world.score();
            assert_eq!(world.advance(FIXED_DT, Input::default()), outcome);
            assert_eq!(world.score(), score);
            return;
        }
    }
}
