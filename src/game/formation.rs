use crate::config::Options;
use crate::game::entity::{Alien, Entity, Size};
use crate::game::{
    ALIEN_COLS, ALIEN_H_SPACING, ALIEN_ORIGIN_X, ALIEN_ORIGIN_Y, ALIEN_ROWS, ALIEN_STEP_DOWN,
    ALIEN_V_SPACING,
};

/// The alien block and its shared movement state.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub aliens: Vec<Alien>,
    /// 1.0 = right, -1.0 = left
    pub direction: f32,
    pub wave: u32,
    total: usize,
    wave_speed: f32,
    speed_up_with_losses: bool,
}

impl Formation {
    pub fn spawn(wave: u32, size: Size, options: &Options) -> Self {
        let mut aliens = Vec::with_capacity(ALIEN_ROWS * ALIEN_COLS);
        for row in 0..ALIEN_ROWS {
            for col in 0..ALIEN_COLS {
                aliens.push(Alien::new(
                    ALIEN_ORIGIN_X + col as f32 * ALIEN_H_SPACING,
                    ALIEN_ORIGIN_Y + row as f32 * ALIEN_V_SPACING,
                    size,
                    row,
                    col,
                ));
            }
        }
        let mut formation = Formation {
            total: aliens.len(),
            aliens,
            direction: 1.0,
            wave,
            wave_speed: 0.0,
            speed_up_with_losses: options.speed_up_with_losses,
        };
        formation.retune(options);
        formation
    }

    /// Recomputes the speed scalar after an options change.
    pub fn retune(&mut self, options: &Options) {
        let exponent = self.wave.saturating_sub(1) as i32;
        self.wave_speed = options.alien_speed_base * options.invader_speed_increment.powi(exponent);
        self.speed_up_with_losses = options.speed_up_with_losses;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn alive_count(&self) -> usize {
        self.aliens.iter().filter(|a| a.alive).count()
    }

    pub fn is_cleared(&self) -> bool {
        self.aliens.iter().all(|a| !a.alive)
    }

    /// Horizontal speed in units per second.
    pub fn speed(&self) -> f32 {
        if !self.speed_up_with_losses || self.total == 0 {
            return self.wave_speed;
        }
        let lost = 1.0 - self.alive_count() as f32 / self.total as f32;
        self.wave_speed * (1.0 + lost)
    }

    /// Moves the block sideways, or reverses and steps down once if any
    /// living alien would cross an edge. Returns true on a reversal.
    pub fn advance(&mut self, dt: f32, field_width: f32) -> bool {
        let dx = self.direction * self.speed() * dt;
        let hits_edge = self
            .aliens
            .iter()
            .filter(|a| a.alive)
            .any(|a| {
                let b = a.bounds();
                b.x + dx < 0.0 || b.right() + dx > field_width
            });

        if hits_edge {
            self.direction = -self.direction;
            for alien in self.aliens.iter_mut().filter(|a| a.alive) {
                alien.y += ALIEN_STEP_DOWN;
            }
        } else {
            for alien in self.aliens.iter_mut().filter(|a| a.alive) {
                alien.x += dx;
            }
        }
        hits_edge
    }

    /// Indices of the lowest living alien in each column, left to right.
    pub fn shooters(&self) -> Vec<usize> {
        let mut lowest: [Option<usize>; ALIEN_COLS] = [None; ALIEN_COLS];
        for (i, alien) in self.aliens.iter().enumerate() {
            if !alien.alive || alien.col >= ALIEN_COLS {
                continue;
            }
            let slot = &mut lowest[alien.col];
            match *slot {
                Some(j) if self.aliens[j].y >= alien.y => {}
                _ => *slot = Some(i),
            }
        }
        lowest.into_iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EntitySizes, FIELD_WIDTH};

    fn formation() -> Formation {
        Formation::spawn(1, EntitySizes::default().alien, &Options::default())
    }

    #[test]
    fn spawns_full_grid() {
        let f = formation();
        assert_eq!(f.total(), ALIEN_ROWS * ALIEN_COLS);
        assert_eq!(f.alive_count(), f.total());
        assert!(!f.is_cleared());
        assert_eq!(f.direction, 1.0);
    }

    #[test]
    fn reversal_steps_down_exactly_once() {
        let mut f = formation();
        let start: Vec<f32> = f.aliens.iter().map(|a| a.y).collect();

        let mut reversals = 0;
        let mut ticks = 0;
        while reversals == 0 {
            if f.advance(1.0 / 60.0, FIELD_WIDTH) {
                reversals += 1;
            }
            ticks += 1;
            assert!(ticks < 10_000, "formation never reached the edge");
        }
        assert_eq!(f.direction, -1.0);
        for (alien, y0) in f.aliens.iter().zip(&start) {
            assert_eq!(alien.y, y0 + ALIEN_STEP_DOWN);
        }

        // The tick after a reversal moves inward without another step.
        assert!(!f.advance(1.0 / 60.0, FIELD_WIDTH));
        for (alien, y0) in f.aliens.iter().zip(&start) {
            assert_eq!(alien.y, y0 + ALIEN_STEP_DOWN);
        }
    }

    #[test]
    fn dead_aliens_do_not_trigger_reversal() {
        let mut f = formation();
        // Kill the right-most column, then park a corpse past the edge.
        for alien in f.aliens.iter_mut().filter(|a| a.col == ALIEN_COLS - 1) {
            alien.alive = false;
            alien.x = FIELD_WIDTH + 50.0;
        }
        assert!(!f.advance(1.0 / 60.0, FIELD_WIDTH));
    }

    #[test]
    fn speed_rises_as_aliens_fall_and_waves_advance() {
        let options = Options::default();
        let mut f = formation();
        let full = f.speed();
        assert_eq!(full, options.alien_speed_base);

        for alien in f.aliens.iter_mut().take(25) {
            alien.alive = false;
        }
        assert!((f.speed() - full * 1.5).abs() < 1e-3);

        let wave3 = Formation::spawn(3, EntitySizes::default().alien, &options);
        let expected = options.alien_speed_base * options.invader_speed_increment.powi(2);
        assert!((wave3.speed() - expected).abs() < 1e-3);
    }

    #[test]
    fn speed_up_can_be_disabled() {
        let options = Options {
            speed_up_with_losses: false,
            ..Options::default()
        };
        let mut f = Formation::spawn(1, EntitySizes::default().alien, &options);
        for alien in f.aliens.iter_mut().take(40) {
            alien.alive = false;
        }
        assert_eq!(f.speed(), options.alien_speed_base);
    }

    #[test]
    fn shooters_are_lowest_per_column() {
        let mut f = formation();
        let bottom = ALIEN_ROWS - 1;
        // Column 2 loses its bottom alien, column 5 is wiped out.
        for alien in f.aliens.iter_mut() {
            if (alien.col == 2 && alien.row == bottom) || alien.col == 5 {
                alien.alive = false;
            }
        }
        let shooters = f.shooters();
        assert_eq!(shooters.len(), ALIEN_COLS - 1);
        for &i in &shooters {
            let alien = &f.aliens[i];
            let expected_row = if alien.col == 2 { bottom - 1 } else { bottom };
            assert_eq!(alien.row, expected_row);
        }
        assert!(shooters.iter().all(|&i| f.aliens[i].col != 5));
    }
}
