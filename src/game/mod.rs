pub mod entity;
pub mod formation;
pub mod world;

pub use entity::{Alien, Bullet, BulletKind, Entity, EntitySizes, Player, Rect, Size};
pub use formation::Formation;
pub use world::{GameOverReason, Input, TickOutcome, World};

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 600.0;
pub const FPS: u32 = 60;
pub const FIXED_DT: f32 = 1.0 / FPS as f32;

/// Top of the player ship, measured from the top of the field.
pub const PLAYER_Y: f32 = FIELD_HEIGHT - 60.0;
pub const MAX_PLAYER_BULLETS: usize = 10;
pub const ALIEN_BULLET_SPEED: f32 = 300.0;
pub const ALIEN_POINTS: u32 = 100;

pub const ALIEN_ROWS: usize = 5;
pub const ALIEN_COLS: usize = 10;
pub const ALIEN_ORIGIN_X: f32 = 50.0;
pub const ALIEN_ORIGIN_Y: f32 = 50.0;
pub const ALIEN_H_SPACING: f32 = 70.0;
pub const ALIEN_V_SPACING: f32 = 50.0;
pub const ALIEN_STEP_DOWN: f32 = 20.0;
