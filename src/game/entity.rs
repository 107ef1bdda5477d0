//! Entity records for the play field. Pure data plus bounding boxes.

/// Axis-aligned rectangle in world units, origin at the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "negative rect size");
        Rect { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Edges that only touch do not count as an overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Anything that lives on the field and can collide.
pub trait Entity {
    fn bounds(&self) -> Rect;
    fn is_alive(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Sprite footprints used to build entities. Defaults match the placeholder
/// sprites written by `make_assets`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySizes {
    pub player: Size,
    pub alien: Size,
    pub bullet: Size,
}

impl Default for EntitySizes {
    fn default() -> Self {
        EntitySizes {
            player: Size { width: 40.0, height: 30.0 },
            alien: Size { width: 30.0, height: 30.0 },
            bullet: Size { width: 5.0, height: 10.0 },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lives: u32,
    pub alive: bool,
    /// Seconds of invulnerability left after a hit.
    pub invulnerable: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, size: Size, lives: u32) -> Self {
        debug_assert!(size.width >= 0.0 && size.height >= 0.0);
        Player {
            x,
            y,
            width: size.width,
            height: size.height,
            lives,
            alive: true,
            invulnerable: 0.0,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub row: usize,
    pub col: usize,
    pub alive: bool,
}

impl Alien {
    pub fn new(x: f32, y: f32, size: Size, row: usize, col: usize) -> Self {
        debug_assert!(size.width >= 0.0 && size.height >= 0.0);
        Alien {
            x,
            y,
            width: size.width,
            height: size.height,
            row,
            col,
            alive: true,
        }
    }
}

impl Entity for Alien {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Alien,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub kind: BulletKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity in units per second. Negative travels up.
    pub vy: f32,
    pub alive: bool,
}

impl Bullet {
    pub fn new(kind: BulletKind, x: f32, y: f32, size: Size, vy: f32) -> Self {
        debug_assert!(size.width >= 0.0 && size.height >= 0.0);
        Bullet {
            kind,
            x,
            y,
            width: size.width,
            height: size.height,
            vy,
            alive: true,
        }
    }
}

impl Entity for Bullet {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
