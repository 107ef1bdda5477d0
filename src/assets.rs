use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::{EntitySizes, Size};

pub const PLAYER_ASSET: &str = "player.json";
pub const ALIEN_ASSET: &str = "alien.json";
pub const BULLET_ASSET: &str = "bullet.json";

/// Placeholder sprite: a solid rectangle of one colour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    pub color: [u8; 3],
}

impl Sprite {
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assets {
    pub player: Sprite,
    pub alien: Sprite,
    pub bullet: Sprite,
}

impl Assets {
    /// The set written by `make_assets`.
    pub fn placeholders() -> Self {
        Assets {
            player: Sprite { width: 40.0, height: 30.0, color: [0, 255, 0] },
            alien: Sprite { width: 30.0, height: 30.0, color: [255, 0, 0] },
            bullet: Sprite { width: 5.0, height: 10.0, color: [255, 255, 255] },
        }
    }

    pub fn load(dir: &Path) -> Result<Self> {
        Ok(Assets {
            player: load_sprite(&dir.join(PLAYER_ASSET))?,
            alien: load_sprite(&dir.join(ALIEN_ASSET))?,
            bullet: load_sprite(&dir.join(BULLET_ASSET))?,
        })
    }

    pub fn write(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create asset directory {}", dir.display()))?;
        for (name, sprite) in [
            (PLAYER_ASSET, &self.player),
            (ALIEN_ASSET, &self.alien),
            (BULLET_ASSET, &self.bullet),
        ] {
            let path = dir.join(name);
            let json = serde_json::to_string_pretty(sprite)?;
            fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        }
        Ok(())
    }

    pub fn sizes(&self) -> EntitySizes {
        EntitySizes {
            player: self.player.size(),
            alien: self.alien.size(),
            bullet: self.bullet.size(),
        }
    }
}

fn load_sprite(path: &Path) -> Result<Sprite> {
    let text = fs::read_to_string(path).with_context(|| {
        format!(
            "missing sprite asset {} (run `make_assets` to generate placeholders)",
            path.display()
        )
    })?;
    let sprite: Sprite = serde_json::from_str(&text)
        .with_context(|| format!("invalid sprite asset {}", path.display()))?;
    if !(sprite.width > 0.0 && sprite.height > 0.0) {
        bail!(
            "sprite asset {} has a non-positive size {}x{}",
            path.display(),
            sprite.width,
            sprite.height
        );
    }
    Ok(sprite)
}
