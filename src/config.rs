use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

pub const OPTIONS_FILE: &str = "game_options.json";

/// Tunable gameplay parameters. Speeds are world units per second,
/// timers are seconds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Options {
    pub starting_lives: u32,
    pub player_speed: f32,
    pub missile_speed: f32,
    pub alien_speed_base: f32,
    pub invader_speed_increment: f32,
    pub fire_cooldown: f32,
    pub alien_fire_interval: f32,
    pub invulnerable_secs: f32,
    pub speed_up_with_losses: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            starting_lives: 3,
            player_speed: 480.0,
            missile_speed: 600.0,
            alien_speed_base: 120.0,
            invader_speed_increment: 1.2,
            fire_cooldown: 1.0 / 6.0,
            alien_fire_interval: 1.0,
            invulnerable_secs: 2.0,
            speed_up_with_losses: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Float(v) => write!(f, "{v:.2}"),
            OptionValue::Bool(true) => write!(f, "On"),
            OptionValue::Bool(false) => write!(f, "Off"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OptionKind {
    Int { min: i64, max: i64, step: i64 },
    Float { min: f64, max: f64, step: f64 },
    Bool,
}

/// Menu and validation metadata for one option key.
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: OptionKind,
}

pub static OPTION_SPECS: [OptionSpec; 9] = [
    OptionSpec { key: "starting_lives", label: "Lives", kind: OptionKind::Int { min: 1, max: 5, step: 1 } },
    OptionSpec { key: "player_speed", label: "Player Speed", kind: OptionKind::Float { min: 120.0, max: 960.0, step: 60.0 } },
    OptionSpec { key: "missile_speed", label: "Missile Speed", kind: OptionKind::Float { min: 300.0, max: 1200.0, step: 60.0 } },
    OptionSpec { key: "alien_speed_base", label: "Invader Speed", kind: OptionKind::Float { min: 30.0, max: 360.0, step: 30.0 } },
    OptionSpec { key: "invader_speed_increment", label: "Invader Speed Increment", kind: OptionKind::Float { min: 1.0, max: 2.0, step: 0.1 } },
    OptionSpec { key: "fire_cooldown", label: "Fire Cooldown (s)", kind: OptionKind::Float { min: 0.05, max: 1.0, step: 0.05 } },
    OptionSpec { key: "alien_fire_interval", label: "Invader Fire Interval (s)", kind: OptionKind::Float { min: 0.25, max: 3.0, step: 0.25 } },
    OptionSpec { key: "invulnerable_secs", label: "Respawn Shield (s)", kind: OptionKind::Float { min: 0.0, max: 5.0, step: 0.5 } },
    OptionSpec { key: "speed_up_with_losses", label: "Speed Up As Invaders Fall", kind: OptionKind::Bool },
];

pub fn spec_for(key: &str) -> Option<&'static OptionSpec> {
    OPTION_SPECS.iter().find(|s| s.key == key)
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    UnknownKey(String),
    WrongType { key: &'static str },
    OutOfRange { key: &'static str, value: f64, min: f64, max: f64 },
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::UnknownKey(key) => write!(f, "unknown option '{key}'"),
            OptionsError::WrongType { key } => write!(f, "wrong value type for '{key}'"),
            OptionsError::OutOfRange { key, value, min, max } => {
                write!(f, "'{key}' = {value} is outside [{min}, {max}]")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

impl Options {
    /// Reads the options file. A missing or unreadable file gives the
    /// defaults; bad keys fall back one at a time.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("no options file at {}, using defaults", path.display());
                return Options::default();
            }
            Err(e) => {
                tracing::warn!("failed to read {}: {e}; using defaults", path.display());
                return Options::default();
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(map) => Self::from_map(&map),
            Err(e) => {
                tracing::warn!("malformed options file {}: {e}; using defaults", path.display());
                Options::default()
            }
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut options = Options::default();
        for (key, raw) in map {
            let Some(spec) = spec_for(key) else {
                tracing::debug!("ignoring unknown option '{key}'");
                continue;
            };
            let value = match spec.kind {
                OptionKind::Int { .. } => raw.as_i64().map(OptionValue::Int),
                OptionKind::Float { .. } => raw.as_f64().map(OptionValue::Float),
                OptionKind::Bool => raw.as_bool().map(OptionValue::Bool),
            };
            let result = match value {
                Some(value) => options.set(key, value),
                None => Err(OptionsError::WrongType { key: spec.key }),
            };
            if let Err(e) = result {
                tracing::warn!("{e}; using default");
            }
        }
        options
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    pub fn get(&self, key: &str) -> Option<OptionValue> {
        let value = match key {
            "starting_lives" => OptionValue::Int(self.starting_lives as i64),
            "player_speed" => OptionValue::Float(self.player_speed as f64),
            "missile_speed" => OptionValue::Float(self.missile_speed as f64),
            "alien_speed_base" => OptionValue::Float(self.alien_speed_base as f64),
            "invader_speed_increment" => OptionValue::Float(self.invader_speed_increment as f64),
            "fire_cooldown" => OptionValue::Float(self.fire_cooldown as f64),
            "alien_fire_interval" => OptionValue::Float(self.alien_fire_interval as f64),
            "invulnerable_secs" => OptionValue::Float(self.invulnerable_secs as f64),
            "speed_up_with_losses" => OptionValue::Bool(self.speed_up_with_losses),
            _ => return None,
        };
        Some(value)
    }

    /// Validated write. Leaves the current value untouched on error.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<(), OptionsError> {
        let spec = spec_for(key).ok_or_else(|| OptionsError::UnknownKey(key.to_string()))?;
        match (spec.kind, value) {
            (OptionKind::Int { min, max, .. }, OptionValue::Int(v)) => {
                if v < min || v > max {
                    return Err(OptionsError::OutOfRange {
                        key: spec.key,
                        value: v as f64,
                        min: min as f64,
                        max: max as f64,
                    });
                }
                self.set_int(spec.key, v);
            }
            (OptionKind::Float { min, max, .. }, OptionValue::Float(v)) => {
                if !v.is_finite() || v < min || v > max {
                    return Err(OptionsError::OutOfRange { key: spec.key, value: v, min, max });
                }
                self.set_float(spec.key, v as f32);
            }
            (OptionKind::Bool, OptionValue::Bool(v)) => self.speed_up_with_losses = v,
            _ => return Err(OptionsError::WrongType { key: spec.key }),
        }
        Ok(())
    }

    /// One menu step up or down, clamped to the key's range. Booleans toggle.
    pub fn adjust(&mut self, key: &str, increase: bool) -> Result<(), OptionsError> {
        let spec = spec_for(key).ok_or_else(|| OptionsError::UnknownKey(key.to_string()))?;
        let current = self.get(spec.key).ok_or(OptionsError::WrongType { key: spec.key })?;
        let next = match (spec.kind, current) {
            (OptionKind::Int { min, max, step }, OptionValue::Int(v)) => {
                let v = if increase { v + step } else { v - step };
                OptionValue::Int(v.clamp(min, max))
            }
            (OptionKind::Float { min, max, step }, OptionValue::Float(v)) => {
                let v = if increase { v + step } else { v - step };
                // f32 storage drifts; snap to four decimals.
                let v = (v.clamp(min, max) * 10_000.0).round() / 10_000.0;
                OptionValue::Float(v.clamp(min, max))
            }
            (OptionKind::Bool, OptionValue::Bool(v)) => OptionValue::Bool(!v),
            _ => return Err(OptionsError::WrongType { key: spec.key }),
        };
        self.set(spec.key, next)
    }

    fn set_int(&mut self, key: &str, v: i64) {
        if key == "starting_lives" {
            self.starting_lives = v as u32;
        }
    }

    fn set_float(&mut self, key: &str, v: f32) {
        match key {
            "player_speed" => self.player_speed = v,
            "missile_speed" => self.missile_speed = v,
            "alien_speed_base" => self.alien_speed_base = v,
            "invader_speed_increment" => self.invader_speed_increment = v,
            "fire_cooldown" => self.fire_cooldown = v,
            "alien_fire_interval" => self.alien_fire_interval = v,
            "invulnerable_secs" => self.invulnerable_secs = v,
            _ => {}
        }
    }
}
