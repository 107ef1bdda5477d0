use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const HIGH_SCORE_FILE: &str = "high_score.json";

#[derive(Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

/// Best score ever recorded, persisted as a single JSON record.
#[derive(Clone, Debug)]
pub struct HighScore {
    best: u32,
    path: PathBuf,
}

impl HighScore {
    /// Missing or corrupt files read as zero.
    pub fn load(path: &Path) -> Self {
        let best = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<HighScoreRecord>(&text) {
                Ok(record) => record.high_score,
                Err(e) => {
                    tracing::warn!("corrupt high score file {}: {e}", path.display());
                    0
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                tracing::warn!("failed to read {}: {e}", path.display());
                0
            }
        };
        HighScore {
            best,
            path: path.to_path_buf(),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Would `score` replace the stored value?
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Writes the file only when `score` beats the stored value.
    /// Returns whether a write happened.
    pub fn record(&mut self, score: u32) -> io::Result<bool> {
        if !self.qualifies(score) {
            return Ok(false);
        }
        self.write_file(score)?;
        self.best = score;
        tracing::info!(score, "new high score saved");
        Ok(true)
    }

    fn write_file(&self, score: u32) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json)
    }
}
