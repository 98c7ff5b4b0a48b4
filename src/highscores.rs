//! High score persistence
//!
//! One best score per theme, stored under the theme's key
//! (`cowboyHighScore`, `DungeonHighScore`).

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::error::{Result, RunnerError};

/// Persistence collaborator
pub trait HighScoreStore {
    /// Stored score for `key`, 0 if none
    fn load_high_score(&self, key: &str) -> Result<u64>;
    fn save_high_score(&mut self, key: &str, value: u64) -> Result<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    scores: HashMap<String, u64>,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: u64) {
        self.scores.insert(key.into(), value);
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load_high_score(&self, key: &str) -> Result<u64> {
        Ok(self.scores.get(key).copied().unwrap_or(0))
    }

    fn save_high_score(&mut self, key: &str, value: u64) -> Result<()> {
        self.scores.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file store: `{ "cowboyHighScore": 1234, ... }`
#[derive(Debug, Clone)]
pub struct JsonFileHighScores {
    path: PathBuf,
    scores: BTreeMap<String, u64>,
}

impl JsonFileHighScores {
    /// Open a store, reading the file if it exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            return Err(RunnerError::storage(format!("{} is a directory", path.display())));
        }
        let scores = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let scores: BTreeMap<String, u64> = serde_json::from_str(&json)?;
            log::info!("Loaded {} high scores from {}", scores.len(), path.display());
            scores
        } else {
            log::info!("No high scores at {}, starting fresh", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, scores })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl HighScoreStore for JsonFileHighScores {
    fn load_high_score(&self, key: &str) -> Result<u64> {
        Ok(self.scores.get(key).copied().unwrap_or(0))
    }

    fn save_high_score(&mut self, key: &str, value: u64) -> Result<()> {
        self.scores.insert(key.to_string(), value);
        self.flush()?;
        log::info!("High score saved: {} = {}", key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("frontier-runner-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_defaults_to_zero() {
        let mut store = MemoryHighScores::new();
        assert_eq!(store.load_high_score("cowboyHighScore").unwrap(), 0);
        store.save_high_score("cowboyHighScore", 42).unwrap();
        assert_eq!(store.load_high_score("cowboyHighScore").unwrap(), 42);
        assert_eq!(store.load_high_score("DungeonHighScore").unwrap(), 0);
    }

    #[test]
    fn test_json_file_persists() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileHighScores::open(&path).unwrap();
        store.save_high_score("DungeonHighScore", 777).unwrap();

        let reopened = JsonFileHighScores::open(&path).unwrap();
        assert_eq!(reopened.load_high_score("DungeonHighScore").unwrap(), 777);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            JsonFileHighScores::open(&path),
            Err(RunnerError::Serialization(_))
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_directory_path_rejected() {
        let result = JsonFileHighScores::open(std::env::temp_dir());
        assert!(matches!(result, Err(RunnerError::Storage(_))));
    }
}
