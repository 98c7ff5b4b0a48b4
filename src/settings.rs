//! Session settings
//!
//! Persisted as JSON. Missing fields take their defaults so older files
//! keep loading.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TICKS_PER_FRAME;
use crate::error::Result;
use crate::theme::DEFAULT_THEME_ID;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// RNG seed; same seed and same actions replay the same run
    pub seed: u64,
    /// Theme preselected before theme selection
    pub theme: String,
    /// Tick cap per rendered frame
    pub max_ticks_per_frame: u32,

    // === Entity caps ===
    pub max_obstacles: usize,
    pub max_bullets: usize,

    // === Debug ===
    /// Ignore contact damage
    pub god_mode: bool,
    /// Log every spawn at info level
    pub log_spawns: bool,

    // === Storage ===
    /// High score file; in-memory when unset
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,
            theme: DEFAULT_THEME_ID.to_string(),
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,

            max_obstacles: 50,
            max_bullets: 30,

            god_mode: false,
            log_spawns: false,

            high_score_path: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
