//! Game settings and preferences
//!
//! Stored as JSON next to the high-score file. Missing keys fall back to
//! defaults, and an unreadable file never stops the game from starting.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::STAR_COUNT;
use crate::error::PersistError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Haptics ===
    pub vibration: bool,

    // === Visuals ===
    /// Background stars per session
    pub star_count: usize,

    // === Session ===
    /// Fixed RNG seed; random per process when unset
    pub seed: Option<u64>,
    /// Where the top-10 list is kept
    pub high_score_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            vibration: true,

            star_count: STAR_COUNT,

            seed: None,
            high_score_path: None,
        }
    }
}

impl Settings {
    /// Default settings file name, relative to the working directory
    pub const FILE_NAME: &'static str = "space_defender_settings.json";

    pub fn default_path() -> PathBuf {
        PathBuf::from(Self::FILE_NAME)
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {:?}, using defaults", path);
                return Self::default();
            }
            Err(e) => {
                log::warn!("Failed to read settings {:?}: {}", path, e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {:?}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to parse settings {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "space_defender_settings_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_path("missing"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_keys() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "muted": true, "seed": 42 }"#).unwrap();
        let settings = Settings::load(&path);
        let _ = fs::remove_file(&path);

        assert!(settings.muted);
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.star_count, STAR_COUNT);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn test_garbage_file_gives_defaults() {
        let path = temp_path("garbage");
        fs::write(&path, "not json at all").unwrap();
        let settings = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("saved");
        let settings = Settings {
            vibration: false,
            star_count: 7,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
