//! Durable score storage
//!
//! The on-disk format is a JSON array of integers. Loading is lenient: each
//! record that is not a non-negative integer is dropped on its own, and a
//! file that is not valid JSON at all (truncated, or the legacy
//! comma-separated form `"120,80,"`) is scanned record by record instead.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::PersistError;
use crate::highscores::HighScores;

/// Storage collaborator for the top-10 list
pub trait ScoreStore: Send {
    /// Current leaderboard, highest first, at most 10 entries
    fn load_scores(&self) -> Vec<u64>;

    /// Record a finished session. Returns the rank achieved, if any.
    fn report_score(&mut self, score: u64) -> Result<Option<usize>, PersistError>;
}

/// Store shared between the stepping thread and the UI
pub type SharedStore = Arc<Mutex<dyn ScoreStore>>;

/// Wrap a store for sharing
pub fn shared(store: impl ScoreStore + 'static) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Parse stored scores, skipping malformed records individually
pub fn parse_scores(text: &str) -> Vec<u64> {
    let parsed: Vec<u64> = match serde_json::from_str::<Vec<serde_json::Value>>(text) {
        Ok(values) => values.iter().filter_map(serde_json::Value::as_u64).collect(),
        Err(e) => {
            log::warn!("High-score file is not a JSON array ({}), scanning records", e);
            scan_records(text)
        }
    };
    HighScores::from_scores(parsed).scores().to_vec()
}

fn scan_records(text: &str) -> Vec<u64> {
    text.split(',')
        .map(|s| s.trim_matches(|c: char| c.is_whitespace() || c == '[' || c == ']'))
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// JSON file on local disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const FILE_NAME: &'static str = "space_defender_scores.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(Self::FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn board(&self) -> HighScores {
        HighScores::from_scores(self.load_scores())
    }

    fn write(&self, board: &HighScores) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string(board)?;
        fs::write(&self.path, json).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ScoreStore for JsonFileStore {
    fn load_scores(&self) -> Vec<u64> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_scores(&text),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!("Failed to read high scores {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn report_score(&mut self, score: u64) -> Result<Option<usize>, PersistError> {
        let mut board = self.board();
        let rank = board.add_score(score);
        if rank.is_some() {
            self.write(&board)?;
            log::info!("High scores saved ({} entries)", board.scores().len());
        }
        Ok(rank)
    }
}

/// In-process store, for tests and headless runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: HighScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load_scores(&self) -> Vec<u64> {
        self.board.scores().to_vec()
    }

    fn report_score(&mut self, score: u64) -> Result<Option<usize>, PersistError> {
        Ok(self.board.add_score(score))
    }
}
