//! Error types
//!
//! Simulation errors are impossible by construction (clamped movement,
//! bounds-checked spawns); only the session driver and storage can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by the session driver
#[derive(Debug, Error)]
pub enum GameError {
    /// A session cannot start before the play-field has been laid out
    #[error("play-field bounds are not set")]
    FieldUnset,

    /// Bounds must be positive and finite
    #[error("invalid play-field size {width}x{height}")]
    InvalidField { width: f32, height: f32 },

    /// The stepping thread panicked; its session was lost
    #[error("stepping thread panicked")]
    StepperPanicked,
}

/// Errors from score/settings storage
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),
}
