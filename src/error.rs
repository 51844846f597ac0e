//! Crate error type

use thiserror::Error;

use crate::sim::{Command, GamePhase};

/// Errors surfaced to the collaborators driving the simulation
#[derive(Debug, Error)]
pub enum GameError {
    /// Command not legal in the current phase
    #[error("command {command:?} is not allowed while {phase:?}")]
    IllegalCommand { command: Command, phase: GamePhase },

    /// Grid dimension outside 8/16/32/64
    #[error("unsupported grid size {0} (expected 8, 16, 32 or 64)")]
    UnsupportedGridSize(u32),

    /// Pixel grid with the wrong shape
    #[error("malformed pixel grid: {0}")]
    MalformedGrid(String),

    /// Color string that is not `#rrggbb`
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// Upload collaborator reported a failure
    #[error("image upload failed: {0}")]
    UploadFailed(String),

    /// Settings failed validation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
