//! Error types
//!
//! Gameplay outcomes (hits, game over, goal) are not errors. They come back as
//! [`MoveOutcome`](crate::sim::MoveOutcome) values and session events.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid {what}: {value}")]
    InvalidConfiguration { what: &'static str, value: i64 },
    #[error("Field of {width}x{height} cells is too small to play")]
    GenerationImpossible { width: i32, height: i32 },
    #[error("Unsupported save version {0}")]
    UnsupportedVersion(u32),
    #[error("Storage unavailable: {0}")]
    Storage(String),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
