// rust/engine/src/engine/error.rs
#![forbid(unsafe_code)]

use thiserror::Error;

use super::config::ConfigError;

/**
 * Engine error taxonomy.
 *
 * `OutOfBounds`, `InvalidDirection` and `BoardFull` are caller-contract violations: a correct
 * driver never sees them during normal play.
 */
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("position ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: i32, col: i32, size: usize },

    #[error("invalid direction {0:?} (expected 0..=3 or up/right/down/left)")]
    InvalidDirection(String),

    #[error("no empty cell available to spawn a tile")]
    BoardFull,

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("one-hot encoding needs at least 2 channels, got {0}")]
    InvalidChannels(usize),

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
