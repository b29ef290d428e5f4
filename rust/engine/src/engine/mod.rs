// rust/engine/src/engine/mod.rs
#![forbid(unsafe_code)]

mod config;
mod constants;
mod direction;
mod error;
mod features;
mod game;
mod grid;
mod slide;
mod spawn;

/**
 * Curated engine public API.
 *
 * Internal implementation modules remain private; only stable items are re-exported here.
 */
pub use config::{ConfigError, Corner, EngineConfig, RewardShaping, StuckCounting};
pub use constants::{
    ACTION_DIM, DEFAULT_BOARD_SIZE, DEFAULT_FOUR_PROBABILITY, DEFAULT_ILLEGAL_MOVE_PENALTY,
    DEFAULT_ONE_HOT_CHANNELS, DEFAULT_STUCK_CAP, DEFAULT_WINNING_VALUE, MAX_BOARD_SIZE,
    START_TILES,
};
pub use direction::{Direction, Order};
pub use error::EngineError;
pub use features::{
    BoardDelta, BoardFeatures, StepFeatures, compute_board_features, compute_step_features,
    log2_encode, one_hot_encode,
};
pub use game::{Game, MoveOutcome, Status, Transition};
pub use grid::{Grid, Pos};
pub use slide::{SlideOutcome, furthest_position, slide};
pub use spawn::{SpawnRule, SpawnedTile};
