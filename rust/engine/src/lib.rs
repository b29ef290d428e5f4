// rust/engine/src/lib.rs
#![forbid(unsafe_code)]

pub mod engine;
pub mod policy;

// Re-export the bits adapters and the CLI need:
pub use engine::{
    BoardDelta, BoardFeatures, ConfigError, Corner, Direction, EngineConfig, EngineError, Game,
    Grid, MoveOutcome, Pos, RewardShaping, SlideOutcome, SpawnRule, SpawnedTile, Status,
    StuckCounting, Transition, ACTION_DIM, DEFAULT_BOARD_SIZE, DEFAULT_ONE_HOT_CHANNELS,
    START_TILES, compute_board_features, log2_encode, one_hot_encode, slide,
};
pub use policy::{CornerPolicy, GreedyPolicy, Policy, RandomPolicy};
