// rust/engine/src/engine/constants.rs
#![forbid(unsafe_code)]

/// Canonical board side.
pub const DEFAULT_BOARD_SIZE: usize = 4;

/// Largest supported side. Cells are `u32`, so the theoretical maximum tile
/// (`2^(N*N + 1)`) must stay representable for every reachable game.
pub const MAX_BOARD_SIZE: usize = 5;

/// Tiles placed on an empty board by a new game.
pub const START_TILES: usize = 2;

/// Fixed action space: 0=up, 1=right, 2=down, 3=left.
pub const ACTION_DIM: usize = 4;

pub const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;
pub const DEFAULT_ILLEGAL_MOVE_PENALTY: i64 = -10;
pub const DEFAULT_STUCK_CAP: u32 = 1;
pub const DEFAULT_WINNING_VALUE: u32 = 2048;

/// One-hot width used by the log2 observation encoder (exponents 0..=17).
pub const DEFAULT_ONE_HOT_CHANNELS: usize = 18;
