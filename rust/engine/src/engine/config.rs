// rust/engine/src/engine/config.rs
#![forbid(unsafe_code)]

//! Immutable engine configuration.
//!
//! Passed into `Game` at construction; the engine never reads process-wide state. Every field
//! has a default, so a TOML file only needs the keys it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_FOUR_PROBABILITY, DEFAULT_ILLEGAL_MOVE_PENALTY, DEFAULT_STUCK_CAP,
    DEFAULT_WINNING_VALUE, MAX_BOARD_SIZE, START_TILES,
};
use super::grid::{Grid, Pos};

/// Configuration loading/validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How no-op moves accumulate in `stuck_counter`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckCounting {
    /// A board-changing move resets the counter to 0.
    #[default]
    Consecutive,
    /// The counter only resets on restart.
    Cumulative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn pos(self, size: usize) -> Pos {
        let last = size as i32 - 1;
        match self {
            Corner::TopLeft => Pos::new(0, 0),
            Corner::TopRight => Pos::new(0, last),
            Corner::BottomLeft => Pos::new(last, 0),
            Corner::BottomRight => Pos::new(last, last),
        }
    }
}

/// Reward shaping layered on top of the merge score of a valid move.
///
/// Shaping never affects the board transition or `score`; it only changes `reward`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardShaping {
    #[default]
    None,
    /// Add the maximum tile value when it sits in `corner`.
    CornerBonus { corner: Corner },
    /// Add `per_merge` for every equal pair a following slide could merge (gaps skipped).
    MergePotential { per_merge: i64 },
}

impl RewardShaping {
    /// Bonus for the board produced by a valid slide (before the spawn).
    pub fn bonus(&self, grid: &Grid) -> i64 {
        match *self {
            RewardShaping::None => 0,
            RewardShaping::CornerBonus { corner } => {
                let max = grid.max_tile();
                if max > 0 && grid.get(corner.pos(grid.size())) == Some(max) {
                    i64::from(max)
                } else {
                    0
                }
            }
            RewardShaping::MergePotential { per_merge } => {
                per_merge.saturating_mul(grid.count_merge_opportunities() as i64)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board side `N`.
    pub board_size: usize,
    /// Tiles spawned on a fresh board.
    pub start_tiles: usize,
    /// Probability that a spawned tile is a 4 instead of a 2.
    pub four_probability: f64,
    /// Reward of a move that leaves the board unchanged.
    pub illegal_move_penalty: i64,
    /// Forced termination once `stuck_counter > stuck_cap`. `None` disables it.
    pub stuck_cap: Option<u32>,
    pub stuck_counting: StuckCounting,
    /// Reaching this tile sets `won`.
    pub winning_value: u32,
    /// Keep playing after a win instead of terminating.
    pub keep_playing: bool,
    pub reward_shaping: RewardShaping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            start_tiles: START_TILES,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            illegal_move_penalty: DEFAULT_ILLEGAL_MOVE_PENALTY,
            stuck_cap: Some(DEFAULT_STUCK_CAP),
            stuck_counting: StuckCounting::default(),
            winning_value: DEFAULT_WINNING_VALUE,
            keep_playing: true,
            reward_shaping: RewardShaping::default(),
        }
    }
}

impl EngineConfig {
    /// Default config with a different board side.
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(2..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return invalid(format!(
                "board_size must be in 2..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            ));
        }
        let cells = self.board_size * self.board_size;
        if !(1..=cells).contains(&self.start_tiles) {
            return invalid(format!(
                "start_tiles must be in 1..={cells}, got {}",
                self.start_tiles
            ));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return invalid(format!(
                "four_probability must be in [0, 1], got {}",
                self.four_probability
            ));
        }
        if self.winning_value < 4 || !self.winning_value.is_power_of_two() {
            return invalid(format!(
                "winning_value must be a power of two >= 4, got {}",
                self.winning_value
            ));
        }
        Ok(())
    }

    /// True iff `stuck_counter` has passed the configured cap.
    #[inline]
    pub fn stuck_exceeded(&self, stuck_counter: u32) -> bool {
        self.stuck_cap.is_some_and(|cap| stuck_counter > cap)
    }
}
