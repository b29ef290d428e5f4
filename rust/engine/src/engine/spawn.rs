// rust/engine/src/engine/spawn.rs
#![forbid(unsafe_code)]

use rand::Rng;

use super::error::EngineError;
use super::grid::{Grid, Pos};

/// A tile placed by the spawn rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnedTile {
    pub pos: Pos,
    pub value: u32,
}

/// Owns the spawn stream: where new tiles land and whether they are 2s or 4s.
///
/// The RNG lives here and nowhere else, so a game is reproducible from its seed alone.
#[derive(Clone, Debug)]
pub struct SpawnRule<R> {
    rng: R,
    four_probability: f64,
}

impl<R: Rng> SpawnRule<R> {
    pub fn new(rng: R, four_probability: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&four_probability));
        Self {
            rng,
            four_probability,
        }
    }

    pub fn four_probability(&self) -> f64 {
        self.four_probability
    }

    pub fn draw_value(&mut self) -> u32 {
        if self.rng.gen::<f64>() < self.four_probability {
            4
        } else {
            2
        }
    }

    /// Place one tile on a uniformly chosen empty cell (cell first, then value).
    pub fn spawn(&mut self, grid: &mut Grid) -> Result<SpawnedTile, EngineError> {
        let pos = grid.random_available_cell(&mut self.rng)?;
        let value = self.draw_value();
        grid.set_cell(pos, value)?;
        Ok(SpawnedTile { pos, value })
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }
}
