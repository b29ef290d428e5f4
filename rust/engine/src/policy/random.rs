// rust/engine/src/policy/random.rs
#![forbid(unsafe_code)]

use rand::prelude::*;

use crate::engine::{Direction, Game};

use super::base::Policy;

pub struct RandomPolicy {
    rng: StdRng,
    legal_only: bool,
}

impl RandomPolicy {
    /// Uniform over the directions that would change the board.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            legal_only: true,
        }
    }

    /// Uniform over all four directions, illegal ones included.
    pub fn unrestricted(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            legal_only: false,
        }
    }
}

impl<R> Policy<R> for RandomPolicy {
    fn choose_direction(&mut self, g: &Game<R>) -> Option<Direction> {
        if !self.legal_only {
            return Direction::ALL.choose(&mut self.rng).copied();
        }
        let dirs = g.legal_directions();
        dirs.choose(&mut self.rng).copied()
    }
}
