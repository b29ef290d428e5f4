// rust/engine/src/policy/base.rs
#![forbid(unsafe_code)]

use rand::rngs::StdRng;

use crate::engine::{Direction, Game};

/// Policy chooses a direction for the current state.
///
/// Returns `None` if it has nothing to play (typically: no legal direction left).
///
/// `R` is the spawn RNG of the games it drives. Object-safe for a fixed `R`, so it can be
/// used as `Box<dyn Policy>`.
pub trait Policy<R = StdRng> {
    fn choose_direction(&mut self, g: &Game<R>) -> Option<Direction>;

    /// Same choice, as an action id in `[0, ACTION_DIM)`.
    fn choose_action(&mut self, g: &Game<R>) -> Option<usize> {
        self.choose_direction(g).map(Direction::action_id)
    }
}
