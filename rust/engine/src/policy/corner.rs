// rust/engine/src/policy/corner.rs
#![forbid(unsafe_code)]

use crate::engine::{Direction, Game};

use super::base::Policy;

/// Fixed-preference corner strategy: the first legal direction in `order`.
///
/// The default order (down, left, right, up) keeps the largest tile pinned to the
/// bottom-left corner, the classic hand-played strategy.
#[derive(Clone, Debug)]
pub struct CornerPolicy {
    order: [Direction; 4],
}

impl CornerPolicy {
    pub const DEFAULT_ORDER: [Direction; 4] =
        [Direction::Down, Direction::Left, Direction::Right, Direction::Up];

    pub fn new() -> Self {
        Self::with_order(Self::DEFAULT_ORDER)
    }

    pub fn with_order(order: [Direction; 4]) -> Self {
        Self { order }
    }
}

impl Default for CornerPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Policy<R> for CornerPolicy {
    fn choose_direction(&mut self, g: &Game<R>) -> Option<Direction> {
        self.order.iter().copied().find(|&d| g.is_legal(d))
    }
}
