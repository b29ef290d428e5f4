// rust/engine/src/policy/greedy.rs
#![forbid(unsafe_code)]

use crate::engine::{Direction, Game};

use super::base::Policy;

/// One-ply lookahead on the deterministic slide.
///
/// Scores each legal direction by `(merge_score, empty cells after the slide)`,
/// lexicographically. Ties go to the earlier direction in action-id order.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl<R> Policy<R> for GreedyPolicy {
    fn choose_direction(&mut self, g: &Game<R>) -> Option<Direction> {
        let mut best: Option<(Direction, (u64, usize))> = None;

        for dir in Direction::ALL {
            let out = g.simulate(dir);
            if !out.changed {
                continue;
            }
            let key = (out.merge_score, out.grid.count_empty());
            match best {
                Some((_, k)) if k >= key => {}
                _ => best = Some((dir, key)),
            }
        }

        best.map(|(dir, _)| dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, Grid};

    fn game(rows: &[[u32; 4]; 4]) -> Game {
        Game::from_grid(Grid::from_rows(rows).unwrap(), 0, EngineConfig::default()).unwrap()
    }

    #[test]
    fn prefers_the_largest_merge() {
        // Horizontal: 2+2 in row 0. Vertical: 8+8 in column 3; up and down tie, up comes first.
        let g = game(&[[2, 2, 0, 8], [0, 0, 0, 8], [0; 4], [0; 4]]);
        let dir = GreedyPolicy::new().choose_direction(&g).unwrap();
        assert_eq!(dir, Direction::Up);
    }

    #[test]
    fn none_on_dead_board() {
        let g = game(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(GreedyPolicy::new().choose_direction(&g), None);
    }
}
