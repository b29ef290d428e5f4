// rust/engine/src/engine/slide.rs
#![forbid(unsafe_code)]

use super::direction::Direction;
use super::grid::{Grid, Pos};

/// Result of sliding a board in one direction, before any spawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideOutcome {
    pub grid: Grid,
    /// Sum of the values produced by merges (the canonical 2048 score delta).
    pub merge_score: u64,
    pub merges: u32,
    /// Largest value produced by a merge in this slide (0 if none).
    pub max_merged: u32,
    /// False iff the slide left every cell untouched.
    pub changed: bool,
}

/// Walk from `from` along `dir` over empty cells.
///
/// Returns `(furthest, blocker)`: the last empty position reached (or `from` itself) and the
/// position one step beyond it, which is either off the board or occupied.
pub fn furthest_position(grid: &Grid, from: Pos, dir: Direction) -> (Pos, Pos) {
    let mut furthest = from;
    let mut next = from.step(dir);
    while grid.is_empty(next) {
        furthest = next;
        next = next.step(dir);
    }
    (furthest, next)
}

/**
 * Pure transition kernel: slide and merge every tile of `grid` toward `dir`.
 *
 * Cells are visited in the direction's traversal order. Each tile either merges into an
 * equal blocker that has not already absorbed a merge during this slide, or relocates to the
 * furthest empty cell. A merged destination is recorded in a per-slide set, so a row like
 * `[2, 2, 2, 0]` moving left yields `[4, 2, 0, 0]` and never `[4, 4, ..]` or `[2, 4, ..]`.
 *
 * No randomness: spawning is the caller's job.
 */
pub fn slide(grid: &Grid, dir: Direction) -> SlideOutcome {
    let n = grid.size();
    let mut out = grid.clone();
    let mut merged = vec![false; n * n];

    let mut merge_score = 0u64;
    let mut merges = 0u32;
    let mut max_merged = 0u32;

    let (row_order, col_order) = dir.traversal();

    for i in 0..n {
        let r = row_order.at(i, n);
        for j in 0..n {
            let c = col_order.at(j, n);
            let from = Pos::from((r, c));
            let src = r * n + c;

            let value = out.cells()[src];
            if value == 0 {
                continue;
            }

            let (furthest, blocker) = furthest_position(&out, from, dir);

            // A merge whose result would not fit in a cell is treated as blocked.
            let merge_target = out
                .offset(blocker)
                .filter(|&dst| out.cells()[dst] == value && !merged[dst])
                .and_then(|dst| value.checked_mul(2).map(|doubled| (dst, doubled)));

            let cells = out.cells_mut();
            match merge_target {
                Some((dst, doubled)) => {
                    cells[dst] = doubled;
                    cells[src] = 0;
                    merged[dst] = true;

                    merge_score += u64::from(doubled);
                    merges += 1;
                    max_merged = max_merged.max(doubled);
                }
                None if furthest != from => {
                    let dst = furthest.row as usize * n + furthest.col as usize;
                    cells[dst] = value;
                    cells[src] = 0;
                }
                None => {}
            }
        }
    }

    let changed = out != *grid;
    SlideOutcome {
        grid: out,
        merge_score,
        merges,
        max_merged,
        changed,
    }
}
