// rust/engine/src/engine/features.rs
#![forbid(unsafe_code)]

use super::error::EngineError;
use super::grid::{Grid, Pos};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardFeatures {
    pub max_tile: u32,
    pub empty: u32,
    /// Adjacent equal pairs (each pair counted once).
    pub merges_available: u32,
    pub tile_sum: u64,
    /// True iff a corner cell holds the maximum tile.
    pub max_in_corner: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoardDelta {
    pub d_max_tile: i64,
    pub d_empty: i32,
    pub d_merges_available: i32,
    pub d_tile_sum: i64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StepFeatures {
    pub cur: BoardFeatures,
    pub delta: BoardDelta,
}

/// Summary features of a board. Complexity: O(N*N), one allocation-free pass per query.
pub fn compute_board_features(grid: &Grid) -> BoardFeatures {
    let max_tile = grid.max_tile();
    let last = grid.size() as i32 - 1;
    let corners = [
        Pos::new(0, 0),
        Pos::new(0, last),
        Pos::new(last, 0),
        Pos::new(last, last),
    ];
    let max_in_corner = max_tile > 0 && corners.iter().any(|&p| grid.get(p) == Some(max_tile));

    BoardFeatures {
        max_tile,
        empty: grid.count_empty() as u32,
        merges_available: grid.count_matches() as u32,
        tile_sum: grid.tile_sum(),
        max_in_corner,
    }
}

/// Convenience: compute current features and delta vs previous features.
/// If `prev` is None, deltas are reported as 0.
pub fn compute_step_features(grid: &Grid, prev: Option<BoardFeatures>) -> StepFeatures {
    let cur = compute_board_features(grid);

    let delta = match prev {
        None => BoardDelta::default(),
        Some(p) => BoardDelta {
            d_max_tile: i64::from(cur.max_tile) - i64::from(p.max_tile),
            d_empty: cur.empty as i32 - p.empty as i32,
            d_merges_available: cur.merges_available as i32 - p.merges_available as i32,
            d_tile_sum: cur.tile_sum as i64 - p.tile_sum as i64,
        },
    };

    StepFeatures { cur, delta }
}

#[inline]
fn exponent(v: u32) -> u8 {
    if v == 0 { 0 } else { v.trailing_zeros() as u8 }
}

/// Row-major log2 view of the board: `0` for empty, `k` for a `2^k` tile.
pub fn log2_encode(grid: &Grid) -> Vec<u8> {
    grid.cells().iter().map(|&v| exponent(v)).collect()
}

/**
 * Flattened one-hot view: `N*N` blocks of `channels` entries, block `i` has a single 1 at
 * the exponent of cell `i` (channel 0 = empty).
 *
 * Exponents beyond `channels - 1` saturate into the last channel.
 */
pub fn one_hot_encode(grid: &Grid, channels: usize) -> Result<Vec<u8>, EngineError> {
    if channels < 2 {
        return Err(EngineError::InvalidChannels(channels));
    }
    let mut out = vec![0u8; grid.cells().len() * channels];
    for (i, &v) in grid.cells().iter().enumerate() {
        let k = (exponent(v) as usize).min(channels - 1);
        out[i * channels + k] = 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[[u32; 4]; 4]) -> Grid {
        Grid::from_rows(rows).unwrap()
    }

    #[test]
    fn features_of_a_known_board() {
        let g = grid(&[[2, 2, 0, 0], [0, 0, 0, 0], [0, 4, 0, 0], [0, 4, 0, 64]]);
        let f = compute_board_features(&g);
        assert_eq!(f.max_tile, 64);
        assert_eq!(f.empty, 11);
        assert_eq!(f.merges_available, 2);
        assert_eq!(f.tile_sum, 76);
        assert!(f.max_in_corner);

        let g = grid(&[[2, 0, 0, 0], [0, 64, 0, 0], [0, 0, 0, 0], [0, 0, 0, 2]]);
        assert!(!compute_board_features(&g).max_in_corner);
    }

    #[test]
    fn step_features_delta() {
        let a = grid(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let b = grid(&[[4, 0, 0, 2], [0; 4], [0; 4], [0; 4]]);
        let first = compute_step_features(&a, None);
        assert_eq!(first.delta, BoardDelta::default());

        let second = compute_step_features(&b, Some(first.cur));
        assert_eq!(second.delta.d_max_tile, 2);
        assert_eq!(second.delta.d_empty, 0);
        assert_eq!(second.delta.d_merges_available, -1);
        assert_eq!(second.delta.d_tile_sum, 2);
    }

    #[test]
    fn log2_and_one_hot() {
        let g = grid(&[[0, 2, 4, 8], [0; 4], [0; 4], [0, 0, 0, 1 << 17]]);
        let logs = log2_encode(&g);
        assert_eq!(&logs[..4], &[0, 1, 2, 3]);
        assert_eq!(logs[15], 17);

        let hot = one_hot_encode(&g, 18).unwrap();
        assert_eq!(hot.len(), 16 * 18);
        for block in hot.chunks(18) {
            assert_eq!(block.iter().map(|&b| b as u32).sum::<u32>(), 1);
        }
        assert_eq!(hot[0], 1);
        assert_eq!(hot[18 + 1], 1);
        assert_eq!(hot[15 * 18 + 17], 1);

        let narrow = one_hot_encode(&g, 4).unwrap();
        assert_eq!(narrow[15 * 4 + 3], 1);
    }

    #[test]
    fn one_hot_rejects_fewer_than_two_channels() {
        let g = grid(&[[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(matches!(one_hot_encode(&g, 1), Err(EngineError::InvalidChannels(1))));
        assert!(matches!(one_hot_encode(&g, 0), Err(EngineError::InvalidChannels(0))));
        assert_eq!(one_hot_encode(&g, 2).unwrap().len(), 32);
    }
}
