// rust/engine/src/engine/grid.rs
#![forbid(unsafe_code)]

use std::fmt;

use rand::prelude::*;

use super::direction::Direction;
use super::error::EngineError;

/// A cell coordinate. Signed so that walks can step off the board and be rejected by the
/// bounds check instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one step along `dir` (may be off the board).
    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dr, dc) = dir.vector();
        Self::new(self.row + dr, self.col + dc)
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row as i32, col as i32)
    }
}

#[inline]
fn is_tile_value(v: u32) -> bool {
    v == 0 || (v >= 2 && v.is_power_of_two())
}

/// Square `N x N` board of tile values, row-major. `0` is an empty cell.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// All-empty board of side `size`. A zero side is rejected.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidGrid("grid side must be at least 1".to_string()));
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from explicit rows.
    ///
    /// Rejects ragged/non-square input and values that are neither `0` nor a power of two
    /// `>= 2`.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidGrid("grid has no rows".to_string()));
        }

        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(EngineError::InvalidGrid(format!(
                    "row {r} has {} cells, expected {size}",
                    row.len()
                )));
            }
            for (c, &v) in row.iter().enumerate() {
                if !is_tile_value(v) {
                    return Err(EngineError::InvalidGrid(format!(
                        "cell ({r}, {c}) holds {v}, expected 0 or a power of two >= 2"
                    )));
                }
            }
            cells.extend_from_slice(row);
        }

        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw row-major cell storage.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Snapshot as nested rows (the position -> value view adapters consume).
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    #[inline]
    pub fn is_within_bounds(&self, pos: Pos) -> bool {
        let n = self.size as i32;
        (0..n).contains(&pos.row) && (0..n).contains(&pos.col)
    }

    #[inline]
    pub(crate) fn offset(&self, pos: Pos) -> Option<usize> {
        self.is_within_bounds(pos)
            .then(|| pos.row as usize * self.size + pos.col as usize)
    }

    #[inline]
    fn checked_offset(&self, pos: Pos) -> Result<usize, EngineError> {
        self.offset(pos).ok_or(EngineError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            size: self.size,
        })
    }

    /// In-bounds value lookup; `None` off the board.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<u32> {
        self.offset(pos).map(|i| self.cells[i])
    }

    pub fn cell(&self, pos: Pos) -> Result<u32, EngineError> {
        let i = self.checked_offset(pos)?;
        Ok(self.cells[i])
    }

    /// Overwrite a cell. Callers are responsible for keeping values powers of two.
    pub fn set_cell(&mut self, pos: Pos, value: u32) -> Result<(), EngineError> {
        let i = self.checked_offset(pos)?;
        self.cells[i] = value;
        Ok(())
    }

    /// True iff `pos` is on the board and holds no tile.
    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        self.get(pos) == Some(0)
    }

    /// Empty positions in row-major order.
    pub fn available_cells(&self) -> Vec<Pos> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| Pos::from((i / self.size, i % self.size)))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    pub fn occupied(&self) -> usize {
        self.cells.len() - self.count_empty()
    }

    /// Uniform sample over `available_cells()`.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Pos, EngineError> {
        self.available_cells()
            .choose(rng)
            .copied()
            .ok_or(EngineError::BoardFull)
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> u64 {
        self.cells.iter().map(|&v| u64::from(v)).sum()
    }

    /// Number of horizontally or vertically adjacent equal non-empty pairs.
    ///
    /// Each pair is counted once by checking only the right and down neighbours.
    pub fn count_matches(&self) -> usize {
        let n = self.size;
        let mut count = 0;
        for r in 0..n {
            for c in 0..n {
                let v = self.cells[r * n + c];
                if v == 0 {
                    continue;
                }
                if c + 1 < n && self.cells[r * n + c + 1] == v {
                    count += 1;
                }
                if r + 1 < n && self.cells[(r + 1) * n + c] == v {
                    count += 1;
                }
            }
        }
        count
    }

    /// Number of equal non-empty pairs that a single slide could merge.
    ///
    /// Unlike `count_matches`, empty cells between two tiles are skipped: each tile is paired
    /// with the next tile to its right and the next tile below it.
    pub fn count_merge_opportunities(&self) -> usize {
        let n = self.size;
        let mut count = 0;
        for r in 0..n {
            for c in 0..n {
                let v = self.cells[r * n + c];
                if v == 0 {
                    continue;
                }
                let right = (c + 1..n).map(|cc| self.cells[r * n + cc]).find(|&w| w != 0);
                if right == Some(v) {
                    count += 1;
                }
                let below = (r + 1..n).map(|rr| self.cells[rr * n + c]).find(|&w| w != 0);
                if below == Some(v) {
                    count += 1;
                }
            }
        }
        count
    }

    /// True iff some merge is possible in at least one direction.
    pub fn matches_available(&self) -> bool {
        let n = self.size;
        for r in 0..n {
            for c in 0..n {
                let v = self.cells[r * n + c];
                if v == 0 {
                    continue;
                }
                if (c + 1 < n && self.cells[r * n + c + 1] == v)
                    || (r + 1 < n && self.cells[(r + 1) * n + c] == v)
                {
                    return true;
                }
            }
        }
        false
    }

    /// No empty cell and no adjacent equal pair: no direction can change the board.
    pub fn is_dead(&self) -> bool {
        self.count_empty() == 0 && !self.matches_available()
    }

    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [u32] {
        &mut self.cells
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("rows", &self.rows())
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len().max(4);
        let sep = format!("+{}+", vec!["-".repeat(width + 2); self.size].join("+"));
        writeln!(f, "{sep}")?;
        for row in self.cells.chunks(self.size) {
            write!(f, "|")?;
            for &v in row {
                if v == 0 {
                    write!(f, " {:>width$} |", ".")?;
                } else {
                    write!(f, " {v:>width$} |")?;
                }
            }
            writeln!(f)?;
            writeln!(f, "{sep}")?;
        }
        Ok(())
    }
}
