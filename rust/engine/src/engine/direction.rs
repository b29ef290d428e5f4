// rust/engine/src/engine/direction.rs
#![forbid(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::constants::ACTION_DIM;
use super::error::EngineError;

/// A direction to slide/merge tiles.
///
/// The discriminant is the action id used by adapters: 0=up, 1=right, 2=down, 3=left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

/// Visit order along one axis of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    /// Grid index visited at step `i` of a pass over `size` cells.
    #[inline]
    pub fn at(self, i: usize, size: usize) -> usize {
        debug_assert!(i < size);
        match self {
            Order::Ascending => i,
            Order::Descending => size - 1 - i,
        }
    }
}

impl Direction {
    pub const ALL: [Direction; ACTION_DIM] =
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    #[inline]
    pub fn action_id(self) -> usize {
        self as usize
    }

    pub fn from_action_id(aid: usize) -> Result<Self, EngineError> {
        Self::ALL
            .get(aid)
            .copied()
            .ok_or_else(|| EngineError::InvalidDirection(aid.to_string()))
    }

    /// Unit motion vector `(d_row, d_col)`.
    #[inline]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /**
     * `(row_order, col_order)` for a move in this direction.
     *
     * Tiles nearest the destination edge must resolve first: an axis is scanned descending
     * iff the motion vector is +1 along it. Scanning the other way lets a tile slide into a
     * cell that has not been resolved yet, which loses tiles or double-counts merges.
     */
    #[inline]
    pub const fn traversal(self) -> (Order, Order) {
        match self {
            Direction::Up => (Order::Ascending, Order::Ascending),
            Direction::Right => (Order::Ascending, Order::Descending),
            Direction::Down => (Order::Descending, Order::Ascending),
            Direction::Left => (Order::Ascending, Order::Ascending),
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = EngineError;

    fn try_from(aid: usize) -> Result<Self, Self::Error> {
        Self::from_action_id(aid)
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    /// Accepts names, WASD keys and numeric action ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" | "0" => Ok(Direction::Up),
            "right" | "r" | "d" | "1" => Ok(Direction::Right),
            "down" | "s" | "2" => Ok(Direction::Down),
            "left" | "l" | "a" | "3" => Ok(Direction::Left),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_ids_follow_fixed_order() {
        for (aid, d) in Direction::ALL.iter().enumerate() {
            assert_eq!(d.action_id(), aid);
            assert_eq!(Direction::from_action_id(aid).unwrap(), *d);
        }
        assert!(matches!(
            Direction::from_action_id(4),
            Err(EngineError::InvalidDirection(_))
        ));
    }

    #[test]
    fn traversal_is_descending_exactly_on_positive_axes() {
        for d in Direction::ALL {
            let (dr, dc) = d.vector();
            let (rows, cols) = d.traversal();
            assert_eq!(rows == Order::Descending, dr == 1, "{d}");
            assert_eq!(cols == Order::Descending, dc == 1, "{d}");
        }
    }

    #[test]
    fn order_maps_indices() {
        let asc: Vec<usize> = (0..4).map(|i| Order::Ascending.at(i, 4)).collect();
        let desc: Vec<usize> = (0..4).map(|i| Order::Descending.at(i, 4)).collect();
        assert_eq!(asc, vec![0, 1, 2, 3]);
        assert_eq!(desc, vec![3, 2, 1, 0]);
    }

    #[test]
    fn parses_names_keys_and_ids() {
        assert_eq!("UP".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("d".parse::<Direction>().unwrap(), Direction::Right);
        assert_eq!("s".parse::<Direction>().unwrap(), Direction::Down);
        assert_eq!(" 3 ".parse::<Direction>().unwrap(), Direction::Left);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
