use core::cmp::Ordering;
use core::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};

/// Position in output space: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2f {
    pub x: f32,
    pub y: f32,
}

/// Integer pixel position in traversal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: usize,
    pub col: usize,
}

/// One step of the 8-neighborhood: `(d_row, d_col)` and its arc-length cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborStep {
    pub d_row: isize,
    pub d_col: isize,
    pub cost: f64,
}

const fn step(d_row: isize, d_col: isize) -> NeighborStep {
    let cost = if d_row != 0 && d_col != 0 { SQRT_2 } else { 1.0 };
    NeighborStep { d_row, d_col, cost }
}

/// The 8-neighborhood in walking priority order: up-left, up, up-right,
/// right, down-right, down, down-left, left.
pub const NEIGHBORS_8: [NeighborStep; 8] = [
    step(-1, -1),
    step(-1, 0),
    step(-1, 1),
    step(0, 1),
    step(1, 1),
    step(1, 0),
    step(1, -1),
    step(0, -1),
];

impl GridPoint {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Applies `s`; `None` when the result would have a negative coordinate.
    /// Upper bounds are the caller's business.
    #[inline]
    pub fn offset(self, s: &NeighborStep) -> Option<Self> {
        let row = self.row.checked_add_signed(s.d_row)?;
        let col = self.col.checked_add_signed(s.d_col)?;
        Some(Self { row, col })
    }

    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        NEIGHBORS_8.into_iter().filter_map(move |s| self.offset(&s))
    }

    /// True for distinct points at Chebyshev distance 1.
    pub fn is_adjacent(self, other: Self) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// Leftmost-then-topmost ordering, the node numbering order of the
    /// assembled graph.
    pub fn cmp_column_major(&self, other: &Self) -> Ordering {
        (self.col, self.row).cmp(&(other.col, other.row))
    }

    pub fn to_point2f(self) -> Point2f {
        Point2f {
            x: self.col as f32,
            y: self.row as f32,
        }
    }
}
