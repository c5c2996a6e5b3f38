//! Grid coordinates.
//!
//! Coordinates are (row, column) pairs named `i` and `j`, matching the wire
//! representation consumed by bees and the dashboard.

use crate::neighbors::Direction;
use crate::{GRID_COLS, GRID_ROWS};

/// A position on the coordination grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    /// Row index.
    pub i: usize,
    /// Column index.
    pub j: usize,
}

impl GridCoord {
    /// Create a new coordinate.
    pub const fn new(i: usize, j: usize) -> Self {
        Self { i, j }
    }

    /// Whether this coordinate lies inside the grid bounds.
    pub const fn in_bounds(&self) -> bool {
        self.i < GRID_ROWS && self.j < GRID_COLS
    }

    /// Step one cell in the given direction.
    ///
    /// Returns `None` when the step leaves the grid.
    pub fn step(&self, direction: Direction) -> Option<GridCoord> {
        let (di, dj) = direction.delta();
        let i = self.i.checked_add_signed(di)?;
        let j = self.j.checked_add_signed(dj)?;
        let next = GridCoord::new(i, j);
        next.in_bounds().then_some(next)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.i, self.j)
    }
}
