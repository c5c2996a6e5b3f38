//! The bounded slot table.

use thiserror::Error;

use crate::{GridCoord, GRID_COLS, GRID_ROWS};

/// The grid has no empty slot left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("grid is full")]
pub struct GridFull;

/// A fixed 10×10 matrix of slots, each empty or holding one bee identity.
///
/// Created empty once at coordinator startup and mutated only on admission
/// (fill) and disconnection (clear). With the `serde` feature it serializes
/// as a nested array of `id | null`, the shape bees and observers consume.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Grid {
    cells: [[Option<String>; GRID_COLS]; GRID_ROWS],
}

impl Grid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// First empty slot in row-major order: lowest row, then lowest column.
    ///
    /// Returns `None` when the grid is full.
    pub fn find_free_slot(&self) -> Option<GridCoord> {
        for i in 0..GRID_ROWS {
            for j in 0..GRID_COLS {
                if self.cells[i][j].is_none() {
                    return Some(GridCoord::new(i, j));
                }
            }
        }
        None
    }

    /// Mark a slot as held by `id`.
    ///
    /// The slot must be empty; occupying a filled slot is a programming
    /// error, not a recoverable condition.
    pub fn occupy(&mut self, coord: GridCoord, id: impl Into<String>) {
        let cell = &mut self.cells[coord.i][coord.j];
        assert!(cell.is_none(), "slot {coord} already occupied");
        *cell = Some(id.into());
    }

    /// Clear a slot. No-op if already empty.
    pub fn release(&mut self, coord: GridCoord) {
        self.cells[coord.i][coord.j] = None;
    }

    /// Find and occupy the first free slot in one step.
    pub fn reserve(&mut self, id: impl Into<String>) -> Result<GridCoord, GridFull> {
        let coord = self.find_free_slot().ok_or(GridFull)?;
        self.occupy(coord, id);
        Ok(coord)
    }

    /// Identity held at a slot, if any.
    pub fn occupant(&self, coord: GridCoord) -> Option<&str> {
        self.cells[coord.i][coord.j].as_deref()
    }

    /// Whether every slot is held.
    pub fn is_full(&self) -> bool {
        self.find_free_slot().is_none()
    }

    /// Number of held slots.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Iterate held slots with their occupants, row-major.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (GridCoord, &str)> {
        self.cells.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(j, cell)| cell.as_deref().map(|id| (GridCoord::new(i, j), id)))
        })
    }
}
