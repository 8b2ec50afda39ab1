use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::cell::CellPos;

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Range spanned by two corner cells, in either order.
    pub fn between(a: CellPos, b: CellPos) -> Self {
        Self::new(a.row, a.col, b.row, b.col)
    }

    /// Create a single-cell range.
    pub fn single(pos: CellPos) -> Self {
        Self::new(pos.row, pos.col, pos.row, pos.col)
    }

    /// Smallest range covering every cell, or None for an empty iterator.
    pub fn bounding<I: IntoIterator<Item = CellPos>>(cells: I) -> Option<Self> {
        let mut iter = cells.into_iter();
        let first = iter.next()?;
        let mut range = Self::single(first);
        for pos in iter {
            range.start_row = range.start_row.min(pos.row);
            range.start_col = range.start_col.min(pos.col);
            range.end_row = range.end_row.max(pos.row);
            range.end_col = range.end_col.max(pos.col);
        }
        Some(range)
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, pos: CellPos) -> bool {
        pos.row >= self.start_row && pos.row <= self.end_row &&
        pos.col >= self.start_col && pos.col <= self.end_col
    }

    pub fn rows(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn cols(&self) -> usize {
        self.end_col - self.start_col + 1
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let start_row = self.start_row;
        let end_row = self.end_row;
        let start_col = self.start_col;
        let end_col = self.end_col;

        (start_row..=end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| CellPos::new(r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// The selection model: an unordered set of individually chosen cells.
///
/// Cells are kept in row-major order so that bulk operations visit them
/// deterministically. The set itself does not know which cells are editable;
/// callers only insert cells that passed the read-only gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cells: BTreeSet<CellPos>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single cell (click).
    pub fn select_only(&mut self, pos: CellPos) {
        self.cells.clear();
        self.cells.insert(pos);
    }

    /// Add the cell if absent, remove it if present (ctrl+click).
    /// Returns true when the cell ended up selected.
    pub fn toggle(&mut self, pos: CellPos) -> bool {
        if self.cells.remove(&pos) {
            false
        } else {
            self.cells.insert(pos);
            true
        }
    }

    /// Replace the whole selection.
    pub fn replace<I: IntoIterator<Item = CellPos>>(&mut self, cells: I) {
        self.cells = cells.into_iter().collect();
    }

    pub fn contains(&self, pos: CellPos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over selected cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().copied()
    }

    /// Bounding rectangle of the selection.
    pub fn bounds(&self) -> Option<Range> {
        Range::bounding(self.iter())
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
