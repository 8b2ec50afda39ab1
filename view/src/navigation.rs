//! Keyboard focus movement.

use entrygrid_core::{CellPos, Direction};

use crate::grid::DataGrid;

impl DataGrid {
    /// Nearest editable cell stepping from `from` by (`d_row`, `d_col`).
    ///
    /// Each axis wraps independently at the matrix edges. At most
    /// rows + cols positions are visited, so a mostly read-only matrix still
    /// terminates; None means nothing editable was reached.
    pub fn find_next_editable(&self, from: CellPos, d_row: isize, d_col: isize) -> Option<CellPos> {
        let (rows, cols) = self.matrix.dimensions();
        if rows == 0 || cols == 0 {
            return None;
        }
        let (rows_i, cols_i) = (rows as isize, cols as isize);
        let mut row = from.row as isize + d_row;
        let mut col = from.col as isize + d_col;

        for _ in 0..rows + cols {
            row = row.rem_euclid(rows_i);
            col = col.rem_euclid(cols_i);
            let pos = CellPos::new(row as usize, col as usize);
            if self.matrix.is_editable(pos) {
                return Some(pos);
            }
            row += d_row;
            col += d_col;
        }
        None
    }

    /// Move focus one step. Without `extend` the new cell becomes the whole
    /// selection and the anchor is dropped; with `extend` the selection is
    /// the rectangle from the anchor (the old focus if none was recorded).
    /// Closes an open editor. Returns false when focus could not move.
    pub fn move_focus(&mut self, direction: Direction, extend: bool) -> bool {
        self.commit_edit();
        let (d_row, d_col) = direction.delta();
        let Some(next) = self.find_next_editable(self.focus, d_row, d_col) else {
            return false;
        };

        if extend {
            let anchor = *self.anchor.get_or_insert(self.focus);
            self.select_range(anchor, next);
        } else {
            self.selection.select_only(next);
            self.anchor = None;
        }
        self.focus = next;
        true
    }
}
