//! Fill handle.
//!
//! Pressing the handle captures the cell's displayed value. While the
//! primary button stays down, every editable cell the pointer enters gets
//! that captured value, wherever the pointer goes; later edits to the
//! source do not change what is written. Release ends the gesture.

use std::collections::BTreeSet;

use entrygrid_core::CellPos;

use crate::grid::DataGrid;
use crate::state::Interaction;

impl DataGrid {
    /// Press on the fill handle of `cell`. The handle is drawn on the
    /// focused cell only, so returns false for any other cell and for a
    /// cell that is not editable.
    ///
    /// Commits an open editor and replaces any drag selection in progress.
    pub fn fill_handle_down(&mut self, cell: CellPos) -> bool {
        if cell != self.focus || self.matrix.is_globally_read_only() || !self.matrix.is_editable(cell) {
            return false;
        }
        self.commit_edit();

        let source = self.matrix.display_value(cell.row, cell.col);
        self.selection.select_only(cell);
        self.interaction = Interaction::Filling {
            source,
            filled: BTreeSet::from([cell]),
            capture: self.captures.acquire(),
        };
        true
    }

    /// Value being replicated by the fill gesture in progress.
    pub fn fill_source(&self) -> Option<&str> {
        match &self.interaction {
            Interaction::Filling { source, .. } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn fill_into(&mut self, cell: CellPos) {
        let Interaction::Filling { source, filled, .. } = &mut self.interaction else {
            return;
        };
        // An empty source replicates nothing
        if source.is_empty() || !self.matrix.is_editable(cell) {
            return;
        }
        filled.insert(cell);
        let value = source.clone();
        self.focus = cell;
        self.apply_writes([(cell, Some(value))]);
    }
}
