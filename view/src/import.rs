//! Bulk import orchestration.
//!
//! Each import gets a ticket. Starting another import (or tearing the grid
//! down) supersedes every earlier ticket: the earlier run stops at its next
//! step and its result is refused, so two imports never both write.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use entrygrid_engine::events::GridEvent;
use entrygrid_engine::RawValues;
use entrygrid_io::import::simulate_import;
use entrygrid_io::ImportError;

use crate::grid::DataGrid;

/// Handle on one import run.
#[derive(Debug, Clone)]
pub struct ImportTicket {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl ImportTicket {
    /// True once a newer import started or the grid was torn down.
    pub fn is_superseded(&self) -> bool {
        self.current.get() != self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl DataGrid {
    /// Start an import, superseding any import still in flight.
    pub fn begin_import(&mut self) -> ImportTicket {
        let generation = self.import_generation.get() + 1;
        self.import_generation.set(generation);
        ImportTicket {
            generation,
            current: Rc::clone(&self.import_generation),
        }
    }

    /// Replace the whole store with an import result. Refused (returns
    /// false) when the ticket has been superseded.
    pub fn apply_import(&mut self, ticket: &ImportTicket, values: RawValues) -> bool {
        if ticket.is_superseded() {
            log::debug!("discarding result of superseded import #{}", ticket.generation);
            return false;
        }
        self.commit_edit();
        let cells = self.matrix.replace_all(values);
        log::info!("import #{} applied {} value(s)", ticket.generation, cells);
        self.emit(GridEvent::ImportApplied {
            revision: self.matrix.revision(),
            cells,
        });
        self.notify_change();
        true
    }

    /// Run the simulated import for `source` against this grid's editable
    /// cells and import settings. The caller applies the result with
    /// [`DataGrid::apply_import`]; `Ok(None)` means the run was superseded.
    pub fn import_job(
        &mut self,
        source: &Path,
        on_progress: impl FnMut(f32),
    ) -> (ImportTicket, impl std::future::Future<Output = Result<Option<RawValues>, ImportError>>) {
        let ticket = self.begin_import();
        let watch = ticket.clone();
        let cells = self.matrix.editable_cells();
        let settings = self.settings.import.clone();
        let source = source.to_path_buf();
        let job = async move {
            simulate_import(&source, &cells, &settings, || watch.is_superseded(), on_progress).await
        };
        (ticket, job)
    }
}
