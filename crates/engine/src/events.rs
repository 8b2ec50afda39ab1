//! Event types for grid change notifications.
//!
//! The host registers a [`ChangeCallback`] that receives the full raw value
//! store after any operation that changed it. Richer [`GridEvent`]s are also
//! produced for listeners that care about why the store changed; the test
//! collector below records them.

use entrygrid_core::CellPos;

use crate::store::RawValues;

/// Receives the complete raw store after every change.
pub type ChangeCallback = Box<dyn FnMut(&RawValues)>;

/// Receives grid events.
pub type EventCallback = Box<dyn FnMut(GridEvent)>;

/// Events emitted by a grid.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// One user operation changed raw values.
    ValuesChanged(ValuesChangedEvent),

    /// Store, selection and focus were reset.
    Cleared { revision: u64 },

    /// An import replaced the store wholesale.
    ImportApplied { revision: u64, cells: usize },
}

/// Emitted after an edit, paste, fill step or bulk clear.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesChangedEvent {
    /// Store revision after the operation.
    pub revision: u64,
    /// Cells the operation wrote or removed, row-major.
    pub cells: Vec<CellPos>,
}

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only ValuesChanged events.
    pub fn values_changed(&self) -> Vec<&ValuesChangedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::ValuesChanged(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    /// Every cell reported as changed, in emission order.
    pub fn changed_cells(&self) -> Vec<CellPos> {
        self.values_changed()
            .into_iter()
            .flat_map(|v| v.cells.iter().copied())
            .collect()
    }
}
