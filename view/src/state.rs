//! Interaction state.
//!
//! At most one gesture is active. Drag gestures hold a [`PointerCapture`],
//! the stand-in for listeners a host installs to keep tracking the pointer
//! outside the grid. The capture is released when the guard drops, so
//! replacing the state, ending the gesture, or dropping the grid all detach
//! it.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

use entrygrid_core::CellPos;

/// Counts live pointer captures for one grid.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    active: Rc<Cell<usize>>,
}

impl CaptureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> PointerCapture {
        self.active.set(self.active.get() + 1);
        log::trace!("pointer capture acquired ({} active)", self.active.get());
        PointerCapture {
            active: Rc::clone(&self.active),
        }
    }

    /// Number of captures not yet released.
    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// Held for the duration of a drag gesture. Dropping it releases the capture.
#[derive(Debug)]
pub struct PointerCapture {
    active: Rc<Cell<usize>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        log::trace!("pointer capture released ({} active)", self.active.get());
    }
}

#[derive(Debug, Default)]
pub enum Interaction {
    #[default]
    Idle,

    /// Primary-button drag from `anchor`.
    RangeSelecting { anchor: CellPos, capture: PointerCapture },

    /// In-cell editor open on `cell` with uncommitted text.
    Editing { cell: CellPos, pending: String },

    /// Fill-handle drag replicating `source`.
    Filling {
        source: String,
        /// Cells written so far in this gesture (for transient emphasis).
        filled: BTreeSet<CellPos>,
        capture: PointerCapture,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn is_range_selecting(&self) -> bool {
        matches!(self, Interaction::RangeSelecting { .. })
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Interaction::Editing { .. })
    }

    pub fn is_filling(&self) -> bool {
        matches!(self, Interaction::Filling { .. })
    }

    /// Cell with an open editor.
    pub fn editing_cell(&self) -> Option<CellPos> {
        match self {
            Interaction::Editing { cell, .. } => Some(*cell),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_released_on_drop() {
        let registry = CaptureRegistry::new();
        let a = registry.acquire();
        let b = registry.acquire();
        assert_eq!(registry.active(), 2);
        drop(a);
        assert_eq!(registry.active(), 1);
        drop(b);
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn test_replacing_state_releases_capture() {
        let registry = CaptureRegistry::new();
        let mut state = Interaction::RangeSelecting {
            anchor: CellPos::new(0, 0),
            capture: registry.acquire(),
        };
        assert_eq!(registry.active(), 1);
        assert!(state.is_range_selecting());

        state = Interaction::Filling {
            source: "5".into(),
            filled: BTreeSet::new(),
            capture: registry.acquire(),
        };
        assert_eq!(registry.active(), 1);
        assert!(state.is_filling());

        state = Interaction::Idle;
        assert_eq!(registry.active(), 0);
        assert!(state.is_idle());
    }
}
