//! Interactive controller for an entrygrid matrix.
//!
//! `DataGrid` owns the matrix plus all transient interaction state (focus,
//! selection, the active gesture) and exposes the operations a host UI
//! forwards pointer and keyboard input to. Rendering is the host's job.

pub mod clipboard;
pub mod export;
pub mod fill;
pub mod grid;
pub mod import;
pub mod keyboard;
pub mod navigation;
pub mod presets;
pub mod state;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use grid::DataGrid;
pub use import::ImportTicket;
pub use keyboard::{Key, KeyOutcome, Modifiers};
pub use state::{CaptureRegistry, Interaction, PointerCapture};

pub use entrygrid_config::Settings;
pub use entrygrid_core::{CellPos, Direction, Range, Selection};
pub use entrygrid_engine::events::{EventCollector, GridEvent, ValuesChangedEvent};
pub use entrygrid_engine::{GridConfig, Matrix, RawValues};
