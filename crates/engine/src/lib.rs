pub mod events;
pub mod formula;
pub mod layout;
pub mod matrix;
pub mod resolve;
pub mod rules;
pub mod store;

pub use entrygrid_core::{CellPos, Range};
pub use matrix::{GridConfig, Matrix};
pub use store::RawValues;
