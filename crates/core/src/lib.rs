pub mod cell;
pub mod selection;

pub use cell::{col_to_letters, CellPos, Direction};
pub use selection::{Range, Selection};
