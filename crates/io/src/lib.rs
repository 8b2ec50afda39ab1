// File I/O operations

pub mod csv;
pub mod error;
pub mod import;
pub mod json;
pub mod sink;

pub use error::{ExportError, ImportError, ValuesFileError};
pub use sink::{Download, ExportSink};

/// File extensions the import accepts.
pub const IMPORT_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];
