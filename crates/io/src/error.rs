use std::fmt;
use std::path::PathBuf;

/// Failure while serializing or delivering an export.
#[derive(Debug)]
pub enum ExportError {
    /// CSV writer failure.
    Csv(String),
    /// Writing the download file failed.
    Io { path: PathBuf, message: String },
    /// No free file name could be found in the target directory.
    NameExhausted { dir: PathBuf, file_name: String },
    /// A caller-supplied sink refused the text.
    Sink(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(msg) => write!(f, "CSV serialization failed: {msg}"),
            Self::Io { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::NameExhausted { dir, file_name } => {
                write!(f, "no free name for '{file_name}' in {}", dir.display())
            }
            Self::Sink(msg) => write!(f, "export sink failed: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

/// Failure of the simulated bulk import.
#[derive(Debug)]
pub enum ImportError {
    /// The file reference has an extension the import does not accept.
    UnsupportedFormat(String),
    /// The referenced file does not exist.
    NotFound(PathBuf),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(ext) if ext.is_empty() => {
                write!(f, "unsupported import file: no extension (expected .xlsx, .xls or .csv)")
            }
            Self::UnsupportedFormat(ext) => {
                write!(f, "unsupported import format '.{ext}' (expected .xlsx, .xls or .csv)")
            }
            Self::NotFound(path) => write!(f, "import file not found: {}", path.display()),
        }
    }
}

impl std::error::Error for ImportError {}

/// Failure loading or saving a JSON value file.
#[derive(Debug)]
pub enum ValuesFileError {
    Io(String),
    /// Malformed JSON or a key that is not "row-col".
    Parse(String),
}

impl fmt::Display for ValuesFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "value file IO error: {msg}"),
            Self::Parse(msg) => write!(f, "value file parse error: {msg}"),
        }
    }
}

impl std::error::Error for ValuesFileError {}

impl From<serde_json::Error> for ValuesFileError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::Io(e.to_string())
        } else {
            Self::Parse(e.to_string())
        }
    }
}
