//! Export delivery.
//!
//! By default an export becomes a downloaded file. Hosts that want the text
//! itself (to upload it, show it, or test it) pass any `FnMut(&str)` closure
//! instead, which bypasses the download entirely.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use entrygrid_config::ExportSettings;

use crate::error::ExportError;

/// Receives serialized CSV text.
pub trait ExportSink {
    fn deliver(&mut self, csv: &str) -> Result<(), ExportError>;
}

impl<F> ExportSink for F
where
    F: FnMut(&str),
{
    fn deliver(&mut self, csv: &str) -> Result<(), ExportError> {
        self(csv);
        Ok(())
    }
}

/// Maximum number of "name (n).ext" candidates tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Writes the export as a new file in a download directory, never
/// overwriting an existing one.
#[derive(Debug, Clone)]
pub struct Download {
    dir: PathBuf,
    file_name: String,
    /// Path of the most recent successful delivery.
    last_path: Option<PathBuf>,
}

impl Download {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            last_path: None,
        }
    }

    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self::new(settings.effective_directory(), settings.file_name.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    /// "export.csv", then "export (1).csv", "export (2).csv", ...
    fn candidate(&self, n: u32) -> PathBuf {
        if n == 0 {
            return self.dir.join(&self.file_name);
        }
        let name = Path::new(&self.file_name);
        let stem = name.file_stem().and_then(|s| s.to_str()).unwrap_or(&self.file_name);
        let file = match name.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        self.dir.join(file)
    }
}

impl ExportSink for Download {
    fn deliver(&mut self, csv: &str) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ExportError::Io {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;

        for n in 0..MAX_NAME_ATTEMPTS {
            let path = self.candidate(n);
            // create_new fails on an existing file, so a name is never reused
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(ExportError::Io {
                        path,
                        message: e.to_string(),
                    })
                }
            };
            file.write_all(csv.as_bytes()).map_err(|e| ExportError::Io {
                path: path.clone(),
                message: e.to_string(),
            })?;
            log::info!("exported {} bytes to {}", csv.len(), path.display());
            self.last_path = Some(path);
            return Ok(());
        }

        Err(ExportError::NameExhausted {
            dir: self.dir.clone(),
            file_name: self.file_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_closure_sink_receives_text() {
        let mut received = String::new();
        let mut sink = |text: &str| received.push_str(text);
        sink.deliver("a,b\n").unwrap();
        assert_eq!(received, "a,b\n");
    }

    #[test]
    fn test_download_never_overwrites() {
        let dir = tempdir().unwrap();
        let mut sink = Download::new(dir.path(), "export.csv");

        sink.deliver("first").unwrap();
        assert_eq!(sink.last_path(), Some(dir.path().join("export.csv").as_path()));

        sink.deliver("second").unwrap();
        let second = dir.path().join("export (1).csv");
        assert_eq!(sink.last_path(), Some(second.as_path()));

        assert_eq!(fs::read_to_string(dir.path().join("export.csv")).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
    }

    #[test]
    fn test_download_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("downloads").join("grid");
        let mut sink = Download::new(&nested, "data");
        sink.deliver("x").unwrap();
        sink.deliver("y").unwrap();
        assert!(nested.join("data").exists());
        assert!(nested.join("data (1)").exists());
    }
}
