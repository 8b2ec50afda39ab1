//! Clipboard interchange.
//!
//! Text format is tab-separated fields and `\n`-separated rows, what
//! spreadsheet tools put on the system clipboard. Clipboard access is async
//! and may fail (permissions, headless session); failures are logged and
//! otherwise leave the grid unchanged.

use std::fmt;

use entrygrid_core::{CellPos, Range};

use crate::grid::DataGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard in this environment.
    Unavailable,
    /// Access refused by the platform.
    Denied(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "clipboard unavailable"),
            Self::Denied(msg) => write!(f, "clipboard access denied: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// System clipboard as seen by the grid.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    async fn read_text(&mut self) -> Result<String, ClipboardError>;
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Make every read fail, as a denied permission would.
    pub fn fail_reads(mut self, fail: bool) -> Self {
        self.fail_reads = fail;
        self
    }

    pub fn fail_writes(mut self, fail: bool) -> Self {
        self.fail_writes = fail;
        self
    }
}

impl Clipboard for MemoryClipboard {
    async fn read_text(&mut self) -> Result<String, ClipboardError> {
        if self.fail_reads {
            return Err(ClipboardError::Denied("read blocked".into()));
        }
        self.text.clone().ok_or(ClipboardError::Unavailable)
    }

    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail_writes {
            return Err(ClipboardError::Denied("write blocked".into()));
        }
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// The platform clipboard. A fresh handle is opened for every access so
/// nothing is held between copies; on a headless session every call fails
/// with [`ClipboardError::Unavailable`].
#[cfg(feature = "system-clipboard")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, ClipboardError> {
        arboard::Clipboard::new().map_err(ClipboardError::from)
    }
}

#[cfg(feature = "system-clipboard")]
impl From<arboard::Error> for ClipboardError {
    fn from(e: arboard::Error) -> Self {
        match e {
            arboard::Error::ContentNotAvailable | arboard::Error::ClipboardNotSupported => Self::Unavailable,
            other => Self::Denied(other.to_string()),
        }
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    async fn read_text(&mut self) -> Result<String, ClipboardError> {
        Ok(Self::open()?.get_text()?)
    }

    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Self::open()?.set_text(text)?;
        Ok(())
    }
}

impl DataGrid {
    /// Text for the current selection: the bounding rectangle of the
    /// selected editable cells, read-only cells inside it blanked.
    /// None when no editable cell is selected.
    pub fn copy_text(&self) -> Option<String> {
        let bounds = Range::bounding(self.selection.iter().filter(|pos| self.matrix.is_editable(*pos)))?;

        let lines: Vec<String> = (bounds.start_row..=bounds.end_row)
            .map(|row| {
                (bounds.start_col..=bounds.end_col)
                    .map(|col| {
                        if self.matrix.is_read_only(row, col) {
                            String::new()
                        } else {
                            self.matrix.display_value(row, col)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect();
        Some(lines.join("\n"))
    }

    /// Write pasted text into the grid. Returns the number of cells changed.
    ///
    /// With more than one cell selected, the first field of the first line
    /// is written to every selected editable cell and the rest of the text
    /// is dropped. Otherwise the text is laid out as a rectangle from the
    /// focused cell; targets out of bounds or read-only are skipped.
    pub fn paste_text(&mut self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.commit_edit();

        if self.selection.len() > 1 {
            let first_line = text.split('\n').next().unwrap_or_default().trim();
            let value = first_line.split('\t').next().unwrap_or(first_line).trim().to_string();
            let targets: Vec<CellPos> = self.selection.iter().collect();
            return self.apply_writes(targets.into_iter().map(|pos| (pos, Some(value.clone()))));
        }

        let origin = self.focus;
        let (rows, cols) = self.matrix.dimensions();
        let mut writes = Vec::new();
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !line.is_empty());
        for (d_row, line) in lines.enumerate() {
            for (d_col, field) in line.split('\t').enumerate() {
                let Some(target) = origin.offset(d_row, d_col) else {
                    continue;
                };
                if target.row < rows && target.col < cols {
                    writes.push((target, Some(field.to_string())));
                }
            }
        }
        self.apply_writes(writes)
    }

    /// Copy the selection to the clipboard. Returns true if text was
    /// written; a failed write is logged and ignored.
    pub async fn copy<C: Clipboard>(&self, clipboard: &mut C) -> bool {
        let Some(text) = self.copy_text() else {
            return false;
        };
        match clipboard.write_text(&text).await {
            Ok(()) => true,
            Err(e) => {
                log::debug!("copy ignored: {e}");
                false
            }
        }
    }

    /// Paste from the clipboard. A failed read is logged and ignored.
    pub async fn paste<C: Clipboard>(&mut self, clipboard: &mut C) -> usize {
        match clipboard.read_text().await {
            Ok(text) => self.paste_text(&text),
            Err(e) => {
                log::debug!("paste ignored: {e}");
                0
            }
        }
    }
}
