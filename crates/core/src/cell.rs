//! Cell addressing.
//!
//! A `CellPos` identifies one position of the matrix by 0-based row and
//! column. Its textual form `"row-col"` is the key used wherever a value map
//! leaves the process (change notifications, value files).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A (row, column) position in the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Offset this position, returning None on overflow.
    pub fn offset(self, d_row: usize, d_col: usize) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add(d_row)?,
            col: self.col.checked_add(d_col)?,
        })
    }
}

impl From<(usize, usize)> for CellPos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// Error returned when a `"row-col"` key cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCellPosError(pub String);

impl fmt::Display for ParseCellPosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid cell key '{}': expected \"row-col\"", self.0)
    }
}

impl std::error::Error for ParseCellPosError {}

impl FromStr for CellPos {
    type Err = ParseCellPosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCellPosError(s.to_string());
        let (row, col) = s.split_once('-').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;
        Ok(Self { row, col })
    }
}

/// Keyboard movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, column delta) of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Convert 0-based column index to spreadsheet-style letter(s).
pub fn col_to_letters(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}
