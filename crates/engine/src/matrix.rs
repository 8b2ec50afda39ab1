//! The matrix model: dimensions, descriptors, rules and the raw store.
//!
//! `is_read_only` is the single gate every mutation goes through. Writes to
//! read-only cells (group headers, calculated or read-only columns, a
//! globally read-only grid, or out-of-bounds addresses) are silently
//! dropped; the caller never sees an error because such cells are rendered
//! non-interactive in the first place.

use std::cell::RefCell;
use std::rc::Rc;

use entrygrid_core::CellPos;

use crate::layout::{ColumnGroup, ColumnLayout, RowDescriptor, RowGroup, RowLayout, DEFAULT_COLS, DEFAULT_ROWS};
use crate::rules::{CalculatedColumn, ColumnSelector, PeriodHighlight};
use crate::store::RawValues;

/// Construction parameters of a grid. Consumed once by [`Matrix::new`].
#[derive(Debug, Clone, Default)]
pub struct GridConfig {
    /// Explicit row count, ignored when `row_groups` is set.
    pub rows: Option<usize>,
    /// Explicit column count, ignored when `column_groups` is set.
    pub cols: Option<usize>,
    pub row_headers: Vec<String>,
    pub col_headers: Vec<String>,
    pub row_groups: Option<Vec<RowGroup>>,
    pub column_groups: Option<Vec<ColumnGroup>>,
    pub initial_values: RawValues,
    /// Makes every cell read-only.
    pub read_only: bool,
    pub read_only_columns: ColumnSelector,
    pub calculated_columns: Vec<CalculatedColumn>,
    pub highlight: Option<PeriodHighlight>,
}

impl GridConfig {
    /// Flat grid with explicit dimensions.
    pub fn flat(rows: usize, cols: usize) -> Self {
        Self {
            rows: Some(rows),
            cols: Some(cols),
            ..Self::default()
        }
    }

    /// Grid with hierarchical rows and columns.
    pub fn grouped(row_groups: Vec<RowGroup>, column_groups: Vec<ColumnGroup>) -> Self {
        Self {
            row_groups: Some(row_groups),
            column_groups: Some(column_groups),
            ..Self::default()
        }
    }

    pub fn with_row_headers(mut self, headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.row_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_col_headers(mut self, headers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.col_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_row_groups(mut self, groups: Vec<RowGroup>) -> Self {
        self.row_groups = Some(groups);
        self
    }

    pub fn with_column_groups(mut self, groups: Vec<ColumnGroup>) -> Self {
        self.column_groups = Some(groups);
        self
    }

    pub fn with_initial_values(mut self, values: RawValues) -> Self {
        self.initial_values = values;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_read_only_columns(mut self, selector: impl Into<ColumnSelector>) -> Self {
        self.read_only_columns = selector.into();
        self
    }

    pub fn with_calculated(mut self, column: CalculatedColumn) -> Self {
        self.calculated_columns.push(column);
        self
    }

    pub fn with_highlight(mut self, highlight: PeriodHighlight) -> Self {
        self.highlight = Some(highlight);
        self
    }
}

/// Per-column rule evaluation, resolved once at construction.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnRules {
    read_only: bool,
    /// Index into `Matrix::calculated` of the first matching rule.
    calculated: Option<usize>,
}

#[derive(Debug)]
pub struct Matrix {
    rows: RowLayout,
    columns: ColumnLayout,
    read_only: bool,
    calculated: Vec<CalculatedColumn>,
    column_rules: Vec<ColumnRules>,
    highlight: Option<PeriodHighlight>,
    values: RawValues,
    /// Incremented on every store mutation.
    revision: u64,
    /// All data rows' raw vectors, memoized per revision.
    data_rows: RefCell<Option<(u64, Rc<Vec<Vec<String>>>)>>,
}

impl Matrix {
    pub fn new(config: GridConfig) -> Self {
        let rows = match &config.row_groups {
            Some(groups) => RowLayout::grouped(groups),
            None => RowLayout::flat(config.rows.unwrap_or(DEFAULT_ROWS), &config.row_headers),
        };
        let columns = match config.column_groups {
            Some(groups) => ColumnLayout::grouped(groups),
            None => ColumnLayout::flat(config.cols.unwrap_or(DEFAULT_COLS), config.col_headers),
        };

        let column_rules = (0..columns.len())
            .map(|col| ColumnRules {
                read_only: config.read_only_columns.matches(col),
                calculated: config
                    .calculated_columns
                    .iter()
                    .position(|rule| rule.selector.matches(col)),
            })
            .collect();

        let mut matrix = Self {
            rows,
            columns,
            read_only: config.read_only,
            calculated: config.calculated_columns,
            column_rules,
            highlight: config.highlight,
            values: RawValues::new(),
            revision: 0,
            data_rows: RefCell::new(None),
        };

        let mut initial = config.initial_values;
        matrix.retain_writable(&mut initial);
        matrix.values = initial;
        matrix
    }

    /// (row count, column count)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> &RowLayout {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn row(&self, row: usize) -> Option<&RowDescriptor> {
        self.rows.get(row)
    }

    pub fn is_group_header(&self, row: usize) -> bool {
        self.rows.is_group_header(row)
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows.len() && col < self.columns.len()
    }

    pub fn is_globally_read_only(&self) -> bool {
        self.read_only
    }

    pub fn highlight(&self) -> Option<&PeriodHighlight> {
        self.highlight.as_ref()
    }

    /// The calculated-column rule for a column, if any.
    pub fn calculated_rule(&self, col: usize) -> Option<&CalculatedColumn> {
        let idx = self.column_rules.get(col)?.calculated?;
        self.calculated.get(idx)
    }

    pub fn is_calculated_column(&self, col: usize) -> bool {
        self.calculated_rule(col).is_some()
    }

    /// The single gate for every mutating operation.
    pub fn is_read_only(&self, row: usize, col: usize) -> bool {
        if self.read_only || !self.in_bounds(row, col) {
            return true;
        }
        if self.rows.is_group_header(row) {
            return true;
        }
        let rules = self.column_rules[col];
        rules.read_only || rules.calculated.is_some()
    }

    pub fn is_editable(&self, pos: CellPos) -> bool {
        !self.is_read_only(pos.row, pos.col)
    }

    /// Stored string, or "" when absent. Group headers always read "".
    pub fn raw_value(&self, row: usize, col: usize) -> &str {
        if self.rows.is_group_header(row) {
            return "";
        }
        self.values.get(CellPos::new(row, col)).unwrap_or("")
    }

    /// Upsert a raw value. Silently ignored for read-only cells.
    /// Returns true if the store changed.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) -> bool {
        if self.is_read_only(row, col) {
            log::trace!("ignored write to read-only cell {}", CellPos::new(row, col));
            return false;
        }
        let changed = self.values.insert(CellPos::new(row, col), value);
        if changed {
            self.bump();
        }
        changed
    }

    /// Remove a raw value, subject to the same gate as `set_value`.
    pub fn remove_value(&mut self, row: usize, col: usize) -> bool {
        if self.is_read_only(row, col) {
            return false;
        }
        let changed = self.values.remove(CellPos::new(row, col));
        if changed {
            self.bump();
        }
        changed
    }

    /// Wipe the whole store. Returns true if anything was removed.
    pub fn clear(&mut self) -> bool {
        if self.values.is_empty() {
            return false;
        }
        self.values.clear();
        self.bump();
        true
    }

    /// Replace the store wholesale. Entries for read-only or out-of-bounds
    /// cells are dropped. Returns the number of entries kept.
    pub fn replace_all(&mut self, mut values: RawValues) -> usize {
        self.retain_writable(&mut values);
        let kept = values.len();
        self.values = values;
        self.bump();
        kept
    }

    pub fn values(&self) -> &RawValues {
        &self.values
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All editable cells in row-major order.
    pub fn editable_cells(&self) -> Vec<CellPos> {
        let (rows, cols) = self.dimensions();
        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| CellPos::new(r, c)))
            .filter(|pos| self.is_editable(*pos))
            .collect()
    }

    /// Full-width raw vector of one row.
    pub fn row_values(&self, row: usize) -> Vec<String> {
        (0..self.col_count())
            .map(|col| self.raw_value(row, col).to_string())
            .collect()
    }

    /// Raw vectors of every non-header row, shared until the next mutation.
    pub fn data_rows(&self) -> Rc<Vec<Vec<String>>> {
        if let Some((rev, rows)) = self.data_rows.borrow().as_ref() {
            if *rev == self.revision {
                return Rc::clone(rows);
            }
        }
        let rows: Rc<Vec<Vec<String>>> = Rc::new(
            (0..self.row_count())
                .filter(|r| !self.rows.is_group_header(*r))
                .map(|r| self.row_values(r))
                .collect(),
        );
        *self.data_rows.borrow_mut() = Some((self.revision, Rc::clone(&rows)));
        rows
    }

    fn retain_writable(&self, values: &mut RawValues) {
        let before = values.len();
        values.retain(|pos, _| !self.is_read_only(pos.row, pos.col));
        let dropped = before - values.len();
        if dropped > 0 {
            log::debug!("dropped {} value(s) addressed to read-only cells", dropped);
        }
    }

    fn bump(&mut self) {
        self.revision += 1;
    }
}
