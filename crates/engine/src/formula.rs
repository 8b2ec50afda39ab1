//! Calculated-column formulas.
//!
//! A formula is a plain function of raw values; there is no expression
//! language. Two patterns cover every data-entry screen: the product of two
//! columns and a row's share of the column-wide total of that product.
//! Arbitrary closures can be supplied with [`Formula::new`].

use std::fmt;
use std::sync::Arc;

/// Everything a formula may read. Rows are full-width raw vectors; group
/// header rows are never part of `all_rows`.
#[derive(Debug, Clone, Copy)]
pub struct FormulaInput<'a> {
    pub row: &'a [String],
    pub all_rows: &'a [Vec<String>],
    pub row_index: usize,
    pub col_index: usize,
}

type FormulaFn = dyn Fn(&FormulaInput<'_>) -> String + Send + Sync;

/// Shared formula closure.
#[derive(Clone)]
pub struct Formula(Arc<FormulaFn>);

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formula(..)")
    }
}

/// Column operand of a built-in formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    /// A fixed flattened column index.
    Absolute(usize),
    /// Relative to the calculated column itself; `Offset(-2)` is two to the left.
    Offset(isize),
}

impl ColumnRef {
    pub fn resolve(self, col_index: usize) -> Option<usize> {
        match self {
            ColumnRef::Absolute(col) => Some(col),
            ColumnRef::Offset(delta) => col_index.checked_add_signed(delta),
        }
    }
}

impl Formula {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&FormulaInput<'_>) -> String + Send + Sync + 'static,
    {
        Formula(Arc::new(f))
    }

    pub fn eval(&self, input: &FormulaInput<'_>) -> String {
        (self.0)(input)
    }

    /// `a × b` with two decimals. Blank when either operand is missing,
    /// non-numeric or zero, so "not entered yet" never shows as 0.00.
    /// An overflowing product is blank too.
    pub fn product(a: ColumnRef, b: ColumnRef) -> Self {
        Formula::new(move |input| match product_of(input.row, a, b, input.col_index) {
            Some(value) => format!("{:.2}", value),
            None => String::new(),
        })
    }

    /// This row's `a × b` as a percentage of the sum of `a × b` over all
    /// data rows, one decimal. Rows without a product contribute 0; a zero
    /// total renders "0.0%" and an overflowing total renders blank.
    pub fn share_of_total(a: ColumnRef, b: ColumnRef) -> Self {
        Formula::new(move |input| {
            let col = input.col_index;
            let total: f64 = input
                .all_rows
                .iter()
                .filter_map(|row| product_of(row, a, b, col))
                .sum();
            if !total.is_finite() {
                return String::new();
            }
            if total == 0.0 {
                return "0.0%".to_string();
            }
            let own = product_of(input.row, a, b, col).unwrap_or(0.0);
            format!("{:.1}%", own / total * 100.0)
        })
    }
}

/// Parse a raw cell string as a formula operand.
pub fn parse_operand(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn operand(row: &[String], col: ColumnRef, col_index: usize) -> Option<f64> {
    let idx = col.resolve(col_index)?;
    parse_operand(row.get(idx)?)
}

fn product_of(row: &[String], a: ColumnRef, b: ColumnRef, col_index: usize) -> Option<f64> {
    let x = operand(row, a, col_index)?;
    let y = operand(row, b, col_index)?;
    if x == 0.0 || y == 0.0 {
        return None;
    }
    let product = x * y;
    product.is_finite().then_some(product)
}
