//! Column rules: which columns are read-only and which are calculated.

use std::fmt;
use std::sync::Arc;

use crate::formula::Formula;

type ColumnPredicate = dyn Fn(usize) -> bool + Send + Sync;

/// Matches a set of flattened column indices.
#[derive(Clone, Default)]
pub enum ColumnSelector {
    #[default]
    None,
    Index(usize),
    Indices(Vec<usize>),
    Predicate(Arc<ColumnPredicate>),
}

impl ColumnSelector {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        ColumnSelector::Predicate(Arc::new(f))
    }

    /// Every `period`-th column starting at `offset` (sub-column `offset` of
    /// each equally sized column group).
    pub fn every(period: usize, offset: usize) -> Self {
        if period == 0 {
            return ColumnSelector::None;
        }
        ColumnSelector::predicate(move |col| col % period == offset)
    }

    pub fn matches(&self, col: usize) -> bool {
        match self {
            ColumnSelector::None => false,
            ColumnSelector::Index(idx) => *idx == col,
            ColumnSelector::Indices(indices) => indices.contains(&col),
            ColumnSelector::Predicate(f) => f(col),
        }
    }
}

impl fmt::Debug for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::None => f.write_str("None"),
            ColumnSelector::Index(idx) => f.debug_tuple("Index").field(idx).finish(),
            ColumnSelector::Indices(indices) => f.debug_tuple("Indices").field(indices).finish(),
            ColumnSelector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<usize> for ColumnSelector {
    fn from(idx: usize) -> Self {
        ColumnSelector::Index(idx)
    }
}

impl From<Vec<usize>> for ColumnSelector {
    fn from(indices: Vec<usize>) -> Self {
        ColumnSelector::Indices(indices)
    }
}

/// A derived column. Always read-only.
#[derive(Debug, Clone)]
pub struct CalculatedColumn {
    pub selector: ColumnSelector,
    pub formula: Formula,
}

impl CalculatedColumn {
    pub fn new(selector: impl Into<ColumnSelector>, formula: Formula) -> Self {
        Self {
            selector: selector.into(),
            formula,
        }
    }
}

/// Period-over-period emphasis for a sub-column repeated in every column
/// group (e.g. volume per month).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodHighlight {
    /// Sub-column index within each column group.
    pub sub_column: usize,
    /// Minimum relative increase over the previous period, in percent.
    pub threshold_percent: f64,
}

impl PeriodHighlight {
    pub const DEFAULT_THRESHOLD: f64 = 100.0;

    pub fn new(sub_column: usize) -> Self {
        Self {
            sub_column,
            threshold_percent: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold_percent: f64) -> Self {
        self.threshold_percent = threshold_percent;
        self
    }
}
