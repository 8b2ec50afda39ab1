//! Displayed values and the period-over-period highlight.
//!
//! Nothing here writes to the store. Calculated cells are derived from the
//! current raw state on every read, so an edit to an operand is visible on
//! the next read without any explicit recompute step.

use crate::formula::{parse_operand, FormulaInput};
use crate::matrix::Matrix;

impl Matrix {
    /// The value shown for a cell: "" for group headers, the formula result
    /// for calculated columns, the raw value otherwise.
    pub fn display_value(&self, row: usize, col: usize) -> String {
        if self.is_group_header(row) {
            return String::new();
        }
        match self.calculated_rule(col) {
            Some(rule) => {
                let current = self.row_values(row);
                let all_rows = self.data_rows();
                rule.formula.eval(&FormulaInput {
                    row: &current,
                    all_rows: &all_rows,
                    row_index: row,
                    col_index: col,
                })
            }
            None => self.raw_value(row, col).to_string(),
        }
    }

    /// Displayed values of one row, full width.
    pub fn display_row(&self, row: usize) -> Vec<String> {
        (0..self.col_count()).map(|col| self.display_value(row, col)).collect()
    }

    /// True when the cell is the highlighted sub-column of a period group and
    /// grew by at least the configured threshold over the previous period.
    ///
    /// Blank values count as 0; a zero, blank or non-numeric previous value
    /// never flags. The first period has no predecessor and never flags.
    pub fn is_highlighted(&self, row: usize, col: usize) -> bool {
        let Some(rule) = self.highlight() else {
            return false;
        };
        if self.is_group_header(row) {
            return false;
        }
        let Some((group, sub)) = self.columns().group_of(col) else {
            return false;
        };
        if sub != rule.sub_column || group == 0 {
            return false;
        }
        let Some(prev_col) = self.columns().column_in_group(group - 1, sub) else {
            return false;
        };

        let (Some(current), Some(previous)) = (
            period_value(self.raw_value(row, col)),
            period_value(self.raw_value(row, prev_col)),
        ) else {
            return false;
        };
        if previous == 0.0 {
            return false;
        }
        let increase = (current - previous) / previous * 100.0;
        increase >= rule.threshold_percent
    }
}

fn period_value(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return Some(0.0);
    }
    parse_operand(raw)
}

#[cfg(test)]
mod tests {
    use crate::formula::{ColumnRef, Formula};
    use crate::layout::{ColumnGroup, RowGroup};
    use crate::matrix::{GridConfig, Matrix};
    use crate::rules::{CalculatedColumn, ColumnSelector, PeriodHighlight};

    fn sales() -> Matrix {
        let months = ["March", "April", "May"]
            .into_iter()
            .map(|m| ColumnGroup::new(m, ["Vol.", "Price", "Turnover"]))
            .collect();
        Matrix::new(
            GridConfig::grouped(
                vec![
                    RowGroup::new("Grup1", ["Prod 1.1", "Prod 1.2"]),
                    RowGroup::new("Grup2", ["Prod 2.1"]),
                ],
                months,
            )
            .with_calculated(CalculatedColumn::new(
                ColumnSelector::every(3, 2),
                Formula::product(ColumnRef::Offset(-2), ColumnRef::Offset(-1)),
            ))
            .with_highlight(PeriodHighlight::new(0)),
        )
    }

    #[test]
    fn test_calculated_cell_tracks_operands() {
        let mut m = Matrix::new(GridConfig::flat(5, 3).with_calculated(CalculatedColumn::new(
            2,
            Formula::product(ColumnRef::Absolute(0), ColumnRef::Absolute(1)),
        )));
        m.set_value(0, 0, "10");
        m.set_value(0, 1, "5");
        assert_eq!(m.display_value(0, 2), "50.00");

        // Unrelated cell: no effect
        m.set_value(3, 0, "99");
        assert_eq!(m.display_value(0, 2), "50.00");

        m.set_value(0, 0, "0");
        assert_eq!(m.display_value(0, 2), "");
    }

    #[test]
    fn test_turnover_is_per_month() {
        let mut m = sales();
        // Row 1 is the first product (row 0 is the Grup1 header)
        m.set_value(1, 0, "4");
        m.set_value(1, 1, "2.5");
        assert_eq!(m.display_value(1, 2), "10.00");

        // Editing April never touches March turnover
        m.set_value(1, 3, "100");
        m.set_value(1, 4, "3");
        assert_eq!(m.display_value(1, 2), "10.00");
        assert_eq!(m.display_value(1, 5), "300.00");
    }

    #[test]
    fn test_group_header_displays_blank() {
        let m = sales();
        assert_eq!(m.display_value(0, 2), "");
        assert_eq!(m.display_row(0), vec![""; 9]);
    }

    #[test]
    fn test_share_of_total_over_data_rows() {
        let mut m = Matrix::new(
            GridConfig::flat(3, 3).with_calculated(CalculatedColumn::new(
                2,
                Formula::share_of_total(ColumnRef::Absolute(0), ColumnRef::Absolute(1)),
            )),
        );
        for r in 0..3 {
            assert_eq!(m.display_value(r, 2), "0.0%");
        }
        m.set_value(0, 0, "10");
        m.set_value(0, 1, "5");
        m.set_value(1, 0, "0");
        m.set_value(1, 1, "8");
        m.set_value(2, 0, "30");
        m.set_value(2, 1, "5");
        assert_eq!(m.display_value(0, 2), "25.0%");
        assert_eq!(m.display_value(1, 2), "0.0%");
        assert_eq!(m.display_value(2, 2), "75.0%");
    }

    #[test]
    fn test_highlight_doubling_volume() {
        let mut m = sales();
        m.set_value(1, 0, "10");
        m.set_value(1, 3, "20");
        m.set_value(1, 6, "29");
        assert!(!m.is_highlighted(1, 0), "first period has no predecessor");
        assert!(m.is_highlighted(1, 3), "+100% flags");
        assert!(!m.is_highlighted(1, 6), "+45% does not");
        assert!(!m.is_highlighted(1, 4), "only the volume sub-column");
    }

    #[test]
    fn test_highlight_guards() {
        let mut m = sales();
        // Previous blank: never flagged
        m.set_value(2, 3, "50");
        assert!(!m.is_highlighted(2, 3));
        // Previous non-numeric
        m.set_value(2, 0, "n/a");
        assert!(!m.is_highlighted(2, 3));
        // Group header rows
        assert!(!m.is_highlighted(0, 3));
    }

    #[test]
    fn test_highlight_needs_grouped_columns() {
        let mut m = Matrix::new(GridConfig::flat(2, 6).with_highlight(PeriodHighlight::new(0)));
        m.set_value(0, 0, "1");
        m.set_value(0, 3, "10");
        assert!(!m.is_highlighted(0, 3));
    }

    #[test]
    fn test_custom_threshold() {
        let months = ["Jan", "Feb"]
            .into_iter()
            .map(|m| ColumnGroup::new(m, ["Vol."]))
            .collect();
        let mut m = Matrix::new(
            GridConfig::grouped(vec![RowGroup::new("G", ["p"])], months)
                .with_highlight(PeriodHighlight::new(0).with_threshold(50.0)),
        );
        m.set_value(1, 0, "10");
        m.set_value(1, 1, "15");
        assert!(m.is_highlighted(1, 1));
    }
}
