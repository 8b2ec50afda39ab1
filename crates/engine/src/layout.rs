//! Row and column descriptors.
//!
//! Rows are either flat or grouped: a grouped layout interleaves one
//! synthetic group-header row before the member rows of every group.
//! Columns are either flat or grouped under a primary label with ordered
//! sub-labels (e.g. one group per month with Vol./Price/Turnover).
//! Descriptors are computed once and never change for the life of a grid.

use serde::{Deserialize, Serialize};

use entrygrid_core::col_to_letters;

/// Default dimensions when neither counts nor a hierarchy are supplied.
pub const DEFAULT_ROWS: usize = 10;
pub const DEFAULT_COLS: usize = 5;

/// One group of the row hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowGroup {
    pub group: String,
    pub items: Vec<String>,
}

impl RowGroup {
    pub fn new(group: impl Into<String>, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            group: group.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

/// One primary column with its ordered sub-columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub main: String,
    pub sub: Vec<String>,
}

impl ColumnGroup {
    pub fn new(main: impl Into<String>, sub: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            main: main.into(),
            sub: sub.into_iter().map(Into::into).collect(),
        }
    }
}

/// Kind of a flattened row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Data,
    /// Synthetic row introduced by grouping; never holds data.
    GroupHeader,
}

/// Descriptor of one flattened row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDescriptor {
    pub label: String,
    pub kind: RowKind,
    /// Name of the owning group (the group itself for header rows).
    pub group: Option<String>,
    /// Index of the owning group, None for flat rows.
    pub group_index: Option<usize>,
    /// Index within the group's items, None for headers and flat rows.
    pub item_index: Option<usize>,
}

impl RowDescriptor {
    pub fn is_group_header(&self) -> bool {
        self.kind == RowKind::GroupHeader
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    rows: Vec<RowDescriptor>,
    grouped: bool,
}

impl RowLayout {
    /// Flat rows; labels come from `headers` where present, else `row + 1`.
    pub fn flat(count: usize, headers: &[String]) -> Self {
        let rows = (0..count)
            .map(|i| RowDescriptor {
                label: headers.get(i).cloned().unwrap_or_else(|| (i + 1).to_string()),
                kind: RowKind::Data,
                group: None,
                group_index: None,
                item_index: None,
            })
            .collect();
        Self { rows, grouped: false }
    }

    /// One header row followed by the member rows, for every group.
    pub fn grouped(groups: &[RowGroup]) -> Self {
        let mut rows = Vec::with_capacity(groups.iter().map(|g| 1 + g.items.len()).sum());
        for (group_idx, group) in groups.iter().enumerate() {
            rows.push(RowDescriptor {
                label: group.group.clone(),
                kind: RowKind::GroupHeader,
                group: Some(group.group.clone()),
                group_index: Some(group_idx),
                item_index: None,
            });
            for (item_idx, item) in group.items.iter().enumerate() {
                rows.push(RowDescriptor {
                    label: item.clone(),
                    kind: RowKind::Data,
                    group: Some(group.group.clone()),
                    group_index: Some(group_idx),
                    item_index: Some(item_idx),
                });
            }
        }
        Self { rows, grouped: true }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_grouped(&self) -> bool {
        self.grouped
    }

    pub fn get(&self, row: usize) -> Option<&RowDescriptor> {
        self.rows.get(row)
    }

    pub fn is_group_header(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(RowDescriptor::is_group_header)
    }

    /// Label of a row (1-based number if out of range).
    pub fn label(&self, row: usize) -> String {
        self.rows
            .get(row)
            .map(|r| r.label.clone())
            .unwrap_or_else(|| (row + 1).to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowDescriptor> + '_ {
        self.rows.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnLayout {
    Flat {
        count: usize,
        headers: Vec<String>,
    },
    Grouped {
        groups: Vec<ColumnGroup>,
        /// Flattened column index where each group starts.
        starts: Vec<usize>,
    },
}

impl ColumnLayout {
    pub fn flat(count: usize, headers: Vec<String>) -> Self {
        ColumnLayout::Flat { count, headers }
    }

    pub fn grouped(groups: Vec<ColumnGroup>) -> Self {
        let mut starts = Vec::with_capacity(groups.len());
        let mut next = 0;
        for group in &groups {
            starts.push(next);
            next += group.sub.len();
        }
        ColumnLayout::Grouped { groups, starts }
    }

    /// Flattened column count.
    pub fn len(&self) -> usize {
        match self {
            ColumnLayout::Flat { count, .. } => *count,
            ColumnLayout::Grouped { groups, .. } => groups.iter().map(|g| g.sub.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_grouped(&self) -> bool {
        matches!(self, ColumnLayout::Grouped { .. })
    }

    pub fn groups(&self) -> &[ColumnGroup] {
        match self {
            ColumnLayout::Flat { .. } => &[],
            ColumnLayout::Grouped { groups, .. } => groups,
        }
    }

    /// (group index, sub-column index) of a flattened column.
    pub fn group_of(&self, col: usize) -> Option<(usize, usize)> {
        let ColumnLayout::Grouped { groups, starts } = self else {
            return None;
        };
        // starts is sorted; the owning group is the last start <= col
        let idx = starts.partition_point(|&s| s <= col).checked_sub(1)?;
        let sub = col - starts[idx];
        (sub < groups[idx].sub.len()).then_some((idx, sub))
    }

    /// Flattened index of a group's sub-column, if the group has one there.
    pub fn column_in_group(&self, group: usize, sub: usize) -> Option<usize> {
        let ColumnLayout::Grouped { groups, starts } = self else {
            return None;
        };
        let g = groups.get(group)?;
        (sub < g.sub.len()).then(|| starts[group] + sub)
    }

    /// Leaf label of a column: the flat header (letters by default) or the
    /// sub-label of a grouped column.
    pub fn label(&self, col: usize) -> String {
        match self {
            ColumnLayout::Flat { .. } => self.flat_headers().get(col).cloned().unwrap_or_default(),
            ColumnLayout::Grouped { groups, .. } => self
                .group_of(col)
                .map(|(g, s)| groups[g].sub[s].clone())
                .unwrap_or_default(),
        }
    }

    /// Header lines for export. Each line starts with the empty corner cell.
    ///
    /// Flat layouts produce one line; supplied headers are used only when
    /// their count matches the column count, else spreadsheet letters.
    /// Grouped layouts produce the primary line (primary label followed by
    /// blanks across the rest of its span) and then the sub-label line.
    pub fn header_lines(&self) -> Vec<Vec<String>> {
        match self {
            ColumnLayout::Flat { .. } => {
                let mut line = vec![String::new()];
                line.extend(self.flat_headers());
                vec![line]
            }
            ColumnLayout::Grouped { groups, .. } => {
                let mut main = vec![String::new()];
                let mut sub = vec![String::new()];
                for group in groups {
                    main.push(group.main.clone());
                    main.extend(std::iter::repeat(String::new()).take(group.sub.len().saturating_sub(1)));
                    sub.extend(group.sub.iter().cloned());
                }
                vec![main, sub]
            }
        }
    }

    fn flat_headers(&self) -> Vec<String> {
        match self {
            ColumnLayout::Flat { count, headers } if headers.len() == *count => headers.clone(),
            _ => (0..self.len()).map(col_to_letters).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn months() -> Vec<ColumnGroup> {
        vec![
            ColumnGroup::new("March", ["Vol.", "Price", "Turnover"]),
            ColumnGroup::new("April", ["Vol.", "Price", "Turnover"]),
        ]
    }

    #[test]
    fn test_grouped_rows_interleave_headers() {
        let layout = RowLayout::grouped(&[
            RowGroup::new("Grup1", ["Prod 1.1", "Prod 1.2"]),
            RowGroup::new("Grup2", ["Prod 2.1"]),
        ]);
        assert_eq!(layout.len(), 5);
        assert!(layout.is_group_header(0));
        assert!(!layout.is_group_header(1));
        assert!(layout.is_group_header(3));
        assert_eq!(layout.label(4), "Prod 2.1");
        assert_eq!(layout.get(4).unwrap().group.as_deref(), Some("Grup2"));
        assert_eq!(layout.get(2).unwrap().item_index, Some(1));
    }

    #[test]
    fn test_flat_row_labels_default_to_numbers() {
        let layout = RowLayout::flat(3, &["first".to_string()]);
        assert_eq!(layout.label(0), "first");
        assert_eq!(layout.label(1), "2");
        assert_eq!(layout.label(2), "3");
    }

    #[test]
    fn test_grouped_columns_count_and_lookup() {
        let layout = ColumnLayout::grouped(months());
        assert_eq!(layout.len(), 6);
        assert_eq!(layout.group_of(0), Some((0, 0)));
        assert_eq!(layout.group_of(2), Some((0, 2)));
        assert_eq!(layout.group_of(3), Some((1, 0)));
        assert_eq!(layout.group_of(6), None);
        assert_eq!(layout.column_in_group(1, 2), Some(5));
        assert_eq!(layout.label(4), "Price");
    }

    #[test]
    fn test_uneven_groups() {
        let layout = ColumnLayout::grouped(vec![
            ColumnGroup::new("A", ["x"]),
            ColumnGroup::new("B", ["y", "z", "w"]),
        ]);
        assert_eq!(layout.group_of(0), Some((0, 0)));
        assert_eq!(layout.group_of(3), Some((1, 2)));
        assert_eq!(layout.column_in_group(0, 1), None);
    }

    #[test]
    fn test_flat_header_line_falls_back_to_letters() {
        let layout = ColumnLayout::flat(3, vec!["only".to_string()]);
        assert_eq!(layout.header_lines(), vec![vec!["", "A", "B", "C"]]);

        let layout = ColumnLayout::flat(2, vec!["Qty".to_string(), "Price".to_string()]);
        assert_eq!(layout.header_lines(), vec![vec!["", "Qty", "Price"]]);
    }

    #[test]
    fn test_grouped_header_lines_span() {
        let layout = ColumnLayout::grouped(months());
        let lines = layout.header_lines();
        assert_eq!(lines[0], vec!["", "March", "", "", "April", "", ""]);
        assert_eq!(lines[1], vec!["", "Vol.", "Price", "Turnover", "Vol.", "Price", "Turnover"]);
    }
}
