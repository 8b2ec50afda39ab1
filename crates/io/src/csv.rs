// CSV export

use std::path::Path;

use entrygrid_engine::Matrix;

use crate::error::ExportError;

fn writer_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder.flexible(true).terminator(csv::Terminator::Any(b'\n'));
    builder
}

/// Serialize the whole matrix: header line(s), then one line per row with
/// the row label followed by every column's displayed value.
///
/// Group-header rows are written too (label plus blanks) so the export keeps
/// the on-screen row structure.
pub fn serialize(matrix: &Matrix) -> Result<String, ExportError> {
    let mut writer = writer_builder().from_writer(Vec::new());

    for mut line in matrix.columns().header_lines() {
        // A lone empty field would be written as `""`; keep the bare separator
        if line.len() == 1 {
            line.push(String::new());
        }
        writer.write_record(&line).map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    for row in 0..matrix.row_count() {
        let mut record = Vec::with_capacity(matrix.col_count() + 1);
        record.push(matrix.rows().label(row));
        record.extend(matrix.display_row(row));
        writer.write_record(&record).map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Serialize and write straight to a file.
pub fn export(matrix: &Matrix, path: &Path) -> Result<(), ExportError> {
    let text = serialize(matrix)?;
    std::fs::write(path, text).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use entrygrid_engine::formula::{ColumnRef, Formula};
    use entrygrid_engine::layout::{ColumnGroup, RowGroup};
    use entrygrid_engine::rules::CalculatedColumn;
    use entrygrid_engine::GridConfig;

    #[test]
    fn test_flat_export_uses_letters_and_row_numbers() {
        let mut m = Matrix::new(GridConfig::flat(2, 3));
        m.set_value(0, 1, "x");
        let text = serialize(&m).unwrap();
        assert_eq!(text, ",A,B,C\n1,,x,\n2,,,\n");
    }

    #[test]
    fn test_flat_export_with_headers_and_labels() {
        let m = Matrix::new(
            GridConfig::flat(1, 2)
                .with_col_headers(["Units", "ASP"])
                .with_row_headers(["Acme"]),
        );
        assert_eq!(serialize(&m).unwrap(), ",Units,ASP\nAcme,,\n");

        // Header count mismatch falls back to letters
        let m = Matrix::new(GridConfig::flat(1, 2).with_col_headers(["Only one"]));
        assert!(serialize(&m).unwrap().starts_with(",A,B\n"));
    }

    #[test]
    fn test_zero_columns_keeps_corner_separator() {
        let m = Matrix::new(GridConfig::flat(2, 0));
        assert_eq!(serialize(&m).unwrap(), ",\n1\n2\n");
    }

    #[test]
    fn test_quoting() {
        let mut m = Matrix::new(GridConfig::flat(1, 3));
        m.set_value(0, 0, "a,b");
        m.set_value(0, 1, "say \"hi\"");
        m.set_value(0, 2, "plain");
        let text = serialize(&m).unwrap();
        assert_eq!(text.lines().nth(1), Some("1,\"a,b\",\"say \"\"hi\"\"\",plain"));
    }

    #[test]
    fn test_grouped_export_exports_displayed_values() {
        let mut m = Matrix::new(
            GridConfig::grouped(
                vec![RowGroup::new("Grup1", ["Prod 1.1"])],
                vec![
                    ColumnGroup::new("March", ["Vol.", "Price", "Turnover"]),
                    ColumnGroup::new("April", ["Vol.", "Price", "Turnover"]),
                ],
            )
            .with_calculated(CalculatedColumn::new(
                entrygrid_engine::rules::ColumnSelector::every(3, 2),
                Formula::product(ColumnRef::Offset(-2), ColumnRef::Offset(-1)),
            )),
        );
        m.set_value(1, 0, "4");
        m.set_value(1, 1, "2.5");

        let text = serialize(&m).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ",March,,,April,,");
        assert_eq!(lines[1], ",Vol.,Price,Turnover,Vol.,Price,Turnover");
        assert_eq!(lines[2], "Grup1,,,,,,");
        assert_eq!(lines[3], "Prod 1.1,4,2.5,10.00,,,");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut m = Matrix::new(GridConfig::flat(1, 1));
        m.set_value(0, 0, "42");
        export(&m, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), ",A\n1,42\n");
    }
}
