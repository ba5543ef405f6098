//! Query helpers for extracting data from loaded runs.

use ff_results::{CellValue, ResultTable};

use crate::error::{AppError, AppResult};

/// Summary of a result table's shape and completeness.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub rows: usize,
    pub cols: usize,
    pub outputs: usize,
    pub cells: usize,
    pub failed_cells: usize,
    /// Stored values, out of `cells * outputs`.
    pub populated: usize,
}

pub fn get_run_summary(table: &ResultTable) -> RunSummary {
    RunSummary {
        rows: table.rows,
        cols: table.cols,
        outputs: table.outputs.len(),
        cells: table.cell_count(),
        failed_cells: table.failures.len(),
        populated: table.populated(),
    }
}

/// List the output column names of a table.
pub fn list_output_names(table: &ResultTable) -> Vec<String> {
    table.outputs.iter().map(|c| c.name.clone()).collect()
}

/// One output across all cells, row-major, as `(row, col, value)`.
/// Failed cells carry `None`.
pub fn extract_output_series(
    table: &ResultTable,
    output: &str,
) -> AppResult<Vec<(usize, usize, Option<CellValue>)>> {
    let k = table
        .output_index(output)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown output: {output}")))?;
    let series = table
        .column_series(k)
        .into_iter()
        .enumerate()
        .map(|(i, v)| (i / table.cols, i % table.cols, v.cloned()))
        .collect();
    Ok(series)
}

/// Numeric values of one output, in native units, skipping failed cells.
pub fn extract_numeric_series(table: &ResultTable, output: &str) -> AppResult<Vec<f64>> {
    Ok(extract_output_series(table, output)?
        .into_iter()
        .filter_map(|(_, _, v)| v.and_then(|v| v.as_number()))
        .collect())
}

/// CSV rendering in display units: one line per cell, axis labels first.
/// Failed cells leave their output fields empty.
pub fn table_to_csv(table: &ResultTable) -> AppResult<String> {
    let mut header = Vec::new();
    for axis in [&table.row_axis, &table.col_axis].into_iter().flatten() {
        header.push(csv_field(&axis.variable));
    }
    for column in &table.outputs {
        let name = if column.display.units.is_empty() {
            column.name.clone()
        } else {
            format!("{} ({})", column.name, column.display.units)
        };
        header.push(csv_field(&name));
    }

    let mut out = header.join(",");
    out.push('\n');
    for row in 0..table.rows {
        for col in 0..table.cols {
            let mut fields = Vec::new();
            if let Some(axis) = &table.row_axis {
                fields.push(csv_field(axis.labels.get(row).map_or("", String::as_str)));
            }
            if let Some(axis) = &table.col_axis {
                fields.push(csv_field(axis.labels.get(col).map_or("", String::as_str)));
            }
            for (k, column) in table.outputs.iter().enumerate() {
                let field = match table.get(row, col, k) {
                    Some(value) => column.format(value)?,
                    None => String::new(),
                };
                fields.push(csv_field(&field));
            }
            out.push_str(&fields.join(","));
            out.push('\n');
        }
    }
    Ok(out)
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_core::UnitSpec;
    use ff_results::{AxisInfo, ColumnDef};

    fn table() -> ResultTable {
        let column = ColumnDef {
            name: "vSurfaceFireSpreadAtHead".into(),
            label: "Rate of spread".into(),
            native: UnitSpec::new("ft/min", 2),
            display: UnitSpec::new("ft/min", 1),
        };
        let mut t = ResultTable::new(2, 1, vec![column]);
        t.row_axis = Some(AxisInfo {
            variable: "vWindSpeedAtMidflame".into(),
            labels: vec!["0.0".into(), "5.0".into()],
        });
        t.set(0, 0, 0, CellValue::Number(1.25));
        t.mark_failed(1, 0, "no fuel");
        t
    }

    #[test]
    fn summary_counts_failures() {
        let s = get_run_summary(&table());
        assert_eq!((s.rows, s.cols, s.outputs, s.cells), (2, 1, 1, 2));
        assert_eq!(s.failed_cells, 1);
        assert_eq!(s.populated, 1);
    }

    #[test]
    fn series_keeps_failed_cells_as_gaps() {
        let t = table();
        let series = extract_output_series(&t, "vSurfaceFireSpreadAtHead").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0], (0, 0, Some(CellValue::Number(1.25))));
        assert_eq!(series[1], (1, 0, None));
        assert_eq!(extract_numeric_series(&t, "vSurfaceFireSpreadAtHead").unwrap(), vec![1.25]);
        assert!(extract_output_series(&t, "vNothing").is_err());
    }

    #[test]
    fn csv_has_header_and_one_line_per_cell() {
        let csv = table_to_csv(&table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "vWindSpeedAtMidflame,vSurfaceFireSpreadAtHead (ft/min)");
        assert_eq!(lines[1], "0.0,1.3");
        assert_eq!(lines[2], "5.0,");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
    }
}
