//! The result table: R rows x C columns x K outputs.

use ff_core::{FfResult, Real, UnitSpec, convert, round_to_decimals};
use serde::{Deserialize, Serialize};

/// One stored output value, in native units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Number(Real),
    Item { index: usize, code: String },
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<Real> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Describes one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub label: String,
    pub native: UnitSpec,
    pub display: UnitSpec,
}

impl ColumnDef {
    /// Render a cell in display units, rounded to display decimals.
    pub fn format(&self, value: &CellValue) -> FfResult<String> {
        Ok(match value {
            CellValue::Number(v) => {
                let shown = convert(*v, &self.native.units, &self.display.units)?;
                let d = self.display.decimals;
                format!("{:.*}", d as usize, round_to_decimals(shown, d))
            }
            CellValue::Item { code, .. } => code.clone(),
            CellValue::Text(t) => t.clone(),
        })
    }
}

/// A swept axis: the variable and one label per item, in display units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub variable: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellFailure {
    pub row: usize,
    pub col: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: usize,
    pub cols: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_axis: Option<AxisInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_axis: Option<AxisInfo>,
    pub outputs: Vec<ColumnDef>,
    /// Row-major, then output index. `None` is the no-result sentinel.
    values: Vec<Option<CellValue>>,
    #[serde(default)]
    pub failures: Vec<CellFailure>,
}

impl ResultTable {
    pub fn new(rows: usize, cols: usize, outputs: Vec<ColumnDef>) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            row_axis: None,
            col_axis: None,
            values: vec![None; rows * cols * outputs.len()],
            outputs,
            failures: Vec::new(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Linear cell index in row-major order.
    pub fn cell_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    fn slot(&self, row: usize, col: usize, output: usize) -> Option<usize> {
        (row < self.rows && col < self.cols && output < self.outputs.len())
            .then(|| self.cell_index(row, col) * self.outputs.len() + output)
    }

    /// Returns false when the coordinates are outside the table.
    pub fn set(&mut self, row: usize, col: usize, output: usize, value: CellValue) -> bool {
        match self.slot(row, col, output) {
            Some(i) => {
                self.values[i] = Some(value);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, row: usize, col: usize, output: usize) -> Option<&CellValue> {
        self.slot(row, col, output)
            .and_then(|i| self.values[i].as_ref())
    }

    /// Clear every output of a cell and record why.
    pub fn mark_failed(&mut self, row: usize, col: usize, reason: impl Into<String>) {
        for k in 0..self.outputs.len() {
            if let Some(i) = self.slot(row, col, k) {
                self.values[i] = None;
            }
        }
        self.failures.push(CellFailure {
            row,
            col,
            reason: reason.into(),
        });
    }

    pub fn is_failed(&self, row: usize, col: usize) -> bool {
        self.failures.iter().any(|f| f.row == row && f.col == col)
    }

    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.iter().position(|c| c.name == name)
    }

    /// One output across all cells, row-major.
    pub fn column_series(&self, output: usize) -> Vec<Option<&CellValue>> {
        (0..self.rows)
            .flat_map(|r| (0..self.cols).map(move |c| (r, c)))
            .map(|(r, c)| self.get(r, c, output))
            .collect()
    }

    pub fn populated(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}
