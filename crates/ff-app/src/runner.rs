//! The range table runner.
//!
//! Expands the row and column axes into cells and evaluates the output set
//! once per cell, one cell per [`RangeTableRunner::step`] call. The caller
//! owns the loop, so it can report progress and cancel between cells.

use ff_core::{Real, VarId};
use ff_graph::{GraphError, Model, Value};
use ff_results::{CellValue, ColumnDef, IoLine, ResultTable};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::range::RangeAxis;

/// A trajectory captured from a path-valued variable in one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub function: String,
    pub io: Vec<IoLine>,
    pub variable: String,
    pub points: Vec<(Real, Real)>,
}

/// Everything evaluated for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CellResult {
    pub row: usize,
    pub col: usize,
    /// Values of the tracked variables (outputs, then supporting); `None`
    /// when the cell failed.
    pub values: Option<Vec<Value>>,
    pub trajectories: Vec<Trajectory>,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Computed,
    Failed(String),
}

/// Report of one `step` call.
#[derive(Debug, Clone, PartialEq)]
pub struct CellStep {
    pub row: usize,
    pub col: usize,
    /// Row-major position of the cell.
    pub index: usize,
    pub outcome: CellOutcome,
}

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: ResultTable,
    pub cells: Vec<CellResult>,
    /// Outputs then supporting variables, the order of `CellResult::values`.
    pub tracked: Vec<VarId>,
}

pub struct RangeTableRunner<'m> {
    model: &'m mut Model,
    rows: RangeAxis,
    cols: RangeAxis,
    outputs: Vec<VarId>,
    tracked: Vec<VarId>,
    next: usize,
    failed: usize,
    table: ResultTable,
    cells: Vec<CellResult>,
}

impl<'m> RangeTableRunner<'m> {
    /// `columns` describes `outputs`, one entry each.
    pub fn new(
        model: &'m mut Model,
        rows: RangeAxis,
        cols: RangeAxis,
        outputs: Vec<VarId>,
        supporting: Vec<VarId>,
        columns: Vec<ColumnDef>,
    ) -> AppResult<Self> {
        if columns.len() != outputs.len() {
            return Err(AppError::InvalidInput(format!(
                "{} column descriptions for {} outputs",
                columns.len(),
                outputs.len()
            )));
        }
        for axis in [&rows, &cols] {
            if axis.is_empty() {
                return Err(AppError::InvalidInput("range axis has no values".to_string()));
            }
            if let Some(var) = axis.var() {
                let variable = model.variable(var);
                if !model.is_leaf(var) || !variable.roles.user_input {
                    return Err(AppError::InvalidInput(format!(
                        "range variable {} is not a user input",
                        variable.name
                    )));
                }
            }
        }
        if rows.var().is_some() && rows.var() == cols.var() {
            return Err(AppError::InvalidInput(
                "row and column axes sweep the same variable".to_string(),
            ));
        }

        let mut tracked = outputs.clone();
        tracked.extend(supporting.iter().copied().filter(|v| !outputs.contains(v)));
        let table = ResultTable::new(rows.len(), cols.len(), columns);
        Ok(Self {
            model,
            rows,
            cols,
            outputs,
            tracked,
            next: 0,
            failed: 0,
            table,
            cells: Vec::new(),
        })
    }

    pub fn total_cells(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn cells_done(&self) -> usize {
        self.next
    }

    pub fn cells_failed(&self) -> usize {
        self.failed
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.total_cells()
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Evaluate the next cell in row-major order; `None` once every cell ran.
    ///
    /// Computation failures become a no-result cell. Cycles abort.
    pub fn step(&mut self) -> AppResult<Option<CellStep>> {
        if self.is_done() {
            return Ok(None);
        }
        let index = self.next;
        let row = index / self.cols.len();
        let col = index % self.cols.len();
        self.next += 1;

        match self.evaluate_cell(row, col) {
            Ok((values, trajectories)) => {
                for (k, value) in values.iter().take(self.outputs.len()).enumerate() {
                    let cell = self.cell_value(self.outputs[k], value);
                    self.table.set(row, col, k, cell);
                }
                debug!(row, col, "cell evaluated");
                self.cells.push(CellResult {
                    row,
                    col,
                    values: Some(values),
                    trajectories,
                    failure: None,
                });
                Ok(Some(CellStep {
                    row,
                    col,
                    index,
                    outcome: CellOutcome::Computed,
                }))
            }
            Err(err @ GraphError::Cycle { .. }) => Err(err.into()),
            Err(err) => {
                let reason = err.to_string();
                warn!(row, col, %reason, "cell has no result");
                self.failed += 1;
                self.table.mark_failed(row, col, reason.clone());
                self.cells.push(CellResult {
                    row,
                    col,
                    values: None,
                    trajectories: Vec::new(),
                    failure: Some(reason.clone()),
                });
                Ok(Some(CellStep {
                    row,
                    col,
                    index,
                    outcome: CellOutcome::Failed(reason),
                }))
            }
        }
    }

    /// Run any remaining cells and hand back the table.
    pub fn finish(mut self) -> AppResult<RunOutput> {
        while self.step()?.is_some() {}
        let total = self.total_cells();
        if total > 0 && self.failed == total {
            let first = self
                .cells
                .iter()
                .find_map(|c| c.failure.clone())
                .unwrap_or_default();
            return Err(AppError::AllCellsFailed { cells: total, first });
        }
        Ok(RunOutput {
            table: self.table,
            cells: self.cells,
            tracked: self.tracked,
        })
    }

    fn evaluate_cell(
        &mut self,
        row: usize,
        col: usize,
    ) -> Result<(Vec<Value>, Vec<Trajectory>), GraphError> {
        for (axis, i) in [(&self.rows, row), (&self.cols, col)] {
            if let (Some(var), Some(value)) = (axis.var(), axis.value_at(i)) {
                self.model.assign(var, value)?;
            }
        }
        let values = self.model.evaluate_many(&self.tracked)?;

        let mut trajectories = Vec::new();
        for (var, value) in self.tracked.iter().zip(&values) {
            if let Value::Path(points) = value
                && let Some(trajectory) = self.capture(*var, points)
            {
                trajectories.push(trajectory);
            }
        }
        Ok((values, trajectories))
    }

    /// The producing equation's inputs and outputs, as evaluated.
    fn capture(&self, var: VarId, points: &[(Real, Real)]) -> Option<Trajectory> {
        let eq = self.model.equation(self.model.active_producer(var)?);
        let mut io = Vec::new();
        for (output, ids) in [(false, eq.inputs()), (true, eq.outputs())] {
            for id in ids {
                io.push(io_line(self.model, *id, output));
            }
        }
        Some(Trajectory {
            function: eq.name.clone(),
            io,
            variable: self.model.variable(var).name.clone(),
            points: points.to_vec(),
        })
    }

    fn cell_value(&self, var: VarId, value: &Value) -> CellValue {
        to_cell_value(self.model, var, value)
    }
}

/// Table representation of a variable's value.
pub fn to_cell_value(model: &Model, var: VarId, value: &Value) -> CellValue {
    match value {
        Value::Number(v) => CellValue::Number(*v),
        Value::Item(index) => CellValue::Item {
            index: *index,
            code: item_code(model, var, *index),
        },
        Value::Text(t) => CellValue::Text(t.clone()),
        Value::Path(points) => CellValue::Text(format!("{} points", points.len())),
    }
}

pub(crate) fn item_code(model: &Model, var: VarId, index: usize) -> String {
    model
        .variable(var)
        .discrete()
        .and_then(|d| d.items.get(index))
        .map(|item| item.code.clone())
        .unwrap_or_else(|| index.to_string())
}

fn io_line(model: &Model, var: VarId, output: bool) -> IoLine {
    let variable = model.variable(var);
    let (value, decimals, units) = match (variable.value(), variable.native_spec()) {
        (Value::Number(v), Some(spec)) => (v.to_string(), spec.decimals, spec.units.clone()),
        (Value::Number(v), None) => (v.to_string(), 0, String::new()),
        (Value::Item(i), _) => (item_code(model, var, i), 0, String::new()),
        (Value::Text(t), _) => (t, 0, String::new()),
        (Value::Path(p), _) => (p.len().to_string(), 0, String::new()),
    };
    IoLine {
        output,
        name: variable.name.clone(),
        value,
        decimals,
        units,
    }
}
