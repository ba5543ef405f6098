//! Run execution and caching service.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use ff_core::VarId;
use ff_graph::{Model, Value};
use ff_results::{CellRecord, ResultTable, RunManifest, RunStore, TraceWriter};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::progress::{CellProgress, RunProgressEvent, RunStage};
use crate::runner::{CellOutcome, RangeTableRunner, RunOutput, item_code};
use crate::worksheet_service::{self, PreparedRun};

/// Options for running worksheets.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: "0.1.0".to_string(),
        }
    }
}

/// Shared flag checked between cells.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub worksheet_path: &'a Path,
    pub options: RunOptions,
    pub cancel: Option<CancelFlag>,
}

impl<'a> RunRequest<'a> {
    pub fn new(worksheet_path: &'a Path) -> Self {
        Self {
            worksheet_path,
            options: RunOptions::default(),
            cancel: None,
        }
    }
}

/// Timing and evaluation counters for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub prepare_time_s: f64,
    pub evaluate_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    /// Equation computations performed across all cells.
    pub computations: u64,
    /// Equations found current and skipped.
    pub cache_hits: u64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub table: ResultTable,
    pub trace_path: PathBuf,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: &str,
    cells: Option<CellProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        let mut event = RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            Some(message.to_string()),
        );
        event.cells = cells;
        cb(event);
    }
}

/// Execute or load a run based on request.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(&mut progress_cb, RunStage::LoadingWorksheet, started, "Loading worksheet", None);
    let worksheet = worksheet_service::load_worksheet(request.worksheet_path)?;

    emit_progress(&mut progress_cb, RunStage::CheckingCache, started, "Checking run cache", None);
    let run_id = ff_results::compute_run_id(&worksheet, &request.options.engine_version);
    let store = RunStore::for_worksheet(request.worksheet_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            "Loading cached run",
            None,
        );
        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        let table = store.load_table(&run_id)?;
        let trace_path = store.trace_path(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.total_time_s = started.elapsed().as_secs_f64();
        info!(run_id = %run_id, "loaded cached run");

        emit_progress(&mut progress_cb, RunStage::Completed, started, "Loaded cached run", None);
        return Ok(RunResponse {
            run_id,
            manifest,
            table,
            trace_path,
            loaded_from_cache: true,
            timing,
        });
    }

    emit_progress(&mut progress_cb, RunStage::BuildingModel, started, "Building model", None);
    let prepare_started = Instant::now();
    emit_progress(&mut progress_cb, RunStage::Reconciling, started, "Reconciling configuration", None);
    let mut prepared = worksheet_service::prepare(&worksheet)?;
    emit_progress(&mut progress_cb, RunStage::ApplyingInputs, started, "Inputs applied", None);
    timing.prepare_time_s = prepare_started.elapsed().as_secs_f64();

    let evaluate_started = Instant::now();
    let output = execute(&mut prepared, request.cancel.as_ref(), &mut progress_cb, started)?;
    timing.evaluate_time_s = evaluate_started.elapsed().as_secs_f64();
    let stats = prepared.model.stats();
    timing.computations = stats.computations;
    timing.cache_hits = stats.cache_hits;

    emit_progress(&mut progress_cb, RunStage::WritingTrace, started, "Writing trace", None);
    let (trace, trace_index) = write_trace(&prepared.model, &output)?;

    emit_progress(&mut progress_cb, RunStage::SavingResults, started, "Saving results", None);
    let save_started = Instant::now();
    let mut table = output.table;
    table.row_axis = prepared.row_axis.take();
    table.col_axis = prepared.col_axis.take();

    let manifest = RunManifest {
        run_id: run_id.clone(),
        worksheet_name: worksheet.name.clone(),
        timestamp: RunManifest::now_timestamp(),
        engine_version: request.options.engine_version.clone(),
        rows: table.rows,
        cols: table.cols,
        outputs: table.outputs.iter().map(|c| c.name.clone()).collect(),
        failed_cells: table.failures.len(),
        diagnostics: prepared
            .reconciliation
            .diagnostics
            .iter()
            .map(ToString::to_string)
            .collect(),
        trace_index,
    };
    store.save_run(&manifest, &table, &trace)?;
    let trace_path = store.trace_path(&run_id)?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    info!(
        run_id = %run_id,
        cells = table.cell_count(),
        failed = manifest.failed_cells,
        computations = timing.computations,
        "run completed"
    );
    emit_progress(&mut progress_cb, RunStage::Completed, started, "Run completed", None);

    Ok(RunResponse {
        run_id,
        manifest,
        table,
        trace_path,
        loaded_from_cache: false,
        timing,
    })
}

/// Step every cell, reporting progress and honouring cancellation between
/// cells.
fn execute(
    prepared: &mut PreparedRun,
    cancel: Option<&CancelFlag>,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<RunOutput> {
    prepared.model.reset_stats();
    let mut runner = RangeTableRunner::new(
        &mut prepared.model,
        prepared.rows.clone(),
        prepared.cols.clone(),
        prepared.reconciliation.outputs.clone(),
        prepared.reconciliation.supporting.clone(),
        prepared.columns.clone(),
    )?;

    let total = runner.total_cells();
    emit_progress(
        progress_cb,
        RunStage::EvaluatingCells,
        started,
        &format!("Evaluating {total} cells"),
        Some(CellProgress {
            done: 0,
            total,
            failed: 0,
        }),
    );
    loop {
        if cancel.is_some_and(CancelFlag::is_cancelled) {
            info!(done = runner.cells_done(), total, "run cancelled");
            return Err(AppError::Cancelled);
        }
        let Some(step) = runner.step()? else {
            break;
        };
        let message = match &step.outcome {
            CellOutcome::Computed => format!("Cell ({}, {}) evaluated", step.row, step.col),
            CellOutcome::Failed(reason) => {
                format!("Cell ({}, {}) has no result: {reason}", step.row, step.col)
            }
        };
        emit_progress(
            progress_cb,
            RunStage::EvaluatingCells,
            started,
            &message,
            Some(CellProgress {
                done: runner.cells_done(),
                total,
                failed: runner.cells_failed(),
            }),
        );
    }
    runner.finish()
}

/// Render the trace text for every cell and trajectory.
fn write_trace(model: &Model, output: &RunOutput) -> AppResult<(Vec<u8>, ff_results::TraceIndex)> {
    let mut writer = TraceWriter::new(Vec::new());
    for cell in &output.cells {
        for (k, &var) in output.tracked.iter().enumerate() {
            let name = &model.variable(var).name;
            let record = match &cell.values {
                Some(values) => match cell_record(model, var, &values[k]) {
                    Some(record) => record,
                    None => continue,
                },
                None => CellRecord::NoResult,
            };
            writer.cell(cell.row, cell.col, name, &record)?;
        }
        for t in &cell.trajectories {
            writer.trajectory(cell.row, cell.col, &t.function, &t.io, &t.variable, &t.points)?;
        }
    }
    let (bytes, index) = writer.finish()?;
    debug!(bytes = bytes.len(), blocks = index.blocks.len(), "trace written");
    Ok((bytes, index))
}

/// Path values are written as trajectory blocks instead of `CELL` lines.
fn cell_record(model: &Model, var: VarId, value: &Value) -> Option<CellRecord> {
    match value {
        Value::Number(v) => {
            let (decimals, units) = model
                .variable(var)
                .native_spec()
                .map(|s| (s.decimals, s.units.clone()))
                .unwrap_or_default();
            Some(CellRecord::Continuous {
                value: *v,
                decimals,
                units,
            })
        }
        Value::Item(index) => Some(CellRecord::Discrete {
            index: *index,
            code: item_code(model, var, *index),
        }),
        Value::Text(t) => Some(CellRecord::Text(t.clone())),
        Value::Path(_) => None,
    }
}

/// Runs saved for a worksheet, most recent first.
pub fn list_runs(worksheet_path: &Path) -> AppResult<Vec<RunManifest>> {
    let worksheet = worksheet_service::load_worksheet(worksheet_path)?;
    let store = RunStore::for_worksheet(worksheet_path)?;

    let mut runs = store.list_runs(&worksheet.name)?;
    runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(runs)
}

/// Load a specific run.
pub fn load_run(worksheet_path: &Path, run_id: &str) -> AppResult<(RunManifest, ResultTable)> {
    let store = RunStore::for_worksheet(worksheet_path)?;

    let manifest = store.load_manifest(run_id)?;
    let table = store.load_table(run_id)?;

    Ok((manifest, table))
}

/// Path of a run's trace file.
pub fn trace_path(worksheet_path: &Path, run_id: &str) -> AppResult<PathBuf> {
    let store = RunStore::for_worksheet(worksheet_path)?;
    Ok(store.trace_path(run_id)?)
}
