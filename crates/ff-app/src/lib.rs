//! Shared application service layer for fireflow.
//!
//! Centralizes worksheet loading, model preparation, the range table runner,
//! run caching and result querying for the CLI.

pub mod error;
pub mod progress;
pub mod query;
pub mod range;
pub mod run_service;
pub mod runner;
pub mod worksheet_service;

pub use error::{AppError, AppResult};
pub use progress::{CellProgress, RunProgressEvent, RunStage};
pub use query::{
    RunSummary, extract_numeric_series, extract_output_series, get_run_summary, list_output_names,
    table_to_csv,
};
pub use range::RangeAxis;
pub use run_service::{
    CancelFlag, RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run,
    ensure_run_with_progress, list_runs, load_run,
};
pub use runner::{CellOutcome, CellResult, CellStep, RangeTableRunner, RunOutput, Trajectory};
pub use worksheet_service::{
    ConfigurationReport, PreparedRun, RoleEntry, check_names, configuration_report,
    load_worksheet, prepare,
};
