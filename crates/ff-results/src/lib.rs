//! ff-results: result tables, the trace text format and the run store.

pub mod hash;
pub mod store;
pub mod table;
pub mod trace;
pub mod types;

pub use hash::compute_run_id;
pub use store::RunStore;
pub use table::{AxisInfo, CellFailure, CellValue, ColumnDef, ResultTable};
pub use trace::{CellRecord, IoLine, TraceBlock, TraceIndex, TraceReader, TraceWriter};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },

    #[error("Malformed trace at byte {offset}: {message}")]
    Trace { offset: u64, message: String },
}
