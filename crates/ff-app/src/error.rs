//! Error types for the ff-app service layer.

use std::path::PathBuf;

/// Application error type wrapping the backend crates' errors, so the CLI
/// and tests see one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Worksheet error: {0}")]
    Project(String),

    #[error("Failed to read worksheet file: {path}")]
    WorksheetFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Graph(String),

    #[error("Dependency cycle: {0}")]
    Cycle(String),

    #[error("Units error: {0}")]
    Units(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Every one of {cells} cells failed; first failure: {first}")]
    AllCellsFailed { cells: usize, first: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ff-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ff_project::ProjectError> for AppError {
    fn from(err: ff_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<ff_config::ConfigError> for AppError {
    fn from(err: ff_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ff_graph::GraphError> for AppError {
    fn from(err: ff_graph::GraphError) -> Self {
        match err {
            ff_graph::GraphError::Cycle { .. } => AppError::Cycle(err.to_string()),
            other => AppError::Graph(other.to_string()),
        }
    }
}

impl From<ff_core::FfError> for AppError {
    fn from(err: ff_core::FfError) -> Self {
        AppError::Units(err.to_string())
    }
}

impl From<ff_results::ResultsError> for AppError {
    fn from(err: ff_results::ResultsError) -> Self {
        match err {
            ff_results::ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
