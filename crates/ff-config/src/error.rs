use ff_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Catalog has no {kind} named '{name}'")]
    UnknownName { kind: &'static str, name: String },

    #[error("Failed to apply reconciled state: {0}")]
    Graph(#[from] GraphError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
