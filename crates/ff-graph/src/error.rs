//! Graph and computation error types.

use ff_core::FfError;
use thiserror::Error;

/// Failure reported by a single equation's computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Invalid input: {what}")]
    InvalidInput { what: String },

    #[error("Input {index} has wrong type: expected {expected}, found {found}")]
    WrongInputType {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Expected {expected} inputs, found {found}")]
    Arity { expected: usize, found: usize },
}

impl ComputationError {
    pub fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidInput { what: what.into() }
    }
}

pub type ComputationResult<T> = Result<T, ComputationError>;

/// Errors raised by the registry, the evaluator and the active-graph audit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Cycle detected: variable {variable} re-entered via {path:?}")]
    Cycle { variable: String, path: Vec<String> },

    #[error("Equation {equation} failed: {source}")]
    Computation {
        equation: String,
        source: ComputationError,
    },

    #[error("Equation {equation} returned {found} outputs, declared {expected}")]
    OutputCount {
        equation: String,
        expected: usize,
        found: usize,
    },

    #[error("Variable {variable} has an active producer and cannot be set directly")]
    NotALeaf { variable: String },

    #[error("Variable {variable} expects a {expected} value")]
    WrongKind {
        variable: String,
        expected: &'static str,
    },

    #[error("Value {value} for {variable} outside [{min}, {max}]")]
    OutOfRange {
        variable: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Variable {variable} has several active producers: {producers:?}")]
    MultipleActiveProducers {
        variable: String,
        producers: Vec<String>,
    },

    #[error("Input {variable} of {equation} has no active producer and is not a leaf")]
    UnresolvedInput { variable: String, equation: String },

    #[error("Computed variable {variable} is flagged as user input")]
    EditableComputed { variable: String },

    #[error(transparent)]
    Core(#[from] FfError),
}

pub type GraphResult<T> = Result<T, GraphError>;
