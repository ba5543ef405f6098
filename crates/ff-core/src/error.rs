use thiserror::Error;

pub type FfResult<T> = Result<T, FfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    #[error("Cannot convert {from} to {to}: different unit families")]
    IncompatibleUnits { from: String, to: String },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
