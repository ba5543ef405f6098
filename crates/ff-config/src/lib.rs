//! ff-config: configuration options and the reconciler.
//!
//! The reconciler maps a string-keyed option set onto the catalog model:
//! which equations are active, and which variables are user inputs,
//! constants or requested outputs.

pub mod decisions;
pub mod error;
pub mod options;
pub mod reconciler;
pub mod tables;

pub use decisions::{
    Decision, Decisions, IgniteFuelTempMode, MoistureMode, SlopeMode, SpotSourceMode,
    SpreadDirectionMode, WindDirectionMode, WindSpeedMode,
};
pub use error::{ConfigError, ConfigResult};
pub use options::{ConfigOptions, OptionValue};
pub use reconciler::{Diagnostic, Reconciliation, Reconciler};
