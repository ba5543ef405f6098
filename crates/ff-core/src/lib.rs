//! ff-core: stable foundation for fireflow.
//!
//! Contains:
//! - ids (compact IDs for variables and equations)
//! - error (shared error types)
//! - numeric (Real + tolerances + rounding helpers)
//! - units (named unit catalog + factor/offset conversion + display bookkeeping)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{FfError, FfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
