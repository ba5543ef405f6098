//! ff-graph: variable/equation registry and the dependency graph evaluator.
//!
//! A [`Model`] owns two arenas, variables and equations, linked by id lists.
//! Leaves are edited from outside; computed variables are refreshed lazily
//! by [`Model::evaluate`] using per-input dirty bits.

pub mod builder;
pub mod equation;
pub mod error;
pub mod export;
pub mod model;
pub mod validate;
pub mod value;
pub mod variable;

pub use builder::ModelBuilder;
pub use equation::{Computation, Equation, EquationSpec};
pub use error::{ComputationError, ComputationResult, GraphError, GraphResult};
pub use export::{CatalogEntry, catalog_entries, write_catalog};
pub use model::{EvalStats, Model};
pub use validate::{audit, validate_active};
pub use value::Value;
pub use variable::{
    ContinuousData, DiscreteData, DiscreteItem, Roles, Variable, VariableKind, VariableSpec,
};
