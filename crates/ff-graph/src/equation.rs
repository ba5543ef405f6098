//! Equations: computation routines with declared inputs and outputs.

use std::fmt;

use ff_core::{EqId, VarId};

use crate::error::ComputationResult;
use crate::value::Value;

/// A pure function of an equation's declared inputs.
///
/// Outputs are returned in declared order; the evaluator stores them.
pub trait Computation {
    fn run(&self, inputs: &[Value]) -> ComputationResult<Vec<Value>>;
}

impl<F> Computation for F
where
    F: Fn(&[Value]) -> ComputationResult<Vec<Value>>,
{
    fn run(&self, inputs: &[Value]) -> ComputationResult<Vec<Value>> {
        self(inputs)
    }
}

pub struct Equation {
    pub id: EqId,
    pub name: String,
    /// Feature module the equation belongs to (e.g. "surface").
    pub module: &'static str,
    pub(crate) inputs: Vec<VarId>,
    pub(crate) outputs: Vec<VarId>,
    /// One stale flag per input slot.
    pub(crate) dirty: Vec<bool>,
    /// False until the first successful run, and again after reset or activation.
    pub(crate) fresh: bool,
    pub(crate) active: bool,
    pub(crate) computation: Box<dyn Computation>,
}

impl Equation {
    pub fn inputs(&self) -> &[VarId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[VarId] {
        &self.outputs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn dirty_bits(&self) -> &[bool] {
        &self.dirty
    }

    /// Whether the next evaluation through this equation must rerun it.
    pub fn is_stale(&self) -> bool {
        !self.fresh || self.dirty.iter().any(|d| *d)
    }
}

impl fmt::Debug for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equation")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("module", &self.module)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("dirty", &self.dirty)
            .field("fresh", &self.fresh)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

/// Declaration of an equation; inputs and outputs are variable names.
pub struct EquationSpec {
    pub name: String,
    pub module: &'static str,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub computation: Box<dyn Computation>,
}

impl EquationSpec {
    pub fn new(
        name: impl Into<String>,
        module: &'static str,
        inputs: &[&str],
        outputs: &[&str],
        computation: impl Computation + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            module,
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            outputs: outputs.iter().map(|s| s.to_string()).collect(),
            computation: Box::new(computation),
        }
    }
}
