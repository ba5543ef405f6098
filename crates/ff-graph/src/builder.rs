//! Append-only registry builder.

use std::collections::HashMap;

use ff_core::{EqId, VarId};

use crate::equation::{Equation, EquationSpec};
use crate::model::{EvalStats, Model};
use crate::variable::{Roles, Variable, VariableKind, VariableSpec};

/// Builder for the compiled-in model catalog.
///
/// Register variables first, then the equations that reference them by name,
/// then call `build()`. Catalog mistakes (duplicate names, unknown references,
/// bad unit triples) are programming errors and panic.
#[derive(Default)]
pub struct ModelBuilder {
    variables: Vec<Variable>,
    equations: Vec<Equation>,
    var_index: HashMap<String, VarId>,
    eq_index: HashMap<String, EqId>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_variable(&mut self, spec: VariableSpec) -> VarId {
        assert!(
            !self.var_index.contains_key(&spec.name),
            "duplicate variable name: {}",
            spec.name
        );
        if let VariableKind::Continuous(c) = &spec.kind {
            if let Err(err) = c.units.check() {
                panic!("variable {} has bad units: {err}", spec.name);
            }
            assert!(
                c.min <= c.default && c.default <= c.max,
                "variable {} default outside its range",
                spec.name
            );
        }

        let id = VarId::from_usize(self.variables.len());
        self.var_index.insert(spec.name.clone(), id);
        self.variables.push(Variable {
            id,
            name: spec.name,
            label: spec.label,
            kind: spec.kind,
            roles: Roles::default(),
            producers: Vec::new(),
            consumers: Vec::new(),
        });
        id
    }

    pub fn register_equation(&mut self, spec: EquationSpec) -> EqId {
        assert!(
            !self.eq_index.contains_key(&spec.name),
            "duplicate equation name: {}",
            spec.name
        );
        let id = EqId::from_usize(self.equations.len());
        let inputs: Vec<VarId> = spec.inputs.iter().map(|n| self.resolve(&spec.name, n)).collect();
        let outputs: Vec<VarId> = spec.outputs.iter().map(|n| self.resolve(&spec.name, n)).collect();
        assert!(!outputs.is_empty(), "equation {} declares no outputs", spec.name);

        for var in &inputs {
            let consumers = &mut self.variables[var.slot()].consumers;
            if !consumers.contains(&id) {
                consumers.push(id);
            }
        }
        for var in &outputs {
            self.variables[var.slot()].producers.push(id);
        }

        self.eq_index.insert(spec.name.clone(), id);
        self.equations.push(Equation {
            id,
            name: spec.name,
            module: spec.module,
            dirty: vec![false; inputs.len()],
            inputs,
            outputs,
            fresh: false,
            active: true,
            computation: spec.computation,
        });
        id
    }

    fn resolve(&self, equation: &str, variable: &str) -> VarId {
        match self.var_index.get(variable) {
            Some(id) => *id,
            None => panic!("equation {equation} references unknown variable {variable}"),
        }
    }

    /// Freeze the registry. Every equation starts active and stale.
    pub fn build(self) -> Model {
        Model {
            variables: self.variables,
            equations: self.equations,
            var_index: self.var_index,
            eq_index: self.eq_index,
            stats: EvalStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use ff_core::UnitTriple;

    fn number(name: &str) -> VariableSpec {
        VariableSpec::continuous(name, name, 0.0, (-1e6, 1e6), UnitTriple::uniform("ratio", 2))
    }

    fn copy(inputs: &[Value]) -> crate::ComputationResult<Vec<Value>> {
        Ok(inputs.to_vec())
    }

    #[test]
    fn wires_producers_and_consumers() {
        let mut b = ModelBuilder::new();
        let x = b.register_variable(number("x"));
        let y = b.register_variable(number("y"));
        let f = b.register_equation(EquationSpec::new("f", "test", &["x"], &["y"], copy));
        let model = b.build();

        assert_eq!(model.variable(x).consumers(), &[f]);
        assert_eq!(model.variable(y).producers(), &[f]);
        assert_eq!(model.lookup_variable("y"), Some(y));
        assert_eq!(model.lookup_equation("f"), Some(f));
        assert!(model.equation(f).is_stale());
    }

    #[test]
    #[should_panic(expected = "duplicate variable name")]
    fn duplicate_variable_panics() {
        let mut b = ModelBuilder::new();
        b.register_variable(number("x"));
        b.register_variable(number("x"));
    }

    #[test]
    #[should_panic(expected = "unknown variable")]
    fn unknown_reference_panics() {
        let mut b = ModelBuilder::new();
        b.register_variable(number("x"));
        b.register_equation(EquationSpec::new("f", "test", &["x"], &["nope"], copy));
    }
}
