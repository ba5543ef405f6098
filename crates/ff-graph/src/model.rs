//! The model: registry arenas plus the lazy evaluator.

use std::collections::HashMap;

use ff_core::{EqId, UnitSystem, VarId, ensure_finite};
use tracing::debug;

use crate::equation::Equation;
use crate::error::{ComputationError, GraphError, GraphResult};
use crate::value::Value;
use crate::variable::{DiscreteItem, Roles, Variable, VariableKind};

/// Evaluation counters, useful for instrumentation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Equation computations actually run.
    pub computations: u64,
    /// Equations found current and skipped.
    pub cache_hits: u64,
}

/// Per-call bookkeeping for one evaluation pass.
struct Visit {
    done: Vec<bool>,
    on_stack: Vec<bool>,
    stack: Vec<VarId>,
}

impl Visit {
    fn new(equations: usize) -> Self {
        Self {
            done: vec![false; equations],
            on_stack: vec![false; equations],
            stack: Vec::new(),
        }
    }
}

pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) equations: Vec<Equation>,
    pub(crate) var_index: HashMap<String, VarId>,
    pub(crate) eq_index: HashMap<String, EqId>,
    pub(crate) stats: EvalStats,
}

impl Model {
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// Panics on an id not issued by this model's builder.
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.slot()]
    }

    pub fn equation(&self, id: EqId) -> &Equation {
        &self.equations[id.slot()]
    }

    pub fn lookup_variable(&self, name: &str) -> Option<VarId> {
        self.var_index.get(name).copied()
    }

    pub fn lookup_equation(&self, name: &str) -> Option<EqId> {
        self.eq_index.get(name).copied()
    }

    /// First active producer of a variable, if any.
    pub fn active_producer(&self, var: VarId) -> Option<EqId> {
        self.variables[var.slot()]
            .producers
            .iter()
            .copied()
            .find(|eq| self.equations[eq.slot()].active)
    }

    /// A leaf has no active producer.
    pub fn is_leaf(&self, var: VarId) -> bool {
        self.active_producer(var).is_none()
    }

    /// Variables flagged as user outputs, in registration order.
    pub fn user_outputs(&self) -> Vec<VarId> {
        self.variables
            .iter()
            .filter(|v| v.roles.user_output)
            .map(|v| v.id)
            .collect()
    }

    pub fn user_inputs(&self) -> Vec<VarId> {
        self.variables
            .iter()
            .filter(|v| v.roles.user_input)
            .map(|v| v.id)
            .collect()
    }

    pub fn stats(&self) -> EvalStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = EvalStats::default();
    }

    // ------------------------------------------------------------------
    // Leaf edits
    // ------------------------------------------------------------------

    /// Store a value into a leaf without invalidating anything.
    pub fn set_value(&mut self, var: VarId, value: Value) -> GraphResult<()> {
        if !self.is_leaf(var) {
            return Err(GraphError::NotALeaf {
                variable: self.variables[var.slot()].name.clone(),
            });
        }
        self.store(var, value, true)
    }

    /// Set a dirty bit on every active consumer slot reading `var`.
    ///
    /// Does not recurse; downstream staleness is discovered during evaluation.
    pub fn mark_dirty(&mut self, var: VarId) {
        let Model {
            variables,
            equations,
            ..
        } = self;
        for eq in &variables[var.slot()].consumers {
            let equation = &mut equations[eq.slot()];
            if !equation.active {
                continue;
            }
            for (slot, input) in equation.inputs.iter().enumerate() {
                if *input == var {
                    equation.dirty[slot] = true;
                }
            }
        }
    }

    /// `set_value` followed by `mark_dirty`.
    pub fn assign(&mut self, var: VarId, value: Value) -> GraphResult<()> {
        self.set_value(var, value)?;
        self.mark_dirty(var);
        Ok(())
    }

    /// Select a discrete item by its code.
    pub fn assign_code(&mut self, var: VarId, code: &str) -> GraphResult<()> {
        let variable = &self.variables[var.slot()];
        let position = variable
            .discrete()
            .and_then(|d| d.position_of(code))
            .ok_or_else(|| GraphError::WrongKind {
                variable: variable.name.clone(),
                expected: "discrete item code",
            })?;
        self.assign(var, Value::Item(position))
    }

    // ------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------

    /// Bring `var` up to date and return its value.
    pub fn evaluate(&mut self, var: VarId) -> GraphResult<Value> {
        let mut visit = Visit::new(self.equations.len());
        self.ensure_current(var, &mut visit)?;
        Ok(self.variables[var.slot()].value())
    }

    /// Evaluate several variables in one pass.
    pub fn evaluate_many(&mut self, vars: &[VarId]) -> GraphResult<Vec<Value>> {
        let mut visit = Visit::new(self.equations.len());
        for var in vars {
            self.ensure_current(*var, &mut visit)?;
        }
        Ok(vars
            .iter()
            .map(|v| self.variables[v.slot()].value())
            .collect())
    }

    fn ensure_current(&mut self, var: VarId, visit: &mut Visit) -> GraphResult<()> {
        let Some(eq) = self.active_producer(var) else {
            return Ok(());
        };
        let slot = eq.slot();
        if visit.done[slot] {
            return Ok(());
        }
        if visit.on_stack[slot] {
            let mut path: Vec<String> = visit
                .stack
                .iter()
                .map(|v| self.variables[v.slot()].name.clone())
                .collect();
            let name = self.variables[var.slot()].name.clone();
            path.push(name.clone());
            return Err(GraphError::Cycle {
                variable: name,
                path,
            });
        }

        visit.on_stack[slot] = true;
        visit.stack.push(var);
        let inputs = self.equations[slot].inputs.clone();
        for input in inputs {
            self.ensure_current(input, visit)?;
        }
        visit.stack.pop();
        visit.on_stack[slot] = false;
        visit.done[slot] = true;

        if self.equations[slot].is_stale() {
            self.run_equation(eq)
        } else {
            self.stats.cache_hits += 1;
            Ok(())
        }
    }

    fn run_equation(&mut self, eq: EqId) -> GraphResult<()> {
        let equation = &self.equations[eq.slot()];
        let inputs: Vec<Value> = equation
            .inputs
            .iter()
            .map(|v| self.variables[v.slot()].value())
            .collect();

        let outputs = equation
            .computation
            .run(&inputs)
            .map_err(|source| GraphError::Computation {
                equation: equation.name.clone(),
                source,
            })?;
        if outputs.len() != equation.outputs.len() {
            return Err(GraphError::OutputCount {
                equation: equation.name.clone(),
                expected: equation.outputs.len(),
                found: outputs.len(),
            });
        }
        for (var, value) in equation.outputs.iter().zip(&outputs) {
            if let Value::Number(v) = value
                && !v.is_finite()
            {
                return Err(GraphError::Computation {
                    equation: equation.name.clone(),
                    source: ComputationError::invalid(format!(
                        "non-finite result for {}",
                        self.variables[var.slot()].name
                    )),
                });
            }
            self.check_kind(*var, value)?;
        }

        debug!(equation = %equation.name, "computed");
        let targets = equation.outputs.clone();
        for (var, value) in targets.iter().zip(outputs) {
            self.store(*var, value, false)?;
        }
        let equation = &mut self.equations[eq.slot()];
        equation.dirty.fill(false);
        equation.fresh = true;
        self.stats.computations += 1;

        for var in targets {
            self.mark_dirty(var);
        }
        Ok(())
    }

    fn check_kind(&self, var: VarId, value: &Value) -> GraphResult<()> {
        let variable = &self.variables[var.slot()];
        let ok = match (&variable.kind, value) {
            (VariableKind::Continuous(_), Value::Number(_)) => true,
            (VariableKind::Discrete(d), Value::Item(i)) => *i < d.items.len(),
            (VariableKind::Text { .. }, Value::Text(_)) => true,
            (VariableKind::Path { .. }, Value::Path(_)) => true,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(GraphError::WrongKind {
                variable: variable.name.clone(),
                expected: variable.kind.name(),
            })
        }
    }

    fn store(&mut self, var: VarId, value: Value, check_range: bool) -> GraphResult<()> {
        self.check_kind(var, &value)?;
        let variable = &mut self.variables[var.slot()];
        match (&mut variable.kind, value) {
            (VariableKind::Continuous(c), Value::Number(v)) => {
                let v = ensure_finite(v, "variable value")?;
                if check_range && (v < c.min || v > c.max) {
                    return Err(GraphError::OutOfRange {
                        variable: variable.name.clone(),
                        value: v,
                        min: c.min,
                        max: c.max,
                    });
                }
                c.value = v;
            }
            (VariableKind::Discrete(d), Value::Item(i)) => d.selected = i,
            (VariableKind::Text { value, .. }, Value::Text(t)) => *value = t,
            (VariableKind::Path { points }, Value::Path(p)) => *points = p,
            _ => {}
        }
        Ok(())
    }

    /// Restore every variable to its default and mark every equation stale.
    pub fn reset(&mut self) {
        for variable in &mut self.variables {
            variable.restore_default();
        }
        for equation in &mut self.equations {
            equation.fresh = false;
            equation.dirty.fill(false);
        }
        self.stats = EvalStats::default();
    }

    // ------------------------------------------------------------------
    // Display and catalog mutation
    // ------------------------------------------------------------------

    pub fn set_unit_system(&mut self, system: UnitSystem) {
        for variable in &mut self.variables {
            if let VariableKind::Continuous(c) = &mut variable.kind {
                c.display = system;
            }
        }
    }

    /// Replace a discrete variable's item list (e.g. custom fuel models).
    pub fn set_discrete_items(&mut self, var: VarId, items: Vec<DiscreteItem>) -> GraphResult<()> {
        let variable = &mut self.variables[var.slot()];
        let VariableKind::Discrete(d) = &mut variable.kind else {
            return Err(GraphError::WrongKind {
                variable: variable.name.clone(),
                expected: "discrete",
            });
        };
        if items.is_empty() {
            return Err(GraphError::WrongKind {
                variable: variable.name.clone(),
                expected: "non-empty item list",
            });
        }
        d.items = items;
        d.selected = 0;
        d.default = 0;
        self.mark_dirty(var);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reconciler-facing mutators
    // ------------------------------------------------------------------

    /// Toggle an equation. Returns true when the flag changed.
    ///
    /// An equation switched on is stale until it runs again.
    pub fn set_active(&mut self, eq: EqId, active: bool) -> bool {
        let equation = &mut self.equations[eq.slot()];
        if equation.active == active {
            return false;
        }
        equation.active = active;
        if active {
            equation.fresh = false;
        }
        true
    }

    pub fn set_roles(&mut self, var: VarId, roles: Roles) {
        self.variables[var.slot()].roles = roles;
    }

    /// Pin a leaf to a fixed value and flag it constant.
    pub fn set_constant(&mut self, var: VarId, value: Value) -> GraphResult<()> {
        let changed = self.variables[var.slot()].value() != value;
        self.set_value(var, value)?;
        let roles = &mut self.variables[var.slot()].roles;
        roles.constant = true;
        roles.user_input = false;
        if changed {
            self.mark_dirty(var);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComputationResult, EquationSpec, ModelBuilder, VariableSpec};
    use ff_core::UnitTriple;
    use std::cell::Cell;
    use std::rc::Rc;

    fn number(name: &str) -> VariableSpec {
        VariableSpec::continuous(name, name, 1.0, (-1e9, 1e9), UnitTriple::uniform("ratio", 3))
    }

    fn double(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
        let x = crate::value::number_at(inputs, 0)?;
        Ok(vec![Value::Number(2.0 * x)])
    }

    fn sum(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
        let a = crate::value::number_at(inputs, 0)?;
        let b = crate::value::number_at(inputs, 1)?;
        Ok(vec![Value::Number(a + b)])
    }

    /// x -> f(double) -> y ; (y, z) -> g(sum) -> w
    fn chain() -> Model {
        let mut b = ModelBuilder::new();
        for name in ["x", "y", "z", "w"] {
            b.register_variable(number(name));
        }
        b.register_equation(EquationSpec::new("f", "test", &["x"], &["y"], double));
        b.register_equation(EquationSpec::new("g", "test", &["y", "z"], &["w"], sum));
        b.build()
    }

    #[test]
    fn evaluate_computes_through_chain() {
        let mut m = chain();
        let x = m.lookup_variable("x").unwrap();
        let w = m.lookup_variable("w").unwrap();
        m.assign(x, Value::Number(3.0)).unwrap();
        assert_eq!(m.evaluate(w).unwrap(), Value::Number(7.0));
        assert_eq!(m.stats().computations, 2);

        // Nothing changed: both equations are cache hits.
        m.evaluate(w).unwrap();
        assert_eq!(m.stats().computations, 2);
        assert_eq!(m.stats().cache_hits, 2);
    }

    #[test]
    fn mark_dirty_touches_only_matching_slot() {
        let mut m = chain();
        let z = m.lookup_variable("z").unwrap();
        let w = m.lookup_variable("w").unwrap();
        let g = m.lookup_equation("g").unwrap();
        m.evaluate(w).unwrap();
        m.mark_dirty(z);
        assert_eq!(m.equation(g).dirty_bits(), &[false, true]);
        m.evaluate(w).unwrap();
        assert_eq!(m.equation(g).dirty_bits(), &[false, false]);
    }

    #[test]
    fn deep_leaf_change_reaches_output() {
        let mut m = chain();
        let x = m.lookup_variable("x").unwrap();
        let w = m.lookup_variable("w").unwrap();
        m.evaluate(w).unwrap();
        m.assign(x, Value::Number(10.0)).unwrap();
        assert_eq!(m.evaluate(w).unwrap(), Value::Number(21.0));
    }

    #[test]
    fn computed_variable_rejects_set_value() {
        let mut m = chain();
        let y = m.lookup_variable("y").unwrap();
        let err = m.set_value(y, Value::Number(1.0)).unwrap_err();
        assert!(matches!(err, GraphError::NotALeaf { .. }));

        let f = m.lookup_equation("f").unwrap();
        m.set_active(f, false);
        m.set_value(y, Value::Number(4.0)).unwrap();
    }

    #[test]
    fn out_of_range_and_wrong_kind_rejected() {
        let mut m = chain();
        let x = m.lookup_variable("x").unwrap();
        assert!(matches!(
            m.set_value(x, Value::Number(1e12)),
            Err(GraphError::OutOfRange { .. })
        ));
        assert!(matches!(
            m.set_value(x, Value::Text("a".into())),
            Err(GraphError::WrongKind { .. })
        ));
    }

    #[test]
    fn failing_computation_leaves_outputs_untouched() {
        let mut b = ModelBuilder::new();
        b.register_variable(number("x"));
        b.register_variable(number("y"));
        b.register_equation(EquationSpec::new(
            "positive",
            "test",
            &["x"],
            &["y"],
            |inputs: &[Value]| -> ComputationResult<Vec<Value>> {
                let x = crate::value::number_at(inputs, 0)?;
                if x <= 0.0 {
                    return Err(ComputationError::invalid("x must be positive"));
                }
                Ok(vec![Value::Number(x.sqrt())])
            },
        ));
        let mut m = b.build();
        let x = m.lookup_variable("x").unwrap();
        let y = m.lookup_variable("y").unwrap();

        m.assign(x, Value::Number(4.0)).unwrap();
        assert_eq!(m.evaluate(y).unwrap(), Value::Number(2.0));

        m.assign(x, Value::Number(-1.0)).unwrap();
        let err = m.evaluate(y).unwrap_err();
        assert!(matches!(err, GraphError::Computation { .. }));
        assert_eq!(m.variable(y).value(), Value::Number(2.0));

        // Still stale, so a valid input recomputes.
        m.assign(x, Value::Number(9.0)).unwrap();
        assert_eq!(m.evaluate(y).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn cycle_fails_fast() {
        let mut b = ModelBuilder::new();
        b.register_variable(number("a"));
        b.register_variable(number("b"));
        b.register_equation(EquationSpec::new("fa", "test", &["b"], &["a"], double));
        b.register_equation(EquationSpec::new("fb", "test", &["a"], &["b"], double));
        let mut m = b.build();
        let a = m.lookup_variable("a").unwrap();
        match m.evaluate(a).unwrap_err() {
            GraphError::Cycle { variable, path } => {
                assert_eq!(variable, "a");
                assert_eq!(path, vec!["a", "b", "a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn inactive_consumer_is_not_marked_and_reactivation_recomputes() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let mut b = ModelBuilder::new();
        b.register_variable(number("x"));
        b.register_variable(number("y"));
        b.register_equation(EquationSpec::new(
            "counted",
            "test",
            &["x"],
            &["y"],
            move |inputs: &[Value]| {
                counter.set(counter.get() + 1);
                double(inputs)
            },
        ));
        let mut m = b.build();
        let x = m.lookup_variable("x").unwrap();
        let y = m.lookup_variable("y").unwrap();
        let f = m.lookup_equation("counted").unwrap();

        m.evaluate(y).unwrap();
        assert_eq!(calls.get(), 1);

        assert!(m.set_active(f, false));
        m.mark_dirty(x);
        assert_eq!(m.equation(f).dirty_bits(), &[false]);
        assert!(!m.set_active(f, false));

        assert!(m.set_active(f, true));
        m.evaluate(y).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut m = chain();
        let x = m.lookup_variable("x").unwrap();
        let w = m.lookup_variable("w").unwrap();
        m.assign(x, Value::Number(5.0)).unwrap();
        m.evaluate(w).unwrap();
        m.reset();
        assert_eq!(m.variable(x).value(), Value::Number(1.0));
        assert_eq!(m.stats(), EvalStats::default());
        assert_eq!(m.evaluate(w).unwrap(), Value::Number(3.0));
    }

    #[test]
    fn set_constant_flags_and_invalidates() {
        let mut m = chain();
        let z = m.lookup_variable("z").unwrap();
        let w = m.lookup_variable("w").unwrap();
        m.evaluate(w).unwrap();
        m.set_constant(z, Value::Number(0.0)).unwrap();
        assert!(m.variable(z).roles.constant);
        assert!(!m.variable(z).roles.user_input);
        assert_eq!(m.evaluate(w).unwrap(), Value::Number(2.0));
    }

    /// kind -> f(item weight) -> y
    fn item_model() -> Model {
        let mut b = ModelBuilder::new();
        b.register_variable(VariableSpec::discrete(
            "kind",
            "kind",
            &[("a", "first"), ("b", "second"), ("c", "third")],
        ));
        b.register_variable(number("y"));
        b.register_equation(EquationSpec::new(
            "weight",
            "test",
            &["kind"],
            &["y"],
            |inputs: &[Value]| -> ComputationResult<Vec<Value>> {
                match inputs.first() {
                    Some(Value::Item(i)) => Ok(vec![Value::Number(10.0 * (*i as f64 + 1.0))]),
                    _ => Err(ComputationError::invalid("expected an item")),
                }
            },
        ));
        b.build()
    }

    #[test]
    fn replacing_items_resets_selection_and_recomputes() {
        let mut m = item_model();
        let kind = m.lookup_variable("kind").unwrap();
        let y = m.lookup_variable("y").unwrap();
        let f = m.lookup_equation("weight").unwrap();

        m.assign_code(kind, "c").unwrap();
        assert_eq!(m.evaluate(y).unwrap(), Value::Number(30.0));
        assert_eq!(m.equation(f).dirty_bits(), &[false]);
        let before = m.stats().computations;

        let custom = vec![
            DiscreteItem::new("x1", "custom one", 0),
            DiscreteItem::new("x2", "custom two", 1),
        ];
        m.set_discrete_items(kind, custom).unwrap();
        assert_eq!(m.equation(f).dirty_bits(), &[true]);

        let d = m.variable(kind).discrete().unwrap();
        assert_eq!(d.items.len(), 2);
        assert_eq!(d.selected_item().unwrap().code, "x1");
        assert_eq!(m.variable(kind).value(), Value::Item(0));

        assert_eq!(m.evaluate(y).unwrap(), Value::Number(10.0));
        assert_eq!(m.stats().computations, before + 1);
        assert!(m.assign_code(kind, "c").is_err());
        m.assign_code(kind, "x2").unwrap();
        assert_eq!(m.evaluate(y).unwrap(), Value::Number(20.0));
    }

    #[test]
    fn replacing_items_rejects_empty_list_and_other_kinds() {
        let mut m = item_model();
        let kind = m.lookup_variable("kind").unwrap();
        let y = m.lookup_variable("y").unwrap();
        assert!(matches!(
            m.set_discrete_items(kind, Vec::new()),
            Err(GraphError::WrongKind { .. })
        ));
        assert_eq!(m.variable(kind).discrete().unwrap().items.len(), 3);
        assert!(matches!(
            m.set_discrete_items(y, vec![DiscreteItem::new("a", "a", 0)]),
            Err(GraphError::WrongKind { .. })
        ));
    }

    #[test]
    fn text_leaf_holds_and_resets_its_value() {
        let mut b = ModelBuilder::new();
        b.register_variable(VariableSpec::text("note", "Note", "none"));
        let mut m = b.build();
        let note = m.lookup_variable("note").unwrap();
        assert_eq!(m.variable(note).value(), Value::Text("none".into()));
        m.set_value(note, Value::Text("crew one".into())).unwrap();
        assert_eq!(m.evaluate(note).unwrap(), Value::Text("crew one".into()));
        assert!(matches!(
            m.set_value(note, Value::Number(1.0)),
            Err(GraphError::WrongKind { .. })
        ));
        m.reset();
        assert_eq!(m.variable(note).value(), Value::Text("none".into()));
    }
}
