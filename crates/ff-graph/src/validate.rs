//! Audit of the active subgraph.

use std::collections::HashMap;

use ff_core::EqId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{GraphError, GraphResult};
use crate::model::Model;

/// Collect every structural problem of the active subgraph.
///
/// Checks acyclicity, at most one active producer per variable, that every
/// input without an active producer is a leaf role, and that computed
/// variables are not flagged user-editable.
pub fn audit(model: &Model) -> Vec<GraphError> {
    let mut problems = Vec::new();

    if let Err(err) = check_acyclic(model) {
        problems.push(err);
    }

    for var in model.variables() {
        let active: Vec<EqId> = var
            .producers()
            .iter()
            .copied()
            .filter(|eq| model.equation(*eq).is_active())
            .collect();

        if active.len() > 1 {
            problems.push(GraphError::MultipleActiveProducers {
                variable: var.name.clone(),
                producers: active
                    .iter()
                    .map(|eq| model.equation(*eq).name.clone())
                    .collect(),
            });
        }

        if !active.is_empty() && var.roles.user_input {
            problems.push(GraphError::EditableComputed {
                variable: var.name.clone(),
            });
        }

        if active.is_empty()
            && !var.roles.is_leaf_role()
            && let Some(consumer) = var
                .consumers()
                .iter()
                .find(|eq| model.equation(**eq).is_active())
        {
            problems.push(GraphError::UnresolvedInput {
                variable: var.name.clone(),
                equation: model.equation(*consumer).name.clone(),
            });
        }
    }

    problems
}

/// First audit problem as an error.
pub fn validate_active(model: &Model) -> GraphResult<()> {
    match audit(model).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Equation-level dependency graph over active equations; toposort finds cycles.
fn check_acyclic(model: &Model) -> GraphResult<()> {
    let mut graph: DiGraph<EqId, ()> = DiGraph::new();
    let mut nodes: HashMap<EqId, NodeIndex> = HashMap::new();

    for eq in model.equations().iter().filter(|e| e.is_active()) {
        nodes.insert(eq.id, graph.add_node(eq.id));
    }

    for eq in model.equations().iter().filter(|e| e.is_active()) {
        for input in eq.inputs() {
            if let Some(producer) = model.active_producer(*input) {
                graph.add_edge(nodes[&producer], nodes[&eq.id], ());
            }
        }
    }

    toposort(&graph, None).map(|_| ()).map_err(|cycle| {
        let eq = model.equation(graph[cycle.node_id()]);
        let variable = eq
            .outputs()
            .first()
            .map(|v| model.variable(*v).name.clone())
            .unwrap_or_default();
        GraphError::Cycle {
            variable,
            path: vec![eq.name.clone()],
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComputationResult, EquationSpec, ModelBuilder, Roles, Value, VariableSpec};
    use ff_core::UnitTriple;

    fn number(name: &str) -> VariableSpec {
        VariableSpec::continuous(name, name, 0.0, (-10.0, 10.0), UnitTriple::uniform("ratio", 1))
    }

    fn pass(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
        Ok(vec![inputs[0].clone()])
    }

    #[test]
    fn clean_graph_passes() {
        let mut b = ModelBuilder::new();
        let x = b.register_variable(number("x"));
        let y = b.register_variable(number("y"));
        b.register_equation(EquationSpec::new("f", "t", &["x"], &["y"], pass));
        let mut m = b.build();
        m.set_roles(x, Roles::INPUT);
        m.set_roles(y, Roles::OUTPUT);
        assert!(validate_active(&m).is_ok());
    }

    #[test]
    fn reports_each_problem_kind() {
        let mut b = ModelBuilder::new();
        b.register_variable(number("x"));
        let y = b.register_variable(number("y"));
        b.register_variable(number("a"));
        b.register_variable(number("c"));
        b.register_equation(EquationSpec::new("f1", "t", &["x"], &["y"], pass));
        b.register_equation(EquationSpec::new("f2", "t", &["x"], &["y"], pass));
        b.register_equation(EquationSpec::new("ga", "t", &["c"], &["a"], pass));
        b.register_equation(EquationSpec::new("gc", "t", &["a"], &["c"], pass));
        let mut m = b.build();
        m.set_roles(y, Roles::INPUT);

        let problems = audit(&m);
        assert!(problems.iter().any(|p| matches!(p, GraphError::Cycle { .. })));
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, GraphError::MultipleActiveProducers { .. }))
        );
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, GraphError::EditableComputed { .. }))
        );
        assert!(
            problems
                .iter()
                .any(|p| matches!(p, GraphError::UnresolvedInput { variable, .. } if variable == "x"))
        );
    }
}
