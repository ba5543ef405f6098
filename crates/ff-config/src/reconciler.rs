//! The configuration reconciler.
//!
//! `reconcile` recomputes every equation's active flag and every variable's
//! role flags from the option set alone, in a fixed precedence order:
//!
//! 1. resolve every decision group (fallback on zero or several set);
//! 2. effective modules: enabled modules plus their cascades;
//! 3. exclude the non-selected alternatives of every group;
//! 4. required variables: requested outputs, implicit cross-module
//!    requirements and diagram supporting variables;
//! 5. activate the selected alternatives of effective modules, then the
//!    single non-excluded producer of every required variable and of every
//!    input of an activated equation;
//! 6. forced constants;
//! 7. roles.
//!
//! Nothing depends on the previous graph state, so the result is the same
//! however often it is applied.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use ff_catalog::names::{MOD_SPOT, MOD_SURFACE, MODULES, V_SPREAD_AT_HEAD, V_SPREAD_AT_VECTOR};
use ff_core::{EqId, VarId};
use ff_graph::{Model, Roles, Value};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::decisions::{Decisions, GroupState, SpotSourceMode, SpreadDirectionMode};
use crate::error::{ConfigError, ConfigResult};
use crate::options::ConfigOptions;
use crate::tables::{
    DIAGRAMS, OUTPUTS, OutputTarget, cascades, implicit_requirements, module_option,
    referenced_variables,
};

/// A recovered contract violation or a surprising outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// Zero or several options set in an exclusive group.
    GroupViolation {
        group: &'static str,
        set: Vec<&'static str>,
        chosen: &'static str,
    },
    /// A requested output ended up without an active producer.
    OutputNotComputed {
        option: &'static str,
        variable: String,
    },
    /// Several non-excluded producers could supply a required variable.
    AmbiguousProducer {
        variable: String,
        chosen: String,
        candidates: Vec<String>,
    },
    UnknownOption { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GroupViolation { group, set, chosen } if set.is_empty() => {
                write!(f, "no option set in group '{group}'; using '{chosen}'")
            }
            Diagnostic::GroupViolation { group, set, chosen } => write!(
                f,
                "options {} all set in group '{group}'; using '{chosen}'",
                set.join(", ")
            ),
            Diagnostic::OutputNotComputed { option, variable } => {
                write!(f, "'{option}' requests {variable}, which is not computed")
            }
            Diagnostic::AmbiguousProducer {
                variable,
                chosen,
                candidates,
            } => write!(
                f,
                "{variable} has producers {}; using {chosen}",
                candidates.join(", ")
            ),
            Diagnostic::UnknownOption { name } => write!(f, "unknown option '{name}'"),
        }
    }
}

/// What a reconcile pass decided.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub decisions: Decisions,
    /// Effective modules, in catalog order.
    pub modules: Vec<&'static str>,
    /// Variables flagged as user outputs, in registration order.
    pub outputs: Vec<VarId>,
    /// Computed diagram variables that are not table outputs.
    pub supporting: Vec<VarId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Reconciliation {
    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains(&module)
    }
}

/// Name tables resolved against one catalog model.
pub struct Reconciler {
    equations: HashMap<&'static str, EqId>,
    variables: HashMap<&'static str, VarId>,
    known_options: HashSet<String>,
}

impl Reconciler {
    /// Resolve every name the option tables use; fails on a catalog that
    /// lacks one of them.
    pub fn new(model: &Model) -> ConfigResult<Self> {
        let (_, groups) = Decisions::resolve_all(&ConfigOptions::new());

        let mut equations = HashMap::new();
        let mut var_names = referenced_variables();
        for group in &groups {
            for name in &group.all {
                let id = model
                    .lookup_equation(name)
                    .ok_or_else(|| ConfigError::UnknownName {
                        kind: "equation",
                        name: name.to_string(),
                    })?;
                equations.insert(*name, id);
            }
        }
        for (name, _) in Decisions::all_constants() {
            var_names.push(name);
        }

        let mut variables = HashMap::new();
        for name in var_names {
            let id = model
                .lookup_variable(name)
                .ok_or_else(|| ConfigError::UnknownName {
                    kind: "variable",
                    name: name.to_string(),
                })?;
            variables.insert(name, id);
        }

        let mut known_options: HashSet<String> = Decisions::option_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        known_options.extend(MODULES.iter().map(|m| module_option(m)));
        known_options.extend(OUTPUTS.iter().map(|o| o.option.to_string()));
        known_options.extend(DIAGRAMS.iter().map(|d| d.option.to_string()));

        Ok(Self {
            equations,
            variables,
            known_options,
        })
    }

    pub fn is_known_option(&self, name: &str) -> bool {
        self.known_options.contains(name)
    }

    fn eq_id(&self, name: &str) -> ConfigResult<EqId> {
        self.equations
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownName {
                kind: "equation",
                name: name.to_string(),
            })
    }

    fn var_id(&self, name: &str) -> ConfigResult<VarId> {
        self.variables
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownName {
                kind: "variable",
                name: name.to_string(),
            })
    }

    pub fn reconcile(
        &self,
        model: &mut Model,
        options: &ConfigOptions,
    ) -> ConfigResult<Reconciliation> {
        let mut diagnostics = Vec::new();
        for (name, _) in options.iter() {
            if !self.is_known_option(name) {
                diagnostics.push(Diagnostic::UnknownOption {
                    name: name.to_string(),
                });
            }
        }

        // 1. decision groups
        let (decisions, groups) = Decisions::resolve_all(options);
        debug!(?decisions, "resolved decision groups");

        // 2. effective modules
        let modules = effective_modules(options, &decisions);
        if modules.is_empty() {
            warn!("no feature module enabled; nothing will be computed");
        }
        let effective = |module: &str| modules.contains(&module);
        for group in groups.iter().filter(|g| effective(g.module)) {
            if let Some(set) = &group.violation {
                diagnostics.push(Diagnostic::GroupViolation {
                    group: group.group,
                    set: set.clone(),
                    chosen: group.chosen,
                });
            }
        }

        // 3. exclusions
        let mut excluded: HashSet<EqId> = HashSet::new();
        for group in &groups {
            for name in group.excluded() {
                excluded.insert(self.eq_id(name)?);
            }
        }

        // 4. required variables
        let mut requested: Vec<(&'static str, VarId)> = Vec::new();
        for entry in OUTPUTS {
            if !effective(entry.module) || !options.is_set(entry.option) {
                continue;
            }
            let name = match entry.target {
                OutputTarget::Var(name) => name,
                OutputTarget::SpreadRate => match decisions.spread_direction {
                    SpreadDirectionMode::Head => V_SPREAD_AT_HEAD,
                    SpreadDirectionMode::Vector => V_SPREAD_AT_VECTOR,
                },
            };
            requested.push((entry.option, self.var_id(name)?));
        }
        let mut supporting_requested: Vec<VarId> = Vec::new();
        for diagram in DIAGRAMS {
            if effective(diagram.module) && options.is_set(diagram.option) {
                for name in diagram.supporting {
                    supporting_requested.push(self.var_id(name)?);
                }
            }
        }
        let mut required: VecDeque<VarId> = requested.iter().map(|(_, v)| *v).collect();
        for module in &modules {
            for name in implicit_requirements(module) {
                required.push_back(self.var_id(name)?);
            }
        }
        required.extend(supporting_requested.iter().copied());

        // 5. activation
        let mut active = vec![false; model.equations().len()];
        let mut queue = required;
        for group in groups.iter().filter(|g| effective(g.module)) {
            for name in group.selected {
                activate(model, self.eq_id(name)?, &mut active, &mut queue);
            }
        }
        let mut visited = vec![false; model.variables().len()];
        while let Some(var) = queue.pop_front() {
            if std::mem::replace(&mut visited[var.slot()], true) {
                continue;
            }
            let candidates: Vec<EqId> = model
                .variable(var)
                .producers()
                .iter()
                .copied()
                .filter(|eq| !excluded.contains(eq) && effective(model.equation(*eq).module))
                .collect();
            let Some(first) = candidates.first().copied() else {
                continue;
            };
            let chosen = candidates
                .iter()
                .copied()
                .find(|eq| active[eq.slot()])
                .unwrap_or(first);
            if candidates.len() > 1 {
                diagnostics.push(Diagnostic::AmbiguousProducer {
                    variable: model.variable(var).name.clone(),
                    chosen: model.equation(chosen).name.clone(),
                    candidates: candidates
                        .iter()
                        .map(|eq| model.equation(*eq).name.clone())
                        .collect(),
                });
            }
            activate(model, chosen, &mut active, &mut queue);
        }

        let ids: Vec<EqId> = model.equations().iter().map(|eq| eq.id).collect();
        let mut flips = 0usize;
        for id in ids {
            if model.set_active(id, active[id.slot()]) {
                flips += 1;
            }
        }
        debug!(flips, "applied active flags");

        // 6. forced constants
        let mut constants: HashMap<VarId, f64> = HashMap::new();
        for group in groups.iter().filter(|g| effective(g.module)) {
            for (name, value) in group.constants {
                constants.insert(self.var_id(name)?, *value);
            }
        }
        for (var, value) in &constants {
            model.set_constant(*var, Value::Number(*value))?;
        }

        // 7. roles
        let requested_vars: HashSet<VarId> = requested.iter().map(|(_, v)| *v).collect();
        let var_ids: Vec<VarId> = model.variables().iter().map(|v| v.id).collect();
        for var in var_ids {
            let computed = model.active_producer(var).is_some();
            let consumed = model
                .variable(var)
                .consumers()
                .iter()
                .any(|eq| active[eq.slot()]);
            let roles = if computed {
                Roles {
                    user_output: requested_vars.contains(&var),
                    ..Roles::default()
                }
            } else if constants.contains_key(&var) {
                Roles::CONSTANT
            } else if consumed {
                Roles::INPUT
            } else {
                Roles::default()
            };
            model.set_roles(var, roles);
        }

        for (option, var) in &requested {
            if model.is_leaf(*var) {
                diagnostics.push(Diagnostic::OutputNotComputed {
                    option: *option,
                    variable: model.variable(*var).name.clone(),
                });
            }
        }

        let outputs = model.user_outputs();
        let mut supporting: Vec<VarId> = Vec::new();
        for var in supporting_requested {
            if !model.is_leaf(var) && !outputs.contains(&var) && !supporting.contains(&var) {
                supporting.push(var);
            }
        }

        for diagnostic in &diagnostics {
            warn!(%diagnostic, "configuration diagnostic");
        }
        info!(
            modules = ?modules,
            active = active.iter().filter(|a| **a).count(),
            outputs = outputs.len(),
            supporting = supporting.len(),
            "reconciled configuration"
        );

        Ok(Reconciliation {
            decisions,
            modules,
            outputs,
            supporting,
            diagnostics,
        })
    }
}

fn activate(model: &Model, eq: EqId, active: &mut [bool], queue: &mut VecDeque<VarId>) {
    if active[eq.slot()] {
        return;
    }
    active[eq.slot()] = true;
    queue.extend(model.equation(eq).inputs().iter().copied());
}

/// Enabled modules closed over their cascades, in catalog order.
fn effective_modules(options: &ConfigOptions, decisions: &Decisions) -> Vec<&'static str> {
    let mut on: HashSet<&'static str> = HashSet::new();
    let mut stack: Vec<&'static str> = MODULES
        .iter()
        .copied()
        .filter(|m| options.is_set(&module_option(m)))
        .collect();
    while let Some(module) = stack.pop() {
        if !on.insert(module) {
            continue;
        }
        stack.extend_from_slice(cascades(module));
        if module == MOD_SPOT && decisions.spot_source == SpotSourceMode::SurfaceFire {
            stack.push(MOD_SURFACE);
        }
    }
    MODULES.iter().copied().filter(|m| on.contains(m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decisions(options: &ConfigOptions) -> Decisions {
        Decisions::resolve_all(options).0
    }

    #[test]
    fn contain_pulls_in_size_and_surface() {
        let opts = ConfigOptions::new().with("module-contain");
        assert_eq!(
            effective_modules(&opts, &decisions(&opts)),
            vec!["surface", "size", "contain"]
        );
    }

    #[test]
    fn spot_from_surface_fire_pulls_in_surface() {
        let torching = ConfigOptions::new().with("module-spot");
        assert_eq!(effective_modules(&torching, &decisions(&torching)), vec!["spot"]);

        let surface = torching.clone().with("spot-from-surface-fire");
        assert_eq!(
            effective_modules(&surface, &decisions(&surface)),
            vec!["surface", "spot"]
        );
    }

    #[test]
    fn disabled_switch_is_ignored() {
        let mut opts = ConfigOptions::new();
        opts.set("module-size", false);
        assert!(effective_modules(&opts, &decisions(&opts)).is_empty());
    }

    #[test]
    fn diagnostic_messages() {
        let d = Diagnostic::GroupViolation {
            group: "slope",
            set: vec![],
            chosen: "slope-fraction",
        };
        assert_eq!(d.to_string(), "no option set in group 'slope'; using 'slope-fraction'");
        let d = Diagnostic::UnknownOption { name: "x".into() };
        assert_eq!(d.to_string(), "unknown option 'x'");
    }
}
