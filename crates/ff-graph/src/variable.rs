//! Variables: named model quantities.

use ff_core::{EqId, FfResult, Real, UnitSpec, UnitSystem, UnitTriple, VarId, round_to_decimals};
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One entry of a discrete variable's item list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscreteItem {
    pub code: String,
    pub sort: i32,
    pub description: String,
    /// Index into whatever data table the code refers to.
    pub index: usize,
}

impl DiscreteItem {
    pub fn new(code: impl Into<String>, description: impl Into<String>, index: usize) -> Self {
        Self {
            code: code.into(),
            sort: index as i32,
            description: description.into(),
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousData {
    pub value: Real,
    pub default: Real,
    pub min: Real,
    pub max: Real,
    pub units: UnitTriple,
    pub display: UnitSystem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteData {
    pub items: Vec<DiscreteItem>,
    pub selected: usize,
    pub default: usize,
}

impl DiscreteData {
    pub fn selected_item(&self) -> Option<&DiscreteItem> {
        self.items.get(self.selected)
    }

    pub fn position_of(&self, code: &str) -> Option<usize> {
        self.items.iter().position(|item| item.code == code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariableKind {
    Continuous(ContinuousData),
    Discrete(DiscreteData),
    Text { value: String, default: String },
    Path { points: Vec<(Real, Real)> },
}

impl VariableKind {
    pub fn name(&self) -> &'static str {
        match self {
            VariableKind::Continuous(_) => "continuous",
            VariableKind::Discrete(_) => "discrete",
            VariableKind::Text { .. } => "text",
            VariableKind::Path { .. } => "path",
        }
    }
}

/// Role flags owned by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Roles {
    pub user_input: bool,
    pub constant: bool,
    pub user_output: bool,
}

impl Roles {
    pub const INPUT: Roles = Roles {
        user_input: true,
        constant: false,
        user_output: false,
    };
    pub const CONSTANT: Roles = Roles {
        user_input: false,
        constant: true,
        user_output: false,
    };
    pub const OUTPUT: Roles = Roles {
        user_input: false,
        constant: false,
        user_output: true,
    };

    pub fn is_leaf_role(&self) -> bool {
        self.user_input || self.constant
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub id: VarId,
    pub name: String,
    pub label: String,
    pub kind: VariableKind,
    pub roles: Roles,
    pub(crate) producers: Vec<EqId>,
    pub(crate) consumers: Vec<EqId>,
}

impl Variable {
    /// Every equation declaring this variable as an output, active or not.
    pub fn producers(&self) -> &[EqId] {
        &self.producers
    }

    /// Every equation declaring this variable as an input.
    pub fn consumers(&self) -> &[EqId] {
        &self.consumers
    }

    pub fn value(&self) -> Value {
        match &self.kind {
            VariableKind::Continuous(c) => Value::Number(c.value),
            VariableKind::Discrete(d) => Value::Item(d.selected),
            VariableKind::Text { value, .. } => Value::Text(value.clone()),
            VariableKind::Path { points } => Value::Path(points.clone()),
        }
    }

    pub fn continuous(&self) -> Option<&ContinuousData> {
        match &self.kind {
            VariableKind::Continuous(c) => Some(c),
            _ => None,
        }
    }

    pub fn discrete(&self) -> Option<&DiscreteData> {
        match &self.kind {
            VariableKind::Discrete(d) => Some(d),
            _ => None,
        }
    }

    /// Native units and decimals, if continuous.
    pub fn native_spec(&self) -> Option<&UnitSpec> {
        self.continuous().map(|c| &c.units.native)
    }

    /// Current value converted into the display system, rounded to its decimals.
    pub fn display_value(&self) -> FfResult<Option<(Real, &UnitSpec)>> {
        let Some(c) = self.continuous() else {
            return Ok(None);
        };
        let spec = c.units.spec(c.display);
        let shown = c.units.to_display(c.value, c.display)?;
        Ok(Some((round_to_decimals(shown, spec.decimals), spec)))
    }

    pub(crate) fn restore_default(&mut self) {
        match &mut self.kind {
            VariableKind::Continuous(c) => c.value = c.default,
            VariableKind::Discrete(d) => d.selected = d.default,
            VariableKind::Text { value, default } => value.clone_from(default),
            VariableKind::Path { points } => points.clear(),
        }
    }
}

/// Declaration of a variable, consumed by [`crate::ModelBuilder`].
#[derive(Debug, Clone)]
pub struct VariableSpec {
    pub name: String,
    pub label: String,
    pub kind: VariableKind,
}

impl VariableSpec {
    pub fn continuous(
        name: impl Into<String>,
        label: impl Into<String>,
        default: Real,
        range: (Real, Real),
        units: UnitTriple,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: VariableKind::Continuous(ContinuousData {
                value: default,
                default,
                min: range.0,
                max: range.1,
                units,
                display: UnitSystem::default(),
            }),
        }
    }

    /// Discrete variable from `(code, description)` pairs; the first item is the default.
    pub fn discrete(
        name: impl Into<String>,
        label: impl Into<String>,
        items: &[(&str, &str)],
    ) -> Self {
        let items = items
            .iter()
            .enumerate()
            .map(|(i, (code, description))| DiscreteItem::new(*code, *description, i))
            .collect();
        Self {
            name: name.into(),
            label: label.into(),
            kind: VariableKind::Discrete(DiscreteData {
                items,
                selected: 0,
                default: 0,
            }),
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>, default: &str) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: VariableKind::Text {
                value: default.to_string(),
                default: default.to_string(),
            },
        }
    }

    pub fn path(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind: VariableKind::Path { points: Vec::new() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_value_converts_and_rounds() {
        let spec = VariableSpec::continuous(
            "vRos",
            "Rate of spread",
            11.0,
            (0.0, 1000.0),
            UnitTriple::new(("ft/min", 3), ("ch/h", 1), ("m/min", 2)),
        );
        let var = Variable {
            id: VarId::from_index(0),
            name: spec.name,
            label: spec.label,
            kind: spec.kind,
            roles: Roles::default(),
            producers: Vec::new(),
            consumers: Vec::new(),
        };
        let (shown, units) = var.display_value().unwrap().unwrap();
        assert_eq!(units.units, "ch/h");
        assert!((shown - 10.0).abs() < 1e-9);
    }

    #[test]
    fn discrete_items_keep_order() {
        let spec = VariableSpec::discrete("vModel", "Fuel model", &[("1", "Short grass"), ("2", "Timber grass")]);
        let VariableKind::Discrete(d) = spec.kind else {
            panic!("expected discrete");
        };
        assert_eq!(d.position_of("2"), Some(1));
        assert_eq!(d.selected_item().unwrap().description, "Short grass");
    }
}
