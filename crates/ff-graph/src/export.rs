//! Read-only dump of the variable catalog.

use std::io::{self, Write};

use serde::Serialize;

use crate::model::Model;
use crate::variable::{Variable, VariableKind};

/// One row of the catalog dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub label: String,
    pub kind: &'static str,
    pub units: String,
    pub value: String,
    pub user_input: bool,
    pub constant: bool,
    pub user_output: bool,
    pub active_producer: Option<String>,
}

fn describe_value(var: &Variable) -> String {
    match &var.kind {
        VariableKind::Continuous(c) => format!("{:.*}", c.units.native.decimals as usize, c.value),
        VariableKind::Discrete(d) => d
            .selected_item()
            .map(|item| item.code.clone())
            .unwrap_or_default(),
        VariableKind::Text { value, .. } => value.clone(),
        VariableKind::Path { points } => format!("{} points", points.len()),
    }
}

pub fn catalog_entries(model: &Model) -> Vec<CatalogEntry> {
    model
        .variables()
        .iter()
        .map(|var| CatalogEntry {
            name: var.name.clone(),
            label: var.label.clone(),
            kind: var.kind.name(),
            units: var
                .native_spec()
                .map(|spec| spec.units.clone())
                .unwrap_or_default(),
            value: describe_value(var),
            user_input: var.roles.user_input,
            constant: var.roles.constant,
            user_output: var.roles.user_output,
            active_producer: model
                .active_producer(var.id)
                .map(|eq| model.equation(eq).name.clone()),
        })
        .collect()
}

/// Human-readable fixed-width table, one variable per line.
pub fn write_catalog(model: &Model, mut out: impl Write) -> io::Result<()> {
    let entries = catalog_entries(model);
    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(4).max(4);

    writeln!(
        out,
        "{:<width$}  {:<10}  {:<12}  {:>14}  {:<5}  {:<40}  label",
        "name", "kind", "units", "value", "role", "producer"
    )?;
    for e in &entries {
        let role = match (e.user_input, e.constant, e.user_output) {
            (true, _, true) => "in/o",
            (true, _, false) => "in",
            (_, true, _) => "const",
            (_, _, true) => "out",
            _ => "-",
        };
        writeln!(
            out,
            "{:<width$}  {:<10}  {:<12}  {:>14}  {:<5}  {:<40}  {}",
            e.name,
            e.kind,
            e.units,
            e.value,
            role,
            e.active_producer.as_deref().unwrap_or("-"),
            e.label
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EquationSpec, ModelBuilder, Roles, Value, VariableSpec};
    use ff_core::UnitTriple;

    #[test]
    fn dump_lists_every_variable() {
        let mut b = ModelBuilder::new();
        let x = b.register_variable(VariableSpec::continuous(
            "vX",
            "Input x",
            1.5,
            (0.0, 10.0),
            UnitTriple::new(("ft", 1), ("ft", 1), ("m", 2)),
        ));
        b.register_variable(VariableSpec::discrete("vPick", "Pick", &[("a", "A"), ("b", "B")]));
        b.register_variable(VariableSpec::continuous(
            "vY",
            "Output y",
            0.0,
            (0.0, 100.0),
            UnitTriple::uniform("ratio", 0),
        ));
        b.register_equation(EquationSpec::new(
            "fY",
            "t",
            &["vX"],
            &["vY"],
            |i: &[Value]| -> crate::ComputationResult<Vec<Value>> { Ok(vec![i[0].clone()]) },
        ));
        let mut m = b.build();
        m.set_roles(x, Roles::INPUT);

        let entries = catalog_entries(&m);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].value, "1.5");
        assert_eq!(entries[0].units, "ft");
        assert_eq!(entries[1].value, "a");
        assert_eq!(entries[2].active_producer.as_deref(), Some("fY"));

        let mut buf = Vec::new();
        write_catalog(&m, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("vPick"));
    }
}
