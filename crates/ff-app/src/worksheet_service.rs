//! Worksheet loading and model preparation.
//!
//! Turns a worksheet into a reconciled catalog model with its inputs
//! applied, the range axes expanded and the output columns described.

use std::path::Path;

use ff_config::{Diagnostic, Reconciler, Reconciliation};
use ff_core::{UnitSpec, UnitSystem, VarId};
use ff_graph::{Model, Value, VariableKind, validate_active};
use ff_project::schema::{AxisDef, InputValue, Worksheet};
use ff_results::{AxisInfo, ColumnDef};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::range::{RangeAxis, stepped_values};

/// Load and validate a worksheet (YAML or JSON, by extension).
pub fn load_worksheet(path: &Path) -> AppResult<Worksheet> {
    if !path.exists() {
        return Err(AppError::WorksheetFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    let worksheet = ff_project::load(path)?;
    debug!(name = %worksheet.name, path = %path.display(), "worksheet loaded");
    Ok(worksheet)
}

/// Check every input and axis name against the catalog.
pub fn check_names(worksheet: &Worksheet) -> AppResult<()> {
    let model = ff_catalog::build_model();
    let axes = [&worksheet.ranges.row, &worksheet.ranges.column];
    let names = worksheet
        .inputs
        .keys()
        .map(String::as_str)
        .chain(axes.into_iter().flatten().map(|a| a.variable.as_str()));
    for name in names {
        if model.lookup_variable(name).is_none() {
            return Err(AppError::InvalidInput(format!("unknown variable: {name}")));
        }
    }
    let reconciler = Reconciler::new(&model)?;
    for (name, _) in worksheet.options.iter() {
        if !reconciler.is_known_option(name) {
            warn!(option = name, "unknown option");
        }
    }
    Ok(())
}

/// A reconciled model ready for the range table runner.
pub struct PreparedRun {
    pub model: Model,
    pub reconciliation: Reconciliation,
    pub rows: RangeAxis,
    pub cols: RangeAxis,
    pub columns: Vec<ColumnDef>,
    pub row_axis: Option<AxisInfo>,
    pub col_axis: Option<AxisInfo>,
}

/// Build the catalog, reconcile it against the worksheet's options and
/// apply its inputs and axes.
pub fn prepare(worksheet: &Worksheet) -> AppResult<PreparedRun> {
    let mut model = ff_catalog::build_model();
    model.set_unit_system(worksheet.units);

    let reconciliation = Reconciler::new(&model)?.reconcile(&mut model, &worksheet.options)?;
    validate_active(&model)?;
    if reconciliation.outputs.is_empty() {
        warn!(worksheet = %worksheet.name, "no outputs requested");
    }

    apply_inputs(&mut model, worksheet)?;

    let rows = build_axis(&model, worksheet, worksheet.ranges.row.as_ref())?;
    let cols = build_axis(&model, worksheet, worksheet.ranges.column.as_ref())?;
    let row_axis = axis_info(&model, worksheet.units, &rows)?;
    let col_axis = axis_info(&model, worksheet.units, &cols)?;
    let columns = reconciliation
        .outputs
        .iter()
        .map(|&var| column_def(&model, worksheet.units, var))
        .collect();

    info!(
        outputs = reconciliation.outputs.len(),
        rows = rows.len(),
        cols = cols.len(),
        "worksheet prepared"
    );
    Ok(PreparedRun {
        model,
        reconciliation,
        rows,
        cols,
        columns,
        row_axis,
        col_axis,
    })
}

/// Apply the worksheet's single-valued inputs. Values are in the
/// worksheet's display units; inputs the configuration did not ask for are
/// skipped.
pub fn apply_inputs(model: &mut Model, worksheet: &Worksheet) -> AppResult<()> {
    for (name, value) in &worksheet.inputs {
        let var = model
            .lookup_variable(name)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown variable: {name}")))?;
        if !model.variable(var).roles.user_input {
            warn!(variable = %name, "not an input under this configuration; ignored");
            continue;
        }
        let native = native_value(model, var, value, worksheet.units)?;
        match native {
            Some(v) => model.assign(var, v)?,
            None => model.assign_code(var, &value.as_code())?,
        }
    }
    Ok(())
}

/// A worksheet value in native units. `None` for discrete variables, which
/// are assigned by item code.
fn native_value(
    model: &Model,
    var: VarId,
    value: &InputValue,
    system: UnitSystem,
) -> AppResult<Option<Value>> {
    let variable = model.variable(var);
    match &variable.kind {
        VariableKind::Continuous(c) => {
            let shown = match value {
                InputValue::Number(n) => *n,
                InputValue::Text(t) => t.trim().parse().map_err(|_| {
                    AppError::InvalidInput(format!("{}: expected a number, got {t:?}", variable.name))
                })?,
            };
            Ok(Some(Value::Number(c.units.from_display(shown, system)?)))
        }
        VariableKind::Discrete(_) => Ok(None),
        VariableKind::Text { .. } => Ok(Some(Value::Text(value.as_code()))),
        VariableKind::Path { .. } => Err(AppError::InvalidInput(format!(
            "{} cannot be entered",
            variable.name
        ))),
    }
}

fn build_axis(model: &Model, worksheet: &Worksheet, def: Option<&AxisDef>) -> AppResult<RangeAxis> {
    let Some(def) = def else {
        return Ok(RangeAxis::None);
    };
    let var = model
        .lookup_variable(&def.variable)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown variable: {}", def.variable)))?;
    let variable = model.variable(var);
    if !variable.roles.user_input || !model.is_leaf(var) {
        return Err(AppError::InvalidInput(format!(
            "range variable {} is not an input under this configuration",
            def.variable
        )));
    }

    match &variable.kind {
        VariableKind::Discrete(d) => {
            let mut items = Vec::with_capacity(def.values.len());
            for value in &def.values {
                let code = value.as_code();
                let index = d.position_of(&code).ok_or_else(|| {
                    AppError::InvalidInput(format!("{}: no item with code {code:?}", def.variable))
                })?;
                items.push(index);
            }
            if items.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "range on {} needs explicit item codes",
                    def.variable
                )));
            }
            Ok(RangeAxis::Discrete { var, items })
        }
        VariableKind::Continuous(c) => {
            let shown: Vec<f64> = match def.steps() {
                Some((start, stop, step)) => {
                    stepped_values(start, stop, step, worksheet.max_range_steps)
                }
                None => def
                    .values
                    .iter()
                    .map(|v| match v {
                        InputValue::Number(n) => Ok(*n),
                        InputValue::Text(t) => t.trim().parse().map_err(|_| {
                            AppError::InvalidInput(format!(
                                "{}: expected a number, got {t:?}",
                                def.variable
                            ))
                        }),
                    })
                    .collect::<AppResult<_>>()?,
            };
            let values = shown
                .into_iter()
                .map(|v| c.units.from_display(v, worksheet.units))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RangeAxis::Continuous { var, values })
        }
        _ => Err(AppError::InvalidInput(format!(
            "range variable {} is neither continuous nor discrete",
            def.variable
        ))),
    }
}

/// Axis labels in display units (continuous) or item codes (discrete).
fn axis_info(model: &Model, system: UnitSystem, axis: &RangeAxis) -> AppResult<Option<AxisInfo>> {
    let Some(var) = axis.var() else {
        return Ok(None);
    };
    let variable = model.variable(var);
    let labels = match (axis, &variable.kind) {
        (RangeAxis::Continuous { values, .. }, VariableKind::Continuous(c)) => {
            let spec = c.units.spec(system);
            values
                .iter()
                .map(|&v| -> AppResult<String> {
                    let shown = c.units.to_display(v, system)?;
                    Ok(format!("{:.*}", spec.decimals as usize, shown))
                })
                .collect::<AppResult<Vec<_>>>()?
        }
        (RangeAxis::Discrete { items, .. }, VariableKind::Discrete(d)) => items
            .iter()
            .map(|&i| d.items.get(i).map(|it| it.code.clone()).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    };
    Ok(Some(AxisInfo {
        variable: variable.name.clone(),
        labels,
    }))
}

fn column_def(model: &Model, system: UnitSystem, var: VarId) -> ColumnDef {
    let variable = model.variable(var);
    let (native, display) = match variable.continuous() {
        Some(c) => (c.units.native.clone(), c.units.spec(system).clone()),
        None => (UnitSpec::new("", 0), UnitSpec::new("", 0)),
    };
    ColumnDef {
        name: variable.name.clone(),
        label: variable.label.clone(),
        native,
        display,
    }
}

/// One variable's line in a configuration report.
#[derive(Debug, Clone, Serialize)]
pub struct RoleEntry {
    pub name: String,
    pub label: String,
    pub role: &'static str,
    pub producer: Option<String>,
}

/// What `configure` prints: the reconciled roles and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationReport {
    pub modules: Vec<&'static str>,
    pub inputs: Vec<RoleEntry>,
    pub constants: Vec<RoleEntry>,
    pub outputs: Vec<RoleEntry>,
    pub supporting: Vec<RoleEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn configuration_report(worksheet: &Worksheet) -> AppResult<ConfigurationReport> {
    let mut model = ff_catalog::build_model();
    model.set_unit_system(worksheet.units);
    let rec = Reconciler::new(&model)?.reconcile(&mut model, &worksheet.options)?;

    let entry = |var: VarId, role: &'static str| {
        let variable = model.variable(var);
        RoleEntry {
            name: variable.name.clone(),
            label: variable.label.clone(),
            role,
            producer: model
                .active_producer(var)
                .map(|eq| model.equation(eq).name.clone()),
        }
    };
    let constants = model
        .variables()
        .iter()
        .filter(|v| v.roles.constant)
        .map(|v| entry(v.id, "constant"))
        .collect();

    Ok(ConfigurationReport {
        modules: rec.modules.clone(),
        inputs: model.user_inputs().into_iter().map(|v| entry(v, "input")).collect(),
        constants,
        outputs: rec.outputs.iter().map(|&v| entry(v, "output")).collect(),
        supporting: rec.supporting.iter().map(|&v| entry(v, "supporting")).collect(),
        diagnostics: rec.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_catalog::names::*;
    use ff_project::schema::AxisDef;

    fn surface_sheet() -> Worksheet {
        let mut ws = Worksheet::new("surface");
        ws.options.set("module-surface", true);
        ws.options.set("wind-at-midflame", true);
        ws.options.set("output-spread-rate", true);
        ws.options.set("output-flame-length", true);
        ws
    }

    #[test]
    fn prepare_applies_display_inputs() {
        let mut ws = surface_sheet();
        ws.units = UnitSystem::Metric;
        ws.inputs.insert(V_WIND_AT_MIDFLAME.to_string(), InputValue::Number(16.0934));
        ws.inputs.insert(V_FUEL_MODEL.to_string(), InputValue::Number(4.0));

        let prepared = prepare(&ws).unwrap();
        let wind = prepared.model.lookup_variable(V_WIND_AT_MIDFLAME).unwrap();
        let native = prepared.model.variable(wind).value().as_number().unwrap();
        assert!((native - 10.0).abs() < 1e-3, "native {native}");

        let fuel = prepared.model.lookup_variable(V_FUEL_MODEL).unwrap();
        let d = prepared.model.variable(fuel).discrete().unwrap();
        assert_eq!(d.selected_item().unwrap().code, "4");

        assert_eq!(prepared.columns.len(), 2);
        assert_eq!(prepared.rows.len(), 1);
    }

    #[test]
    fn unrequested_input_is_ignored() {
        let mut ws = surface_sheet();
        ws.inputs.insert(V_WIND_AT_10M.to_string(), InputValue::Number(30.0));
        let prepared = prepare(&ws).unwrap();
        let wind = prepared.model.lookup_variable(V_WIND_AT_10M).unwrap();
        assert_eq!(prepared.model.variable(wind).value(), Value::Number(0.0));
    }

    #[test]
    fn unknown_input_is_rejected() {
        let mut ws = surface_sheet();
        ws.inputs.insert("vNoSuchThing".to_string(), InputValue::Number(1.0));
        assert!(matches!(prepare(&ws), Err(AppError::InvalidInput(_))));
        assert!(check_names(&ws).is_err());
    }

    #[test]
    fn axes_expand_to_native_values() {
        let mut ws = surface_sheet();
        ws.ranges.row = Some(AxisDef::stepped(V_WIND_AT_MIDFLAME, 0.0, 10.0, 2.5));
        ws.ranges.column = Some(AxisDef::listed(
            V_FUEL_MODEL,
            vec![InputValue::Number(1.0), InputValue::Text("4".to_string())],
        ));
        let prepared = prepare(&ws).unwrap();
        assert_eq!(prepared.rows.len(), 5);
        assert_eq!(prepared.cols.len(), 2);
        let labels = &prepared.col_axis.as_ref().unwrap().labels;
        assert_eq!(labels, &vec!["1".to_string(), "4".to_string()]);
        let row_labels = &prepared.row_axis.as_ref().unwrap().labels;
        assert_eq!(row_labels.first().map(String::as_str), Some("0.0"));
    }

    #[test]
    fn computed_variable_cannot_be_ranged() {
        let mut ws = surface_sheet();
        ws.ranges.row = Some(AxisDef::listed(V_SPREAD_AT_HEAD, vec![InputValue::Number(1.0)]));
        assert!(matches!(prepare(&ws), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn report_lists_roles() {
        let report = configuration_report(&surface_sheet()).unwrap();
        assert_eq!(report.modules, vec![MOD_SURFACE]);
        assert!(report.inputs.iter().any(|e| e.name == V_WIND_AT_MIDFLAME));
        assert!(report.outputs.iter().any(|e| e.name == V_SPREAD_AT_HEAD));
        assert!(report.outputs.iter().all(|e| e.producer.is_some()));
    }
}
