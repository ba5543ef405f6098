use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ff_catalog::names::*;
use ff_project::{AxisDef, InputValue, Worksheet};

pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// Surface spread swept over midflame wind (rows) and fuel model (columns).
pub fn surface_sheet() -> Worksheet {
    let mut ws = Worksheet::new("Grass and brush");
    ws.options.set("module-surface", true);
    ws.options.set("wind-at-midflame", true);
    ws.options.set("output-spread-rate", true);
    ws.options.set("output-flame-length", true);
    ws.inputs.insert(V_MOIS_DEAD1.to_string(), InputValue::Number(5.0));
    ws.ranges.row = Some(AxisDef::stepped(V_WIND_AT_MIDFLAME, 0.0, 10.0, 5.0));
    ws.ranges.column = Some(AxisDef::listed(
        V_FUEL_MODEL,
        vec![InputValue::Number(1.0), InputValue::Number(4.0)],
    ));
    ws
}

/// Initial attack on a fire sized by the surface module, with the crew
/// trajectory diagram.
pub fn contain_sheet() -> Worksheet {
    let mut ws = Worksheet::new("Initial attack");
    ws.options.set("module-contain", true);
    ws.options.set("output-contain-status", true);
    ws.options.set("output-contain-line", true);
    ws.options.set("diagram-contain", true);
    ws.ranges.row = Some(AxisDef::listed(
        V_CONTAIN_LINE_PROD_RATE,
        vec![InputValue::Number(20.0), InputValue::Number(60.0)],
    ));
    ws
}

/// Save `worksheet` as YAML in a fresh directory and return its path.
pub fn write_sheet(prefix: &str, worksheet: &Worksheet) -> PathBuf {
    let dir = unique_temp_dir(prefix);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("worksheet.yaml");
    ff_project::save_yaml(&path, worksheet).unwrap();
    path
}
