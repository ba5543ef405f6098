//! Worksheet schema definitions.

use std::collections::BTreeMap;

use ff_config::ConfigOptions;
use ff_core::UnitSystem;
use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;
pub const DEFAULT_MAX_RANGE_STEPS: usize = 20;

/// One worksheet: options, inputs and range axes for a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Worksheet {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display system the input values are written in.
    #[serde(default)]
    pub units: UnitSystem,
    #[serde(default)]
    pub options: ConfigOptions,
    #[serde(default)]
    pub inputs: BTreeMap<String, InputValue>,
    #[serde(default)]
    pub ranges: RangesDef,
    #[serde(default = "default_max_range_steps")]
    pub max_range_steps: usize,
}

fn default_max_range_steps() -> usize {
    DEFAULT_MAX_RANGE_STEPS
}

impl Worksheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            description: None,
            units: UnitSystem::default(),
            options: ConfigOptions::default(),
            inputs: BTreeMap::new(),
            ranges: RangesDef::default(),
            max_range_steps: DEFAULT_MAX_RANGE_STEPS,
        }
    }
}

/// An input value: a number in display units, or a discrete item code or text.
///
/// Discrete codes that look numeric (fuel model `4`) arrive as numbers;
/// the run service maps them back to codes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum InputValue {
    Number(f64),
    Text(String),
}

impl InputValue {
    /// Discrete item code spelled by this value.
    pub fn as_code(&self) -> String {
        match self {
            InputValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            InputValue::Number(n) => n.to_string(),
            InputValue::Text(t) => t.clone(),
        }
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Number(value)
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RangesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<AxisDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<AxisDef>,
}

/// A range axis: either an explicit value list or `start`/`stop`/`step`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisDef {
    pub variable: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl AxisDef {
    pub fn listed(variable: impl Into<String>, values: Vec<InputValue>) -> Self {
        Self {
            variable: variable.into(),
            values,
            start: None,
            stop: None,
            step: None,
        }
    }

    pub fn stepped(variable: impl Into<String>, start: f64, stop: f64, step: f64) -> Self {
        Self {
            variable: variable.into(),
            values: Vec::new(),
            start: Some(start),
            stop: Some(stop),
            step: Some(step),
        }
    }

    /// `(start, stop, step)` when all three are given.
    pub fn steps(&self) -> Option<(f64, f64, f64)> {
        Some((self.start?, self.stop?, self.step?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code_reads_back_as_code() {
        assert_eq!(InputValue::Number(4.0).as_code(), "4");
        assert_eq!(InputValue::Text("GR2".into()).as_code(), "GR2");
    }

    #[test]
    fn minimal_yaml_takes_defaults() {
        let ws: Worksheet = serde_yaml::from_str("version: 1\nname: quick\n").unwrap();
        assert_eq!(ws.units, UnitSystem::English);
        assert_eq!(ws.max_range_steps, DEFAULT_MAX_RANGE_STEPS);
        assert!(ws.ranges.row.is_none());
    }

    #[test]
    fn axis_forms_parse() {
        let yaml = "
version: 1
name: axes
ranges:
  row: { variable: vWindSpeedAtMidflame, start: 0, stop: 10, step: 2 }
  column: { variable: vSurfaceFuelBedModel, values: [1, 4, 'GR2'] }
";
        let ws: Worksheet = serde_yaml::from_str(yaml).unwrap();
        let row = ws.ranges.row.unwrap();
        assert_eq!(row.steps(), Some((0.0, 10.0, 2.0)));
        let column = ws.ranges.column.unwrap();
        assert_eq!(column.values.len(), 3);
        assert_eq!(column.values[2], InputValue::Text("GR2".into()));
    }
}
