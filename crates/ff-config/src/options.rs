//! The string-keyed configuration option map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One option value. Worksheets write plain scalars; serde picks the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl OptionValue {
    /// Truthiness used for boolean switches.
    pub fn is_set(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Int(i) => *i != 0,
            OptionValue::Float(f) => *f != 0.0,
            OptionValue::Text(t) => matches!(
                t.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "on" | "1"
            ),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

/// Full option set, supplied wholesale before each reconcile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigOptions(BTreeMap<String, OptionValue>);

impl ConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Builder-style `set(name, true)`.
    pub fn with(mut self, name: &str) -> Self {
        self.set(name, true);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.0.get(name)
    }

    /// True when the option is present and truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(OptionValue::is_set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for ConfigOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        let opts: ConfigOptions = [
            ("a", OptionValue::Bool(true)),
            ("b", OptionValue::Int(0)),
            ("c", OptionValue::Text("Yes".into())),
            ("d", OptionValue::Float(0.5)),
        ]
        .into_iter()
        .collect();
        assert!(opts.is_set("a"));
        assert!(!opts.is_set("b"));
        assert!(opts.is_set("c"));
        assert!(opts.is_set("d"));
        assert!(!opts.is_set("missing"));
    }

    #[test]
    fn scalars_deserialize_untagged() {
        let opts: ConfigOptions =
            serde_json::from_str(r#"{"x": true, "y": 3, "z": 2.5, "w": "on"}"#).unwrap();
        assert_eq!(opts.get("x"), Some(&OptionValue::Bool(true)));
        assert_eq!(opts.get("y"), Some(&OptionValue::Int(3)));
        assert_eq!(opts.get("z"), Some(&OptionValue::Float(2.5)));
        assert!(opts.is_set("w"));
    }
}
