//! Values carried by variables and passed to computations.

use ff_core::Real;
use serde::{Deserialize, Serialize};

use crate::error::{ComputationError, ComputationResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Continuous quantity in native units.
    Number(Real),
    /// Index into a discrete variable's item list.
    Item(usize),
    Text(String),
    /// Ordered `(x, y)` trajectory points.
    Path(Vec<(Real, Real)>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Item(_) => "item",
            Value::Text(_) => "text",
            Value::Path(_) => "path",
        }
    }

    pub fn as_number(&self) -> Option<Real> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<usize> {
        match self {
            Value::Item(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&[(Real, Real)]> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// Read input `index` as a number, for use inside computations.
pub fn number_at(inputs: &[Value], index: usize) -> ComputationResult<Real> {
    match inputs.get(index) {
        Some(Value::Number(v)) => Ok(*v),
        Some(other) => Err(ComputationError::WrongInputType {
            index,
            expected: "number",
            found: other.kind_name(),
        }),
        None => Err(ComputationError::Arity {
            expected: index + 1,
            found: inputs.len(),
        }),
    }
}

/// Read input `index` as a discrete item index.
pub fn item_at(inputs: &[Value], index: usize) -> ComputationResult<usize> {
    match inputs.get(index) {
        Some(Value::Item(i)) => Ok(*i),
        Some(other) => Err(ComputationError::WrongInputType {
            index,
            expected: "item",
            found: other.kind_name(),
        }),
        None => Err(ComputationError::Arity {
            expected: index + 1,
            found: inputs.len(),
        }),
    }
}

/// Fail unless exactly `expected` inputs were supplied.
pub fn expect_arity(inputs: &[Value], expected: usize) -> ComputationResult<()> {
    if inputs.len() == expected {
        Ok(())
    } else {
        Err(ComputationError::Arity {
            expected,
            found: inputs.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let inputs = vec![Value::Number(2.0), Value::Item(3)];
        assert_eq!(number_at(&inputs, 0).unwrap(), 2.0);
        assert_eq!(item_at(&inputs, 1).unwrap(), 3);
        assert!(matches!(
            number_at(&inputs, 1),
            Err(ComputationError::WrongInputType { index: 1, .. })
        ));
        assert!(matches!(
            number_at(&inputs, 5),
            Err(ComputationError::Arity { .. })
        ));
        assert!(expect_arity(&inputs, 2).is_ok());
    }
}
