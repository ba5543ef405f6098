//! Worksheet validation logic.
//!
//! Structural checks only; variable names are resolved against the catalog
//! when the run service builds the model.

use crate::schema::{AxisDef, LATEST_VERSION, Worksheet};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate axis variable: {variable}")]
    DuplicateAxis { variable: String },
}

pub fn validate_worksheet(worksheet: &Worksheet) -> Result<(), ValidationError> {
    if worksheet.version == 0 || worksheet.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: worksheet.version,
        });
    }

    if worksheet.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: worksheet.name.clone(),
            reason: "must not be empty".to_string(),
        });
    }

    if worksheet.max_range_steps == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_range_steps".to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    for (name, value) in &worksheet.inputs {
        if let crate::schema::InputValue::Number(n) = value
            && !n.is_finite()
        {
            return Err(ValidationError::InvalidValue {
                field: format!("inputs.{name}"),
                value: n.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    if let Some(row) = &worksheet.ranges.row {
        validate_axis("ranges.row", row)?;
    }
    if let Some(column) = &worksheet.ranges.column {
        validate_axis("ranges.column", column)?;
    }
    if let (Some(row), Some(column)) = (&worksheet.ranges.row, &worksheet.ranges.column)
        && row.variable == column.variable
    {
        return Err(ValidationError::DuplicateAxis {
            variable: row.variable.clone(),
        });
    }

    Ok(())
}

fn validate_axis(field: &str, axis: &AxisDef) -> Result<(), ValidationError> {
    if axis.variable.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: format!("{field}.variable"),
            value: axis.variable.clone(),
            reason: "must not be empty".to_string(),
        });
    }

    let partial = axis.start.is_some() || axis.stop.is_some() || axis.step.is_some();
    match (axis.values.is_empty(), axis.steps()) {
        (false, None) if !partial => Ok(()),
        (true, Some((start, stop, step))) => {
            if !start.is_finite() || !stop.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{field}.start/stop"),
                    value: format!("{start}..{stop}"),
                    reason: "must be finite".to_string(),
                });
            }
            if !step.is_finite() || step <= 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("{field}.step"),
                    value: step.to_string(),
                    reason: "must be positive and finite".to_string(),
                });
            }
            if stop < start {
                return Err(ValidationError::InvalidValue {
                    field: format!("{field}.stop"),
                    value: stop.to_string(),
                    reason: "must not be below start".to_string(),
                });
            }
            Ok(())
        }
        (true, None) => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: axis.variable.clone(),
            reason: "needs a non-empty value list or start, stop and step".to_string(),
        }),
        _ => Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: axis.variable.clone(),
            reason: "give either a value list or start, stop and step, not both".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AxisDef, InputValue};

    fn worksheet() -> Worksheet {
        Worksheet::new("test")
    }

    #[test]
    fn fresh_worksheet_is_valid() {
        validate_worksheet(&worksheet()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut ws = worksheet();
        ws.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_worksheet(&ws),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_blank_name_and_zero_steps() {
        let mut ws = worksheet();
        ws.name = "  ".into();
        assert!(validate_worksheet(&ws).is_err());

        let mut ws = worksheet();
        ws.max_range_steps = 0;
        assert!(validate_worksheet(&ws).is_err());
    }

    #[test]
    fn rejects_bad_steps() {
        let mut ws = worksheet();
        ws.ranges.row = Some(AxisDef::stepped("x", 0.0, 10.0, 0.0));
        assert!(validate_worksheet(&ws).is_err());

        ws.ranges.row = Some(AxisDef::stepped("x", 10.0, 0.0, 1.0));
        assert!(validate_worksheet(&ws).is_err());

        ws.ranges.row = Some(AxisDef::stepped("x", 0.0, 10.0, 2.5));
        validate_worksheet(&ws).unwrap();
    }

    #[test]
    fn rejects_empty_or_mixed_axes() {
        let mut ws = worksheet();
        ws.ranges.row = Some(AxisDef::listed("x", vec![]));
        assert!(validate_worksheet(&ws).is_err());

        let mut mixed = AxisDef::listed("x", vec![InputValue::Number(1.0)]);
        mixed.step = Some(1.0);
        ws.ranges.row = Some(mixed);
        assert!(validate_worksheet(&ws).is_err());
    }

    #[test]
    fn rejects_same_variable_on_both_axes() {
        let mut ws = worksheet();
        ws.ranges.row = Some(AxisDef::listed("x", vec![InputValue::Number(1.0)]));
        ws.ranges.column = Some(AxisDef::listed("x", vec![InputValue::Number(2.0)]));
        assert!(matches!(
            validate_worksheet(&ws),
            Err(ValidationError::DuplicateAxis { .. })
        ));
    }
}
