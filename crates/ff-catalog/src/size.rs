//! Elliptical fire size after a given elapsed time.

use std::f64::consts::PI;

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::names::*;

pub const FT2_PER_ACRE: Real = 43_560.0;

pub fn spread_at_back(head: Real, eccentricity: Real) -> Real {
    head * (1.0 - eccentricity) / (1.0 + eccentricity)
}

/// Ramanujan's perimeter approximation for semi-axes `a`, `b`.
pub fn ellipse_perimeter(a: Real, b: Real) -> Real {
    PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt())
}

/// Ellipse area in acres for overall length `length` (ft).
pub fn ellipse_area_acres(length: Real, length_to_width: Real) -> Real {
    let width = length / length_to_width;
    PI * length * width / 4.0 / FT2_PER_ACRE
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireShape {
    pub dist_at_head: Real,
    pub dist_at_back: Real,
    pub length: Real,
    pub width: Real,
    /// ac
    pub area: Real,
    pub perimeter: Real,
}

pub fn fire_shape(
    head: Real,
    back: Real,
    length_to_width: Real,
    elapsed: Real,
) -> ComputationResult<FireShape> {
    if elapsed < 0.0 {
        return Err(ComputationError::invalid("negative elapsed time"));
    }
    if length_to_width < 1.0 {
        return Err(ComputationError::invalid("length-to-width ratio below 1"));
    }
    let dist_at_head = head * elapsed;
    let dist_at_back = back * elapsed;
    let length = dist_at_head + dist_at_back;
    let width = length / length_to_width;
    Ok(FireShape {
        dist_at_head,
        dist_at_back,
        length,
        width,
        area: ellipse_area_acres(length, length_to_width),
        perimeter: ellipse_perimeter(0.5 * length, 0.5 * width),
    })
}

fn back(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let rate = spread_at_back(number_at(inputs, 0)?, number_at(inputs, 1)?);
    Ok(vec![Value::Number(rate)])
}

fn shape(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 4)?;
    let s = fire_shape(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
    )?;
    Ok(vec![
        Value::Number(s.dist_at_head),
        Value::Number(s.dist_at_back),
        Value::Number(s.length),
        Value::Number(s.width),
        Value::Number(s.area),
        Value::Number(s.perimeter),
    ])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_SPREAD_AT_BACK,
        MOD_SIZE,
        &[V_SPREAD_AT_HEAD, V_ECCENTRICITY],
        &[V_SPREAD_AT_BACK],
        back,
    ));
    b.register_equation(EquationSpec::new(
        F_FIRE_SHAPE,
        MOD_SIZE,
        &[V_SPREAD_AT_HEAD, V_SPREAD_AT_BACK, V_LENGTH_TO_WIDTH, V_ELAPSED_TIME],
        &[
            V_DIST_AT_HEAD,
            V_DIST_AT_BACK,
            V_FIRE_LENGTH,
            V_FIRE_WIDTH,
            V_FIRE_AREA,
            V_FIRE_PERIMETER,
        ],
        shape,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_when_no_wind() {
        let s = fire_shape(1.0, 1.0, 1.0, 60.0).unwrap();
        assert_eq!(s.length, 120.0);
        assert_eq!(s.width, 120.0);
        assert!((s.perimeter - PI * 120.0).abs() < 1e-9);
        assert!((s.area * FT2_PER_ACRE - PI * 60.0 * 60.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_shape() {
        assert!(fire_shape(1.0, 0.5, 0.5, 10.0).is_err());
        assert!(fire_shape(1.0, 0.5, 2.0, -1.0).is_err());
    }

    #[test]
    fn back_spread_is_slower() {
        assert!(spread_at_back(10.0, 0.8) < 10.0);
        assert_eq!(spread_at_back(10.0, 0.0), 10.0);
    }
}
