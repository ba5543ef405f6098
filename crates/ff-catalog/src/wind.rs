//! Wind and site geometry.

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::names::*;

/// 10-m open wind over 20-ft wind.
const TEN_METER_TO_TWENTY_FOOT: Real = 1.15;
/// Crown fill fraction below which the fuel is treated as unsheltered.
const SHELTER_THRESHOLD: Real = 0.05;

/// Wind adjustment factor from 20-ft to midflame height.
///
/// Unsheltered fuel uses the bed depth, sheltered fuel the canopy height
/// and crown fill fraction (Albini & Baughman 1979).
pub fn wind_adj_factor(
    canopy_cover: Real,
    canopy_ht: Real,
    crown_ratio: Real,
    fuel_depth: Real,
) -> ComputationResult<Real> {
    if !(0.0..=1.0).contains(&canopy_cover) || !(0.0..=1.0).contains(&crown_ratio) {
        return Err(ComputationError::invalid("canopy fractions must lie in [0, 1]"));
    }
    let fill = canopy_cover * crown_ratio / 3.0;
    let factor = if fill <= SHELTER_THRESHOLD {
        if fuel_depth <= 0.0 {
            return Err(ComputationError::invalid("non-positive fuel bed depth"));
        }
        1.83 / ((20.0 + 0.36 * fuel_depth) / (0.13 * fuel_depth)).ln()
    } else {
        if canopy_ht <= 0.0 {
            return Err(ComputationError::invalid("non-positive canopy height"));
        }
        0.555 / ((fill * canopy_ht).sqrt() * ((20.0 + 0.36 * canopy_ht) / (0.13 * canopy_ht)).ln())
    };
    Ok(factor.clamp(0.0, 1.0))
}

/// Direction the wind blows toward, measured clockwise from upslope.
///
/// Aspect is the downslope direction, so upslope is `aspect + 180`.
pub fn wind_dir_from_upslope(wind_from_north: Real, aspect: Real) -> Real {
    (wind_from_north - aspect - 180.0).rem_euclid(360.0)
}

pub fn slope_fraction(degrees: Real) -> ComputationResult<Real> {
    if !(0.0..90.0).contains(&degrees) {
        return Err(ComputationError::invalid("slope must lie in [0, 90) degrees"));
    }
    Ok(degrees.to_radians().tan())
}

fn adj_factor(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 4)?;
    let waf = wind_adj_factor(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
    )?;
    Ok(vec![Value::Number(waf)])
}

fn midflame(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let twenty = number_at(inputs, 0)?;
    let waf = number_at(inputs, 1)?;
    if twenty < 0.0 {
        return Err(ComputationError::invalid("negative 20-ft wind speed"));
    }
    Ok(vec![Value::Number(twenty * waf)])
}

fn twenty_foot(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 1)?;
    Ok(vec![Value::Number(number_at(inputs, 0)? / TEN_METER_TO_TWENTY_FOOT)])
}

fn dir_from_upslope(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let dir = wind_dir_from_upslope(number_at(inputs, 0)?, number_at(inputs, 1)?);
    Ok(vec![Value::Number(dir)])
}

fn slope(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 1)?;
    Ok(vec![Value::Number(slope_fraction(number_at(inputs, 0)?)?)])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_WIND_ADJ_FACTOR,
        MOD_SURFACE,
        &[V_CANOPY_COVER, V_TREE_HT, V_CROWN_RATIO, V_FUEL_DEPTH],
        &[V_WIND_ADJ_FACTOR],
        adj_factor,
    ));
    b.register_equation(EquationSpec::new(
        F_WIND_AT_MIDFLAME,
        MOD_SURFACE,
        &[V_WIND_AT_20FT, V_WIND_ADJ_FACTOR],
        &[V_WIND_AT_MIDFLAME],
        midflame,
    ));
    b.register_equation(EquationSpec::new(
        F_WIND_AT_20FT,
        MOD_SURFACE,
        &[V_WIND_AT_10M],
        &[V_WIND_AT_20FT],
        twenty_foot,
    ));
    b.register_equation(EquationSpec::new(
        F_WIND_DIR_FROM_UPSLOPE,
        MOD_SURFACE,
        &[V_WIND_DIR_FROM_NORTH, V_SITE_ASPECT],
        &[V_WIND_DIR_FROM_UPSLOPE],
        dir_from_upslope,
    ));
    b.register_equation(EquationSpec::new(
        F_SLOPE_FRACTION,
        MOD_SURFACE,
        &[V_SLOPE_DEGREES],
        &[V_SLOPE_FRACTION],
        slope,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsheltered_factor_depends_on_depth() {
        let shallow = wind_adj_factor(0.0, 0.0, 0.0, 1.0).unwrap();
        let deep = wind_adj_factor(0.0, 0.0, 0.0, 6.0).unwrap();
        assert!((shallow - 0.362).abs() < 0.01);
        assert!(deep > shallow);
    }

    #[test]
    fn sheltered_factor_is_smaller() {
        let open = wind_adj_factor(0.0, 60.0, 0.5, 1.0).unwrap();
        let sheltered = wind_adj_factor(0.5, 60.0, 0.5, 1.0).unwrap();
        assert!(sheltered < open);
        assert!(wind_adj_factor(0.5, 0.0, 0.5, 1.0).is_err());
    }

    #[test]
    fn geometry() {
        assert_eq!(wind_dir_from_upslope(180.0, 0.0), 0.0);
        assert_eq!(wind_dir_from_upslope(90.0, 0.0), 270.0);
        assert!((slope_fraction(45.0).unwrap() - 1.0).abs() < 1e-12);
        assert!(slope_fraction(90.0).is_err());
    }
}
