//! Maximum spotting distance over flat terrain.
//!
//! Two alternate producers share the same outputs: firebrands lofted by
//! torching trees, or by a surface fire's plume. Either way the drift
//! distance follows Albini's flat-terrain relation
//! `D (mi) = 0.000718 * U (mi/h) * sqrt(z (ft))`.

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::KW_M_PER_BTU_FT_S;
use crate::names::*;

const DRIFT_COEFF: Real = 0.000_718;
/// Albini (1979) plume lofting coefficient (m per (kW/m)^0.4).
const LOFTING_COEFF: Real = 12.2;
const FT_PER_M: Real = 1.0 / 0.3048;

pub fn drift_distance(wind_20ft: Real, firebrand_ht: Real) -> Real {
    DRIFT_COEFF * wind_20ft * firebrand_ht.max(0.0).sqrt()
}

/// Firebrand height (ft) from a group of torching trees.
pub fn torching_firebrand_ht(trees: Real, tree_ht: Real) -> ComputationResult<Real> {
    if trees < 1.0 {
        return Err(ComputationError::invalid("at least one torching tree is required"));
    }
    if tree_ht <= 0.0 {
        return Err(ComputationError::invalid("non-positive tree height"));
    }
    Ok(3.0 * tree_ht * trees.powf(0.4))
}

/// Firebrand height (ft) from a surface fire of the given flame length (ft).
pub fn surface_firebrand_ht(flame_length: Real) -> Real {
    if flame_length <= 0.0 {
        return 0.0;
    }
    // Invert Byram's flame length for intensity, then loft in SI.
    let intensity = (flame_length / 0.45).powf(1.0 / 0.46) * KW_M_PER_BTU_FT_S;
    LOFTING_COEFF * intensity.powf(0.4) * FT_PER_M
}

fn check_wind(wind: Real) -> ComputationResult<Real> {
    if wind < 0.0 {
        Err(ComputationError::invalid("negative 20-ft wind speed"))
    } else {
        Ok(wind)
    }
}

fn torching(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 3)?;
    let z = torching_firebrand_ht(number_at(inputs, 0)?, number_at(inputs, 1)?)?;
    let wind = check_wind(number_at(inputs, 2)?)?;
    Ok(vec![Value::Number(z), Value::Number(drift_distance(wind, z))])
}

fn surface_fire(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let z = surface_firebrand_ht(number_at(inputs, 0)?);
    let wind = check_wind(number_at(inputs, 1)?)?;
    Ok(vec![Value::Number(z), Value::Number(drift_distance(wind, z))])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_SPOT_TORCHING_TREES,
        MOD_SPOT,
        &[V_SPOT_TORCHING_TREES, V_TREE_HT, V_WIND_AT_20FT],
        &[V_SPOT_FIREBRAND_HT, V_SPOT_DIST_FLAT],
        torching,
    ));
    b.register_equation(EquationSpec::new(
        F_SPOT_SURFACE_FIRE,
        MOD_SPOT,
        &[V_FLAME_LENG_AT_HEAD, V_WIND_AT_20FT],
        &[V_SPOT_FIREBRAND_HT, V_SPOT_DIST_FLAT],
        surface_fire,
    ));
}
