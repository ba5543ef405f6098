//! Probability of ignition from firebrands (Schroeder 1969).

use ff_core::{Real, convert};
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::names::*;

/// Fuel surface heating above air temperature in full sun (oF).
const FULL_SUN_HEATING: Real = 25.0;

/// Fuel temperature (oF) from air temperature (oF) and sun shading (fraction).
pub fn fuel_temperature(air_temp: Real, shading: Real) -> ComputationResult<Real> {
    if !(0.0..=1.0).contains(&shading) {
        return Err(ComputationError::invalid("sun shading must lie in [0, 1]"));
    }
    Ok(air_temp + FULL_SUN_HEATING * (1.0 - shading))
}

/// Ignition probability (fraction) for fine dead fuel at the given
/// temperature (oF) and moisture (fraction).
pub fn firebrand_probability(fuel_temp: Real, mois: Real) -> ComputationResult<Real> {
    if mois < 0.0 {
        return Err(ComputationError::invalid("negative fuel moisture"));
    }
    let tc = convert(fuel_temp, "oF", "oC")
        .map_err(|err| ComputationError::invalid(err.to_string()))?;
    // Heat of ignition (cal/g).
    let q_ig = 144.512 - 0.266 * tc - 0.000_58 * tc * tc - tc * mois
        + 18.54 * (1.0 - (-15.1 * mois).exp())
        + 640.0 * mois;
    let x = (400.0 - q_ig) / 10.0;
    if x <= 0.0 {
        return Ok(0.0);
    }
    Ok((0.000_048 * x.powf(4.3) / 50.0).clamp(0.0, 1.0))
}

fn fuel_temp(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let t = fuel_temperature(number_at(inputs, 0)?, number_at(inputs, 1)?)?;
    Ok(vec![Value::Number(t)])
}

fn probability(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let p = firebrand_probability(number_at(inputs, 0)?, number_at(inputs, 1)?)?;
    Ok(vec![Value::Number(p)])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_IGNITE_FUEL_TEMP,
        MOD_IGNITE,
        &[V_AIR_TEMP, V_SUN_SHADING],
        &[V_IGNITE_FUEL_TEMP],
        fuel_temp,
    ));
    b.register_equation(EquationSpec::new(
        F_IGNITE_PROB,
        MOD_IGNITE,
        &[V_IGNITE_FUEL_TEMP, V_MOIS_DEAD1],
        &[V_IGNITE_PROB],
        probability,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_hot_fuel_ignites_more_readily() {
        let dry = firebrand_probability(95.0, 0.03).unwrap();
        let damp = firebrand_probability(95.0, 0.15).unwrap();
        assert!(dry > damp);
        assert!((0.0..=1.0).contains(&dry));
    }

    #[test]
    fn shading_lowers_fuel_temperature() {
        assert_eq!(fuel_temperature(80.0, 1.0).unwrap(), 80.0);
        assert_eq!(fuel_temperature(80.0, 0.0).unwrap(), 105.0);
        assert!(fuel_temperature(80.0, 1.5).is_err());
    }
}
