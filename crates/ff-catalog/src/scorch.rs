//! Crown scorch height (Van Wagner 1973, English form).

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::names::*;

/// Scorch height (ft) from fireline intensity (Btu/ft/s), midflame wind (mi/h)
/// and air temperature (oF).
pub fn scorch_height(line_int: Real, wind: Real, air_temp: Real) -> ComputationResult<Real> {
    if air_temp >= 140.0 {
        return Err(ComputationError::invalid("air temperature at or above lethal 140 oF"));
    }
    if wind < 0.0 {
        return Err(ComputationError::invalid("negative midflame wind speed"));
    }
    if line_int <= 0.0 {
        return Ok(0.0);
    }
    Ok(63.0 / (140.0 - air_temp) * line_int.powf(7.0 / 6.0) / (line_int + wind.powi(3)).sqrt())
}

fn scorch(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 3)?;
    let hs = scorch_height(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
    )?;
    Ok(vec![Value::Number(hs)])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_SCORCH_HT,
        MOD_SCORCH,
        &[V_LINE_INT_AT_HEAD, V_WIND_AT_MIDFLAME, V_AIR_TEMP],
        &[V_SCORCH_HT],
        scorch,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_cools_the_plume() {
        let calm = scorch_height(100.0, 0.0, 77.0).unwrap();
        let windy = scorch_height(100.0, 10.0, 77.0).unwrap();
        assert!(windy < calm);
        assert_eq!(scorch_height(0.0, 0.0, 77.0).unwrap(), 0.0);
        assert!(scorch_height(100.0, 0.0, 150.0).is_err());
    }
}
