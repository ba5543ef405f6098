//! Crown fire initiation (Van Wagner 1977).

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::KW_M_PER_BTU_FT_S;
use crate::names::*;

const M_PER_FT: Real = 0.3048;

pub const TRANS_NO: usize = 0;
pub const TRANS_YES: usize = 1;

pub fn transition_items() -> [(&'static str, &'static str); 2] {
    [("No", "Surface fire stays on the surface"), ("Yes", "Surface fire transitions to the crown")]
}

/// Critical surface fireline intensity (Btu/ft/s) for crown ignition.
///
/// `I0 = (0.010 * CBH * (460 + 25.9 * FMC))^1.5` with CBH in m, FMC in percent.
pub fn critical_intensity(base_ht: Real, foliar_mois: Real) -> ComputationResult<Real> {
    if base_ht <= 0.0 {
        return Err(ComputationError::invalid("non-positive canopy base height"));
    }
    if foliar_mois <= 0.0 {
        return Err(ComputationError::invalid("non-positive foliar moisture"));
    }
    let kw_m = (0.010 * base_ht * M_PER_FT * (460.0 + 25.9 * foliar_mois * 100.0)).powf(1.5);
    Ok(kw_m / KW_M_PER_BTU_FT_S)
}

fn crit_int(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let i0 = critical_intensity(number_at(inputs, 0)?, number_at(inputs, 1)?)?;
    Ok(vec![Value::Number(i0)])
}

fn trans_ratio(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let surface = number_at(inputs, 0)?;
    let critical = number_at(inputs, 1)?;
    if critical <= 0.0 {
        return Err(ComputationError::invalid("non-positive critical intensity"));
    }
    let ratio = surface / critical;
    let trans = if ratio >= 1.0 { TRANS_YES } else { TRANS_NO };
    Ok(vec![Value::Number(ratio), Value::Item(trans)])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_CROWN_CRIT_INT,
        MOD_CROWN,
        &[V_CANOPY_BASE_HT, V_FOLIAR_MOIS],
        &[V_CROWN_CRIT_INT],
        crit_int,
    ));
    b.register_equation(EquationSpec::new(
        F_CROWN_TRANS_RATIO,
        MOD_CROWN,
        &[V_LINE_INT_AT_HEAD, V_CROWN_CRIT_INT],
        &[V_CROWN_TRANS_RATIO, V_CROWN_TRANS_TO_CROWN],
        trans_ratio,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_canopy_needs_more_intensity() {
        let low = critical_intensity(5.0, 1.0).unwrap();
        let high = critical_intensity(20.0, 1.0).unwrap();
        assert!(high > low);
        assert!(critical_intensity(0.0, 1.0).is_err());
    }

    #[test]
    fn transition_flag_follows_ratio() {
        let out = trans_ratio(&[Value::Number(200.0), Value::Number(100.0)]).unwrap();
        assert_eq!(out, vec![Value::Number(2.0), Value::Item(TRANS_YES)]);
        let out = trans_ratio(&[Value::Number(50.0), Value::Number(100.0)]).unwrap();
        assert_eq!(out[1], Value::Item(TRANS_NO));
    }
}
