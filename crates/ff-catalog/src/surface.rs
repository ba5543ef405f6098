//! Surface fire: fuel bed, moisture and a lumped Rothermel spread model.
//!
//! English units throughout: lb/ft2, 1/ft, ft, ft/min, Btu.
//!
//! # References
//! - Rothermel (1972) "A mathematical model for predicting fire spread in wildland fuels"
//! - Albini (1976) "Estimating wildfire behavior and effects"
//! - Byram (1959) flame length from fireline intensity

use ff_core::Real;
use ff_graph::value::{expect_arity, item_at, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::fuel_models::{FuelBed, STANDARD_MODELS};
use crate::names::*;

const HEAT_CONTENT: Real = 8_000.0; // Btu/lb
const PARTICLE_DENSITY: Real = 32.0; // lb/ft3
const TOTAL_MINERAL: Real = 0.0555;
const EFFECTIVE_MINERAL: Real = 0.010;
const LIVE_MEXT_FACTOR: Real = 5.0;
const FT_PER_MIN_PER_MI_PER_H: Real = 88.0;

// ----------------------------------------------------------------------
// Physics
// ----------------------------------------------------------------------

/// Dead and live moisture from the five size classes.
///
/// Dead moisture is weighted toward the fine 1-h class.
pub fn moisture_by_life_class(
    dead1: Real,
    dead10: Real,
    dead100: Real,
    live_herb: Real,
    live_wood: Real,
) -> ComputationResult<(Real, Real)> {
    for m in [dead1, dead10, dead100, live_herb, live_wood] {
        if m < 0.0 {
            return Err(ComputationError::invalid("negative fuel moisture"));
        }
    }
    let dead = 0.89 * dead1 + 0.09 * dead10 + 0.02 * dead100;
    let live = 0.5 * (live_herb + live_wood);
    Ok((dead, live))
}

fn moisture_damping(moisture: Real, extinction: Real) -> Real {
    if extinction <= 0.0 || moisture >= extinction {
        return 0.0;
    }
    let r = moisture / extinction;
    (1.0 - 2.59 * r + 5.11 * r * r - 3.52 * r * r * r).clamp(0.0, 1.0)
}

fn optimum_packing_ratio(savr: Real) -> Real {
    3.348 * savr.powf(-0.8189)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    /// Btu/ft2/min
    pub reaction_int: Real,
    /// min
    pub residence_time: Real,
    /// ft/min
    pub no_wind_rate: Real,
    pub packing_ratio: Real,
    /// Packing ratio over its optimum.
    pub rel_packing_ratio: Real,
}

pub fn reaction(bed: &FuelBed, mois_dead: Real, mois_live: Real) -> ComputationResult<Reaction> {
    let load = bed.load_dead + bed.load_live;
    if load <= 0.0 {
        return Err(ComputationError::invalid("zero fuel load"));
    }
    if bed.depth <= 0.0 {
        return Err(ComputationError::invalid("non-positive fuel bed depth"));
    }
    if bed.savr <= 0.0 {
        return Err(ComputationError::invalid("non-positive surface-area-to-volume ratio"));
    }
    if mois_dead < 0.0 || mois_live < 0.0 {
        return Err(ComputationError::invalid("negative fuel moisture"));
    }

    let sigma = bed.savr;
    let bulk_density = load / bed.depth;
    let beta = bulk_density / PARTICLE_DENSITY;
    let rel = beta / optimum_packing_ratio(sigma);

    let a = 133.0 * sigma.powf(-0.7913);
    let s15 = sigma.powf(1.5);
    let gamma_max = s15 / (495.0 + 0.0594 * s15);
    let gamma = gamma_max * rel.powf(a) * (a * (1.0 - rel)).exp();

    let mineral = (0.174 * EFFECTIVE_MINERAL.powf(-0.19)).min(1.0);
    let net = 1.0 - TOTAL_MINERAL;
    let live_mext = bed.mext_dead * LIVE_MEXT_FACTOR;
    let damped_load = bed.load_dead * net * moisture_damping(mois_dead, bed.mext_dead)
        + bed.load_live * net * moisture_damping(mois_live, live_mext);
    let reaction_int = gamma * HEAT_CONTENT * mineral * damped_load;

    let xi = ((0.792 + 0.681 * sigma.sqrt()) * (beta + 0.1)).exp() / (192.0 + 0.2595 * sigma);
    let epsilon = (-138.0 / sigma).exp();
    let mois = (bed.load_dead * mois_dead + bed.load_live * mois_live) / load;
    let q_ig = 250.0 + 1_116.0 * mois;
    let no_wind_rate = reaction_int * xi / (bulk_density * epsilon * q_ig);

    Ok(Reaction {
        reaction_int,
        residence_time: 384.0 / sigma,
        no_wind_rate,
        packing_ratio: beta,
        rel_packing_ratio: rel,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadSpread {
    /// ft/min
    pub spread: Real,
    /// Direction of maximum spread, degrees clockwise from upslope.
    pub max_dir: Real,
    /// mi/h
    pub eff_wind: Real,
}

/// Combine wind and slope as vectors and return the head fire spread.
#[allow(clippy::too_many_arguments)]
pub fn spread_at_head(
    no_wind_rate: Real,
    reaction_int: Real,
    savr: Real,
    packing_ratio: Real,
    rel_packing_ratio: Real,
    midflame_mph: Real,
    slope_fraction: Real,
    wind_dir_from_upslope: Real,
) -> ComputationResult<HeadSpread> {
    if midflame_mph < 0.0 {
        return Err(ComputationError::invalid("negative midflame wind speed"));
    }
    if slope_fraction < 0.0 {
        return Err(ComputationError::invalid("negative slope"));
    }
    if savr <= 0.0 || packing_ratio <= 0.0 || rel_packing_ratio <= 0.0 {
        return Err(ComputationError::invalid("degenerate fuel bed"));
    }
    if no_wind_rate <= 0.0 {
        return Ok(HeadSpread {
            spread: 0.0,
            max_dir: 0.0,
            eff_wind: 0.0,
        });
    }

    let c = 7.47 * (-0.133 * savr.powf(0.55)).exp();
    let b = 0.02526 * savr.powf(0.54);
    let e = 0.715 * (-3.59e-4 * savr).exp();

    // Wind limit: the reaction cannot be driven past 0.9 * I_R.
    let wind = (midflame_mph * FT_PER_MIN_PER_MI_PER_H).min(0.9 * reaction_int);
    let phi_w = if wind > 0.0 {
        c * wind.powf(b) * rel_packing_ratio.powf(-e)
    } else {
        0.0
    };
    let phi_s = 5.275 * packing_ratio.powf(-0.3) * slope_fraction * slope_fraction;

    let slope_rate = no_wind_rate * phi_s;
    let wind_rate = no_wind_rate * phi_w;
    let theta = wind_dir_from_upslope.to_radians();
    let x = slope_rate + wind_rate * theta.cos();
    let y = wind_rate * theta.sin();
    let combined = x.hypot(y);

    let max_dir = if combined > 0.0 {
        y.atan2(x).to_degrees().rem_euclid(360.0)
    } else {
        0.0
    };
    let phi_e = combined / no_wind_rate;
    let eff_wind = if phi_e > 0.0 {
        (phi_e * rel_packing_ratio.powf(e) / c).powf(1.0 / b) / FT_PER_MIN_PER_MI_PER_H
    } else {
        0.0
    };

    Ok(HeadSpread {
        spread: no_wind_rate + combined,
        max_dir,
        eff_wind,
    })
}

/// Length-to-width ratio and eccentricity of the fire ellipse.
pub fn length_to_width(eff_wind_mph: Real) -> (Real, Real) {
    let lw = 1.0 + 0.25 * eff_wind_mph.max(0.0);
    let ecc = (lw * lw - 1.0).sqrt() / lw;
    (lw, ecc)
}

/// Spread rate along a direction measured from upslope.
pub fn spread_at_vector(head: Real, eccentricity: Real, max_dir: Real, vector_dir: Real) -> Real {
    let delta = (vector_dir - max_dir).to_radians();
    head * (1.0 - eccentricity) / (1.0 - eccentricity * delta.cos())
}

/// Byram's flame length (ft) from fireline intensity (Btu/ft/s).
pub fn flame_length(line_int: Real) -> Real {
    if line_int <= 0.0 {
        0.0
    } else {
        0.45 * line_int.powf(0.46)
    }
}

// ----------------------------------------------------------------------
// Equations
// ----------------------------------------------------------------------

fn fuel_bed_model(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 1)?;
    let index = item_at(inputs, 0)?;
    let model = STANDARD_MODELS
        .get(index)
        .ok_or_else(|| ComputationError::invalid(format!("no fuel model at index {index}")))?;
    let bed = model.bed();
    Ok(vec![
        Value::Number(bed.depth),
        Value::Number(bed.load_dead),
        Value::Number(bed.load_live),
        Value::Number(bed.savr),
        Value::Number(bed.mext_dead),
    ])
}

fn mois_life_class(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 5)?;
    let (dead, live) = moisture_by_life_class(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
        number_at(inputs, 4)?,
    )?;
    Ok(vec![Value::Number(dead), Value::Number(live)])
}

fn reaction_int(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 7)?;
    let bed = FuelBed {
        load_dead: number_at(inputs, 0)?,
        load_live: number_at(inputs, 1)?,
        savr: number_at(inputs, 2)?,
        depth: number_at(inputs, 3)?,
        mext_dead: number_at(inputs, 4)?,
    };
    let r = reaction(&bed, number_at(inputs, 5)?, number_at(inputs, 6)?)?;
    Ok(vec![
        Value::Number(r.reaction_int),
        Value::Number(r.residence_time),
        Value::Number(r.no_wind_rate),
        Value::Number(r.packing_ratio),
        Value::Number(r.rel_packing_ratio),
    ])
}

fn head(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 8)?;
    let h = spread_at_head(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
        number_at(inputs, 4)?,
        number_at(inputs, 5)?,
        number_at(inputs, 6)?,
        number_at(inputs, 7)?,
    )?;
    Ok(vec![
        Value::Number(h.spread),
        Value::Number(h.max_dir),
        Value::Number(h.eff_wind),
    ])
}

fn lw_ratio(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 1)?;
    let (lw, ecc) = length_to_width(number_at(inputs, 0)?);
    Ok(vec![Value::Number(lw), Value::Number(ecc)])
}

fn vector(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 4)?;
    let rate = spread_at_vector(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
    );
    Ok(vec![Value::Number(rate)])
}

fn heat_per_unit_area(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    Ok(vec![Value::Number(number_at(inputs, 0)? * number_at(inputs, 1)?)])
}

fn line_int(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 2)?;
    let hpua = number_at(inputs, 0)?;
    let spread = number_at(inputs, 1)?;
    Ok(vec![Value::Number(hpua * spread / 60.0)])
}

fn flame(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 1)?;
    Ok(vec![Value::Number(flame_length(number_at(inputs, 0)?))])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_FUEL_BED_MODEL,
        MOD_SURFACE,
        &[V_FUEL_MODEL],
        &[V_FUEL_DEPTH, V_FUEL_LOAD_DEAD, V_FUEL_LOAD_LIVE, V_FUEL_SAVR, V_FUEL_MEXT_DEAD],
        fuel_bed_model,
    ));
    b.register_equation(EquationSpec::new(
        F_MOIS_LIFE_CLASS,
        MOD_SURFACE,
        &[V_MOIS_DEAD1, V_MOIS_DEAD10, V_MOIS_DEAD100, V_MOIS_LIVE_HERB, V_MOIS_LIVE_WOOD],
        &[V_MOIS_DEAD, V_MOIS_LIVE],
        mois_life_class,
    ));
    b.register_equation(EquationSpec::new(
        F_REACTION_INT,
        MOD_SURFACE,
        &[
            V_FUEL_LOAD_DEAD,
            V_FUEL_LOAD_LIVE,
            V_FUEL_SAVR,
            V_FUEL_DEPTH,
            V_FUEL_MEXT_DEAD,
            V_MOIS_DEAD,
            V_MOIS_LIVE,
        ],
        &[
            V_REACTION_INT,
            V_RESIDENCE_TIME,
            V_NO_WIND_RATE,
            V_PACKING_RATIO,
            V_REL_PACKING_RATIO,
        ],
        reaction_int,
    ));
    b.register_equation(EquationSpec::new(
        F_SPREAD_AT_HEAD,
        MOD_SURFACE,
        &[
            V_NO_WIND_RATE,
            V_REACTION_INT,
            V_FUEL_SAVR,
            V_PACKING_RATIO,
            V_REL_PACKING_RATIO,
            V_WIND_AT_MIDFLAME,
            V_SLOPE_FRACTION,
            V_WIND_DIR_FROM_UPSLOPE,
        ],
        &[V_SPREAD_AT_HEAD, V_MAX_DIR_FROM_UPSLOPE, V_EFF_WIND],
        head,
    ));
    b.register_equation(EquationSpec::new(
        F_LENGTH_TO_WIDTH,
        MOD_SURFACE,
        &[V_EFF_WIND],
        &[V_LENGTH_TO_WIDTH, V_ECCENTRICITY],
        lw_ratio,
    ));
    b.register_equation(EquationSpec::new(
        F_SPREAD_AT_VECTOR,
        MOD_SURFACE,
        &[
            V_SPREAD_AT_HEAD,
            V_ECCENTRICITY,
            V_MAX_DIR_FROM_UPSLOPE,
            V_VECTOR_DIR_FROM_UPSLOPE,
        ],
        &[V_SPREAD_AT_VECTOR],
        vector,
    ));
    b.register_equation(EquationSpec::new(
        F_HEAT_PER_UNIT_AREA,
        MOD_SURFACE,
        &[V_REACTION_INT, V_RESIDENCE_TIME],
        &[V_HEAT_PER_UNIT_AREA],
        heat_per_unit_area,
    ));
    b.register_equation(EquationSpec::new(
        F_LINE_INT_AT_HEAD,
        MOD_SURFACE,
        &[V_HEAT_PER_UNIT_AREA, V_SPREAD_AT_HEAD],
        &[V_LINE_INT_AT_HEAD],
        line_int,
    ));
    b.register_equation(EquationSpec::new(
        F_FLAME_LENG_AT_HEAD,
        MOD_SURFACE,
        &[V_LINE_INT_AT_HEAD],
        &[V_FLAME_LENG_AT_HEAD],
        flame,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass() -> FuelBed {
        STANDARD_MODELS[0].bed()
    }

    #[test]
    fn dry_grass_spreads() {
        let r = reaction(&grass(), 0.06, 1.0).unwrap();
        assert!(r.reaction_int > 0.0);
        assert!(r.no_wind_rate > 0.0);
        assert!((r.residence_time - 384.0 / 3_500.0).abs() < 1e-12);
    }

    #[test]
    fn moisture_at_extinction_stops_reaction() {
        let r = reaction(&grass(), 0.12, 1.0).unwrap();
        assert_eq!(r.reaction_int, 0.0);
        assert_eq!(r.no_wind_rate, 0.0);
    }

    #[test]
    fn zero_load_is_invalid() {
        let mut bed = grass();
        bed.load_dead = 0.0;
        assert!(matches!(
            reaction(&bed, 0.06, 1.0),
            Err(ComputationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn wind_and_slope_increase_head_spread() {
        let r = reaction(&grass(), 0.06, 1.0).unwrap();
        let calm = spread_at_head(
            r.no_wind_rate,
            r.reaction_int,
            3_500.0,
            r.packing_ratio,
            r.rel_packing_ratio,
            0.0,
            0.0,
            0.0,
        )
        .unwrap();
        assert!((calm.spread - r.no_wind_rate).abs() < 1e-12);
        assert_eq!(calm.eff_wind, 0.0);

        let windy = spread_at_head(
            r.no_wind_rate,
            r.reaction_int,
            3_500.0,
            r.packing_ratio,
            r.rel_packing_ratio,
            5.0,
            0.3,
            90.0,
        )
        .unwrap();
        assert!(windy.spread > calm.spread);
        assert!(windy.max_dir > 0.0 && windy.max_dir < 90.0);
        assert!(windy.eff_wind > 0.0);
    }

    #[test]
    fn upslope_wind_effective_wind_round_trips() {
        let r = reaction(&grass(), 0.06, 1.0).unwrap();
        let h = spread_at_head(
            r.no_wind_rate,
            r.reaction_int,
            3_500.0,
            r.packing_ratio,
            r.rel_packing_ratio,
            4.0,
            0.0,
            0.0,
        )
        .unwrap();
        assert!((h.eff_wind - 4.0).abs() < 1e-6);
        assert!(h.max_dir.abs() < 1e-9);
    }

    #[test]
    fn ellipse_relations() {
        let (lw, ecc) = length_to_width(0.0);
        assert_eq!(lw, 1.0);
        assert_eq!(ecc, 0.0);
        let (_, ecc) = length_to_width(8.0);
        let head = 10.0;
        assert!((spread_at_vector(head, ecc, 30.0, 30.0) - head).abs() < 1e-9);
        assert!(spread_at_vector(head, ecc, 30.0, 210.0) < head);
        assert_eq!(flame_length(0.0), 0.0);
        assert!((flame_length(100.0) - 0.45 * 100f64.powf(0.46)).abs() < 1e-12);
    }
}
