//! Initial attack containment simulation.
//!
//! Crews begin building line around the fire perimeter after the attack
//! delay. The fire is contained at the first minute when the line built
//! reaches the current perimeter; otherwise it escapes at the time limit.

use ff_core::Real;
use ff_graph::value::{expect_arity, number_at};
use ff_graph::{ComputationError, ComputationResult, EquationSpec, ModelBuilder, Value};

use crate::names::*;
use crate::size::{FT2_PER_ACRE, ellipse_area_acres, ellipse_perimeter, spread_at_back};
use crate::surface::length_to_width;

pub const FT_PER_CHAIN: Real = 66.0;
/// Simulation step (min).
pub const STEP_MIN: Real = 1.0;
/// Escape limit (min).
pub const TIME_LIMIT_MIN: Real = 72.0 * 60.0;
/// A trajectory point is kept every this many steps.
pub const PATH_STRIDE: usize = 10;

pub const STATUS_CONTAINED: usize = 0;
pub const STATUS_ESCAPED: usize = 1;

pub fn status_items() -> [(&'static str, &'static str); 2] {
    [("Contained", "Fire contained"), ("Escaped", "Fire escaped initial attack")]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainResult {
    pub status: usize,
    /// Minutes since the fire was reported.
    pub time: Real,
    /// ac
    pub size: Real,
    /// ch
    pub line: Real,
    /// Crew positions (ch), origin at the ignition point, x toward the head.
    pub path: Vec<(Real, Real)>,
}

struct Fire {
    /// Length at report time (ft).
    initial_length: Real,
    /// Length growth (ft/min).
    growth: Real,
    /// Fraction of the length lying behind the ignition point.
    back_fraction: Real,
    lw: Real,
}

impl Fire {
    fn length(&self, t: Real) -> Real {
        self.initial_length + self.growth * t
    }

    fn perimeter(&self, t: Real) -> Real {
        let a = 0.5 * self.length(t);
        ellipse_perimeter(a, a / self.lw)
    }

    /// Point on the perimeter `fraction` of the way around, starting at the rear.
    fn point(&self, t: Real, fraction: Real) -> (Real, Real) {
        let length = self.length(t);
        let a = 0.5 * length;
        let b = a / self.lw;
        let center = a - self.back_fraction * length;
        let angle = std::f64::consts::PI * (1.0 + 2.0 * fraction);
        (
            (center + a * angle.cos()) / FT_PER_CHAIN,
            (b * angle.sin()) / FT_PER_CHAIN,
        )
    }
}

pub fn simulate(
    head: Real,
    lw: Real,
    report_size: Real,
    attack_delay: Real,
    line_rate_ch_per_h: Real,
) -> ComputationResult<ContainResult> {
    if head < 0.0 {
        return Err(ComputationError::invalid("negative spread rate"));
    }
    if lw < 1.0 {
        return Err(ComputationError::invalid("length-to-width ratio below 1"));
    }
    if report_size <= 0.0 {
        return Err(ComputationError::invalid("non-positive report size"));
    }
    if attack_delay < 0.0 {
        return Err(ComputationError::invalid("negative attack delay"));
    }
    if line_rate_ch_per_h <= 0.0 {
        return Err(ComputationError::invalid("non-positive line production rate"));
    }

    let (_, ecc) = length_to_width((lw - 1.0) / 0.25);
    let back = spread_at_back(head, ecc);
    let growth = head + back;
    let fire = Fire {
        initial_length: (4.0 * lw * report_size * FT2_PER_ACRE / std::f64::consts::PI).sqrt(),
        growth,
        back_fraction: if growth > 0.0 { back / growth } else { 0.5 },
        lw,
    };
    let line_rate = line_rate_ch_per_h * FT_PER_CHAIN / 60.0;

    let mut path = vec![fire.point(attack_delay, 0.0)];
    let mut line = 0.0;
    let mut t = attack_delay;
    let mut step = 0usize;
    let status = loop {
        t += STEP_MIN;
        step += 1;
        line += line_rate * STEP_MIN;
        let perimeter = fire.perimeter(t);
        let fraction = (line / perimeter).min(1.0);
        if fraction >= 1.0 {
            path.push(fire.point(t, 1.0));
            break STATUS_CONTAINED;
        }
        if step % PATH_STRIDE == 0 {
            path.push(fire.point(t, fraction));
        }
        if t >= TIME_LIMIT_MIN {
            path.push(fire.point(t, fraction));
            break STATUS_ESCAPED;
        }
    };

    Ok(ContainResult {
        status,
        time: t,
        size: ellipse_area_acres(fire.length(t), lw),
        line: line / FT_PER_CHAIN,
        path,
    })
}

fn simulation(inputs: &[Value]) -> ComputationResult<Vec<Value>> {
    expect_arity(inputs, 5)?;
    let r = simulate(
        number_at(inputs, 0)?,
        number_at(inputs, 1)?,
        number_at(inputs, 2)?,
        number_at(inputs, 3)?,
        number_at(inputs, 4)?,
    )?;
    Ok(vec![
        Value::Item(r.status),
        Value::Number(r.time),
        Value::Number(r.size),
        Value::Number(r.line),
        Value::Path(r.path),
    ])
}

pub(crate) fn register(b: &mut ModelBuilder) {
    b.register_equation(EquationSpec::new(
        F_CONTAIN_SIMULATION,
        MOD_CONTAIN,
        &[
            V_SPREAD_AT_HEAD,
            V_LENGTH_TO_WIDTH,
            V_CONTAIN_REPORT_SIZE,
            V_CONTAIN_ATTACK_DELAY,
            V_CONTAIN_LINE_PROD_RATE,
        ],
        &[
            V_CONTAIN_STATUS,
            V_CONTAIN_TIME,
            V_CONTAIN_SIZE,
            V_CONTAIN_LINE,
            V_CONTAIN_PATH,
        ],
        simulation,
    ));
}
