use crate::FfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Half a unit in the last displayed decimal place.
    pub fn for_decimals(decimals: u32) -> Self {
        Self {
            abs: 0.5 * 10f64.powi(-(decimals as i32)),
            rel: 0.0,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, FfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FfError::NonFinite { what, value: v })
    }
}

/// Round to a fixed number of decimal places (half away from zero).
pub fn round_to_decimals(v: Real, decimals: u32) -> Real {
    if !v.is_finite() {
        return v;
    }
    let scale = 10f64.powi(decimals as i32);
    (v * scale).round() / scale
}
