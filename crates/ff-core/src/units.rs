// ff-core/src/units.rs

//! Named unit catalog with factor+offset conversions.
//!
//! Every unit is stored as an affine map onto its family's SI base:
//! `si = value * si_factor + si_offset`. Length, time, area, mass and
//! temperature factors come from `uom` so only the Btu constant is typed by hand.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use uom::si::f64::{
    Area as UomArea, Length as UomLength, Mass as UomMass,
    ThermodynamicTemperature as UomTemperature, Time as UomTime,
};

use crate::{FfError, FfResult, Real};

/// International table Btu in joules.
const BTU_J: Real = 1_055.055_852_62;

/// Physical family a unit belongs to. Conversions never cross families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitFamily {
    Length,
    Velocity,
    Temperature,
    Area,
    Time,
    Loading,
    InverseLength,
    SpecificEnergy,
    ArealEnergy,
    LinearPower,
    ArealPower,
    Fraction,
    Ratio,
    Angle,
    Count,
    Text,
}

/// One named unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub name: &'static str,
    pub family: UnitFamily,
    pub si_factor: Real,
    pub si_offset: Real,
}

fn length<U>() -> Real
where
    U: uom::si::length::Unit + uom::Conversion<f64, T = f64>,
{
    UomLength::new::<U>(1.0).value
}

fn time<U>() -> Real
where
    U: uom::si::time::Unit + uom::Conversion<f64, T = f64>,
{
    UomTime::new::<U>(1.0).value
}

fn area<U>() -> Real
where
    U: uom::si::area::Unit + uom::Conversion<f64, T = f64>,
{
    UomArea::new::<U>(1.0).value
}

fn mass<U>() -> Real
where
    U: uom::si::mass::Unit + uom::Conversion<f64, T = f64>,
{
    UomMass::new::<U>(1.0).value
}

fn temperature<U>() -> (Real, Real)
where
    U: uom::si::thermodynamic_temperature::Unit + uom::Conversion<f64, T = f64>,
{
    let zero = UomTemperature::new::<U>(0.0).value;
    let one = UomTemperature::new::<U>(1.0).value;
    (one - zero, zero)
}

fn linear(name: &'static str, family: UnitFamily, si_factor: Real) -> UnitDef {
    UnitDef {
        name,
        family,
        si_factor,
        si_offset: 0.0,
    }
}

fn build_table() -> Vec<UnitDef> {
    use uom::si::{area as a, length as l, mass as ms, thermodynamic_temperature as t, time as tm};
    use UnitFamily::*;

    let ft = length::<l::foot>();
    let m = length::<l::meter>();
    // Gunter's chain, 66 international feet.
    let ch = 66.0 * ft;
    let mi = length::<l::mile>();
    let km = length::<l::kilometer>();
    let s = time::<tm::second>();
    let min = time::<tm::minute>();
    let h = time::<tm::hour>();
    let ft2 = area::<a::square_foot>();
    let m2 = area::<a::square_meter>();
    let ac = area::<a::acre>();
    let ha = area::<a::hectare>();
    let lb = mass::<ms::pound>();
    let kg = mass::<ms::kilogram>();
    let (f_factor, f_offset) = temperature::<t::degree_fahrenheit>();
    let (c_factor, c_offset) = temperature::<t::degree_celsius>();

    vec![
        linear("ft", Length, ft),
        linear("m", Length, m),
        linear("ch", Length, ch),
        linear("mi", Length, mi),
        linear("km", Length, km),
        linear("ft/min", Velocity, ft / min),
        linear("ch/h", Velocity, ch / h),
        linear("m/min", Velocity, m / min),
        linear("mi/h", Velocity, mi / h),
        linear("km/h", Velocity, km / h),
        linear("m/s", Velocity, m / s),
        UnitDef {
            name: "oF",
            family: Temperature,
            si_factor: f_factor,
            si_offset: f_offset,
        },
        UnitDef {
            name: "oC",
            family: Temperature,
            si_factor: c_factor,
            si_offset: c_offset,
        },
        linear("ft2", Area, ft2),
        linear("m2", Area, m2),
        linear("ac", Area, ac),
        linear("ha", Area, ha),
        linear("s", Time, s),
        linear("min", Time, min),
        linear("h", Time, h),
        linear("lb/ft2", Loading, lb / ft2),
        linear("kg/m2", Loading, kg / m2),
        linear("tons/ac", Loading, 2_000.0 * lb / ac),
        linear("tonnes/ha", Loading, 1_000.0 * kg / ha),
        linear("1/ft", InverseLength, 1.0 / ft),
        linear("1/m", InverseLength, 1.0 / m),
        linear("Btu/lb", SpecificEnergy, BTU_J / lb),
        linear("kJ/kg", SpecificEnergy, 1_000.0 / kg),
        linear("Btu/ft2", ArealEnergy, BTU_J / ft2),
        linear("kJ/m2", ArealEnergy, 1_000.0 / m2),
        linear("Btu/ft/s", LinearPower, BTU_J / (ft * s)),
        linear("kW/m", LinearPower, 1_000.0 / m),
        linear("Btu/ft2/min", ArealPower, BTU_J / (ft2 * min)),
        linear("kW/m2", ArealPower, 1_000.0 / m2),
        linear("fraction", Fraction, 1.0),
        linear("%", Fraction, 0.01),
        linear("ratio", Ratio, 1.0),
        linear("deg", Angle, 1.0),
        linear("count", Count, 1.0),
        linear("", Text, 1.0),
    ]
}

/// All known units, built once.
pub fn unit_table() -> &'static [UnitDef] {
    static TABLE: OnceLock<Vec<UnitDef>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Look up a unit by its exact name.
pub fn unit_def(name: &str) -> FfResult<&'static UnitDef> {
    unit_table()
        .iter()
        .find(|u| u.name == name)
        .ok_or_else(|| FfError::UnknownUnit {
            unit: name.to_string(),
        })
}

/// Affine conversion `to = from * factor + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    pub factor: Real,
    pub offset: Real,
}

impl UnitConversion {
    pub fn identity() -> Self {
        Self {
            factor: 1.0,
            offset: 0.0,
        }
    }

    /// Build the conversion between two units of the same family.
    pub fn between(from: &str, to: &str) -> FfResult<Self> {
        if from == to {
            return Ok(Self::identity());
        }
        let a = unit_def(from)?;
        let b = unit_def(to)?;
        if a.family != b.family {
            return Err(FfError::IncompatibleUnits {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self {
            factor: a.si_factor / b.si_factor,
            offset: (a.si_offset - b.si_offset) / b.si_factor,
        })
    }

    pub fn apply(&self, value: Real) -> Real {
        value * self.factor + self.offset
    }

    pub fn invert(&self, value: Real) -> Real {
        (value - self.offset) / self.factor
    }
}

/// Convert a value between two named units.
pub fn convert(value: Real, from: &str, to: &str) -> FfResult<Real> {
    Ok(UnitConversion::between(from, to)?.apply(value))
}

/// Which member of a unit triple is used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum UnitSystem {
    Native,
    #[default]
    English,
    Metric,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::English => write!(f, "english"),
            Self::Metric => write!(f, "metric"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = FfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "english" => Ok(Self::English),
            "metric" => Ok(Self::Metric),
            _ => Err(FfError::InvalidArg {
                what: "unit system must be native, english or metric",
            }),
        }
    }
}

/// Units plus the number of decimals shown for them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub units: String,
    pub decimals: u32,
}

impl UnitSpec {
    pub fn new(units: impl Into<String>, decimals: u32) -> Self {
        Self {
            units: units.into(),
            decimals,
        }
    }
}

/// Native, English and metric units of one continuous variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTriple {
    pub native: UnitSpec,
    pub english: UnitSpec,
    pub metric: UnitSpec,
}

impl UnitTriple {
    pub fn new(native: (&str, u32), english: (&str, u32), metric: (&str, u32)) -> Self {
        Self {
            native: UnitSpec::new(native.0, native.1),
            english: UnitSpec::new(english.0, english.1),
            metric: UnitSpec::new(metric.0, metric.1),
        }
    }

    /// Same units everywhere (e.g. dimensionless ratios).
    pub fn uniform(units: &str, decimals: u32) -> Self {
        Self::new((units, decimals), (units, decimals), (units, decimals))
    }

    pub fn spec(&self, system: UnitSystem) -> &UnitSpec {
        match system {
            UnitSystem::Native => &self.native,
            UnitSystem::English => &self.english,
            UnitSystem::Metric => &self.metric,
        }
    }

    /// Conversion from native units into the given display system.
    pub fn display_conversion(&self, system: UnitSystem) -> FfResult<UnitConversion> {
        UnitConversion::between(&self.native.units, &self.spec(system).units)
    }

    pub fn to_display(&self, native_value: Real, system: UnitSystem) -> FfResult<Real> {
        Ok(self.display_conversion(system)?.apply(native_value))
    }

    pub fn from_display(&self, display_value: Real, system: UnitSystem) -> FfResult<Real> {
        Ok(self.display_conversion(system)?.invert(display_value))
    }

    /// Check that all three members exist and share a family.
    pub fn check(&self) -> FfResult<()> {
        self.display_conversion(UnitSystem::English)?;
        self.display_conversion(UnitSystem::Metric)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn length_and_velocity_factors() {
        assert!(nearly_equal(convert(1.0, "ch", "ft").unwrap(), 66.0, Tolerances::default()));
        assert!(nearly_equal(convert(1.0, "mi", "ft").unwrap(), 5280.0, Tolerances::default()));
        assert!(nearly_equal(convert(88.0, "ft/min", "mi/h").unwrap(), 1.0, Tolerances::default()));
        assert!(nearly_equal(
            convert(1.0, "ch/h", "ft/min").unwrap(),
            1.1,
            Tolerances::default()
        ));
    }

    #[test]
    fn temperature_uses_offset() {
        let c = convert(212.0, "oF", "oC").unwrap();
        assert!((c - 100.0).abs() < 1e-9);
        let f = convert(-40.0, "oC", "oF").unwrap();
        assert!((f + 40.0).abs() < 1e-9);
    }

    #[test]
    fn area_and_loading() {
        assert!((convert(1.0, "ac", "ft2").unwrap() - 43_560.0).abs() < 1e-3);
        assert!((convert(1.0, "tons/ac", "lb/ft2").unwrap() - 0.045_913_7).abs() < 1e-6);
        assert!((convert(1.0, "Btu/ft/s", "kW/m").unwrap() - 3.4615).abs() < 1e-3);
    }

    #[test]
    fn family_mismatch_is_rejected() {
        let err = UnitConversion::between("ft", "oF").unwrap_err();
        assert!(matches!(err, FfError::IncompatibleUnits { .. }));
        let err = unit_def("furlong").unwrap_err();
        assert!(matches!(err, FfError::UnknownUnit { .. }));
    }

    #[test]
    fn triple_display_round_trip() {
        let triple = UnitTriple::new(("ft/min", 1), ("ch/h", 1), ("m/min", 1));
        triple.check().unwrap();
        assert_eq!(triple.spec(UnitSystem::Metric).units, "m/min");
        let shown = triple.to_display(11.0, UnitSystem::English).unwrap();
        assert!((shown - 10.0).abs() < 1e-9);
        let back = triple.from_display(shown, UnitSystem::English).unwrap();
        assert!((back - 11.0).abs() < 1e-9);
    }

    #[test]
    fn unit_system_parses() {
        assert_eq!("Metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert!("imperial".parse::<UnitSystem>().is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_trip_within_tolerance(
            a in 0usize..64,
            b in 0usize..64,
            value in -1.0e4_f64..1.0e4_f64,
        ) {
            let table = unit_table();
            let from = &table[a % table.len()];
            let family: Vec<&UnitDef> = table.iter().filter(|u| u.family == from.family).collect();
            let to = family[b % family.len()];

            let conv = UnitConversion::between(from.name, to.name).unwrap();
            let back = conv.invert(conv.apply(value));
            let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
            prop_assert!(nearly_equal(back, value, tol));
        }
    }
}
