//! Exclusive decision points.
//!
//! Each decision is an enum whose variants are the alternatives of one
//! option group. The first declared alternative is the fallback when the
//! group is left empty.

use std::fmt;

use ff_catalog::names::*;
use ff_core::Real;
use serde::Serialize;

use crate::options::ConfigOptions;

pub trait Decision: Copy + PartialEq + fmt::Debug + 'static {
    /// Group name used in diagnostics.
    const GROUP: &'static str;
    /// Module owning the group's equations.
    const MODULE: &'static str;
    /// `(option name, alternative)` in declaration order.
    const ALTERNATIVES: &'static [(&'static str, Self)];

    /// Equations this alternative activates.
    fn equations(self) -> &'static [&'static str];

    /// Variables pinned to a fixed native value by this alternative.
    fn constants(self) -> &'static [(&'static str, Real)] {
        &[]
    }

    fn option(self) -> &'static str {
        Self::ALTERNATIVES
            .iter()
            .find(|(_, alt)| *alt == self)
            .map(|(name, _)| *name)
            .unwrap_or(Self::GROUP)
    }
}

/// Outcome of reading one option group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution<D> {
    pub chosen: D,
    /// Options found set, when the group had zero or several.
    pub violation: Option<Vec<&'static str>>,
}

/// Pick the single set alternative; otherwise fall back deterministically.
///
/// Zero options set selects the first declared alternative. Several set
/// selects the first declared among them.
pub fn resolve<D: Decision>(options: &ConfigOptions) -> Resolution<D> {
    let set: Vec<(&'static str, D)> = D::ALTERNATIVES
        .iter()
        .copied()
        .filter(|(name, _)| options.is_set(name))
        .collect();
    match set.len() {
        1 => Resolution {
            chosen: set[0].1,
            violation: None,
        },
        0 => Resolution {
            chosen: D::ALTERNATIVES[0].1,
            violation: Some(Vec::new()),
        },
        _ => Resolution {
            chosen: set[0].1,
            violation: Some(set.iter().map(|(name, _)| *name).collect()),
        },
    }
}

/// Every equation named by any alternative of the group.
pub fn group_equations<D: Decision>() -> Vec<&'static str> {
    let mut all: Vec<&'static str> = Vec::new();
    for (_, alt) in D::ALTERNATIVES {
        for eq in alt.equations() {
            if !all.contains(eq) {
                all.push(eq);
            }
        }
    }
    all
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindSpeedMode {
    /// Midflame wind speed is entered directly.
    Midflame,
    /// 20-ft wind and adjustment factor are entered.
    TwentyFootInput,
    /// 20-ft wind is entered, the adjustment factor comes from canopy and fuel.
    TwentyFootCalculated,
    /// 10-m wind is entered and reduced to 20 ft.
    TenMeterCalculated,
}

impl Decision for WindSpeedMode {
    const GROUP: &'static str = "wind-speed";
    const MODULE: &'static str = MOD_SURFACE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("wind-at-midflame", WindSpeedMode::Midflame),
        ("wind-at-20ft-input", WindSpeedMode::TwentyFootInput),
        ("wind-at-20ft-calculated", WindSpeedMode::TwentyFootCalculated),
        ("wind-at-10m-calculated", WindSpeedMode::TenMeterCalculated),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            WindSpeedMode::Midflame => &[],
            WindSpeedMode::TwentyFootInput => &[F_WIND_AT_MIDFLAME],
            WindSpeedMode::TwentyFootCalculated => &[F_WIND_AT_MIDFLAME, F_WIND_ADJ_FACTOR],
            WindSpeedMode::TenMeterCalculated => {
                &[F_WIND_AT_MIDFLAME, F_WIND_ADJ_FACTOR, F_WIND_AT_20FT]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WindDirectionMode {
    /// Wind always blows upslope.
    Upslope,
    /// Direction is entered relative to upslope.
    FromUpslope,
    /// Direction is entered from north and combined with aspect.
    FromNorth,
}

impl Decision for WindDirectionMode {
    const GROUP: &'static str = "wind-direction";
    const MODULE: &'static str = MOD_SURFACE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("wind-dir-upslope", WindDirectionMode::Upslope),
        ("wind-dir-from-upslope", WindDirectionMode::FromUpslope),
        ("wind-dir-from-north", WindDirectionMode::FromNorth),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            WindDirectionMode::Upslope | WindDirectionMode::FromUpslope => &[],
            WindDirectionMode::FromNorth => &[F_WIND_DIR_FROM_UPSLOPE],
        }
    }

    fn constants(self) -> &'static [(&'static str, Real)] {
        match self {
            WindDirectionMode::Upslope => &[(V_WIND_DIR_FROM_UPSLOPE, 0.0)],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SlopeMode {
    Fraction,
    Degrees,
}

impl Decision for SlopeMode {
    const GROUP: &'static str = "slope";
    const MODULE: &'static str = MOD_SURFACE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("slope-fraction", SlopeMode::Fraction),
        ("slope-degrees", SlopeMode::Degrees),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            SlopeMode::Fraction => &[],
            SlopeMode::Degrees => &[F_SLOPE_FRACTION],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MoistureMode {
    /// Moisture entered per size class and combined by life class.
    SizeClass,
    /// Dead and live moisture entered directly.
    Category,
}

impl Decision for MoistureMode {
    const GROUP: &'static str = "moisture";
    const MODULE: &'static str = MOD_SURFACE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("mois-by-size-class", MoistureMode::SizeClass),
        ("mois-by-category", MoistureMode::Category),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            MoistureMode::SizeClass => &[F_MOIS_LIFE_CLASS],
            MoistureMode::Category => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpreadDirectionMode {
    Head,
    Vector,
}

impl Decision for SpreadDirectionMode {
    const GROUP: &'static str = "spread-direction";
    const MODULE: &'static str = MOD_SURFACE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("spread-at-head", SpreadDirectionMode::Head),
        ("spread-at-vector", SpreadDirectionMode::Vector),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            SpreadDirectionMode::Head => &[],
            SpreadDirectionMode::Vector => &[F_SPREAD_AT_VECTOR],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpotSourceMode {
    TorchingTrees,
    SurfaceFire,
}

impl Decision for SpotSourceMode {
    const GROUP: &'static str = "spot-source";
    const MODULE: &'static str = MOD_SPOT;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("spot-from-torching-trees", SpotSourceMode::TorchingTrees),
        ("spot-from-surface-fire", SpotSourceMode::SurfaceFire),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            SpotSourceMode::TorchingTrees => &[F_SPOT_TORCHING_TREES],
            SpotSourceMode::SurfaceFire => &[F_SPOT_SURFACE_FIRE],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IgniteFuelTempMode {
    Input,
    Calculated,
}

impl Decision for IgniteFuelTempMode {
    const GROUP: &'static str = "ignite-fuel-temp";
    const MODULE: &'static str = MOD_IGNITE;
    const ALTERNATIVES: &'static [(&'static str, Self)] = &[
        ("ignite-fuel-temp-input", IgniteFuelTempMode::Input),
        ("ignite-fuel-temp-calculated", IgniteFuelTempMode::Calculated),
    ];

    fn equations(self) -> &'static [&'static str] {
        match self {
            IgniteFuelTempMode::Input => &[],
            IgniteFuelTempMode::Calculated => &[F_IGNITE_FUEL_TEMP],
        }
    }
}

/// The chosen alternative of every decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decisions {
    pub wind_speed: WindSpeedMode,
    pub wind_direction: WindDirectionMode,
    pub slope: SlopeMode,
    pub moisture: MoistureMode,
    pub spread_direction: SpreadDirectionMode,
    pub spot_source: SpotSourceMode,
    pub ignite_fuel_temp: IgniteFuelTempMode,
}

/// A resolved group flattened to names, so groups of different enum types
/// can be handled uniformly.
#[derive(Debug, Clone)]
pub(crate) struct GroupState {
    pub group: &'static str,
    pub module: &'static str,
    pub chosen: &'static str,
    pub violation: Option<Vec<&'static str>>,
    pub selected: &'static [&'static str],
    pub all: Vec<&'static str>,
    pub constants: &'static [(&'static str, Real)],
}

impl GroupState {
    fn of<D: Decision>(resolution: &Resolution<D>) -> Self {
        Self {
            group: D::GROUP,
            module: D::MODULE,
            chosen: resolution.chosen.option(),
            violation: resolution.violation.clone(),
            selected: resolution.chosen.equations(),
            all: group_equations::<D>(),
            constants: resolution.chosen.constants(),
        }
    }

    /// Alternatives of the group that were not chosen.
    pub fn excluded(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.all
            .iter()
            .copied()
            .filter(|eq| !self.selected.contains(eq))
    }
}

impl Decisions {
    /// Resolve every group; also returns the flattened per-group state.
    pub(crate) fn resolve_all(options: &ConfigOptions) -> (Self, Vec<GroupState>) {
        let wind_speed = resolve::<WindSpeedMode>(options);
        let wind_direction = resolve::<WindDirectionMode>(options);
        let slope = resolve::<SlopeMode>(options);
        let moisture = resolve::<MoistureMode>(options);
        let spread_direction = resolve::<SpreadDirectionMode>(options);
        let spot_source = resolve::<SpotSourceMode>(options);
        let ignite_fuel_temp = resolve::<IgniteFuelTempMode>(options);

        let groups = vec![
            GroupState::of(&wind_speed),
            GroupState::of(&wind_direction),
            GroupState::of(&slope),
            GroupState::of(&moisture),
            GroupState::of(&spread_direction),
            GroupState::of(&spot_source),
            GroupState::of(&ignite_fuel_temp),
        ];
        let decisions = Decisions {
            wind_speed: wind_speed.chosen,
            wind_direction: wind_direction.chosen,
            slope: slope.chosen,
            moisture: moisture.chosen,
            spread_direction: spread_direction.chosen,
            spot_source: spot_source.chosen,
            ignite_fuel_temp: ignite_fuel_temp.chosen,
        };
        (decisions, groups)
    }

    /// Forced constants of every alternative of every group.
    pub(crate) fn all_constants() -> Vec<(&'static str, Real)> {
        fn consts<D: Decision>(out: &mut Vec<(&'static str, Real)>) {
            for (_, alt) in D::ALTERNATIVES {
                out.extend_from_slice(alt.constants());
            }
        }
        let mut out = Vec::new();
        consts::<WindSpeedMode>(&mut out);
        consts::<WindDirectionMode>(&mut out);
        consts::<SlopeMode>(&mut out);
        consts::<MoistureMode>(&mut out);
        consts::<SpreadDirectionMode>(&mut out);
        consts::<SpotSourceMode>(&mut out);
        consts::<IgniteFuelTempMode>(&mut out);
        out
    }

    /// Option names of every alternative of every group.
    pub fn option_names() -> Vec<&'static str> {
        fn names<D: Decision>(out: &mut Vec<&'static str>) {
            out.extend(D::ALTERNATIVES.iter().map(|(name, _)| *name));
        }
        let mut out = Vec::new();
        names::<WindSpeedMode>(&mut out);
        names::<WindDirectionMode>(&mut out);
        names::<SlopeMode>(&mut out);
        names::<MoistureMode>(&mut out);
        names::<SpreadDirectionMode>(&mut out);
        names::<SpotSourceMode>(&mut out);
        names::<IgniteFuelTempMode>(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_option_resolves_cleanly() {
        let opts = ConfigOptions::new().with("wind-at-20ft-calculated");
        let r = resolve::<WindSpeedMode>(&opts);
        assert_eq!(r.chosen, WindSpeedMode::TwentyFootCalculated);
        assert!(r.violation.is_none());
    }

    #[test]
    fn empty_group_falls_back_to_first() {
        let r = resolve::<SlopeMode>(&ConfigOptions::new());
        assert_eq!(r.chosen, SlopeMode::Fraction);
        assert_eq!(r.violation, Some(vec![]));
    }

    #[test]
    fn crowded_group_picks_first_declared_set() {
        let opts = ConfigOptions::new()
            .with("wind-at-10m-calculated")
            .with("wind-at-20ft-input");
        let r = resolve::<WindSpeedMode>(&opts);
        assert_eq!(r.chosen, WindSpeedMode::TwentyFootInput);
        assert_eq!(
            r.violation,
            Some(vec!["wind-at-20ft-input", "wind-at-10m-calculated"])
        );
    }

    #[test]
    fn group_equations_are_unioned() {
        let all = group_equations::<WindSpeedMode>();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&F_WIND_AT_20FT));
    }

    #[test]
    fn option_lookup() {
        assert_eq!(WindDirectionMode::FromNorth.option(), "wind-dir-from-north");
        assert_eq!(Decisions::option_names().len(), 17);
    }
}
