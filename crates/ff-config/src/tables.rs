//! Static option tables: module switches, cascades, output switches,
//! implicit cross-module requirements and diagram supporting variables.

use ff_catalog::names::*;

/// Prefix of module switches, e.g. `module-size`.
pub const MODULE_PREFIX: &str = "module-";

pub fn module_option(module: &str) -> String {
    format!("{MODULE_PREFIX}{module}")
}

/// Modules pulled in by an enabled module. Transitive closure is taken by
/// the reconciler.
pub fn cascades(module: &str) -> &'static [&'static str] {
    match module {
        MOD_SIZE => &[MOD_SURFACE],
        MOD_CONTAIN => &[MOD_SIZE],
        MOD_CROWN | MOD_SCORCH => &[MOD_SURFACE],
        _ => &[],
    }
}

/// Variable requested by an output switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    Var(&'static str),
    /// Head or vector spread rate, depending on the spread direction mode.
    SpreadRate,
}

pub struct OutputOption {
    pub option: &'static str,
    pub module: &'static str,
    pub target: OutputTarget,
}

const fn out(option: &'static str, module: &'static str, var: &'static str) -> OutputOption {
    OutputOption {
        option,
        module,
        target: OutputTarget::Var(var),
    }
}

pub const OUTPUTS: &[OutputOption] = &[
    OutputOption {
        option: "output-spread-rate",
        module: MOD_SURFACE,
        target: OutputTarget::SpreadRate,
    },
    out("output-heat-per-unit-area", MOD_SURFACE, V_HEAT_PER_UNIT_AREA),
    out("output-fireline-intensity", MOD_SURFACE, V_LINE_INT_AT_HEAD),
    out("output-flame-length", MOD_SURFACE, V_FLAME_LENG_AT_HEAD),
    out("output-reaction-intensity", MOD_SURFACE, V_REACTION_INT),
    out("output-effective-wind", MOD_SURFACE, V_EFF_WIND),
    out("output-max-spread-dir", MOD_SURFACE, V_MAX_DIR_FROM_UPSLOPE),
    out("output-length-to-width", MOD_SURFACE, V_LENGTH_TO_WIDTH),
    out("output-midflame-wind", MOD_SURFACE, V_WIND_AT_MIDFLAME),
    out("output-wind-adj-factor", MOD_SURFACE, V_WIND_ADJ_FACTOR),
    out("output-fire-area", MOD_SIZE, V_FIRE_AREA),
    out("output-fire-perimeter", MOD_SIZE, V_FIRE_PERIMETER),
    out("output-fire-length", MOD_SIZE, V_FIRE_LENGTH),
    out("output-fire-width", MOD_SIZE, V_FIRE_WIDTH),
    out("output-spread-distance", MOD_SIZE, V_DIST_AT_HEAD),
    out("output-back-spread-rate", MOD_SIZE, V_SPREAD_AT_BACK),
    out("output-contain-status", MOD_CONTAIN, V_CONTAIN_STATUS),
    out("output-contain-time", MOD_CONTAIN, V_CONTAIN_TIME),
    out("output-contain-size", MOD_CONTAIN, V_CONTAIN_SIZE),
    out("output-contain-line", MOD_CONTAIN, V_CONTAIN_LINE),
    out("output-spot-distance", MOD_SPOT, V_SPOT_DIST_FLAT),
    out("output-firebrand-height", MOD_SPOT, V_SPOT_FIREBRAND_HT),
    out("output-crown-critical-intensity", MOD_CROWN, V_CROWN_CRIT_INT),
    out("output-crown-transition-ratio", MOD_CROWN, V_CROWN_TRANS_RATIO),
    out("output-crown-transition", MOD_CROWN, V_CROWN_TRANS_TO_CROWN),
    out("output-scorch-height", MOD_SCORCH, V_SCORCH_HT),
    out("output-ignition-probability", MOD_IGNITE, V_IGNITE_PROB),
    out("output-fuel-temperature", MOD_IGNITE, V_IGNITE_FUEL_TEMP),
];

/// Variables a module needs from another module whatever outputs it reports.
pub fn implicit_requirements(module: &str) -> &'static [&'static str] {
    match module {
        MOD_SIZE | MOD_CONTAIN => &[V_SPREAD_AT_HEAD, V_LENGTH_TO_WIDTH],
        MOD_CROWN | MOD_SCORCH => &[V_LINE_INT_AT_HEAD],
        _ => &[],
    }
}

pub struct DiagramOption {
    pub option: &'static str,
    pub module: &'static str,
    pub supporting: &'static [&'static str],
}

pub const DIAGRAMS: &[DiagramOption] = &[
    DiagramOption {
        option: "diagram-fire-shape",
        module: MOD_SIZE,
        supporting: &[V_FIRE_LENGTH, V_FIRE_WIDTH, V_DIST_AT_HEAD, V_DIST_AT_BACK],
    },
    DiagramOption {
        option: "diagram-wind-slope",
        module: MOD_SURFACE,
        supporting: &[V_MAX_DIR_FROM_UPSLOPE, V_WIND_DIR_FROM_UPSLOPE, V_EFF_WIND],
    },
    DiagramOption {
        option: "diagram-contain",
        module: MOD_CONTAIN,
        supporting: &[V_CONTAIN_STATUS, V_CONTAIN_PATH],
    },
];

/// Every variable name the tables mention, for start-up resolution.
pub(crate) fn referenced_variables() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = vec![V_SPREAD_AT_HEAD, V_SPREAD_AT_VECTOR];
    for entry in OUTPUTS {
        if let OutputTarget::Var(v) = entry.target {
            names.push(v);
        }
    }
    for module in MODULES {
        names.extend_from_slice(implicit_requirements(module));
    }
    for diagram in DIAGRAMS {
        names.extend_from_slice(diagram.supporting);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_options_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in OUTPUTS {
            assert!(seen.insert(entry.option), "duplicate {}", entry.option);
            assert!(entry.option.starts_with("output-"));
        }
    }

    #[test]
    fn contain_cascades_through_size() {
        assert_eq!(cascades(MOD_CONTAIN), &[MOD_SIZE]);
        assert_eq!(cascades(MOD_SIZE), &[MOD_SURFACE]);
        assert!(cascades(MOD_IGNITE).is_empty());
    }
}
