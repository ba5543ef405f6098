//! The variable catalog: names, labels, ranges and unit triples.

use ff_core::{Real, UnitTriple};
use ff_graph::{ModelBuilder, VariableSpec};

use crate::contain::status_items;
use crate::crown::transition_items;
use crate::fuel_models::fuel_model_items;
use crate::names::*;

type Units = (&'static str, u32);

const RATE: [Units; 3] = [("ft/min", 2), ("ch/h", 1), ("m/min", 1)];
const WIND: [Units; 3] = [("mi/h", 1), ("mi/h", 1), ("km/h", 1)];
const MOIS: [Units; 3] = [("fraction", 2), ("%", 0), ("%", 0)];
const FRACTION: [Units; 3] = [("fraction", 2), ("%", 0), ("%", 0)];
const DEGREES: [Units; 3] = [("deg", 0), ("deg", 0), ("deg", 0)];
const LOAD: [Units; 3] = [("lb/ft2", 4), ("tons/ac", 2), ("tonnes/ha", 2)];
const HEIGHT: [Units; 3] = [("ft", 1), ("ft", 1), ("m", 1)];
const DISTANCE: [Units; 3] = [("ft", 0), ("ch", 1), ("m", 0)];
const AREA: [Units; 3] = [("ac", 2), ("ac", 2), ("ha", 2)];
const MINUTES: [Units; 3] = [("min", 0), ("min", 0), ("min", 0)];
const DURATION: [Units; 3] = [("min", 0), ("h", 2), ("h", 2)];
const INTENSITY: [Units; 3] = [("Btu/ft/s", 0), ("Btu/ft/s", 0), ("kW/m", 0)];
const TEMPERATURE: [Units; 3] = [("oF", 0), ("oF", 0), ("oC", 0)];

fn triple(units: [Units; 3]) -> UnitTriple {
    UnitTriple::new(units[0], units[1], units[2])
}

fn ratio(decimals: u32) -> [Units; 3] {
    [("ratio", decimals); 3]
}

fn cont(
    b: &mut ModelBuilder,
    name: &str,
    label: &str,
    default: Real,
    range: (Real, Real),
    units: [Units; 3],
) {
    b.register_variable(VariableSpec::continuous(name, label, default, range, triple(units)));
}

pub(crate) fn register(b: &mut ModelBuilder) {
    const BIG: Real = 1.0e9;

    // Fuel
    b.register_variable(VariableSpec::discrete(V_FUEL_MODEL, "Fuel model", &fuel_model_items()));
    cont(b, V_FUEL_DEPTH, "Fuel bed depth", 1.0, (0.0, 100.0), HEIGHT);
    cont(b, V_FUEL_LOAD_DEAD, "Dead fuel load", 0.0, (0.0, 100.0), LOAD);
    cont(b, V_FUEL_LOAD_LIVE, "Live fuel load", 0.0, (0.0, 100.0), LOAD);
    cont(
        b,
        V_FUEL_SAVR,
        "Characteristic surface-area-to-volume ratio",
        1_500.0,
        (0.0, 10_000.0),
        [("1/ft", 0), ("1/ft", 0), ("1/m", 0)],
    );
    cont(b, V_FUEL_MEXT_DEAD, "Dead fuel extinction moisture", 0.25, (0.0, 1.0), MOIS);

    // Moisture
    cont(b, V_MOIS_DEAD1, "1-h dead fuel moisture", 0.06, (0.0, 1.0), MOIS);
    cont(b, V_MOIS_DEAD10, "10-h dead fuel moisture", 0.07, (0.0, 1.0), MOIS);
    cont(b, V_MOIS_DEAD100, "100-h dead fuel moisture", 0.08, (0.0, 1.0), MOIS);
    cont(b, V_MOIS_LIVE_HERB, "Live herbaceous fuel moisture", 1.0, (0.0, 5.0), MOIS);
    cont(b, V_MOIS_LIVE_WOOD, "Live woody fuel moisture", 1.0, (0.0, 5.0), MOIS);
    cont(b, V_MOIS_DEAD, "Dead fuel moisture", 0.06, (0.0, 1.0), MOIS);
    cont(b, V_MOIS_LIVE, "Live fuel moisture", 1.0, (0.0, 5.0), MOIS);

    // Surface fire
    cont(
        b,
        V_REACTION_INT,
        "Reaction intensity",
        0.0,
        (0.0, BIG),
        [("Btu/ft2/min", 0), ("Btu/ft2/min", 0), ("kW/m2", 1)],
    );
    cont(b, V_RESIDENCE_TIME, "Flame residence time", 0.0, (0.0, 100.0), [("min", 3); 3]);
    cont(b, V_NO_WIND_RATE, "No-wind no-slope spread rate", 0.0, (0.0, BIG), RATE);
    cont(b, V_PACKING_RATIO, "Packing ratio", 0.0, (0.0, 1.0), ratio(5));
    cont(b, V_REL_PACKING_RATIO, "Relative packing ratio", 0.0, (0.0, BIG), ratio(3));
    cont(b, V_SPREAD_AT_HEAD, "Surface rate of spread (maximum)", 0.0, (0.0, BIG), RATE);
    cont(b, V_MAX_DIR_FROM_UPSLOPE, "Direction of maximum spread from upslope", 0.0, (0.0, 360.0), DEGREES);
    cont(b, V_EFF_WIND, "Effective wind speed", 0.0, (0.0, BIG), WIND);
    cont(b, V_LENGTH_TO_WIDTH, "Length-to-width ratio", 1.0, (1.0, BIG), ratio(2));
    cont(b, V_ECCENTRICITY, "Fire ellipse eccentricity", 0.0, (0.0, 1.0), ratio(3));
    cont(b, V_VECTOR_DIR_FROM_UPSLOPE, "Spread direction from upslope", 0.0, (0.0, 360.0), DEGREES);
    cont(b, V_SPREAD_AT_VECTOR, "Surface rate of spread (direction)", 0.0, (0.0, BIG), RATE);
    cont(
        b,
        V_HEAT_PER_UNIT_AREA,
        "Heat per unit area",
        0.0,
        (0.0, BIG),
        [("Btu/ft2", 0), ("Btu/ft2", 0), ("kJ/m2", 0)],
    );
    cont(b, V_LINE_INT_AT_HEAD, "Fireline intensity", 0.0, (0.0, BIG), INTENSITY);
    cont(b, V_FLAME_LENG_AT_HEAD, "Flame length", 0.0, (0.0, BIG), HEIGHT);

    // Wind and site
    cont(b, V_WIND_AT_10M, "10-m wind speed", 0.0, (0.0, 200.0), WIND);
    cont(b, V_WIND_AT_20FT, "20-ft wind speed", 0.0, (0.0, 200.0), WIND);
    cont(b, V_WIND_AT_MIDFLAME, "Midflame wind speed", 0.0, (0.0, 200.0), WIND);
    cont(b, V_WIND_ADJ_FACTOR, "Wind adjustment factor", 0.4, (0.0, 1.0), ratio(2));
    cont(b, V_WIND_DIR_FROM_UPSLOPE, "Wind direction from upslope", 0.0, (0.0, 360.0), DEGREES);
    cont(b, V_WIND_DIR_FROM_NORTH, "Wind direction from north", 0.0, (0.0, 360.0), DEGREES);
    cont(b, V_SITE_ASPECT, "Aspect", 0.0, (0.0, 360.0), DEGREES);
    cont(b, V_SLOPE_FRACTION, "Slope steepness", 0.0, (0.0, 20.0), FRACTION);
    cont(b, V_SLOPE_DEGREES, "Slope steepness (degrees)", 0.0, (0.0, 89.9), DEGREES);
    cont(b, V_SUN_SHADING, "Sun shading", 0.5, (0.0, 1.0), FRACTION);
    cont(b, V_AIR_TEMP, "Air temperature", 77.0, (-40.0, 139.0), TEMPERATURE);

    // Canopy
    cont(b, V_CANOPY_COVER, "Canopy cover", 0.0, (0.0, 1.0), FRACTION);
    cont(b, V_TREE_HT, "Canopy height", 30.0, (0.0, 400.0), HEIGHT);
    cont(b, V_CROWN_RATIO, "Crown ratio", 0.5, (0.0, 1.0), FRACTION);
    cont(b, V_CANOPY_BASE_HT, "Canopy base height", 10.0, (0.0, 400.0), HEIGHT);
    cont(b, V_FOLIAR_MOIS, "Foliar moisture", 1.0, (0.3, 3.0), MOIS);

    // Size
    cont(b, V_ELAPSED_TIME, "Elapsed time", 60.0, (0.0, 10_080.0), DURATION);
    cont(b, V_SPREAD_AT_BACK, "Backing spread rate", 0.0, (0.0, BIG), RATE);
    cont(b, V_DIST_AT_HEAD, "Forward spread distance", 0.0, (0.0, BIG), DISTANCE);
    cont(b, V_DIST_AT_BACK, "Backing spread distance", 0.0, (0.0, BIG), DISTANCE);
    cont(b, V_FIRE_LENGTH, "Fire length", 0.0, (0.0, BIG), DISTANCE);
    cont(b, V_FIRE_WIDTH, "Fire width", 0.0, (0.0, BIG), DISTANCE);
    cont(b, V_FIRE_AREA, "Fire area", 0.0, (0.0, BIG), AREA);
    cont(b, V_FIRE_PERIMETER, "Fire perimeter", 0.0, (0.0, BIG), DISTANCE);

    // Contain
    cont(b, V_CONTAIN_REPORT_SIZE, "Fire size at report", 1.0, (0.0, 1.0e6), AREA);
    cont(b, V_CONTAIN_ATTACK_DELAY, "Attack delay after report", 0.0, (0.0, 10_080.0), MINUTES);
    cont(
        b,
        V_CONTAIN_LINE_PROD_RATE,
        "Fireline production rate",
        10.0,
        (0.0, 10_000.0),
        [("ch/h", 1), ("ch/h", 1), ("m/min", 1)],
    );
    b.register_variable(VariableSpec::discrete(V_CONTAIN_STATUS, "Containment status", &status_items()));
    cont(b, V_CONTAIN_TIME, "Time from report to containment", 0.0, (0.0, BIG), DURATION);
    cont(b, V_CONTAIN_SIZE, "Contained fire size", 0.0, (0.0, BIG), AREA);
    cont(b, V_CONTAIN_LINE, "Fireline constructed", 0.0, (0.0, BIG), [("ch", 1), ("ch", 1), ("m", 0)]);
    b.register_variable(VariableSpec::path(V_CONTAIN_PATH, "Crew trajectory (ch)"));

    // Spot
    cont(b, V_SPOT_TORCHING_TREES, "Number of torching trees", 1.0, (0.0, 1_000.0), [("count", 0); 3]);
    cont(b, V_SPOT_FIREBRAND_HT, "Firebrand lofting height", 0.0, (0.0, BIG), [("ft", 0), ("ft", 0), ("m", 0)]);
    cont(b, V_SPOT_DIST_FLAT, "Spotting distance (flat terrain)", 0.0, (0.0, BIG), [("mi", 2), ("mi", 2), ("km", 2)]);

    // Crown
    cont(b, V_CROWN_CRIT_INT, "Critical surface fire intensity", 0.0, (0.0, BIG), INTENSITY);
    cont(b, V_CROWN_TRANS_RATIO, "Transition ratio", 0.0, (0.0, BIG), ratio(2));
    b.register_variable(VariableSpec::discrete(
        V_CROWN_TRANS_TO_CROWN,
        "Transition to crown fire",
        &transition_items(),
    ));

    // Scorch and ignite
    cont(b, V_SCORCH_HT, "Scorch height", 0.0, (0.0, BIG), HEIGHT);
    cont(b, V_IGNITE_FUEL_TEMP, "Fuel temperature", 90.0, (-40.0, 300.0), TEMPERATURE);
    cont(b, V_IGNITE_PROB, "Probability of ignition", 0.0, (0.0, 1.0), FRACTION);
}
