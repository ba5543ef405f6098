//! Stable names of every catalog variable, equation and feature module.
//!
//! Worksheets, option tables and trace files refer to these strings.

// Feature modules
pub const MOD_SURFACE: &str = "surface";
pub const MOD_SIZE: &str = "size";
pub const MOD_CONTAIN: &str = "contain";
pub const MOD_SPOT: &str = "spot";
pub const MOD_CROWN: &str = "crown";
pub const MOD_SCORCH: &str = "scorch";
pub const MOD_IGNITE: &str = "ignite";

pub const MODULES: [&str; 7] = [
    MOD_SURFACE,
    MOD_SIZE,
    MOD_CONTAIN,
    MOD_SPOT,
    MOD_CROWN,
    MOD_SCORCH,
    MOD_IGNITE,
];

// Fuel
pub const V_FUEL_MODEL: &str = "vSurfaceFuelBedModel";
pub const V_FUEL_DEPTH: &str = "vSurfaceFuelBedDepth";
pub const V_FUEL_LOAD_DEAD: &str = "vSurfaceFuelLoadDead";
pub const V_FUEL_LOAD_LIVE: &str = "vSurfaceFuelLoadLive";
pub const V_FUEL_SAVR: &str = "vSurfaceFuelSavr";
pub const V_FUEL_MEXT_DEAD: &str = "vSurfaceFuelBedMextDead";

// Moisture
pub const V_MOIS_DEAD1: &str = "vSurfaceFuelMoisDead1";
pub const V_MOIS_DEAD10: &str = "vSurfaceFuelMoisDead10";
pub const V_MOIS_DEAD100: &str = "vSurfaceFuelMoisDead100";
pub const V_MOIS_LIVE_HERB: &str = "vSurfaceFuelMoisLiveHerb";
pub const V_MOIS_LIVE_WOOD: &str = "vSurfaceFuelMoisLiveWood";
pub const V_MOIS_DEAD: &str = "vSurfaceFuelMoisDead";
pub const V_MOIS_LIVE: &str = "vSurfaceFuelMoisLive";

// Surface fire
pub const V_REACTION_INT: &str = "vSurfaceFireReactionInt";
pub const V_RESIDENCE_TIME: &str = "vSurfaceFireResidenceTime";
pub const V_NO_WIND_RATE: &str = "vSurfaceFireNoWindRate";
pub const V_PACKING_RATIO: &str = "vSurfaceFirePackingRatio";
pub const V_REL_PACKING_RATIO: &str = "vSurfaceFireRelPackingRatio";
pub const V_SPREAD_AT_HEAD: &str = "vSurfaceFireSpreadAtHead";
pub const V_MAX_DIR_FROM_UPSLOPE: &str = "vSurfaceFireMaxDirFromUpslope";
pub const V_EFF_WIND: &str = "vSurfaceFireEffWind";
pub const V_LENGTH_TO_WIDTH: &str = "vSurfaceFireLengthToWidth";
pub const V_ECCENTRICITY: &str = "vSurfaceFireEccentricity";
pub const V_VECTOR_DIR_FROM_UPSLOPE: &str = "vSurfaceFireVectorDirFromUpslope";
pub const V_SPREAD_AT_VECTOR: &str = "vSurfaceFireSpreadAtVector";
pub const V_HEAT_PER_UNIT_AREA: &str = "vSurfaceFireHeatPerUnitArea";
pub const V_LINE_INT_AT_HEAD: &str = "vSurfaceFireLineIntAtHead";
pub const V_FLAME_LENG_AT_HEAD: &str = "vSurfaceFireFlameLengAtHead";

// Wind and site
pub const V_WIND_AT_10M: &str = "vWindSpeedAt10M";
pub const V_WIND_AT_20FT: &str = "vWindSpeedAt20Ft";
pub const V_WIND_AT_MIDFLAME: &str = "vWindSpeedAtMidflame";
pub const V_WIND_ADJ_FACTOR: &str = "vWindAdjFactor";
pub const V_WIND_DIR_FROM_UPSLOPE: &str = "vWindDirFromUpslope";
pub const V_WIND_DIR_FROM_NORTH: &str = "vWindDirFromNorth";
pub const V_SITE_ASPECT: &str = "vSiteAspectDir";
pub const V_SLOPE_FRACTION: &str = "vSiteSlopeFraction";
pub const V_SLOPE_DEGREES: &str = "vSiteSlopeDegrees";
pub const V_SUN_SHADING: &str = "vSiteSunShading";
pub const V_AIR_TEMP: &str = "vAirTemp";

// Canopy
pub const V_CANOPY_COVER: &str = "vTreeCanopyCover";
pub const V_TREE_HT: &str = "vTreeCoverHt";
pub const V_CROWN_RATIO: &str = "vTreeCrownRatio";
pub const V_CANOPY_BASE_HT: &str = "vTreeCanopyBaseHt";
pub const V_FOLIAR_MOIS: &str = "vTreeFoliarMois";

// Size
pub const V_ELAPSED_TIME: &str = "vSurfaceFireElapsedTime";
pub const V_SPREAD_AT_BACK: &str = "vSurfaceFireSpreadAtBack";
pub const V_DIST_AT_HEAD: &str = "vSurfaceFireDistAtHead";
pub const V_DIST_AT_BACK: &str = "vSurfaceFireDistAtBack";
pub const V_FIRE_LENGTH: &str = "vSurfaceFireLength";
pub const V_FIRE_WIDTH: &str = "vSurfaceFireWidth";
pub const V_FIRE_AREA: &str = "vSurfaceFireArea";
pub const V_FIRE_PERIMETER: &str = "vSurfaceFirePerimeter";

// Contain
pub const V_CONTAIN_REPORT_SIZE: &str = "vContainReportSize";
pub const V_CONTAIN_ATTACK_DELAY: &str = "vContainAttackDelay";
pub const V_CONTAIN_LINE_PROD_RATE: &str = "vContainLineProdRate";
pub const V_CONTAIN_STATUS: &str = "vContainStatus";
pub const V_CONTAIN_TIME: &str = "vContainTime";
pub const V_CONTAIN_SIZE: &str = "vContainSize";
pub const V_CONTAIN_LINE: &str = "vContainLine";
pub const V_CONTAIN_PATH: &str = "vContainPerimeterPath";

// Spot
pub const V_SPOT_TORCHING_TREES: &str = "vSpotTorchingTrees";
pub const V_SPOT_FIREBRAND_HT: &str = "vSpotFirebrandHt";
pub const V_SPOT_DIST_FLAT: &str = "vSpotDistFlatTerrain";

// Crown
pub const V_CROWN_CRIT_INT: &str = "vCrownFireCritSurfFireInt";
pub const V_CROWN_TRANS_RATIO: &str = "vCrownFireTransRatio";
pub const V_CROWN_TRANS_TO_CROWN: &str = "vCrownFireTransToCrown";

// Scorch and ignite
pub const V_SCORCH_HT: &str = "vScorchHt";
pub const V_IGNITE_FUEL_TEMP: &str = "vIgniteFuelTemp";
pub const V_IGNITE_PROB: &str = "vIgniteFirebrandProb";

// Equations
pub const F_FUEL_BED_MODEL: &str = "fSurfaceFuelBedModel";
pub const F_MOIS_LIFE_CLASS: &str = "fSurfaceFuelMoisLifeClass";
pub const F_REACTION_INT: &str = "fSurfaceFireReactionInt";
pub const F_SPREAD_AT_HEAD: &str = "fSurfaceFireSpreadAtHead";
pub const F_LENGTH_TO_WIDTH: &str = "fSurfaceFireLengthToWidth";
pub const F_SPREAD_AT_VECTOR: &str = "fSurfaceFireSpreadAtVector";
pub const F_HEAT_PER_UNIT_AREA: &str = "fSurfaceFireHeatPerUnitArea";
pub const F_LINE_INT_AT_HEAD: &str = "fSurfaceFireLineIntAtHead";
pub const F_FLAME_LENG_AT_HEAD: &str = "fSurfaceFireFlameLengAtHead";
pub const F_WIND_ADJ_FACTOR: &str = "fWindAdjFactor";
pub const F_WIND_AT_MIDFLAME: &str = "fWindSpeedAtMidflame";
pub const F_WIND_AT_20FT: &str = "fWindSpeedAt20Ft";
pub const F_WIND_DIR_FROM_UPSLOPE: &str = "fWindDirFromUpslope";
pub const F_SLOPE_FRACTION: &str = "fSiteSlopeFraction";
pub const F_SPREAD_AT_BACK: &str = "fSurfaceFireSpreadAtBack";
pub const F_FIRE_SHAPE: &str = "fSurfaceFireShape";
pub const F_CONTAIN_SIMULATION: &str = "fContainSimulation";
pub const F_SPOT_TORCHING_TREES: &str = "fSpotDistTorchingTrees";
pub const F_SPOT_SURFACE_FIRE: &str = "fSpotDistSurfaceFire";
pub const F_CROWN_CRIT_INT: &str = "fCrownFireCritSurfInt";
pub const F_CROWN_TRANS_RATIO: &str = "fCrownFireTransRatio";
pub const F_SCORCH_HT: &str = "fScorchHt";
pub const F_IGNITE_FUEL_TEMP: &str = "fIgniteFuelTemp";
pub const F_IGNITE_PROB: &str = "fIgniteFirebrandProb";
