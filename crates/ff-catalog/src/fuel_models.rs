//! The 13 standard fire behavior fuel models.

use ff_core::Real;

/// Pounds per square foot in one ton per acre.
pub const TONS_PER_AC_TO_LB_PER_FT2: Real = 2_000.0 / 43_560.0;

/// Surface-area-to-volume ratios (1/ft) of the fixed size classes.
const SAVR_10H: Real = 109.0;
const SAVR_100H: Real = 30.0;
const SAVR_LIVE: Real = 1_500.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelModel {
    pub code: &'static str,
    pub name: &'static str,
    /// Loads in tons/ac: 1-h, 10-h, 100-h dead and live.
    pub load_1h: Real,
    pub load_10h: Real,
    pub load_100h: Real,
    pub load_live: Real,
    /// 1-h dead surface-area-to-volume ratio (1/ft).
    pub savr_1h: Real,
    /// Fuel bed depth (ft).
    pub depth: Real,
    /// Dead fuel extinction moisture (fraction).
    pub mext_dead: Real,
}

const fn model(
    code: &'static str,
    name: &'static str,
    loads: [Real; 4],
    savr_1h: Real,
    depth: Real,
    mext_dead: Real,
) -> FuelModel {
    FuelModel {
        code,
        name,
        load_1h: loads[0],
        load_10h: loads[1],
        load_100h: loads[2],
        load_live: loads[3],
        savr_1h,
        depth,
        mext_dead,
    }
}

pub const STANDARD_MODELS: [FuelModel; 13] = [
    model("1", "Short grass", [0.74, 0.0, 0.0, 0.0], 3_500.0, 1.0, 0.12),
    model("2", "Timber grass and understory", [2.0, 1.0, 0.5, 0.5], 3_000.0, 1.0, 0.15),
    model("3", "Tall grass", [3.01, 0.0, 0.0, 0.0], 1_500.0, 2.5, 0.25),
    model("4", "Chaparral", [5.01, 4.01, 2.0, 5.01], 2_000.0, 6.0, 0.20),
    model("5", "Brush", [1.0, 0.5, 0.0, 2.0], 2_000.0, 2.0, 0.20),
    model("6", "Dormant brush", [1.5, 2.5, 2.0, 0.0], 1_750.0, 2.5, 0.25),
    model("7", "Southern rough", [1.13, 1.87, 1.5, 0.37], 1_750.0, 2.5, 0.40),
    model("8", "Short needle litter", [1.5, 1.0, 2.5, 0.0], 2_000.0, 0.2, 0.30),
    model("9", "Long needle or hardwood litter", [2.92, 0.41, 0.15, 0.0], 2_500.0, 0.2, 0.25),
    model("10", "Timber litter and understory", [3.01, 2.0, 5.01, 2.0], 2_000.0, 1.0, 0.25),
    model("11", "Light logging slash", [1.5, 4.51, 5.51, 0.0], 1_500.0, 1.0, 0.15),
    model("12", "Medium logging slash", [4.01, 14.03, 16.53, 0.0], 1_500.0, 2.3, 0.20),
    model("13", "Heavy logging slash", [7.01, 23.04, 28.1, 0.0], 1_500.0, 3.0, 0.25),
];

/// Bed properties derived from one fuel model, English units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelBed {
    pub depth: Real,
    pub load_dead: Real,
    pub load_live: Real,
    pub savr: Real,
    pub mext_dead: Real,
}

impl FuelModel {
    /// Lump the size classes into one dead and one live load with a
    /// surface-area weighted characteristic SAVR.
    pub fn bed(&self) -> FuelBed {
        let classes = [
            (self.load_1h, self.savr_1h),
            (self.load_10h, SAVR_10H),
            (self.load_100h, SAVR_100H),
            (self.load_live, SAVR_LIVE),
        ];
        let area: Real = classes.iter().map(|(w, s)| w * s).sum();
        let weighted: Real = classes.iter().map(|(w, s)| w * s * s).sum();
        let savr = if area > 0.0 { weighted / area } else { 0.0 };

        FuelBed {
            depth: self.depth,
            load_dead: (self.load_1h + self.load_10h + self.load_100h) * TONS_PER_AC_TO_LB_PER_FT2,
            load_live: self.load_live * TONS_PER_AC_TO_LB_PER_FT2,
            savr,
            mext_dead: self.mext_dead,
        }
    }
}

/// `(code, description)` pairs for the fuel model discrete variable.
pub fn fuel_model_items() -> Vec<(&'static str, &'static str)> {
    STANDARD_MODELS.iter().map(|m| (m.code, m.name)).collect()
}
