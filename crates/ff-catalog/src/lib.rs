//! ff-catalog: the compiled-in wildfire behavior model.
//!
//! Builds a [`ff_graph::Model`] holding every variable and equation of the
//! surface, size, contain, spot, crown, scorch and ignite modules. All
//! equations work in native English units; display units live on the
//! variables' unit triples.
//!
//! The physics are compact approximations of the published relations; the
//! point of this crate is a realistic graph for the engine to orchestrate.

pub mod contain;
pub mod crown;
pub mod fuel_models;
pub mod ignite;
pub mod names;
pub mod scorch;
pub mod size;
pub mod spot;
pub mod surface;
mod variables;
pub mod wind;

use ff_core::Real;
use ff_graph::{Model, ModelBuilder};

/// Btu/ft/s to kW/m.
pub(crate) const KW_M_PER_BTU_FT_S: Real = 3.461_47;

/// Build the full catalog. Every equation starts active; run the
/// configuration reconciler before evaluating.
pub fn build_model() -> Model {
    let mut b = ModelBuilder::new();
    variables::register(&mut b);
    surface::register(&mut b);
    wind::register(&mut b);
    size::register(&mut b);
    contain::register(&mut b);
    spot::register(&mut b);
    crown::register(&mut b);
    scorch::register(&mut b);
    ignite::register(&mut b);
    b.build()
}
