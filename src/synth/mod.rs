//! Fabricate plausible element sets for hypothetical satellites.

mod catalog;
mod error;
mod orbit_type;
mod synthesizer;

pub use catalog::{CatalogAllocator, CatalogPool, FixedCatalog, DUMMY_CATALOG_RANGE};
pub use error::SynthesisError;
pub use orbit_type::{
    AltitudeRule, EccentricityRule, InclinationRule, OrbitDefinition, OrbitType,
};
pub use synthesizer::{
    mean_motion_rev_per_day, semi_major_axis_km, sun_synchronous_inclination, synthesize,
    synthesize_at, OrbitalSynthesisRequest, SynthesizedOrbit, EARTH_MU, EARTH_RADIUS_KM,
};
