use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::CatalogAllocator;
use super::error::SynthesisError;
use super::orbit_type::{AltitudeRule, EccentricityRule, InclinationRule, OrbitType};
use crate::tle::{self, Notation, TleLines, TwoLineElement};

/// Mean Earth radius used to turn altitude into semi-major axis.
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// Earth gravitational parameter (km³/s²).
pub const EARTH_MU: f64 = 398_600.4418;
/// Empirical fit for the sun-synchronous inclination formula.
const SSO_REFERENCE_AXIS_KM: f64 = 12_352.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

const DEFAULT_MEAN_MOTION_DOT: f64 = 0.00001;
const DEFAULT_DRAG_TERM: f64 = 0.00001;
const DEFAULT_ELEMENT_SET: u16 = 999;
const DEFAULT_REVOLUTION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalSynthesisRequest {
    pub orbit: OrbitType,
    #[serde(default)]
    pub altitude_km: Option<f64>,
    #[serde(default)]
    pub inclination_deg: Option<f64>,
    #[serde(default)]
    pub eccentricity: Option<f64>,
}

impl OrbitalSynthesisRequest {
    pub fn new(orbit: OrbitType) -> Self {
        Self {
            orbit,
            altitude_km: None,
            inclination_deg: None,
            eccentricity: None,
        }
    }

    pub fn with_altitude(mut self, altitude_km: f64) -> Self {
        self.altitude_km = Some(altitude_km);
        self
    }

    pub fn with_inclination(mut self, inclination_deg: f64) -> Self {
        self.inclination_deg = Some(inclination_deg);
        self
    }

    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = Some(eccentricity);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedOrbit {
    pub orbit: OrbitType,
    pub altitude_km: f64,
    pub semi_major_axis_km: f64,
    pub inclination_deg: f64,
    pub eccentricity: f64,
    pub mean_motion_rev_per_day: f64,
    pub period_minutes: f64,
    pub lines: TleLines,
    pub tle: TwoLineElement,
}

pub fn semi_major_axis_km(altitude_km: f64) -> f64 {
    EARTH_RADIUS_KM + altitude_km
}

/// Kepler's third law, converted from rad/s to revolutions per day.
pub fn mean_motion_rev_per_day(semi_major_axis_km: f64) -> f64 {
    let rad_per_sec = (EARTH_MU / semi_major_axis_km.powi(3)).sqrt();
    rad_per_sec * SECONDS_PER_DAY / (2.0 * PI)
}

/// Inclination that keeps the node precession in step with the Sun.
pub fn sun_synchronous_inclination(altitude_km: f64) -> Result<f64, SynthesisError> {
    let a = semi_major_axis_km(altitude_km);
    let cos_i = -(a / SSO_REFERENCE_AXIS_KM).powf(3.5);
    if !(-1.0..=1.0).contains(&cos_i) {
        return Err(SynthesisError::Range(format!(
            "no sun-synchronous inclination at {} km",
            altitude_km
        )));
    }
    Ok(cos_i.acos().to_degrees())
}

/// Synthesize an element set with the current instant as epoch.
pub fn synthesize(
    request: &OrbitalSynthesisRequest,
    catalog: &dyn CatalogAllocator,
) -> Result<SynthesizedOrbit, SynthesisError> {
    synthesize_at(request, catalog, Utc::now())
}

pub fn synthesize_at(
    request: &OrbitalSynthesisRequest,
    catalog: &dyn CatalogAllocator,
    epoch: DateTime<Utc>,
) -> Result<SynthesizedOrbit, SynthesisError> {
    let definition = request.orbit.definition();

    let altitude_km = resolve_altitude(request)?;
    let inclination_deg = match definition.inclination {
        InclinationRule::Caller { default_deg } => request
            .inclination_deg
            .or(default_deg)
            .ok_or_else(|| {
                SynthesisError::Range(format!("{} requires an inclination", request.orbit))
            })?,
        InclinationRule::Fixed(value) => {
            ignore_override(request.orbit, "inclination", request.inclination_deg, value);
            value
        }
        InclinationRule::SunSynchronous => {
            let derived = sun_synchronous_inclination(altitude_km)?;
            ignore_override(request.orbit, "inclination", request.inclination_deg, derived);
            derived
        }
    };
    if !(0.0..=180.0).contains(&inclination_deg) {
        return Err(SynthesisError::Range(format!(
            "inclination {} outside [0, 180]",
            inclination_deg
        )));
    }

    let eccentricity = match definition.eccentricity {
        EccentricityRule::Default(value) => request.eccentricity.unwrap_or(value),
        EccentricityRule::Fixed(value) => {
            ignore_override(request.orbit, "eccentricity", request.eccentricity, value);
            value
        }
    };
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(SynthesisError::Range(format!(
            "eccentricity {} outside [0, 1)",
            eccentricity
        )));
    }

    let semi_major_axis_km = semi_major_axis_km(altitude_km);
    let perigee_radius_km = semi_major_axis_km * (1.0 - eccentricity);
    if perigee_radius_km <= EARTH_RADIUS_KM {
        return Err(SynthesisError::Range(format!(
            "perigee radius {:.1} km is below the Earth's surface",
            perigee_radius_km
        )));
    }
    let mean_motion = mean_motion_rev_per_day(semi_major_axis_km);
    let catalog_number = catalog.allocate()?;

    let skeleton = TwoLineElement {
        catalog_number,
        classification: 'U',
        international_designator: format!("{:02}001A", epoch.year().rem_euclid(100)),
        epoch,
        mean_motion_dot: DEFAULT_MEAN_MOTION_DOT,
        mean_motion_ddot: 0.0,
        drag_term: DEFAULT_DRAG_TERM,
        ephemeris_type: 0,
        element_set_number: DEFAULT_ELEMENT_SET,
        inclination_deg,
        raan_deg: 0.0,
        eccentricity,
        argument_of_perigee_deg: 0.0,
        mean_anomaly_deg: 0.0,
        mean_motion,
        revolution_number: DEFAULT_REVOLUTION,
        checksums: [0, 0],
        notation: Notation::default(),
    };
    let lines = tle::encode(&skeleton, catalog_number)?;
    // Re-read the wire form so the returned elements carry its precision and checksums.
    let tle = tle::parse(&lines.line1, &lines.line2)?;

    log::debug!(
        "Synthesized {} object {} at {} km (i={:.2}, e={})",
        request.orbit,
        catalog_number,
        altitude_km,
        inclination_deg,
        eccentricity
    );

    Ok(SynthesizedOrbit {
        orbit: request.orbit,
        altitude_km,
        semi_major_axis_km,
        inclination_deg,
        eccentricity,
        mean_motion_rev_per_day: mean_motion,
        period_minutes: 1440.0 / mean_motion,
        lines,
        tle,
    })
}

fn resolve_altitude(request: &OrbitalSynthesisRequest) -> Result<f64, SynthesisError> {
    let definition = request.orbit.definition();
    let altitude = request
        .altitude_km
        .unwrap_or(definition.typical_altitude_km);
    if !altitude.is_finite() || altitude <= 0.0 {
        return Err(SynthesisError::Range(format!(
            "altitude {} km must be positive",
            altitude
        )));
    }
    match definition.altitude {
        AltitudeRule::Range { min_km, max_km } => {
            if !(min_km..=max_km).contains(&altitude) {
                return Err(SynthesisError::Range(format!(
                    "{} altitude {} km outside [{}, {}]",
                    request.orbit, altitude, min_km, max_km
                )));
            }
            Ok(altitude)
        }
        AltitudeRule::Fixed(value) => {
            ignore_override(request.orbit, "altitude", request.altitude_km, value);
            Ok(value)
        }
        AltitudeRule::AnyPositive => Ok(altitude),
    }
}

fn ignore_override(orbit: OrbitType, what: &str, requested: Option<f64>, used: f64) {
    if let Some(requested) = requested {
        if requested != used {
            log::warn!(
                "{} {} is fixed at {}; ignoring requested {}",
                orbit,
                what,
                used,
                requested
            );
        }
    }
}
