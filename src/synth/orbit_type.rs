use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use super::error::SynthesisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum OrbitType {
    #[serde(alias = "leo")]
    Leo,
    #[serde(alias = "meo")]
    Meo,
    #[serde(alias = "geo")]
    Geo,
    #[serde(alias = "sso")]
    Sso,
    #[serde(alias = "molniya")]
    Molniya,
    #[serde(alias = "polar")]
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AltitudeRule {
    Range { min_km: f64, max_km: f64 },
    Fixed(f64),
    AnyPositive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InclinationRule {
    /// Caller value, falling back to the default when there is one.
    Caller { default_deg: Option<f64> },
    Fixed(f64),
    SunSynchronous,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EccentricityRule {
    Default(f64),
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitDefinition {
    pub description: &'static str,
    pub typical_altitude_km: f64,
    pub altitude: AltitudeRule,
    pub inclination: InclinationRule,
    pub eccentricity: EccentricityRule,
}

const LEO: OrbitDefinition = OrbitDefinition {
    description: "Low Earth Orbit",
    typical_altitude_km: 400.0,
    altitude: AltitudeRule::Range {
        min_km: 160.0,
        max_km: 2000.0,
    },
    inclination: InclinationRule::Caller {
        default_deg: Some(0.0),
    },
    eccentricity: EccentricityRule::Default(0.0001),
};

const MEO: OrbitDefinition = OrbitDefinition {
    description: "Medium Earth Orbit",
    typical_altitude_km: 20200.0,
    altitude: AltitudeRule::Range {
        min_km: 2000.0,
        max_km: 35786.0,
    },
    inclination: InclinationRule::Caller { default_deg: None },
    eccentricity: EccentricityRule::Default(0.001),
};

const GEO: OrbitDefinition = OrbitDefinition {
    description: "Geostationary Earth Orbit",
    typical_altitude_km: 35786.0,
    altitude: AltitudeRule::Fixed(35786.0),
    inclination: InclinationRule::Fixed(0.0),
    eccentricity: EccentricityRule::Default(0.0001),
};

const SSO: OrbitDefinition = OrbitDefinition {
    description: "Sun-Synchronous Orbit",
    typical_altitude_km: 800.0,
    altitude: AltitudeRule::Range {
        min_km: 600.0,
        max_km: 1500.0,
    },
    inclination: InclinationRule::SunSynchronous,
    eccentricity: EccentricityRule::Default(0.001),
};

const MOLNIYA: OrbitDefinition = OrbitDefinition {
    description: "Molniya Orbit (highly elliptical)",
    typical_altitude_km: 19100.0,
    altitude: AltitudeRule::Range {
        min_km: 500.0,
        max_km: 39300.0,
    },
    inclination: InclinationRule::Fixed(63.4),
    eccentricity: EccentricityRule::Fixed(0.74),
};

const POLAR: OrbitDefinition = OrbitDefinition {
    description: "Polar Orbit",
    typical_altitude_km: 800.0,
    altitude: AltitudeRule::AnyPositive,
    inclination: InclinationRule::Fixed(90.0),
    eccentricity: EccentricityRule::Default(0.001),
};

impl OrbitType {
    pub const ALL: [OrbitType; 6] = [
        OrbitType::Leo,
        OrbitType::Meo,
        OrbitType::Geo,
        OrbitType::Sso,
        OrbitType::Molniya,
        OrbitType::Polar,
    ];

    pub fn definition(self) -> &'static OrbitDefinition {
        match self {
            OrbitType::Leo => &LEO,
            OrbitType::Meo => &MEO,
            OrbitType::Geo => &GEO,
            OrbitType::Sso => &SSO,
            OrbitType::Molniya => &MOLNIYA,
            OrbitType::Polar => &POLAR,
        }
    }
}

impl FromStr for OrbitType {
    type Err = SynthesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        OrbitType::ALL
            .into_iter()
            .find(|t| t.to_string().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SynthesisError::UnknownOrbitType(s.to_string()))
    }
}
