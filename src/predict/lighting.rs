use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

use crate::oracle::{GroundSite, Illumination, PropagationError, PropagationOracle, Topocentric};
use crate::tle::TwoLineElement;

pub const CIVIL_TWILIGHT_DEG: f64 = -6.0;
pub const NAUTICAL_TWILIGHT_DEG: f64 = -12.0;
pub const ASTRONOMICAL_TWILIGHT_DEG: f64 = -18.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LightCondition {
    Daylight,
    CivilTwilight,
    NauticalTwilight,
    AstronomicalTwilight,
    Night,
}

impl LightCondition {
    /// Band containing `sun_elevation_deg`; each band includes its lower edge.
    pub fn from_sun_elevation(sun_elevation_deg: f64) -> Self {
        if sun_elevation_deg >= 0.0 {
            Self::Daylight
        } else if sun_elevation_deg >= CIVIL_TWILIGHT_DEG {
            Self::CivilTwilight
        } else if sun_elevation_deg >= NAUTICAL_TWILIGHT_DEG {
            Self::NauticalTwilight
        } else if sun_elevation_deg >= ASTRONOMICAL_TWILIGHT_DEG {
            Self::AstronomicalTwilight
        } else {
            Self::Night
        }
    }
}

/// Ambient lighting at the site.
///
/// Each twilight flag is set when the site is in that stage; daylight sets
/// all of them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroundLighting {
    pub sun_elevation_deg: f64,
    pub sun_azimuth_deg: f64,
    pub condition: LightCondition,
    pub is_daylight: bool,
    pub civil_twilight: bool,
    pub nautical_twilight: bool,
    pub astronomical_twilight: bool,
    pub is_night: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SatelliteLighting {
    pub condition: Illumination,
    pub in_sunlight: bool,
    pub in_eclipse: bool,
    pub altitude_km: f64,
}

pub fn classify_ground(sun: Topocentric) -> GroundLighting {
    let condition = LightCondition::from_sun_elevation(sun.elevation_deg);
    let daylight = condition == LightCondition::Daylight;
    GroundLighting {
        sun_elevation_deg: sun.elevation_deg,
        sun_azimuth_deg: sun.azimuth_deg,
        condition,
        is_daylight: daylight,
        civil_twilight: daylight || condition == LightCondition::CivilTwilight,
        nautical_twilight: daylight || condition == LightCondition::NauticalTwilight,
        astronomical_twilight: daylight || condition == LightCondition::AstronomicalTwilight,
        is_night: condition == LightCondition::Night,
    }
}

pub fn classify_satellite(illumination: Illumination, altitude_km: f64) -> SatelliteLighting {
    let in_sunlight = illumination == Illumination::Sunlit;
    SatelliteLighting {
        condition: illumination,
        in_sunlight,
        in_eclipse: !in_sunlight,
        altitude_km,
    }
}

/// Lighting of the site and the object at one instant.
pub fn annotate<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    time: DateTime<Utc>,
) -> Result<(GroundLighting, SatelliteLighting), PropagationError> {
    let ground = classify_ground(oracle.sun_look_angles(site, time));
    let satellite = classify_satellite(
        oracle.eclipse_state(tle, time)?,
        oracle.approximate_altitude(tle, time)?,
    );
    Ok((ground, satellite))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sun_at(elevation_deg: f64) -> Topocentric {
        Topocentric {
            elevation_deg,
            azimuth_deg: 120.0,
        }
    }

    #[test]
    fn test_bands() {
        let cases = [
            (45.0, LightCondition::Daylight),
            (0.0, LightCondition::Daylight),
            (-0.1, LightCondition::CivilTwilight),
            (-6.0, LightCondition::CivilTwilight),
            (-6.1, LightCondition::NauticalTwilight),
            (-12.0, LightCondition::NauticalTwilight),
            (-15.0, LightCondition::AstronomicalTwilight),
            (-18.0, LightCondition::AstronomicalTwilight),
            (-18.5, LightCondition::Night),
            (-90.0, LightCondition::Night),
        ];
        for (elevation, expected) in cases {
            assert_eq!(LightCondition::from_sun_elevation(elevation), expected, "{}", elevation);
        }
    }

    #[test]
    fn test_civil_twilight_flags() {
        let lighting = classify_ground(sun_at(-3.0));
        assert_eq!(lighting.condition, LightCondition::CivilTwilight);
        assert!(lighting.civil_twilight);
        assert!(!lighting.nautical_twilight);
        assert!(!lighting.astronomical_twilight);
        assert!(!lighting.is_daylight);
        assert!(!lighting.is_night);
    }

    #[test]
    fn test_daylight_sets_all_twilight_flags() {
        let lighting = classify_ground(sun_at(10.0));
        assert!(lighting.is_daylight);
        assert!(lighting.civil_twilight);
        assert!(lighting.nautical_twilight);
        assert!(lighting.astronomical_twilight);

        let night = classify_ground(sun_at(-30.0));
        assert!(night.is_night);
        assert!(!night.civil_twilight && !night.nautical_twilight && !night.astronomical_twilight);
    }

    #[test]
    fn test_condition_serializes_snake_case() {
        let json = serde_json::to_value(classify_ground(sun_at(-14.0))).unwrap();
        assert_eq!(json["condition"], "astronomical_twilight");
        assert_eq!(json["sun_azimuth_deg"], 120.0);
        assert_eq!(LightCondition::NauticalTwilight.to_string(), "nautical_twilight");
    }

    #[test]
    fn test_satellite_flags_exclusive() {
        let lit = classify_satellite(Illumination::Sunlit, 410.0);
        assert!(lit.in_sunlight && !lit.in_eclipse);
        let dark = classify_satellite(Illumination::Eclipsed, 410.0);
        assert!(!dark.in_sunlight && dark.in_eclipse);

        let json = serde_json::to_value(dark).unwrap();
        assert_eq!(json["condition"], "eclipsed");
        assert_eq!(serde_json::to_value(lit).unwrap()["condition"], "sunlit");
    }

    #[test]
    fn test_annotate_reports_sun_azimuth() {
        use crate::predict::testing::{origin, ScriptedOracle, SUN_AZIMUTH_DEG};

        let oracle = ScriptedOracle::new(|_| 20.0).with_sun_elevation(-8.0);
        let (tle, site) = ScriptedOracle::fixtures();
        let (ground, satellite) = annotate(&oracle, &tle, &site, origin()).unwrap();
        assert_eq!(ground.condition, LightCondition::NauticalTwilight);
        assert_eq!(ground.sun_azimuth_deg, SUN_AZIMUTH_DEG);
        assert_eq!(satellite.condition, Illumination::Sunlit);
    }
}
