//! Low-precision solar ephemeris (about 0.01° over 1950-2050).

use chrono::{DateTime, Utc};

use super::frames::{self, dot, norm};
use super::site::{GroundSite, WGS84_A_KM};
use super::{Illumination, Topocentric};

const AU_KM: f64 = 149_597_870.7;
const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

pub fn julian_date(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

/// Geocentric equatorial position of the Sun (km), mean equinox of date.
pub fn sun_position_eci_km(time: DateTime<Utc>) -> [f64; 3] {
    let n = julian_date(time) - J2000_JD;
    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();
    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();
    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();
    let distance = AU_KM
        * (1.000_14 - 0.016_71 * mean_anomaly.cos() - 0.000_14 * (2.0 * mean_anomaly).cos());

    [
        distance * ecliptic_longitude.cos(),
        distance * obliquity.cos() * ecliptic_longitude.sin(),
        distance * obliquity.sin() * ecliptic_longitude.sin(),
    ]
}

/// Geometric look angles of the Sun's centre from the site.
pub fn sun_look_angles(site: &GroundSite, time: DateTime<Utc>) -> Topocentric {
    let sun_ecef =
        frames::teme_to_ecef_position(sun_position_eci_km(time), frames::sidereal_angle(time));
    frames::look_angles(site, sun_ecef)
}

/// Geometric elevation of the Sun's centre above the site's horizon (deg).
pub fn sun_elevation(site: &GroundSite, time: DateTime<Utc>) -> f64 {
    sun_look_angles(site, time).elevation_deg
}

/// Cylindrical shadow test: eclipsed when behind the Earth and within one
/// Earth radius of the Earth-Sun axis.
pub fn illumination(object_eci_km: [f64; 3], time: DateTime<Utc>) -> Illumination {
    let sun = sun_position_eci_km(time);
    let sun_distance = norm(sun);
    let sun_unit = [
        sun[0] / sun_distance,
        sun[1] / sun_distance,
        sun[2] / sun_distance,
    ];
    let along = dot(object_eci_km, sun_unit);
    if along >= 0.0 {
        return Illumination::Sunlit;
    }
    let perpendicular = [
        object_eci_km[0] - along * sun_unit[0],
        object_eci_km[1] - along * sun_unit[1],
        object_eci_km[2] - along * sun_unit[2],
    ];
    if norm(perpendicular) < WGS84_A_KM {
        Illumination::Eclipsed
    } else {
        Illumination::Sunlit
    }
}
