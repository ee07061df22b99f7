//! Rotations between the inertial propagation frame, Earth-fixed and local horizon frames.

use chrono::{DateTime, Utc};

use super::site::GroundSite;
use super::Topocentric;

/// Greenwich mean sidereal angle (rad) at `time`.
pub fn sidereal_angle(time: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()))
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Elevation and azimuth of an Earth-fixed point as seen from `site`.
pub fn look_angles(site: &GroundSite, target_ecef_km: [f64; 3]) -> Topocentric {
    let origin = site.position_ecef_km();
    let dr = [
        target_ecef_km[0] - origin[0],
        target_ecef_km[1] - origin[1],
        target_ecef_km[2] - origin[2],
    ];
    let range = norm(dr);
    let (east, north, up) = ecef_to_enu(dr, site.lat_rad(), site.lon_rad());
    let elevation_deg = if range > 0.0 {
        (up / range).clamp(-1.0, 1.0).asin().to_degrees()
    } else {
        90.0
    };
    Topocentric {
        elevation_deg,
        azimuth_deg: east.atan2(north).to_degrees().rem_euclid(360.0),
    }
}

pub fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zenith_and_horizon() {
        let site = GroundSite::new(0.0, 0.0, 0.0);
        let overhead = look_angles(&site, [7000.0, 0.0, 0.0]);
        assert_abs_diff_eq!(overhead.elevation_deg, 90.0, epsilon = 1e-9);

        let north = look_angles(&site, [6378.137, 0.0, 1000.0]);
        assert_abs_diff_eq!(north.elevation_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(north.azimuth_deg, 0.0, epsilon = 1e-9);

        let east = look_angles(&site, [6378.137, 1000.0, 0.0]);
        assert_abs_diff_eq!(east.azimuth_deg, 90.0, epsilon = 1e-9);

        let west = look_angles(&site, [6378.137, -1000.0, 0.0]);
        assert_abs_diff_eq!(west.azimuth_deg, 270.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let v = [1234.0, -5678.0, 910.0];
        let r = teme_to_ecef_position(v, 1.234);
        assert_abs_diff_eq!(norm(r), norm(v), epsilon = 1e-9);
        assert_eq!(r[2], v[2]);
    }
}
