use serde::{Deserialize, Serialize};

/// WGS-84 equatorial radius (km).
pub const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Observer location on the reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSite {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Height above the ellipsoid; may be negative.
    #[serde(default)]
    pub elevation_m: f64,
}

impl Default for GroundSite {
    fn default() -> Self {
        Self {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
            elevation_m: 0.0,
        }
    }
}

impl GroundSite {
    pub fn new(latitude_deg: f64, longitude_deg: f64, elevation_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m,
        }
    }

    /// Parses `"lat, lon"` as written in configuration files.
    pub fn from_coordinates(coordinates: &str, elevation_m: Option<f64>) -> Option<Self> {
        let mut parts = coordinates.split(',').map(str::trim);
        let lat = parts.next()?.parse().ok()?;
        let lon = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(lat, lon, elevation_m.unwrap_or(0.0)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(format!("latitude {} outside [-90, 90]", self.latitude_deg));
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            ));
        }
        if !self.elevation_m.is_finite() {
            return Err("elevation must be finite".into());
        }
        Ok(())
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn lon_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn position_ecef_km(&self) -> [f64; 3] {
        let lat = self.lat_rad();
        let lon = self.lon_rad();
        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        let h = self.elevation_m / 1000.0;
        [
            (n + h) * cos_lat * lon.cos(),
            (n + h) * cos_lat * lon.sin(),
            (n * (1.0 - WGS84_E2) + h) * sin_lat,
        ]
    }
}
