use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

use super::lighting::{GroundLighting, SatelliteLighting};

/// One continuous interval with the object above the elevation threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessWindow {
    pub aos_time: DateTime<Utc>,
    pub culmination_time: DateTime<Utc>,
    pub los_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub culmination_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    /// Already visible at the start of the query range.
    pub open_at_start: bool,
    /// Still visible at the end of the query range.
    pub open_at_end: bool,
    pub ground_lighting: GroundLighting,
    pub satellite_lighting: SatelliteLighting,
}

impl AccessWindow {
    pub fn is_partial(&self) -> bool {
        self.open_at_start || self.open_at_end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccessEventKind {
    Aos,
    Culmination,
    Los,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: AccessEventKind,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    pub satellite_id: String,
    pub location_id: String,
    /// Kind of location the event was computed for, `ground_station` unless
    /// the site says otherwise.
    pub location_type: String,
}

pub const DEFAULT_LOCATION_TYPE: &str = "ground_station";
