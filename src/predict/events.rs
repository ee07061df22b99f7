use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{AccessEvent, AccessEventKind, AccessWindow};

pub const INFLUX_MEASUREMENT: &str = "satellite_access";

/// Flattens windows into AOS, culmination and LOS events ordered by time.
///
/// AOS and LOS carry the threshold as their elevation.
pub fn events_from_windows(
    windows: &[AccessWindow],
    satellite_id: &str,
    location_id: &str,
    location_type: &str,
    min_elevation_deg: f64,
) -> Vec<AccessEvent> {
    let event = |timestamp: DateTime<Utc>,
                 event_type: AccessEventKind,
                 elevation_deg: f64,
                 azimuth_deg: f64| AccessEvent {
        timestamp,
        event_type,
        elevation_deg,
        azimuth_deg,
        satellite_id: satellite_id.to_string(),
        location_id: location_id.to_string(),
        location_type: location_type.to_string(),
    };

    let mut events: Vec<_> = windows
        .iter()
        .flat_map(|w| {
            [
                event(w.aos_time, AccessEventKind::Aos, min_elevation_deg, w.aos_azimuth_deg),
                event(
                    w.culmination_time,
                    AccessEventKind::Culmination,
                    w.max_elevation_deg,
                    w.culmination_azimuth_deg,
                ),
                event(w.los_time, AccessEventKind::Los, min_elevation_deg, w.los_azimuth_deg),
            ]
        })
        .collect();
    events.sort_by_key(|e| e.timestamp);
    events
}

/// An access event shaped as an InfluxDB point: identifiers as tags, angles
/// as fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluxPoint {
    pub measurement: &'static str,
    pub tags: InfluxTags,
    pub fields: InfluxFields,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluxTags {
    pub satellite_id: String,
    pub location_id: String,
    pub location_type: String,
    pub event_type: AccessEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfluxFields {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

impl InfluxPoint {
    /// Line protocol form, timestamp in nanoseconds.
    pub fn to_line_protocol(&self) -> String {
        let tags = format!(
            "event_type={},location_id={},location_type={},satellite_id={}",
            self.tags.event_type,
            escape_tag(&self.tags.location_id),
            escape_tag(&self.tags.location_type),
            escape_tag(&self.tags.satellite_id),
        );
        let nanos = self
            .time
            .timestamp_nanos_opt()
            .unwrap_or_else(|| self.time.timestamp_millis() * 1_000_000);
        format!(
            "{},{} elevation_deg={},azimuth_deg={} {}",
            self.measurement, tags, self.fields.elevation_deg, self.fields.azimuth_deg, nanos
        )
    }
}

impl From<&AccessEvent> for InfluxPoint {
    fn from(event: &AccessEvent) -> Self {
        Self {
            measurement: INFLUX_MEASUREMENT,
            tags: InfluxTags {
                satellite_id: event.satellite_id.clone(),
                location_id: event.location_id.clone(),
                location_type: event.location_type.clone(),
                event_type: event.event_type,
            },
            fields: InfluxFields {
                elevation_deg: event.elevation_deg,
                azimuth_deg: event.azimuth_deg,
            },
            time: event.timestamp,
        }
    }
}

pub fn format_for_influxdb(events: &[AccessEvent]) -> Vec<InfluxPoint> {
    events.iter().map(InfluxPoint::from).collect()
}

/// Tag keys and values escape commas, equals signs and spaces.
fn escape_tag(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
