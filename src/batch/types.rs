use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::PairFailure;
use crate::oracle::GroundSite;
use crate::predict::{
    format_for_influxdb, AccessEvent, AccessWindow, InfluxPoint, PassConfig, DEFAULT_LOCATION_TYPE,
};
use crate::synth::OrbitalSynthesisRequest;
use crate::tle::TwoLineElement;

/// Where a satellite's element set comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SatelliteSource {
    Lines { line1: String, line2: String },
    Elements(Box<TwoLineElement>),
    Synthesize(OrbitalSynthesisRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SatelliteInput {
    pub label: String,
    pub source: SatelliteSource,
}

impl SatelliteInput {
    pub fn from_lines(label: impl Into<String>, line1: &str, line2: &str) -> Self {
        Self {
            label: label.into(),
            source: SatelliteSource::Lines {
                line1: line1.to_string(),
                line2: line2.to_string(),
            },
        }
    }

    pub fn from_elements(label: impl Into<String>, tle: TwoLineElement) -> Self {
        Self {
            label: label.into(),
            source: SatelliteSource::Elements(Box::new(tle)),
        }
    }

    pub fn synthesized(label: impl Into<String>, request: OrbitalSynthesisRequest) -> Self {
        Self {
            label: label.into(),
            source: SatelliteSource::Synthesize(request),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInput {
    pub label: String,
    pub site: GroundSite,
    /// Carried into the events of this site.
    #[serde(default = "default_location_type")]
    pub location_type: String,
}

fn default_location_type() -> String {
    DEFAULT_LOCATION_TYPE.to_string()
}

impl SiteInput {
    pub fn new(label: impl Into<String>, site: GroundSite) -> Self {
        Self {
            label: label.into(),
            site,
            location_type: DEFAULT_LOCATION_TYPE.to_string(),
        }
    }

    pub fn with_location_type(mut self, location_type: impl Into<String>) -> Self {
        self.location_type = location_type.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub satellites: Vec<SatelliteInput>,
    pub sites: Vec<SiteInput>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub pass: PassConfig,
    /// Upper bound on pairs evaluated at once.
    pub workers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOutcome {
    Windows(Vec<AccessWindow>),
    Error(PairFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairResult {
    pub satellite: String,
    pub site: String,
    pub location_type: String,
    pub catalog_number: Option<u32>,
    #[serde(flatten)]
    pub outcome: PairOutcome,
}

impl PairResult {
    pub fn windows(&self) -> Option<&[AccessWindow]> {
        match &self.outcome {
            PairOutcome::Windows(windows) => Some(windows.as_slice()),
            PairOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PairFailure> {
        match &self.outcome {
            PairOutcome::Error(failure) => Some(failure),
            PairOutcome::Windows(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Satellites times sites.
    pub pairs_total: usize,
    /// Pairs that ran to completion, successfully or not.
    pub pairs_attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_windows: usize,
    pub total_duration_seconds: f64,
    pub max_elevation_deg: Option<f64>,
}

impl BatchSummary {
    pub fn from_pairs(pairs: &[PairResult], pairs_total: usize) -> Self {
        let mut summary = BatchSummary {
            pairs_total,
            pairs_attempted: pairs.len(),
            ..Default::default()
        };
        for pair in pairs {
            match &pair.outcome {
                PairOutcome::Windows(windows) => {
                    summary.succeeded += 1;
                    summary.total_windows += windows.len();
                    for window in windows {
                        summary.total_duration_seconds += window.duration_seconds;
                        let elevation = window.max_elevation_deg;
                        summary.max_elevation_deg = Some(
                            summary
                                .max_elevation_deg
                                .map_or(elevation, |m| m.max(elevation)),
                        );
                    }
                }
                PairOutcome::Error(_) => summary.failed += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_elevation_deg: f64,
    /// Satellite-major, site-minor.
    pub pairs: Vec<PairResult>,
    pub summary: BatchSummary,
    pub cancelled: bool,
}

impl BatchResult {
    /// AOS, culmination and LOS events of every successful pair, ordered by time.
    pub fn events(&self) -> Vec<AccessEvent> {
        let mut events: Vec<_> = self
            .pairs
            .iter()
            .filter_map(|pair| {
                pair.windows().map(|windows| {
                    crate::predict::events_from_windows(
                        windows,
                        &pair.satellite,
                        &pair.site,
                        &pair.location_type,
                        self.min_elevation_deg,
                    )
                })
            })
            .flatten()
            .collect();
        events.sort_by_key(|e| e.timestamp);
        events
    }

    /// [`BatchResult::events`] as InfluxDB points.
    pub fn influx_points(&self) -> Vec<InfluxPoint> {
        format_for_influxdb(&self.events())
    }
}
