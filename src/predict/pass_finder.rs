use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::cancel::CancelToken;
use super::error::PredictError;
use super::lighting;
use super::types::AccessWindow;
use crate::oracle::{GroundSite, PropagationOracle, Topocentric};
use crate::tle::TwoLineElement;

pub const DEFAULT_MIN_ELEVATION_DEG: f64 = 10.0;
pub const DEFAULT_STEP_SECONDS: i64 = 30;
const FINE_STEP_MILLIS: i64 = 1000;

/// Treatment of windows cut off by the query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Keep them, with AOS at the range start or LOS at the range end.
    #[default]
    Partial,
    /// Drop them.
    FullOnly,
}

/// Optional searches on top of the sampled result. Both are off by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Refinement {
    /// Bisect AOS and LOS to one-second resolution.
    pub crossings: bool,
    /// Ternary search for the peak within one step of the sampled culmination.
    pub culmination: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassConfig {
    pub min_elevation_deg: f64,
    pub step: Duration,
    pub boundary: BoundaryPolicy,
    pub refine: Refinement,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: DEFAULT_MIN_ELEVATION_DEG,
            step: Duration::seconds(DEFAULT_STEP_SECONDS),
            boundary: BoundaryPolicy::default(),
            refine: Refinement::default(),
        }
    }
}

impl PassConfig {
    pub fn validate(&self) -> Result<(), PredictError> {
        if !(0.0..=90.0).contains(&self.min_elevation_deg) {
            return Err(PredictError::InvalidInput(format!(
                "elevation threshold {} outside [0, 90]",
                self.min_elevation_deg
            )));
        }
        if self.step <= Duration::zero() {
            return Err(PredictError::InvalidInput("step must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    time: DateTime<Utc>,
    look: Topocentric,
}

impl Sample {
    fn elevation(&self) -> f64 {
        self.look.elevation_deg
    }
}

struct OpenWindow {
    aos: Sample,
    peak: Sample,
    open_at_start: bool,
}

/// Instants `start, start + step, ...` followed by `end` itself.
pub fn sample_times(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
) -> impl Iterator<Item = DateTime<Utc>> {
    let mut next = (start <= end && step > Duration::zero()).then_some(start);
    std::iter::from_fn(move || {
        let current = next?;
        next = if current >= end {
            None
        } else {
            current.checked_add_signed(step).map(|t| t.min(end))
        };
        Some(current)
    })
}

/// Sweep `[start, end]` and return the access windows of one object over one site.
///
/// Windows open at the first sample at or above the threshold and close at
/// the first sample below it. Culmination is the highest sample, earliest on
/// ties, so its accuracy is bounded by the step unless refinement is enabled.
/// Any oracle failure fails the whole sweep.
pub fn find_access_windows<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    config: &PassConfig,
    cancel: &CancelToken,
) -> Result<Vec<AccessWindow>, PredictError> {
    site.validate().map_err(PredictError::InvalidInput)?;
    config.validate()?;
    if start >= end {
        return Err(PredictError::InvalidInput(format!(
            "start {} is not before end {}",
            start, end
        )));
    }

    let threshold = config.min_elevation_deg;
    let mut windows = Vec::new();
    let mut open: Option<OpenWindow> = None;
    let mut previous: Option<Sample> = None;

    for time in sample_times(start, end, config.step) {
        cancel.check()?;
        let sample = observe(oracle, tle, site, time)?;
        let visible = sample.elevation() >= threshold;

        match open.take() {
            None if visible => {
                let aos = match previous {
                    Some(before) if config.refine.crossings => {
                        refine_crossing(oracle, tle, site, before.time, sample, threshold, true)?
                    }
                    _ => sample,
                };
                open = Some(OpenWindow {
                    aos,
                    peak: sample,
                    open_at_start: previous.is_none(),
                });
            }
            None => {}
            Some(mut window) if visible => {
                if sample.elevation() > window.peak.elevation() {
                    window.peak = sample;
                }
                open = Some(window);
            }
            Some(window) => {
                let last_visible = previous.unwrap_or(window.peak);
                let los = if config.refine.crossings {
                    refine_crossing(oracle, tle, site, last_visible.time, sample, threshold, false)?
                } else {
                    sample
                };
                if let Some(closed) =
                    close_window(oracle, tle, site, window, last_visible, los, false, config)?
                {
                    windows.push(closed);
                }
            }
        }
        previous = Some(sample);
    }

    if let (Some(window), Some(last)) = (open, previous) {
        if let Some(closed) = close_window(oracle, tle, site, window, last, last, true, config)? {
            windows.push(closed);
        }
    }

    log::debug!(
        "{} access windows for {} between {} and {}",
        windows.len(),
        tle.catalog_number,
        start,
        end
    );
    Ok(windows)
}

fn observe<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    time: DateTime<Utc>,
) -> Result<Sample, PredictError> {
    Ok(Sample {
        time,
        look: oracle.elevation_azimuth(tle, site, time)?,
    })
}

#[allow(clippy::too_many_arguments)]
fn close_window<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    window: OpenWindow,
    last_visible: Sample,
    los: Sample,
    open_at_end: bool,
    config: &PassConfig,
) -> Result<Option<AccessWindow>, PredictError> {
    if config.boundary == BoundaryPolicy::FullOnly && (window.open_at_start || open_at_end) {
        return Ok(None);
    }
    let peak = if config.refine.culmination {
        refine_culmination(oracle, tle, site, &window, last_visible.time, config.step)?
    } else {
        window.peak
    };
    let (ground_lighting, satellite_lighting) = lighting::annotate(oracle, tle, site, peak.time)?;

    Ok(Some(AccessWindow {
        aos_time: window.aos.time,
        culmination_time: peak.time,
        los_time: los.time,
        duration_seconds: (los.time - window.aos.time).num_milliseconds() as f64 / 1000.0,
        max_elevation_deg: peak.elevation(),
        aos_azimuth_deg: window.aos.look.azimuth_deg,
        culmination_azimuth_deg: peak.look.azimuth_deg,
        los_azimuth_deg: los.look.azimuth_deg,
        open_at_start: window.open_at_start,
        open_at_end,
        ground_lighting,
        satellite_lighting,
    }))
}

/// Bisect between a sample on one side of the threshold and `after` on the
/// other; returns the first sample on `after`'s side.
fn refine_crossing<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    before: DateTime<Utc>,
    after: Sample,
    threshold: f64,
    rising: bool,
) -> Result<Sample, PredictError> {
    let mut low = before;
    let mut high = after;

    while (high.time - low).num_milliseconds() > FINE_STEP_MILLIS {
        let mid = observe(oracle, tle, site, low + (high.time - low) / 2)?;
        let above = mid.elevation() >= threshold;
        if above == rising {
            high = mid;
        } else {
            low = mid.time;
        }
    }
    Ok(high)
}

fn refine_culmination<O: PropagationOracle + ?Sized>(
    oracle: &O,
    tle: &TwoLineElement,
    site: &GroundSite,
    window: &OpenWindow,
    last_visible: DateTime<Utc>,
    step: Duration,
) -> Result<Sample, PredictError> {
    let sampled = window.peak;
    let mut lo = (sampled.time - step).max(window.aos.time);
    let mut hi = (sampled.time + step).min(last_visible);

    while (hi - lo).num_milliseconds() > FINE_STEP_MILLIS {
        let third = (hi - lo) / 3;
        let left = observe(oracle, tle, site, lo + third)?;
        let right = observe(oracle, tle, site, hi - third)?;
        if left.elevation() < right.elevation() {
            lo = left.time;
        } else {
            hi = right.time;
        }
    }

    let candidate = observe(oracle, tle, site, lo + (hi - lo) / 2)?;
    Ok(if candidate.elevation() > sampled.elevation() {
        candidate
    } else {
        sampled
    })
}
