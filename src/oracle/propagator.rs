use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::error::PropagationError;
use super::frames::{self, norm};
use super::site::{GroundSite, WGS84_A_KM};
use super::{sun, Illumination, PropagationOracle, Topocentric};
use crate::tle::TwoLineElement;

/// Identity of an element set; two parses of the same lines share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ElementsKey {
    catalog_number: u32,
    epoch_nanos: i64,
    fields: [u64; 7],
}

impl ElementsKey {
    fn of(tle: &TwoLineElement) -> Self {
        Self {
            catalog_number: tle.catalog_number,
            epoch_nanos: tle.epoch.timestamp_nanos_opt().unwrap_or(i64::MIN),
            fields: [
                tle.inclination_deg.to_bits(),
                tle.raan_deg.to_bits(),
                tle.eccentricity.to_bits(),
                tle.argument_of_perigee_deg.to_bits(),
                tle.mean_anomaly_deg.to_bits(),
                tle.mean_motion.to_bits(),
                tle.drag_term.to_bits(),
            ],
        }
    }
}

struct Prepared {
    elements: Elements,
    constants: Constants,
}

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Oracle backed by the `sgp4` crate with a per-element-set propagator cache.
///
/// The cache holds at most `capacity` element sets and starts over once full.
pub struct SgpOracle {
    cache: RwLock<HashMap<ElementsKey, Arc<Prepared>>>,
    capacity: usize,
}

impl Default for SgpOracle {
    fn default() -> Self {
        Self::with_cache_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl SgpOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn cached_element_sets(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    /// Drop every prepared propagator.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    fn prepare(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<Arc<Prepared>, PropagationError> {
        let key = ElementsKey::of(tle);
        if let Ok(cache) = self.cache.read() {
            if let Some(prepared) = cache.get(&key) {
                return Ok(Arc::clone(prepared));
            }
        }

        let lines = tle
            .to_lines()
            .map_err(|e| PropagationError::new(time, e.to_string()))?;
        let elements = Elements::from_tle(None, lines.line1.as_bytes(), lines.line2.as_bytes())
            .map_err(|e| PropagationError::new(time, e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PropagationError::new(time, e.to_string()))?;
        let prepared = Arc::new(Prepared {
            elements,
            constants,
        });

        if let Ok(mut cache) = self.cache.write() {
            if cache.len() >= self.capacity && !cache.contains_key(&key) {
                log::debug!("Propagator cache full at {} element sets, clearing", cache.len());
                cache.clear();
            }
            cache.insert(key, Arc::clone(&prepared));
        }
        Ok(prepared)
    }

    /// Object position in the TEME frame (km).
    pub fn position_teme_km(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<[f64; 3], PropagationError> {
        let prepared = self.prepare(tle, time)?;
        let minutes = prepared
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PropagationError::new(time, e.to_string()))?;
        let prediction = prepared
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::new(time, e.to_string()))?;
        Ok(prediction.position)
    }
}

impl PropagationOracle for SgpOracle {
    fn elevation_azimuth(
        &self,
        tle: &TwoLineElement,
        site: &GroundSite,
        time: DateTime<Utc>,
    ) -> Result<Topocentric, PropagationError> {
        let teme = self.position_teme_km(tle, time)?;
        let ecef = frames::teme_to_ecef_position(teme, frames::sidereal_angle(time));
        Ok(frames::look_angles(site, ecef))
    }

    fn sun_look_angles(&self, site: &GroundSite, time: DateTime<Utc>) -> Topocentric {
        sun::sun_look_angles(site, time)
    }

    fn eclipse_state(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<Illumination, PropagationError> {
        let teme = self.position_teme_km(tle, time)?;
        Ok(sun::illumination(teme, time))
    }

    fn approximate_altitude(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<f64, PropagationError> {
        Ok(norm(self.position_teme_km(tle, time)?) - WGS84_A_KM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tle;
    use chrono::{Duration, TimeZone};

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn test_iss_altitude_is_leo() {
        let oracle = SgpOracle::new();
        let tle = tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        for minutes in [0, 30, 60, 90] {
            let altitude = oracle
                .approximate_altitude(&tle, tle.epoch + Duration::minutes(minutes))
                .unwrap();
            assert!((300.0..450.0).contains(&altitude), "altitude {}", altitude);
        }
        assert_eq!(oracle.cached_element_sets(), 1);
    }

    #[test]
    fn test_cache_is_bounded_and_clearable() {
        let oracle = SgpOracle::with_cache_capacity(2);
        let base = tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        for anomaly in [10.0, 20.0, 30.0] {
            let tle = TwoLineElement {
                mean_anomaly_deg: anomaly,
                ..base.clone()
            };
            oracle.approximate_altitude(&tle, tle.epoch).unwrap();
            assert!(oracle.cached_element_sets() <= 2);
        }
        assert_eq!(oracle.cached_element_sets(), 1);

        oracle.approximate_altitude(&base, base.epoch).unwrap();
        assert_eq!(oracle.cached_element_sets(), 2);
        oracle.clear_cache();
        assert_eq!(oracle.cached_element_sets(), 0);
    }

    #[test]
    fn test_look_angles_are_in_range() {
        let oracle = SgpOracle::new();
        let tle = tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let site = GroundSite::new(48.0, 11.0, 500.0);
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 0, 0, 0).unwrap();
        for step in 0..120 {
            let look = oracle
                .elevation_azimuth(&tle, &site, start + Duration::minutes(step))
                .unwrap();
            assert!((-90.0..=90.0).contains(&look.elevation_deg));
            assert!((0.0..360.0).contains(&look.azimuth_deg));
        }
    }

    #[test]
    fn test_orbit_has_eclipse_and_sunlight() {
        let oracle = SgpOracle::new();
        let tle = tle::parse(ISS_LINE1, ISS_LINE2).unwrap();
        let states: Vec<_> = (0..92)
            .map(|m| {
                oracle
                    .eclipse_state(&tle, tle.epoch + Duration::minutes(m))
                    .unwrap()
            })
            .collect();
        assert!(states.contains(&Illumination::Sunlit));
        assert!(states.contains(&Illumination::Eclipsed));
    }
}
