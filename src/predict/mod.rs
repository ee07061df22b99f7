//! Access-window detection and lighting annotation.

mod cancel;
mod error;
mod events;
pub mod lighting;
mod pass_finder;
mod types;

pub use cancel::CancelToken;
pub use error::PredictError;
pub use events::{
    events_from_windows, format_for_influxdb, InfluxFields, InfluxPoint, InfluxTags,
    INFLUX_MEASUREMENT,
};
pub use lighting::{GroundLighting, LightCondition, SatelliteLighting};
pub use pass_finder::{
    find_access_windows, sample_times, BoundaryPolicy, PassConfig, Refinement,
    DEFAULT_MIN_ELEVATION_DEG, DEFAULT_STEP_SECONDS,
};
pub use types::{AccessEvent, AccessEventKind, AccessWindow, DEFAULT_LOCATION_TYPE};

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::oracle::{
        GroundSite, Illumination, PropagationError, PropagationOracle, Topocentric,
    };
    use crate::tle::{self, TwoLineElement};

    pub const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    pub const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    pub fn origin() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    pub fn at(seconds: f64) -> DateTime<Utc> {
        origin() + Duration::milliseconds((seconds * 1000.0).round() as i64)
    }

    /// Linear rise to `peak` at `center`, reaching -10° at `half_width` either side.
    pub fn tent(t: f64, center: f64, half_width: f64, peak: f64) -> f64 {
        peak - (peak + 10.0) * (t - center).abs() / half_width
    }

    /// Sun azimuth reported by [`ScriptedOracle`].
    pub const SUN_AZIMUTH_DEG: f64 = 250.0;

    type Profile = Box<dyn Fn(f64) -> f64 + Send + Sync>;

    /// Elevation as a function of seconds after [`origin`].
    pub struct ScriptedOracle {
        profile: Profile,
        fail_at: Option<DateTime<Utc>>,
        sun_elevation_deg: f64,
    }

    impl ScriptedOracle {
        pub fn new(profile: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
            Self {
                profile: Box::new(profile),
                fail_at: None,
                sun_elevation_deg: 30.0,
            }
        }

        pub fn failing_at(mut self, time: DateTime<Utc>) -> Self {
            self.fail_at = Some(time);
            self
        }

        pub fn with_sun_elevation(mut self, elevation_deg: f64) -> Self {
            self.sun_elevation_deg = elevation_deg;
            self
        }

        pub fn azimuth(seconds: f64) -> f64 {
            (seconds / 10.0).rem_euclid(360.0)
        }

        pub fn fixtures() -> (TwoLineElement, GroundSite) {
            (
                tle::parse(ISS_LINE1, ISS_LINE2).unwrap(),
                GroundSite::new(48.0, 11.0, 0.0),
            )
        }

        fn seconds(time: DateTime<Utc>) -> f64 {
            (time - origin()).num_milliseconds() as f64 / 1000.0
        }
    }

    impl PropagationOracle for ScriptedOracle {
        fn elevation_azimuth(
            &self,
            _tle: &TwoLineElement,
            _site: &GroundSite,
            time: DateTime<Utc>,
        ) -> Result<Topocentric, PropagationError> {
            if self.fail_at == Some(time) {
                return Err(PropagationError::new(time, "scripted failure"));
            }
            let t = Self::seconds(time);
            Ok(Topocentric {
                elevation_deg: (self.profile)(t),
                azimuth_deg: Self::azimuth(t),
            })
        }

        fn sun_look_angles(&self, _site: &GroundSite, _time: DateTime<Utc>) -> Topocentric {
            Topocentric {
                elevation_deg: self.sun_elevation_deg,
                azimuth_deg: SUN_AZIMUTH_DEG,
            }
        }

        fn eclipse_state(
            &self,
            _tle: &TwoLineElement,
            _time: DateTime<Utc>,
        ) -> Result<Illumination, PropagationError> {
            Ok(Illumination::Sunlit)
        }

        fn approximate_altitude(
            &self,
            _tle: &TwoLineElement,
            _time: DateTime<Utc>,
        ) -> Result<f64, PropagationError> {
            Ok(400.0)
        }
    }
}
