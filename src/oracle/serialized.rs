use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use super::error::PropagationError;
use super::site::GroundSite;
use super::{Illumination, PropagationOracle, Topocentric};
use crate::tle::TwoLineElement;

/// Shares an oracle that must not be called concurrently by taking a lock
/// around every query.
pub struct SerializedOracle<O> {
    inner: Mutex<O>,
}

impl<O> SerializedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn into_inner(self) -> O {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn with<R>(&self, f: impl FnOnce(&O) -> R) -> R {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

impl<O: PropagationOracle> PropagationOracle for SerializedOracle<O> {
    fn elevation_azimuth(
        &self,
        tle: &TwoLineElement,
        site: &GroundSite,
        time: DateTime<Utc>,
    ) -> Result<Topocentric, PropagationError> {
        self.with(|o| o.elevation_azimuth(tle, site, time))
    }

    fn sun_look_angles(&self, site: &GroundSite, time: DateTime<Utc>) -> Topocentric {
        self.with(|o| o.sun_look_angles(site, time))
    }

    fn eclipse_state(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<Illumination, PropagationError> {
        self.with(|o| o.eclipse_state(tle, time))
    }

    fn approximate_altitude(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<f64, PropagationError> {
        self.with(|o| o.approximate_altitude(tle, time))
    }
}
