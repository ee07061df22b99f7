//! Propagation oracle: turns an element set and an instant into look angles,
//! solar geometry and illumination.

mod error;
pub mod frames;
mod propagator;
mod serialized;
mod site;
pub mod sun;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use error::PropagationError;
pub use propagator::{SgpOracle, DEFAULT_CACHE_CAPACITY};
pub use serialized::SerializedOracle;
pub use site::{GroundSite, WGS84_A_KM};

use crate::tle::TwoLineElement;

/// Look angles from a site (degrees, azimuth clockwise from north).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Topocentric {
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Illumination {
    Sunlit,
    Eclipsed,
}

/// Source of geometry for pass detection and lighting.
///
/// Implementations must be pure with respect to their inputs. Callers that
/// fan out across threads additionally require `Sync`; wrap an oracle that
/// cannot be shared in [`SerializedOracle`].
pub trait PropagationOracle {
    fn elevation_azimuth(
        &self,
        tle: &TwoLineElement,
        site: &GroundSite,
        time: DateTime<Utc>,
    ) -> Result<Topocentric, PropagationError>;

    /// Elevation and azimuth of the Sun's centre from the site.
    fn sun_look_angles(&self, site: &GroundSite, time: DateTime<Utc>) -> Topocentric;

    fn sun_elevation(&self, site: &GroundSite, time: DateTime<Utc>) -> f64 {
        self.sun_look_angles(site, time).elevation_deg
    }

    fn eclipse_state(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<Illumination, PropagationError>;

    /// Height above the equatorial radius (km).
    fn approximate_altitude(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<f64, PropagationError>;
}

impl<O: PropagationOracle + ?Sized> PropagationOracle for Arc<O> {
    fn elevation_azimuth(
        &self,
        tle: &TwoLineElement,
        site: &GroundSite,
        time: DateTime<Utc>,
    ) -> Result<Topocentric, PropagationError> {
        (**self).elevation_azimuth(tle, site, time)
    }

    fn sun_look_angles(&self, site: &GroundSite, time: DateTime<Utc>) -> Topocentric {
        (**self).sun_look_angles(site, time)
    }

    fn eclipse_state(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<Illumination, PropagationError> {
        (**self).eclipse_state(tle, time)
    }

    fn approximate_altitude(
        &self,
        tle: &TwoLineElement,
        time: DateTime<Utc>,
    ) -> Result<f64, PropagationError> {
        (**self).approximate_altitude(tle, time)
    }
}
