use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use super::error::TleError;
use super::fields;

/// Orbital elements of one object as carried by a two-line element set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoLineElement {
    pub catalog_number: u32,
    pub classification: char,
    pub international_designator: String,
    pub epoch: DateTime<Utc>,
    /// First derivative of mean motion divided by two (rev/day²).
    pub mean_motion_dot: f64,
    /// Second derivative of mean motion divided by six (rev/day³).
    pub mean_motion_ddot: f64,
    /// B* drag term (1/earth radii).
    pub drag_term: f64,
    pub ephemeris_type: u8,
    pub element_set_number: u16,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub eccentricity: f64,
    pub argument_of_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
    /// Revolutions per day.
    pub mean_motion: f64,
    pub revolution_number: u32,
    /// Trailing checksum digit of line 1 and line 2.
    pub checksums: [u8; 2],
    /// How the source lines wrote fields whose values leave the text ambiguous.
    pub notation: Notation,
}

impl TwoLineElement {
    pub fn epoch_year(&self) -> i32 {
        self.epoch.year()
    }

    pub fn epoch_day(&self) -> f64 {
        fields::day_of_year(self.epoch)
    }

    pub fn period_minutes(&self) -> f64 {
        1440.0 / self.mean_motion
    }

    pub fn to_lines(&self) -> Result<TleLines, TleError> {
        super::encode(self, self.catalog_number)
    }
}

/// How an integer field fills columns the value does not need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    Space,
    Zero,
    /// All columns blank; read as zero.
    Blank,
}

/// Column conventions recovered from parsed lines so that encoding them again
/// reproduces the input exactly.
///
/// The defaults are what a freshly built element set is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Notation {
    /// Catalog number field of line 1 and line 2.
    pub catalog: [Padding; 2],
    pub ephemeris_type: Padding,
    pub element_set_number: Padding,
    pub revolution_number: Padding,
    /// Sign in front of a `0` exponent digit of the second derivative and drag
    /// fields, when the source wrote one. `None` writes `-0` for zero values
    /// and `+0` otherwise.
    pub zero_exponent_sign: [Option<char>; 2],
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            catalog: [Padding::Zero; 2],
            ephemeris_type: Padding::Space,
            element_set_number: Padding::Space,
            revolution_number: Padding::Space,
            zero_exponent_sign: [None, None],
        }
    }
}

/// The two 69-column text lines of an element set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TleLines {
    pub line1: String,
    pub line2: String,
}
