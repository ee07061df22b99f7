//! Two-line element codec: parsing, validation and fixed-width encoding.

mod checksum;
mod codec;
mod error;
pub mod fields;
pub mod loader;
mod types;
mod validate;

pub use checksum::checksum;
pub use codec::{encode, parse, LINE_LENGTH, MAX_CATALOG_NUMBER};
pub use error::{LoadError, TleError};
pub use loader::{parse_multi_tle, NamedTle, TleLoader};
pub use types::{Notation, Padding, TleLines, TwoLineElement};
pub use validate::{validate, TleReport};
