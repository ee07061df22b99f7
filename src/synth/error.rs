use thiserror::Error;

use crate::tle::TleError;

#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("parameter out of range: {0}")]
    Range(String),
    #[error("unknown orbit type: {0}")]
    UnknownOrbitType(String),
    #[error("encoding failed: {0}")]
    Encode(#[from] TleError),
}
