use serde::Serialize;
use thiserror::Error;

use crate::predict::PredictError;
use crate::synth::SynthesisError;
use crate::tle::TleError;

/// Why one satellite/site pair produced no windows.
#[derive(Debug, Clone, Error)]
pub enum PairError {
    #[error(transparent)]
    Tle(#[from] TleError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

impl PairError {
    /// Stable category name used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            PairError::Tle(e) | PairError::Synthesis(SynthesisError::Encode(e)) => match e {
                TleError::Format { .. } => "format",
                TleError::Checksum { .. } => "checksum",
                TleError::Consistency { .. } => "consistency",
            },
            PairError::Synthesis(SynthesisError::Range(_)) => "range",
            PairError::Synthesis(SynthesisError::UnknownOrbitType(_)) => "unknown_orbit_type",
            PairError::Predict(PredictError::Propagation(_)) => "propagation",
            PairError::Predict(PredictError::InvalidInput(_)) => "invalid_input",
            PairError::Predict(PredictError::Cancelled) => "cancelled",
        }
    }

    pub fn to_failure(&self) -> PairFailure {
        PairFailure {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid batch: {0}")]
    InvalidInput(String),
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Reported form of a [`PairError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairFailure {
    pub kind: &'static str,
    pub message: String,
}
