use thiserror::Error;

use crate::oracle::PropagationError;

#[derive(Debug, Clone, Error)]
pub enum PredictError {
    #[error(transparent)]
    Propagation(#[from] PropagationError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("cancelled")]
    Cancelled,
}
