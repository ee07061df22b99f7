use chrono::{DateTime, Utc};
use thiserror::Error;

/// The oracle could not produce a value for one instant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("propagation failed at {time}: {message}")]
pub struct PropagationError {
    pub time: DateTime<Utc>,
    pub message: String,
}

impl PropagationError {
    pub fn new(time: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            time,
            message: message.into(),
        }
    }
}
