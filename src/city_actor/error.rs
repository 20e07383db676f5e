//! Error types for the City actor.

use crate::error::DomainError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CityError {
    #[error("City actor unavailable")]
    Unavailable,

    #[error("City request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected city reply: {0}")]
    Internal(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CityError {
    fn from(msg: String) -> Self {
        CityError::ActorCommunicationError(msg)
    }
}

impl DomainError for CityError {
    fn unavailable() -> Self {
        CityError::Unavailable
    }

    fn timeout(after: Duration) -> Self {
        CityError::Timeout(after)
    }

    fn communication(message: String) -> Self {
        CityError::ActorCommunicationError(message)
    }

    fn is_unavailable(&self) -> bool {
        matches!(self, CityError::Unavailable)
    }
}
