//! Error types for the Army actor.

use crate::error::DomainError;
use crate::model::Coord;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArmyError {
    /// No map tile exists at the coordinate the army stands on or marches to.
    #[error("No map tile at {0}")]
    TileNotFound(Coord),

    #[error("Invalid army size: {0}")]
    InvalidSize(u32),

    #[error("Army actor unavailable")]
    Unavailable,

    #[error("Army request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected army reply: {0}")]
    Internal(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for ArmyError {
    fn from(msg: String) -> Self {
        ArmyError::ActorCommunicationError(msg)
    }
}

impl DomainError for ArmyError {
    fn unavailable() -> Self {
        ArmyError::Unavailable
    }

    fn timeout(after: Duration) -> Self {
        ArmyError::Timeout(after)
    }

    fn communication(message: String) -> Self {
        ArmyError::ActorCommunicationError(message)
    }

    fn is_unavailable(&self) -> bool {
        matches!(self, ArmyError::Unavailable)
    }
}
