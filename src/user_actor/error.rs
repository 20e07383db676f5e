//! Error types for the User actor.

use crate::error::DomainError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// A checked spend asked for more gold than the wallet holds.
    #[error("Insufficient gold: requested {requested}, available {available}")]
    InsufficientFunds { requested: i64, available: i64 },

    /// Spends must be positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// An adjustment would take a balance past the `i64` range.
    #[error("Balance overflow: {balance} + {delta}")]
    BalanceOverflow { balance: i64, delta: i64 },

    /// The user's actor has stopped.
    #[error("User actor unavailable")]
    Unavailable,

    #[error("User request timed out after {0:?}")]
    Timeout(Duration),

    /// The actor answered with a reply of the wrong shape.
    #[error("Unexpected user reply: {0}")]
    Internal(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for UserError {
    fn from(msg: String) -> Self {
        UserError::ActorCommunicationError(msg)
    }
}

impl DomainError for UserError {
    fn unavailable() -> Self {
        UserError::Unavailable
    }

    fn timeout(after: Duration) -> Self {
        UserError::Timeout(after)
    }

    fn communication(message: String) -> Self {
        UserError::ActorCommunicationError(message)
    }

    fn is_unavailable(&self) -> bool {
        matches!(self, UserError::Unavailable)
    }
}
