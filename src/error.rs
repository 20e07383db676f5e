//! # Error Handling
//!
//! Every actor family has its own `thiserror` enum. Clients turn a [`FrameworkError`] back into
//! that enum through [`DomainError::from_framework`], so callers match on domain variants and
//! never on transport details. Services wrap everything into [`WorldError`].

use crate::army_actor::ArmyError;
use crate::building_actor::BuildingError;
use crate::city_actor::CityError;
use crate::config::ConfigError;
use crate::directory::{EntityKind, NotFound};
use crate::map_tile_actor::MapTileError;
use crate::password::BcryptError;
use crate::persistence::StoreError;
use crate::user_actor::UserError;
use actor_framework::FrameworkError;
use std::fmt::Display;
use std::time::Duration;
use thiserror::Error;

/// Shared shape of the per-actor error enums.
pub trait DomainError: std::error::Error + Send + Sync + Sized + 'static {
    /// The target actor is gone.
    fn unavailable() -> Self;

    fn timeout(after: Duration) -> Self;

    fn communication(message: String) -> Self;

    fn is_unavailable(&self) -> bool;

    /// Recovers the typed error raised by the entity, or classifies the transport failure.
    fn from_framework(e: FrameworkError) -> Self {
        match e.downcast_entity::<Self>() {
            Ok(typed) => typed,
            Err(FrameworkError::Timeout(after)) => Self::timeout(after),
            Err(other) if other.is_unavailable() => Self::unavailable(),
            Err(other) => Self::communication(other.to_string()),
        }
    }
}

/// Errors returned by the service layer.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    MapTile(#[from] MapTileError),

    #[error(transparent)]
    City(#[from] CityError),

    #[error(transparent)]
    Building(#[from] BuildingError),

    #[error(transparent)]
    Army(#[from] ArmyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Password hashing failed: {0}")]
    Password(#[from] BcryptError),

    #[error("No free {size}x{size} area after {attempts} attempts")]
    NoFreeArea { size: i32, attempts: u32 },

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WorldError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WorldError::NotFound(_))
    }
}

impl From<FrameworkError> for WorldError {
    fn from(e: FrameworkError) -> Self {
        WorldError::Internal(e.to_string())
    }
}

/// Turns "actor vanished between lookup and request" into a [`NotFound`].
pub(crate) trait OrNotFound<T> {
    fn or_not_found(self, kind: EntityKind, id: impl Display) -> Result<T, WorldError>;
}

impl<T, E> OrNotFound<T> for Result<T, E>
where
    E: DomainError + Into<WorldError>,
{
    fn or_not_found(self, kind: EntityKind, id: impl Display) -> Result<T, WorldError> {
        self.map_err(|e| {
            if e.is_unavailable() {
                NotFound::new(kind, id).into()
            } else {
                e.into()
            }
        })
    }
}
