//! Error types for the Building actor family.

use crate::city_actor::CityError;
use crate::error::DomainError;
use crate::map_tile_actor::MapTileError;
use crate::model::{BuildingId, CityId, Coord};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildingError {
    #[error("City {0} does not exist")]
    CityNotFound(CityId),

    #[error("No map tile at {0}")]
    TileNotFound(Coord),

    #[error("Building {id} is already at the maximum level {level}")]
    MaxLevelReached { id: BuildingId, level: u32 },

    #[error("Building {0} is not a barracks")]
    NotBarracks(BuildingId),

    #[error("Barracks {0} is already training troops")]
    TrainingAlreadyExists(BuildingId),

    /// The request names a different building than the one that received it.
    #[error("Request for building {actual} reached building {expected}")]
    Mismatch {
        expected: BuildingId,
        actual: BuildingId,
    },

    #[error("Invalid troop count: {0}")]
    InvalidTroopCount(u32),

    /// Claiming the tile failed, e.g. it is occupied.
    #[error(transparent)]
    Tile(#[from] MapTileError),

    #[error(transparent)]
    City(#[from] CityError),

    #[error("Building actor unavailable")]
    Unavailable,

    #[error("Building request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected building reply: {0}")]
    Internal(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for BuildingError {
    fn from(msg: String) -> Self {
        BuildingError::ActorCommunicationError(msg)
    }
}

impl DomainError for BuildingError {
    fn unavailable() -> Self {
        BuildingError::Unavailable
    }

    fn timeout(after: Duration) -> Self {
        BuildingError::Timeout(after)
    }

    fn communication(message: String) -> Self {
        BuildingError::ActorCommunicationError(message)
    }

    fn is_unavailable(&self) -> bool {
        matches!(self, BuildingError::Unavailable)
    }
}
