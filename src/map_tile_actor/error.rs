//! Error types for the MapTile actor.

use crate::error::DomainError;
use crate::model::{BuildingId, Coord};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MapTileError {
    /// The tile's building slot already holds another building.
    #[error("Tile {coord} is occupied by building {building}")]
    Occupied { coord: Coord, building: BuildingId },

    #[error("Map tile actor unavailable")]
    Unavailable,

    #[error("Map tile request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unexpected map tile reply: {0}")]
    Internal(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MapTileError {
    fn from(msg: String) -> Self {
        MapTileError::ActorCommunicationError(msg)
    }
}

impl DomainError for MapTileError {
    fn unavailable() -> Self {
        MapTileError::Unavailable
    }

    fn timeout(after: Duration) -> Self {
        MapTileError::Timeout(after)
    }

    fn communication(message: String) -> Self {
        MapTileError::ActorCommunicationError(message)
    }

    fn is_unavailable(&self) -> bool {
        matches!(self, MapTileError::Unavailable)
    }
}
