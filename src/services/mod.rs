//! # Services
//!
//! The typed, in-process call surface of the world. Every operation is a method on
//! [`WorldSystem`]: look the target up in the directory, talk to its actor through a client,
//! and map the outcome into [`WorldError`](crate::error::WorldError). A target that is not
//! registered, or that stops between lookup and request, is reported as [`NotFound`].
//!
//! - [`users`] - registration, wallet, alliances, account removal
//! - [`map`] - tiles and cities
//! - [`buildings`] - construction, upgrades, troop training
//! - [`armies`] - spawning, marching, disbanding
//! - [`restore`] - respawning actors from persisted rows

pub mod armies;
pub mod buildings;
pub mod map;
pub mod restore;
pub mod users;

use crate::clients::{ArmyClient, BuildingClient, CityClient, MapTileClient, UserClient};
use crate::directory::{EntityKind, NotFound};
use crate::lifecycle::WorldSystem;
use crate::model::{ArmyId, BuildingId, CityId, Coord, UserId};

impl WorldSystem {
    pub(crate) fn user_client(&self, id: &UserId) -> Result<UserClient, NotFound> {
        self.directory()
            .user(id)
            .ok_or_else(|| NotFound::new(EntityKind::User, id))
    }

    pub(crate) fn city_client(&self, id: &CityId) -> Result<CityClient, NotFound> {
        self.directory()
            .city(id)
            .ok_or_else(|| NotFound::new(EntityKind::City, id))
    }

    pub(crate) fn tile_client(&self, coord: Coord) -> Result<MapTileClient, NotFound> {
        self.directory()
            .tile(coord)
            .ok_or_else(|| NotFound::new(EntityKind::MapTile, coord))
    }

    pub(crate) fn army_client(&self, id: &ArmyId) -> Result<ArmyClient, NotFound> {
        self.directory()
            .army(id)
            .ok_or_else(|| NotFound::new(EntityKind::Army, id))
    }

    pub(crate) fn building_client(&self, id: &BuildingId) -> Result<BuildingClient, NotFound> {
        self.directory()
            .building(id)
            .ok_or_else(|| NotFound::new(EntityKind::Building, id))
    }
}
