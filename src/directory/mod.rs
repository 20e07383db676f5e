//! # Directory
//!
//! The process-wide registry mapping logical ids to live actor handles. It is an ordinary
//! value, cloned into every actor's context at spawn time; a test builds its own empty one.
//!
//! Each entity kind has its own [`Partition`], guarded by its own reader/writer lock. Actors
//! register themselves when their creation succeeds and remove themselves when they stop, so
//! an entry exists exactly while its actor does.

use crate::army_actor::ArmyEntity;
use crate::building_actor::BuildingEntity;
use crate::city_actor::CityEntity;
use crate::clients::{ArmyClient, BuildingClient, CityClient, MapTileClient, UserClient};
use crate::map_tile_actor::MapTileEntity;
use crate::model::{ArmyId, BuildingId, CityId, Coord, UserId};
use crate::user_actor::UserEntity;
use actor_framework::{EntityClient, FrameworkError, Partition};
use std::fmt::Display;

/// The five addressable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    City,
    MapTile,
    Army,
    Building,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::City => "city",
            EntityKind::MapTile => "map tile",
            EntityKind::Army => "army",
            EntityKind::Building => "building",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Directory {
    users: Partition<UserId, EntityClient<UserEntity>>,
    cities: Partition<CityId, EntityClient<CityEntity>>,
    tiles: Partition<Coord, EntityClient<MapTileEntity>>,
    armies: Partition<ArmyId, EntityClient<ArmyEntity>>,
    buildings: Partition<BuildingId, EntityClient<BuildingEntity>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Partitions (handed to actors at spawn) ---

    pub fn users(&self) -> &Partition<UserId, EntityClient<UserEntity>> {
        &self.users
    }

    pub fn cities(&self) -> &Partition<CityId, EntityClient<CityEntity>> {
        &self.cities
    }

    pub fn tiles(&self) -> &Partition<Coord, EntityClient<MapTileEntity>> {
        &self.tiles
    }

    pub fn armies(&self) -> &Partition<ArmyId, EntityClient<ArmyEntity>> {
        &self.armies
    }

    pub fn buildings(&self) -> &Partition<BuildingId, EntityClient<BuildingEntity>> {
        &self.buildings
    }

    // --- Typed lookups ---

    pub fn user(&self, id: &UserId) -> Option<UserClient> {
        self.users.get(id).map(UserClient::new)
    }

    pub fn city(&self, id: &CityId) -> Option<CityClient> {
        self.cities.get(id).map(CityClient::new)
    }

    pub fn tile(&self, coord: Coord) -> Option<MapTileClient> {
        self.tiles.get(&coord).map(MapTileClient::new)
    }

    pub fn army(&self, id: &ArmyId) -> Option<ArmyClient> {
        self.armies.get(id).map(ArmyClient::new)
    }

    pub fn building(&self, id: &BuildingId) -> Option<BuildingClient> {
        self.buildings.get(id).map(BuildingClient::new)
    }

    /// Number of live entries per kind, in [`EntityKind`] order.
    pub fn counts(&self) -> [(EntityKind, usize); 5] {
        [
            (EntityKind::User, self.users.len()),
            (EntityKind::City, self.cities.len()),
            (EntityKind::MapTile, self.tiles.len()),
            (EntityKind::Army, self.armies.len()),
            (EntityKind::Building, self.buildings.len()),
        ]
    }

    /// Asks every registered actor to stop, dependents first.
    ///
    /// Actors deregister themselves as they stop, so the directory drains on its own.
    pub async fn stop_all(&self) {
        stop_each(self.buildings.values()).await;
        stop_each(self.armies.values()).await;
        stop_each(self.cities.values()).await;
        stop_each(self.tiles.values()).await;
        stop_each(self.users.values()).await;
    }
}

async fn stop_each<T: actor_framework::ActorEntity>(clients: Vec<EntityClient<T>>) {
    for client in clients {
        // An actor that is already gone needs no stop
        let _ = client.stop().await;
    }
}

/// Lookup failures reported by services.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} not found: {id}")]
pub struct NotFound {
    pub kind: EntityKind,
    pub id: String,
}

impl NotFound {
    pub fn new(kind: EntityKind, id: impl Display) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }

    /// Maps an unavailable actor (closed between lookup and request) to `NotFound`.
    pub fn from_unavailable(kind: EntityKind, id: impl Display, e: &FrameworkError) -> Option<Self> {
        e.is_unavailable().then(|| Self::new(kind, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_answers_absent() {
        let directory = Directory::new();
        assert!(directory.user(&UserId::from("alice")).is_none());
        assert!(directory.tile(Coord::new(0, 0)).is_none());
        assert!(directory.counts().iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn test_clones_share_partitions() {
        let directory = Directory::new();
        let other = directory.clone();
        let (sender, _receiver) = tokio::sync::mpsc::channel(1);
        other
            .users()
            .put(UserId::from("alice"), EntityClient::new(sender));
        assert!(directory.user(&UserId::from("alice")).is_some());
    }

    #[test]
    fn test_not_found_message() {
        let err = NotFound::new(EntityKind::MapTile, Coord::new(3, 4));
        assert_eq!(err.to_string(), "map tile not found: (3, 4)");
    }
}
