//! [`ActorEntity`] implementation for map tiles.
//!
//! A tile owns its city and building slots and the list of armies standing on it,
//! partitioned by owner. Arrival of an idle army triggers the merge of every idle army of
//! that owner into the oldest one; marching armies are never touched.

use super::actions::{MapTileAction, MapTileActionResult};
use super::error::MapTileError;
use crate::clients::{ActorClient, ArmyClient, BuildingClient, CityClient};
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::{Army, ArmyId, BuildingId, CityId, Coord, MapTile, TileView, UserId};
use crate::persistence::Record;
use actor_framework::{ActorEntity, ActorScope, LazyRef};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
struct Stationed {
    army: Army,
    handle: ArmyClient,
}

#[derive(Debug)]
pub struct MapTileEntity {
    tile: MapTile,
    city: LazyRef<CityClient>,
    building: LazyRef<BuildingClient>,
    armies: BTreeMap<UserId, Vec<Stationed>>,
}

impl MapTileEntity {
    pub fn new(tile: MapTile) -> Self {
        Self {
            tile,
            city: LazyRef::Unresolved,
            building: LazyRef::Unresolved,
            armies: BTreeMap::new(),
        }
    }

    async fn persist(&self, ctx: &WorldContext) {
        ctx.persistence.update(Record::MapTile(self.tile.clone())).await;
    }

    async fn assign_city(&mut self, city: Option<CityId>, ctx: &WorldContext) {
        if self.tile.city_id != city {
            self.tile.city_id = city;
            self.city.invalidate();
            self.persist(ctx).await;
        }
    }

    async fn assign_building(
        &mut self,
        building: BuildingId,
        ctx: &WorldContext,
    ) -> Result<(), MapTileError> {
        match &self.tile.building_id {
            Some(current) if *current == building => Ok(()),
            Some(current) => Err(MapTileError::Occupied {
                coord: self.tile.coord,
                building: current.clone(),
            }),
            None => {
                self.tile.building_id = Some(building);
                self.building.invalidate();
                self.persist(ctx).await;
                Ok(())
            }
        }
    }

    async fn forward_owner_change(&mut self, ctx: &WorldContext) {
        let Some(id) = self.tile.building_id.clone() else {
            return;
        };
        if matches!(&self.building, LazyRef::Resolved(b) if b.is_closed()) {
            self.building.invalidate();
        }
        match self.building.resolve(|| ctx.directory.building(&id)) {
            Some(building) => building.invalidate_references().await,
            None => debug!(coord = %self.tile.coord, building = %id, "Building not registered"),
        }
    }

    fn station(&mut self, army: Army, handle: ArmyClient) {
        let owned = self.armies.entry(army.owner.clone()).or_default();
        match owned.iter_mut().find(|s| s.army.id == army.id) {
            Some(existing) => {
                existing.army = army;
                existing.handle = handle;
            }
            None => owned.push(Stationed { army, handle }),
        }
    }

    fn unstation(&mut self, owner: &UserId, army: &ArmyId) {
        if let Some(owned) = self.armies.get_mut(owner) {
            owned.retain(|s| s.army.id != *army);
            if owned.is_empty() {
                self.armies.remove(owner);
            }
        }
    }

    /// Folds every idle army of `owner` into the oldest idle one.
    ///
    /// With fewer than two idle armies this does nothing. Absorbed armies are deleted first;
    /// only the troops of armies that were actually deleted are added to the survivor.
    async fn merge_idle(&mut self, owner: &UserId) {
        let coord = self.tile.coord;
        let Some(owned) = self.armies.get_mut(owner) else {
            return;
        };
        let idle: Vec<usize> = owned
            .iter()
            .enumerate()
            .filter(|(_, s)| s.army.is_idle())
            .map(|(i, _)| i)
            .collect();
        if idle.len() < 2 {
            return;
        }

        let survivor_id = owned[idle[0]].army.id.clone();
        let absorbed: Vec<Stationed> = idle[1..].iter().rev().map(|&i| owned.remove(i)).collect();

        let mut gained = 0;
        for stationed in absorbed {
            match stationed.handle.delete().await {
                Ok(()) => gained += stationed.army.size,
                Err(e) if e.is_unavailable() => {
                    debug!(%coord, army = %stationed.army.id, "Absorbed army already gone");
                }
                Err(e) => {
                    warn!(%coord, army = %stationed.army.id, error = %e, "Could not delete absorbed army, keeping it");
                    owned.push(stationed);
                }
            }
        }
        if gained == 0 {
            return;
        }

        let Some(survivor) = owned.iter_mut().find(|s| s.army.id == survivor_id) else {
            return;
        };
        let total = survivor.army.size + gained;
        match survivor.handle.set_size(total).await {
            Ok(()) => {
                survivor.army.size = total;
                info!(%coord, %owner, army = %survivor.army.id, size = total, "Armies merged");
            }
            Err(e) => {
                error!(%coord, army = %survivor.army.id, error = %e, troops = gained, "Merge survivor unreachable, troops lost");
            }
        }
    }

    async fn describe(&mut self, ctx: &WorldContext) -> TileView {
        let city = match self.tile.city_id.clone() {
            Some(id) => match self.city.resolve(|| ctx.directory.city(&id)) {
                Some(client) => match client.get().await {
                    Ok(city) => Some(city),
                    Err(e) => {
                        if e.is_unavailable() {
                            self.city.invalidate();
                        }
                        debug!(coord = %self.tile.coord, city = %id, error = %e, "City snapshot unavailable");
                        None
                    }
                },
                None => None,
            },
            None => None,
        };

        let building = match self.tile.building_id.clone() {
            Some(id) => match self.building.resolve(|| ctx.directory.building(&id)) {
                Some(client) => match client.get().await {
                    Ok(building) => Some(building),
                    Err(e) => {
                        if e.is_unavailable() {
                            self.building.invalidate();
                        }
                        debug!(coord = %self.tile.coord, building = %id, error = %e, "Building snapshot unavailable");
                        None
                    }
                },
                None => None,
            },
            None => None,
        };

        let city_owner = match city.as_ref().and_then(|c| c.owner.clone()) {
            Some(owner) => Some(username(&owner, ctx).await),
            None => None,
        };

        let mut armies = BTreeMap::new();
        for (owner, owned) in &self.armies {
            let name = username(owner, ctx).await;
            armies.insert(name, owned.iter().map(|s| s.army.clone()).collect());
        }

        TileView {
            tile: self.tile.clone(),
            city,
            city_owner,
            building,
            armies,
        }
    }
}

/// Resolves a user id to its username, falling back to the id itself.
async fn username(owner: &UserId, ctx: &WorldContext) -> String {
    let Some(user) = ctx.directory.user(owner) else {
        return owner.to_string();
    };
    match user.get().await {
        Ok(user) => user.username,
        Err(e) => {
            debug!(%owner, error = %e, "Username lookup failed");
            owner.to_string()
        }
    }
}

#[async_trait]
impl ActorEntity for MapTileEntity {
    type Id = Coord;
    type Snapshot = MapTile;
    type Action = MapTileAction;
    type ActionResult = MapTileActionResult;
    type Tick = ();
    type Context = WorldContext;
    type Error = MapTileError;

    fn id(&self) -> Coord {
        self.tile.coord
    }

    fn snapshot(&self) -> MapTile {
        self.tile.clone()
    }

    async fn on_create(
        &mut self,
        restore: bool,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), MapTileError> {
        if !restore {
            ctx.persistence.create(Record::MapTile(self.tile.clone())).await;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: MapTileAction,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<MapTileActionResult, MapTileError> {
        match action {
            MapTileAction::AssignCity(city) => {
                self.assign_city(city, ctx).await;
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::ReleaseCity(city) => {
                if self.tile.city_id.as_ref() == Some(&city) {
                    self.assign_city(None, ctx).await;
                }
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::AssignBuilding(building) => {
                self.assign_building(building, ctx).await?;
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::ReleaseBuilding(building) => {
                if self.tile.building_id.as_ref() == Some(&building) {
                    self.tile.building_id = None;
                    self.building.invalidate();
                    self.persist(ctx).await;
                }
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::AddArmy { army, handle } => {
                let owner = army.owner.clone();
                let idle = army.is_idle();
                self.station(army, handle);
                if idle {
                    self.merge_idle(&owner).await;
                }
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::RemoveArmy { owner, army } => {
                self.unstation(&owner, &army);
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::UpdateArmy(army) => {
                let known = self
                    .armies
                    .get_mut(&army.owner)
                    .and_then(|owned| owned.iter_mut().find(|s| s.army.id == army.id));
                match known {
                    Some(stationed) => stationed.army = army,
                    None => debug!(coord = %self.tile.coord, army = %army.id, "Update for unknown army"),
                }
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::CityOwnerChanged(city) => {
                if self.tile.city_id.as_ref() == Some(&city) {
                    self.forward_owner_change(ctx).await;
                }
                Ok(MapTileActionResult::Done)
            }
            MapTileAction::Occupancy => Ok(MapTileActionResult::Occupancy(self.tile.clone())),
            MapTileAction::Describe => Ok(MapTileActionResult::View(self.describe(ctx).await)),
        }
    }
}
