//! [`ActorEntity`] implementation for buildings.
//!
//! A building holds three lazily resolved references: its city, its tile and the city's
//! owner. Each is resolved on first use and cached until [`BuildingAction::InvalidateReferences`]
//! or until the cached actor turns out to be gone. Ticks treat an unresolvable owner as
//! "no owner" and skip their side effects.
//!
//! Lock order: a building may send requests to its tile and its city and may spawn an army.
//! None of those ever sends a request back to a building.

use super::actions::{BuildingAction, BuildingActionResult, BuildingTick, TrainOrder};
use super::error::BuildingError;
use crate::army_actor;
use crate::clients::{ActorClient, CityClient, MapTileClient, UserClient};
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::{
    Army, ArmyId, Building, BuildingId, BuildingKind, Coord, Training, UserId, MAX_BUILDING_LEVEL,
};
use crate::persistence::{Record, RecordKey};
use actor_framework::{ActorEntity, ActorScope, LazyRef};
use async_trait::async_trait;
use std::time::SystemTime;
use tracing::{debug, error, info, trace, warn};

/// The resolved owner of the building's city.
#[derive(Debug, Clone)]
struct Owner {
    id: UserId,
    client: UserClient,
}

#[derive(Debug)]
pub struct BuildingEntity {
    building: Building,
    training: Option<Training>,
    city: LazyRef<CityClient>,
    tile: LazyRef<MapTileClient>,
    owner: LazyRef<Owner>,
}

impl BuildingEntity {
    pub fn new(building: Building) -> Self {
        Self {
            building,
            training: None,
            city: LazyRef::Unresolved,
            tile: LazyRef::Unresolved,
            owner: LazyRef::Unresolved,
        }
    }

    fn kind(&self) -> BuildingKind {
        self.building.kind
    }

    fn city_handle(&mut self, ctx: &WorldContext) -> Option<CityClient> {
        if matches!(&self.city, LazyRef::Resolved(city) if city.is_closed()) {
            self.city.invalidate();
        }
        let id = self.building.city_id.clone();
        self.city.resolve(|| ctx.directory.city(&id))
    }

    fn tile_handle(&mut self, ctx: &WorldContext) -> Option<MapTileClient> {
        if matches!(&self.tile, LazyRef::Resolved(tile) if tile.is_closed()) {
            self.tile.invalidate();
        }
        let coord = self.building.coord;
        self.tile.resolve(|| ctx.directory.tile(coord))
    }

    /// The owner of the building's city, or `None` for neutral or orphaned buildings.
    async fn owner(&mut self, ctx: &WorldContext) -> Option<Owner> {
        if let LazyRef::Resolved(owner) = &self.owner {
            if !owner.client.is_closed() {
                return Some(owner.clone());
            }
            self.owner.invalidate();
        }

        let city = self.city_handle(ctx)?;
        let id = match city.owner().await {
            Ok(owner) => owner?,
            Err(e) => {
                if e.is_unavailable() {
                    self.city.invalidate();
                }
                debug!(id = %self.building.id, error = %e, "Owner lookup failed");
                return None;
            }
        };
        let client = ctx.directory.user(&id)?;
        self.owner.resolve(|| Some(Owner { id, client }))
    }

    fn invalidate_references(&mut self) {
        self.city.invalidate();
        self.tile.invalidate();
        self.owner.invalidate();
    }

    async fn persist(&self, ctx: &WorldContext) {
        ctx.persistence.update(Record::Building(self.building.clone())).await;
    }

    /// Claims the tile, writes the row and applies the population side effect.
    async fn construct(&mut self, ctx: &WorldContext) -> Result<(), BuildingError> {
        let city = self
            .city_handle(ctx)
            .ok_or_else(|| BuildingError::CityNotFound(self.building.city_id.clone()))?;
        let tile = self
            .tile_handle(ctx)
            .ok_or(BuildingError::TileNotFound(self.building.coord))?;
        tile.assign_building(self.building.id.clone()).await?;

        ctx.persistence.create(Record::Building(self.building.clone())).await;

        if self.kind().adds_population() {
            let added = self.kind().population(self.building.level) as f64;
            match city.adjust_population_cap(added).await {
                Ok(cap) => debug!(id = %self.building.id, cap, "Population cap raised"),
                Err(e) => warn!(id = %self.building.id, error = %e, "Population cap not raised"),
            }
        }
        Ok(())
    }

    async fn upgrade(&mut self, ctx: &WorldContext) -> Result<Building, BuildingError> {
        let previous = self.building.level;
        if previous >= MAX_BUILDING_LEVEL {
            return Err(BuildingError::MaxLevelReached {
                id: self.building.id.clone(),
                level: previous,
            });
        }
        self.building.level = previous + 1;
        let start = self.building.construction_end.max(SystemTime::now());
        self.building.construction_end = start + self.kind().construction_time(self.building.level);
        self.persist(ctx).await;

        if self.kind().adds_population() {
            let delta = self.kind().population(self.building.level) as f64
                - self.kind().population(previous) as f64;
            if delta != 0.0 {
                if let Some(city) = self.city_handle(ctx) {
                    city.shift_population_cap(delta).await;
                }
            }
        }
        info!(id = %self.building.id, level = self.building.level, "Upgraded");
        Ok(self.building.clone())
    }

    async fn produce(&mut self, ctx: &WorldContext) {
        if !self.building.is_constructed(SystemTime::now()) {
            trace!(id = %self.building.id, "Under construction");
            return;
        }
        let amount = i64::from(self.kind().production(self.building.level));
        if amount == 0 {
            return;
        }
        let Some(owner) = self.owner(ctx).await else {
            trace!(id = %self.building.id, "No owner, nothing produced");
            return;
        };
        let food = if self.kind().produces_food() { amount } else { 0 };
        owner.client.credit(amount, food).await;
    }

    fn check_barracks(&self) -> Result<(), BuildingError> {
        match self.kind() {
            BuildingKind::Barracks => Ok(()),
            _ => Err(BuildingError::NotBarracks(self.building.id.clone())),
        }
    }

    fn check_target(&self, requested: &BuildingId) -> Result<(), BuildingError> {
        if *requested != self.building.id {
            return Err(BuildingError::Mismatch {
                expected: self.building.id.clone(),
                actual: requested.clone(),
            });
        }
        Ok(())
    }

    fn train(
        &mut self,
        order: TrainOrder,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<Training, BuildingError> {
        self.check_barracks()?;
        if self.training.is_some() {
            return Err(BuildingError::TrainingAlreadyExists(self.building.id.clone()));
        }
        self.check_target(&order.barracks_id)?;
        if order.size == 0 {
            return Err(BuildingError::InvalidTroopCount(order.size));
        }

        let duration = ctx.config.training_duration();
        let training = Training {
            barracks_id: order.barracks_id,
            size: order.size,
            deploy_to: order.deploy_to,
            ends_at: SystemTime::now() + duration,
        };
        scope.start_timer("training", duration, BuildingTick::TrainingDue);
        self.training = Some(training.clone());
        Ok(training)
    }

    /// Where a trained army should march to, if anywhere.
    async fn deployment_target(&self, training: &Training, ctx: &WorldContext) -> Option<Coord> {
        let city_id = training
            .deploy_to
            .as_ref()
            .filter(|city| **city != self.building.city_id)?;
        let Some(city) = ctx.directory.city(city_id) else {
            warn!(id = %self.building.id, city = %city_id, "Deployment city not found, army stays at the barracks");
            return None;
        };
        match city.get().await {
            Ok(city) => {
                let center = city.center();
                (center != self.building.coord && ctx.directory.tile(center).is_some())
                    .then_some(center)
            }
            Err(e) => {
                warn!(id = %self.building.id, city = %city_id, error = %e, "Deployment city unavailable, army stays at the barracks");
                None
            }
        }
    }

    /// Turns the finished training into an army and drops the training row.
    async fn complete_training(&mut self, ctx: &WorldContext, scope: &mut ActorScope<Self>) {
        let Some(training) = self.training.take() else {
            return;
        };
        scope.stop("training");
        let key = RecordKey::Training(self.building.id.clone());

        let Some(owner) = self.owner(ctx).await else {
            warn!(id = %self.building.id, size = training.size, "Training finished without an owner, troops dropped");
            ctx.persistence.delete(key).await;
            return;
        };

        let here = self.building.coord;
        let army = match self.deployment_target(&training, ctx).await {
            Some(target) => {
                Army::marching(ArmyId::generate(), owner.id.clone(), here, target, training.size)
            }
            None => Army::new(ArmyId::generate(), owner.id.clone(), here, training.size),
        };
        let army_id = army.id.clone();
        match army_actor::start(army, ctx, false).await {
            Ok(_) => {
                info!(id = %self.building.id, army = %army_id, size = training.size, owner = %owner.id, "Training complete")
            }
            Err(e) => error!(id = %self.building.id, size = training.size, error = %e, "Trained army could not be spawned"),
        }
        ctx.persistence.delete(key).await;
    }

    async fn restore_training(
        &mut self,
        training: Training,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<(), BuildingError> {
        self.check_barracks()?;
        self.check_target(&training.barracks_id)?;
        if self.training.is_some() {
            return Err(BuildingError::TrainingAlreadyExists(self.building.id.clone()));
        }
        let remaining = training.ends_at.duration_since(SystemTime::now()).ok();
        self.training = Some(training);
        match remaining {
            Some(left) if !left.is_zero() => {
                debug!(id = %self.building.id, ?left, "Training resumed");
                scope.start_timer("training", left, BuildingTick::TrainingDue);
            }
            _ => self.complete_training(ctx, scope).await,
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for BuildingEntity {
    type Id = BuildingId;
    type Snapshot = Building;
    type Action = BuildingAction;
    type ActionResult = BuildingActionResult;
    type Tick = BuildingTick;
    type Context = WorldContext;
    type Error = BuildingError;

    fn id(&self) -> BuildingId {
        self.building.id.clone()
    }

    fn snapshot(&self) -> Building {
        self.building.clone()
    }

    async fn on_create(
        &mut self,
        restore: bool,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<(), BuildingError> {
        if !restore {
            self.construct(ctx).await?;
        }
        if self.kind().produces() {
            let every = ctx.config.building_production_interval();
            scope.start_ticker("production", every, every, BuildingTick::Produce);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: BuildingAction,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<BuildingActionResult, BuildingError> {
        match action {
            BuildingAction::Upgrade => Ok(BuildingActionResult::Building(self.upgrade(ctx).await?)),
            BuildingAction::TrainTroops(order) => {
                let training = self.train(order, ctx, scope)?;
                ctx.persistence.create(Record::Training(training.clone())).await;
                info!(id = %self.building.id, size = training.size, "Training started");
                Ok(BuildingActionResult::Training(Some(training)))
            }
            BuildingAction::RestoreTraining(training) => {
                self.restore_training(training, ctx, scope).await?;
                Ok(BuildingActionResult::Done)
            }
            BuildingAction::CurrentTraining => {
                Ok(BuildingActionResult::Training(self.training.clone()))
            }
            BuildingAction::InvalidateReferences => {
                self.invalidate_references();
                Ok(BuildingActionResult::Done)
            }
        }
    }

    async fn on_tick(
        &mut self,
        tick: BuildingTick,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) {
        match tick {
            BuildingTick::Produce => self.produce(ctx).await,
            BuildingTick::TrainingDue => self.complete_training(ctx, scope).await,
        }
    }

    async fn on_delete(
        &mut self,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), BuildingError> {
        let id = self.building.id.clone();
        ctx.persistence.delete(RecordKey::Building(id.clone())).await;
        if self.training.take().is_some() {
            ctx.persistence.delete(RecordKey::Training(id.clone())).await;
        }
        if let Some(tile) = self.tile_handle(ctx) {
            tile.release_building(id).await;
        }
        if self.kind().adds_population() {
            if let Some(city) = self.city_handle(ctx) {
                let removed = self.kind().population(self.building.level) as f64;
                city.shift_population_cap(-removed).await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::BuildingClient;
    use crate::lifecycle::test_context;
    use crate::model::{City, CityId, CityKind, MapTile};

    async fn world(ctx: &WorldContext) {
        crate::map_tile_actor::start(MapTile::empty(Coord::new(0, 0)), ctx, false)
            .await
            .unwrap();
        crate::city_actor::start(
            City {
                id: CityId::from("city_1"),
                kind: CityKind::Town,
                owner: None,
                name: "Eridu".into(),
                population: 100.0,
                population_cap: 100.0,
                origin: Coord::new(0, 0),
                size: 1,
            },
            ctx,
            false,
        )
        .await
        .unwrap();
    }

    fn building(id: &str, kind: BuildingKind, level: u32) -> Building {
        Building {
            id: BuildingId::from(id),
            city_id: CityId::from("city_1"),
            kind,
            level,
            coord: Coord::new(0, 0),
            construction_end: SystemTime::UNIX_EPOCH,
        }
    }

    async fn spawn(b: Building, ctx: &WorldContext) -> Result<BuildingClient, BuildingError> {
        super::super::start(b, ctx, false).await
    }

    #[tokio::test]
    async fn test_house_raises_and_returns_population_cap() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        let house = spawn(building("b1", BuildingKind::House, 1), &ctx).await.unwrap();
        let city = ctx.directory.city(&CityId::from("city_1")).unwrap();
        assert_eq!(city.get().await.unwrap().population_cap, 350.0);

        house.upgrade().await.unwrap();
        assert_eq!(city.get().await.unwrap().population_cap, 600.0);

        house.delete().await.unwrap();
        assert_eq!(city.get().await.unwrap().population_cap, 100.0);
    }

    #[tokio::test]
    async fn test_second_building_on_tile_is_rejected() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        spawn(building("b1", BuildingKind::Farm, 1), &ctx).await.unwrap();
        let err = spawn(building("b2", BuildingKind::Mine, 1), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BuildingError::Tile(crate::map_tile_actor::MapTileError::Occupied { .. })
        ));
        assert!(ctx.directory.building(&BuildingId::from("b2")).is_none());
    }

    #[tokio::test]
    async fn test_missing_city_fails_creation() {
        let (ctx, _store) = test_context();
        let err = spawn(building("b1", BuildingKind::Farm, 1), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err, BuildingError::CityNotFound(CityId::from("city_1")));
    }

    #[tokio::test]
    async fn test_upgrade_stops_at_max_level() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        let mine = spawn(building("b1", BuildingKind::Mine, MAX_BUILDING_LEVEL), &ctx)
            .await
            .unwrap();
        assert_eq!(
            mine.upgrade().await.unwrap_err(),
            BuildingError::MaxLevelReached {
                id: BuildingId::from("b1"),
                level: MAX_BUILDING_LEVEL
            }
        );
    }

    #[tokio::test]
    async fn test_upgrade_extends_construction_from_now() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        let farm = spawn(building("b1", BuildingKind::Farm, 1), &ctx).await.unwrap();
        let before = SystemTime::now();
        let upgraded = farm.upgrade().await.unwrap();
        assert_eq!(upgraded.level, 2);
        assert!(upgraded.construction_end >= before + BuildingKind::Farm.construction_time(2));
        assert!(!upgraded.is_constructed(SystemTime::now()));
    }

    #[tokio::test]
    async fn test_training_rules() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        let barracks = spawn(building("b1", BuildingKind::Barracks, 1), &ctx)
            .await
            .unwrap();

        let order = |id: &str, size| TrainOrder {
            barracks_id: BuildingId::from(id),
            size,
            deploy_to: None,
        };
        assert_eq!(
            barracks.train_troops(order("b9", 5)).await.unwrap_err(),
            BuildingError::Mismatch {
                expected: BuildingId::from("b1"),
                actual: BuildingId::from("b9")
            }
        );
        assert_eq!(
            barracks.train_troops(order("b1", 0)).await.unwrap_err(),
            BuildingError::InvalidTroopCount(0)
        );
        barracks.train_troops(order("b1", 5)).await.unwrap();
        assert_eq!(
            barracks.train_troops(order("b1", 5)).await.unwrap_err(),
            BuildingError::TrainingAlreadyExists(BuildingId::from("b1"))
        );
        assert_eq!(barracks.current_training().await.unwrap().unwrap().size, 5);
    }

    #[tokio::test]
    async fn test_only_barracks_train() {
        let (ctx, _store) = test_context();
        world(&ctx).await;
        let farm = spawn(building("b1", BuildingKind::Farm, 1), &ctx).await.unwrap();
        let err = farm
            .train_troops(TrainOrder {
                barracks_id: BuildingId::from("b1"),
                size: 3,
                deploy_to: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, BuildingError::NotBarracks(BuildingId::from("b1")));
    }
}
