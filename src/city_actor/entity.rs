//! [`ActorEntity`] implementation for cities.

use super::actions::{CityAction, CityActionResult, CityTick};
use super::error::CityError;
use crate::lifecycle::WorldContext;
use crate::model::{logistic_step, City, CityId, UserId};
use crate::persistence::{Record, RecordKey};
use actor_framework::{ActorEntity, ActorScope};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct CityEntity {
    city: City,
}

impl CityEntity {
    pub fn new(city: City) -> Self {
        Self { city }
    }

    async fn persist(&self, ctx: &WorldContext) {
        ctx.persistence.update(Record::City(self.city.clone())).await;
    }

    async fn claim_tiles(&self, ctx: &WorldContext) {
        let mut missing = 0;
        for coord in self.city.tiles() {
            match ctx.directory.tile(coord) {
                Some(tile) => tile.assign_city(Some(self.city.id.clone())).await,
                None => missing += 1,
            }
        }
        if missing > 0 {
            debug!(id = %self.city.id, missing, "City square extends past existing tiles");
        }
    }

    async fn release_tiles(&self, ctx: &WorldContext) {
        for coord in self.city.tiles() {
            if let Some(tile) = ctx.directory.tile(coord) {
                tile.release_city(self.city.id.clone()).await;
            }
        }
    }

    async fn set_owner(&mut self, owner: Option<UserId>, ctx: &WorldContext) {
        if self.city.owner == owner {
            return;
        }
        if let Some(previous) = self.city.owner.take() {
            notify_owner(&previous, &self.city.id, false, ctx).await;
        }
        if let Some(next) = &owner {
            notify_owner(next, &self.city.id, true, ctx).await;
        }
        self.city.owner = owner;
        self.persist(ctx).await;
        for coord in self.city.tiles() {
            if let Some(tile) = ctx.directory.tile(coord) {
                tile.city_owner_changed(self.city.id.clone()).await;
            }
        }
    }
}

/// Spreads the growth ticks of many cities over `[0, max_ms]`.
fn random_jitter(max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

async fn notify_owner(owner: &UserId, city: &CityId, attached: bool, ctx: &WorldContext) {
    let Some(user) = ctx.directory.user(owner) else {
        debug!(%owner, %city, "Owner not registered");
        return;
    };
    if attached {
        user.city_attached(city.clone()).await;
    } else {
        user.city_detached(city.clone()).await;
    }
}

#[async_trait]
impl ActorEntity for CityEntity {
    type Id = CityId;
    type Snapshot = City;
    type Action = CityAction;
    type ActionResult = CityActionResult;
    type Tick = CityTick;
    type Context = WorldContext;
    type Error = CityError;

    fn id(&self) -> CityId {
        self.city.id.clone()
    }

    fn snapshot(&self) -> City {
        self.city.clone()
    }

    async fn on_create(
        &mut self,
        restore: bool,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<(), CityError> {
        if !restore {
            ctx.persistence.create(Record::City(self.city.clone())).await;
            self.claim_tiles(ctx).await;
        }
        if let Some(owner) = &self.city.owner {
            notify_owner(owner, &self.city.id, true, ctx).await;
        }

        let every = ctx.config.city_growth_interval();
        let delay = every + random_jitter(ctx.config.city_tick_jitter_ms);
        scope.start_ticker("growth", delay, every, CityTick::Grow);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CityAction,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<CityActionResult, CityError> {
        match action {
            CityAction::AdjustPopulationCap(delta) => {
                self.city.population_cap = (self.city.population_cap + delta).max(0.0);
                self.persist(ctx).await;
                Ok(CityActionResult::PopulationCap(self.city.population_cap))
            }
            CityAction::SetOwner(owner) => {
                self.set_owner(owner, ctx).await;
                Ok(CityActionResult::Done)
            }
        }
    }

    async fn on_tick(&mut self, tick: CityTick, ctx: &WorldContext, _scope: &mut ActorScope<Self>) {
        match tick {
            CityTick::Grow => {
                let before = self.city.population;
                self.city.population = logistic_step(
                    before,
                    self.city.population_cap,
                    ctx.config.population_growth_rate,
                );
                if self.city.population != before {
                    trace!(id = %self.city.id, population = self.city.population, "Grew");
                    self.persist(ctx).await;
                }
            }
        }
    }

    async fn on_delete(
        &mut self,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), CityError> {
        ctx.persistence.delete(RecordKey::City(self.city.id.clone())).await;
        self.release_tiles(ctx).await;
        if let Some(owner) = &self.city.owner {
            notify_owner(owner, &self.city.id, false, ctx).await;
        }
        Ok(())
    }
}
