//! [`ActorEntity`] implementation for armies.
//!
//! An army is idle or marching. While marching, a step ticker moves it one tile per tick
//! toward the target, x first, and it tells the tiles it leaves and enters. Tiles and the
//! owner only ever get notifications from here, never requests.

use super::actions::{ArmyAction, ArmyActionResult, ArmyTick};
use super::error::ArmyError;
use crate::clients::ArmyClient;
use crate::lifecycle::WorldContext;
use crate::model::{Army, ArmyId, Coord};
use crate::persistence::{Record, RecordKey};
use actor_framework::{ActorEntity, ActorScope};
use async_trait::async_trait;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct ArmyEntity {
    army: Army,
    /// Steps taken since the current march started.
    steps: u32,
}

impl ArmyEntity {
    pub fn new(army: Army) -> Self {
        Self { army, steps: 0 }
    }

    async fn persist(&self, ctx: &WorldContext) {
        ctx.persistence.update(Record::Army(self.army.clone())).await;
    }

    /// Moves one tile toward the target. Returns the tile left behind.
    fn advance(&mut self) -> Coord {
        let left = self.army.coord;
        self.army.coord = left.step_toward(self.army.to);
        self.steps += 1;
        if self.army.coord == self.army.to {
            self.army.clear_march();
        }
        left
    }

    async fn enter(&self, coord: Coord, ctx: &WorldContext, scope: &ActorScope<Self>) {
        let (Some(tile), Some(me)) = (ctx.directory.tile(coord), scope.client()) else {
            warn!(id = %self.army.id, %coord, "Entered a tile without an actor");
            return;
        };
        tile.add_army(self.army.clone(), ArmyClient::new(me)).await;
    }

    async fn leave(&self, coord: Coord, ctx: &WorldContext) {
        if let Some(tile) = ctx.directory.tile(coord) {
            tile.remove_army(self.army.owner.clone(), self.army.id.clone())
                .await;
        }
    }
}

#[async_trait]
impl ActorEntity for ArmyEntity {
    type Id = ArmyId;
    type Snapshot = Army;
    type Action = ArmyAction;
    type ActionResult = ArmyActionResult;
    type Tick = ArmyTick;
    type Context = WorldContext;
    type Error = ArmyError;

    fn id(&self) -> ArmyId {
        self.army.id.clone()
    }

    fn snapshot(&self) -> Army {
        self.army.clone()
    }

    async fn on_create(
        &mut self,
        restore: bool,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<(), ArmyError> {
        if self.army.size == 0 {
            return Err(ArmyError::InvalidSize(0));
        }
        if ctx.directory.tile(self.army.coord).is_none() {
            return Err(ArmyError::TileNotFound(self.army.coord));
        }
        if self.army.marching
            && (self.army.to == self.army.coord || ctx.directory.tile(self.army.to).is_none())
        {
            warn!(id = %self.army.id, to = %self.army.to, "March target unusable, army stays idle");
            self.army.clear_march();
        } else if !self.army.marching {
            self.army.clear_march();
        }

        if !restore {
            ctx.persistence.create(Record::Army(self.army.clone())).await;
        }
        self.enter(self.army.coord, ctx, scope).await;
        match ctx.directory.user(&self.army.owner) {
            Some(owner) => owner.army_added(self.army.id.clone()).await,
            None => debug!(id = %self.army.id, owner = %self.army.owner, "Owner not registered"),
        }

        if self.army.marching {
            let every = ctx.config.army_step_interval();
            scope.start_ticker("march", every, every, ArmyTick::Step);
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ArmyAction,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<ArmyActionResult, ArmyError> {
        match action {
            ArmyAction::StartMarch(target) => {
                if target == self.army.coord {
                    return Ok(ArmyActionResult::Army(self.army.clone()));
                }
                if ctx.directory.tile(target).is_none() {
                    return Err(ArmyError::TileNotFound(target));
                }
                self.army.from = self.army.coord;
                self.army.to = target;
                self.army.marching = true;
                self.steps = 0;
                self.persist(ctx).await;
                if let Some(tile) = ctx.directory.tile(self.army.coord) {
                    tile.update_army(self.army.clone()).await;
                }
                let every = ctx.config.army_step_interval();
                scope.start_ticker("march", every, every, ArmyTick::Step);
                info!(id = %self.army.id, from = %self.army.from, to = %target, "March started");
                Ok(ArmyActionResult::Army(self.army.clone()))
            }
            ArmyAction::SetSize(size) => {
                if size == 0 {
                    return Err(ArmyError::InvalidSize(size));
                }
                self.army.size = size;
                self.persist(ctx).await;
                Ok(ArmyActionResult::Done)
            }
        }
    }

    async fn on_tick(&mut self, tick: ArmyTick, ctx: &WorldContext, scope: &mut ActorScope<Self>) {
        match tick {
            ArmyTick::Step => {
                if !self.army.marching {
                    scope.stop("march");
                    return;
                }
                let left = self.advance();
                let arrived = !self.army.marching;
                if arrived {
                    scope.stop("march");
                    info!(id = %self.army.id, at = %self.army.coord, steps = self.steps, "March finished");
                }
                if arrived || self.steps % ctx.config.army_backup_every == 0 {
                    self.persist(ctx).await;
                }
                self.leave(left, ctx).await;
                self.enter(self.army.coord, ctx, scope).await;
            }
        }
    }

    async fn on_delete(
        &mut self,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), ArmyError> {
        ctx.persistence.delete(RecordKey::Army(self.army.id.clone())).await;
        self.leave(self.army.coord, ctx).await;
        if let Some(owner) = ctx.directory.user(&self.army.owner) {
            owner.army_removed(self.army.id.clone()).await;
        }
        Ok(())
    }
}
