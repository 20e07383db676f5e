//! [`ActorEntity`] implementation for users.
//!
//! The user actor owns the wallet and the alliance list. It also keeps the ids of the armies
//! and cities that point at it, maintained by notifications from those actors, so that an
//! account removal knows what to cascade to.

use super::actions::{UserAction, UserActionResult, UserHoldings, UserTick};
use super::error::UserError;
use crate::lifecycle::WorldContext;
use crate::model::{ArmyId, CityId, User, UserId};
use crate::persistence::{Record, RecordKey};
use actor_framework::{ActorEntity, ActorScope};
use async_trait::async_trait;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug)]
pub struct UserEntity {
    user: User,
    armies: BTreeSet<ArmyId>,
    cities: BTreeSet<CityId>,
}

impl UserEntity {
    pub fn new(user: User) -> Self {
        Self {
            user,
            armies: BTreeSet::new(),
            cities: BTreeSet::new(),
        }
    }

    /// Returns false when `ally` was already listed.
    fn add_ally(&mut self, ally: UserId) -> bool {
        if self.user.allies.contains(&ally) {
            return false;
        }
        self.user.allies.push(ally);
        true
    }

    /// Purchases and alliances are written as they happen; production credits wait for the
    /// backup tick.
    async fn persist(&self, ctx: &WorldContext) {
        ctx.persistence.update(Record::User(self.user.clone())).await;
    }

    fn remove_ally(&mut self, ally: &UserId) -> bool {
        match self.user.allies.iter().position(|a| a == ally) {
            Some(index) => {
                self.user.allies.remove(index);
                true
            }
            None => false,
        }
    }
}

fn adjust(balance: i64, delta: i64) -> Result<i64, UserError> {
    balance
        .checked_add(delta)
        .ok_or(UserError::BalanceOverflow { balance, delta })
}

#[async_trait]
impl ActorEntity for UserEntity {
    type Id = UserId;
    type Snapshot = User;
    type Action = UserAction;
    type ActionResult = UserActionResult;
    type Tick = UserTick;
    type Context = WorldContext;
    type Error = UserError;

    fn id(&self) -> UserId {
        self.user.id.clone()
    }

    fn snapshot(&self) -> User {
        self.user.clone()
    }

    async fn on_create(
        &mut self,
        restore: bool,
        ctx: &WorldContext,
        scope: &mut ActorScope<Self>,
    ) -> Result<(), UserError> {
        if !restore {
            ctx.persistence.create(Record::User(self.user.clone())).await;
        }
        let every = ctx.config.user_backup_interval();
        scope.start_ticker("backup", every, every, UserTick::Backup);
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: UserAction,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<UserActionResult, UserError> {
        match action {
            UserAction::AdjustGold(delta) => {
                self.user.gold = adjust(self.user.gold, delta)?;
                Ok(UserActionResult::Gold(self.user.gold))
            }
            UserAction::AdjustFood(delta) => {
                self.user.food = adjust(self.user.food, delta)?;
                Ok(UserActionResult::Food(self.user.food))
            }
            UserAction::SpendGold(amount) => {
                if amount <= 0 {
                    return Err(UserError::InvalidAmount(amount));
                }
                if self.user.gold < amount {
                    return Err(UserError::InsufficientFunds {
                        requested: amount,
                        available: self.user.gold,
                    });
                }
                self.user.gold -= amount;
                self.persist(ctx).await;
                Ok(UserActionResult::Gold(self.user.gold))
            }
            UserAction::AddAlly(ally) => {
                if self.add_ally(ally) {
                    self.persist(ctx).await;
                }
                Ok(UserActionResult::Done)
            }
            UserAction::RemoveAlly(ally) => {
                let removed = self.remove_ally(&ally);
                if removed {
                    self.persist(ctx).await;
                }
                Ok(UserActionResult::AllyRemoved(removed))
            }
            UserAction::AddArmy(army) => {
                self.armies.insert(army);
                Ok(UserActionResult::Done)
            }
            UserAction::RemoveArmy(army) => {
                self.armies.remove(&army);
                Ok(UserActionResult::Done)
            }
            UserAction::AttachCity(city) => {
                self.cities.insert(city);
                Ok(UserActionResult::Done)
            }
            UserAction::DetachCity(city) => {
                self.cities.remove(&city);
                Ok(UserActionResult::Done)
            }
            UserAction::Holdings => Ok(UserActionResult::Holdings(UserHoldings {
                armies: self.armies.iter().cloned().collect(),
                cities: self.cities.iter().cloned().collect(),
            })),
        }
    }

    async fn on_tick(&mut self, tick: UserTick, ctx: &WorldContext, _scope: &mut ActorScope<Self>) {
        match tick {
            UserTick::Backup => {
                debug!(id = %self.user.id, gold = self.user.gold, "Backup");
                self.persist(ctx).await;
            }
        }
    }

    async fn on_delete(
        &mut self,
        ctx: &WorldContext,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), UserError> {
        ctx.persistence.delete(RecordKey::User(self.user.id.clone())).await;
        Ok(())
    }
}
