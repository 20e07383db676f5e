use crate::clients::actor_client::ActorClient;
use crate::error::DomainError;
use crate::model::{ArmyId, CityId, UserId};
use crate::user_actor::{UserAction, UserActionResult, UserEntity, UserError, UserHoldings};
use actor_framework::{EntityClient, FrameworkError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with one User actor.
#[derive(Clone, Debug)]
pub struct UserClient {
    inner: EntityClient<UserEntity>,
}

impl UserClient {
    pub fn new(inner: EntityClient<UserEntity>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<UserEntity> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &EntityClient<UserEntity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UserError::from_framework(e)
    }
}

impl UserClient {
    async fn request(&self, action: UserAction) -> Result<UserActionResult, UserError> {
        self.inner
            .perform_action(action)
            .await
            .map_err(Self::map_error)
    }

    async fn post(&self, action: UserAction) {
        if let Err(e) = self.inner.notify(action).await {
            warn!(error = %e, "User notification dropped");
        }
    }

    #[instrument(skip(self))]
    pub async fn adjust_gold(&self, delta: i64) -> Result<i64, UserError> {
        debug!("Sending request");
        match self.request(UserAction::AdjustGold(delta)).await? {
            UserActionResult::Gold(balance) => Ok(balance),
            other => Err(UserError::Internal(format!("{other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn adjust_food(&self, delta: i64) -> Result<i64, UserError> {
        debug!("Sending request");
        match self.request(UserAction::AdjustFood(delta)).await? {
            UserActionResult::Food(balance) => Ok(balance),
            other => Err(UserError::Internal(format!("{other:?}"))),
        }
    }

    /// Debits `amount` gold, failing with [`UserError::InsufficientFunds`] if it is not there.
    #[instrument(skip(self))]
    pub async fn spend_gold(&self, amount: i64) -> Result<i64, UserError> {
        debug!("Sending request");
        match self.request(UserAction::SpendGold(amount)).await? {
            UserActionResult::Gold(balance) => Ok(balance),
            other => Err(UserError::Internal(format!("{other:?}"))),
        }
    }

    /// Credits production without waiting for the user actor.
    pub async fn credit(&self, gold: i64, food: i64) {
        if gold != 0 {
            self.post(UserAction::AdjustGold(gold)).await;
        }
        if food != 0 {
            self.post(UserAction::AdjustFood(food)).await;
        }
    }

    #[instrument(skip(self))]
    pub async fn add_ally(&self, ally: UserId) -> Result<(), UserError> {
        debug!("Sending request");
        self.request(UserAction::AddAlly(ally)).await.map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn remove_ally(&self, ally: UserId) -> Result<bool, UserError> {
        debug!("Sending request");
        match self.request(UserAction::RemoveAlly(ally)).await? {
            UserActionResult::AllyRemoved(found) => Ok(found),
            other => Err(UserError::Internal(format!("{other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn holdings(&self) -> Result<UserHoldings, UserError> {
        debug!("Sending request");
        match self.request(UserAction::Holdings).await? {
            UserActionResult::Holdings(holdings) => Ok(holdings),
            other => Err(UserError::Internal(format!("{other:?}"))),
        }
    }

    // Ownership bookkeeping is fire-and-forget so an army or city never waits on its owner.

    pub async fn army_added(&self, army: ArmyId) {
        self.post(UserAction::AddArmy(army)).await;
    }

    pub async fn army_removed(&self, army: ArmyId) {
        self.post(UserAction::RemoveArmy(army)).await;
    }

    pub async fn city_attached(&self, city: CityId) {
        self.post(UserAction::AttachCity(city)).await;
    }

    pub async fn city_detached(&self, city: CityId) {
        self.post(UserAction::DetachCity(city)).await;
    }
}
