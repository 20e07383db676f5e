use crate::army_actor::{ArmyAction, ArmyActionResult, ArmyEntity, ArmyError};
use crate::clients::actor_client::ActorClient;
use crate::error::DomainError;
use crate::model::{Army, Coord};
use actor_framework::{EntityClient, FrameworkError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with one Army actor.
#[derive(Clone, Debug)]
pub struct ArmyClient {
    inner: EntityClient<ArmyEntity>,
}

impl ArmyClient {
    pub fn new(inner: EntityClient<ArmyEntity>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<ArmyEntity> for ArmyClient {
    type Error = ArmyError;

    fn inner(&self) -> &EntityClient<ArmyEntity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ArmyError::from_framework(e)
    }
}

impl ArmyClient {
    #[instrument(skip(self))]
    pub async fn start_march(&self, target: Coord) -> Result<Army, ArmyError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(ArmyAction::StartMarch(target))
            .await
            .map_err(Self::map_error)?
        {
            ArmyActionResult::Army(army) => Ok(army),
            other => Err(ArmyError::Internal(format!("{other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_size(&self, size: u32) -> Result<(), ArmyError> {
        debug!("Sending request");
        self.inner
            .perform_action(ArmyAction::SetSize(size))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}
