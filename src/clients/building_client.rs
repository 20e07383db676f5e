use crate::building_actor::{
    BuildingAction, BuildingActionResult, BuildingEntity, BuildingError, TrainOrder,
};
use crate::clients::actor_client::ActorClient;
use crate::error::DomainError;
use crate::model::{Building, Training};
use actor_framework::{EntityClient, FrameworkError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with one Building actor.
#[derive(Clone, Debug)]
pub struct BuildingClient {
    inner: EntityClient<BuildingEntity>,
}

impl BuildingClient {
    pub fn new(inner: EntityClient<BuildingEntity>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<BuildingEntity> for BuildingClient {
    type Error = BuildingError;

    fn inner(&self) -> &EntityClient<BuildingEntity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        BuildingError::from_framework(e)
    }
}

impl BuildingClient {
    async fn request(&self, action: BuildingAction) -> Result<BuildingActionResult, BuildingError> {
        self.inner
            .perform_action(action)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn upgrade(&self) -> Result<Building, BuildingError> {
        debug!("Sending request");
        match self.request(BuildingAction::Upgrade).await? {
            BuildingActionResult::Building(building) => Ok(building),
            other => Err(BuildingError::Internal(format!("{other:?}"))),
        }
    }

    /// Starts a training. Fails with [`BuildingError::TrainingAlreadyExists`] while one runs.
    #[instrument(skip(self))]
    pub async fn train_troops(&self, order: TrainOrder) -> Result<Training, BuildingError> {
        debug!("Sending request");
        match self.request(BuildingAction::TrainTroops(order)).await? {
            BuildingActionResult::Training(Some(training)) => Ok(training),
            other => Err(BuildingError::Internal(format!("{other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn restore_training(&self, training: Training) -> Result<(), BuildingError> {
        debug!("Sending request");
        self.request(BuildingAction::RestoreTraining(training))
            .await
            .map(|_| ())
    }

    pub async fn current_training(&self) -> Result<Option<Training>, BuildingError> {
        match self.request(BuildingAction::CurrentTraining).await? {
            BuildingActionResult::Training(training) => Ok(training),
            other => Err(BuildingError::Internal(format!("{other:?}"))),
        }
    }

    /// Tells the building to drop its cached city, tile and owner handles.
    pub async fn invalidate_references(&self) {
        if let Err(e) = self.inner.notify(BuildingAction::InvalidateReferences).await {
            warn!(error = %e, "Building invalidation dropped");
        }
    }
}
