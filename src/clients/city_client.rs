use crate::city_actor::{CityAction, CityActionResult, CityEntity, CityError};
use crate::clients::actor_client::ActorClient;
use crate::error::DomainError;
use crate::model::UserId;
use actor_framework::{EntityClient, FrameworkError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with one City actor.
#[derive(Clone, Debug)]
pub struct CityClient {
    inner: EntityClient<CityEntity>,
}

impl CityClient {
    pub fn new(inner: EntityClient<CityEntity>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<CityEntity> for CityClient {
    type Error = CityError;

    fn inner(&self) -> &EntityClient<CityEntity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CityError::from_framework(e)
    }
}

impl CityClient {
    #[instrument(skip(self))]
    pub async fn adjust_population_cap(&self, delta: f64) -> Result<f64, CityError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(CityAction::AdjustPopulationCap(delta))
            .await
            .map_err(Self::map_error)?
        {
            CityActionResult::PopulationCap(cap) => Ok(cap),
            other => Err(CityError::Internal(format!("{other:?}"))),
        }
    }

    /// Same as [`CityClient::adjust_population_cap`] without waiting for the city.
    pub async fn shift_population_cap(&self, delta: f64) {
        if let Err(e) = self
            .inner
            .notify(CityAction::AdjustPopulationCap(delta))
            .await
        {
            warn!(error = %e, delta, "Population cap change dropped");
        }
    }

    #[instrument(skip(self))]
    pub async fn set_owner(&self, owner: Option<UserId>) -> Result<(), CityError> {
        debug!("Sending request");
        self.inner
            .perform_action(CityAction::SetOwner(owner))
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }

    /// Current owner, read from a fresh snapshot.
    pub async fn owner(&self) -> Result<Option<UserId>, CityError> {
        self.get().await.map(|city| city.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{City, CityId, CityKind, Coord};
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_owner_reads_snapshot() {
        let mut mock = MockClient::<CityEntity>::new();
        mock.expect_get().return_ok(City {
            id: CityId::from("city_1"),
            kind: CityKind::Capital,
            owner: Some(UserId::from("alice")),
            name: "Uruk".into(),
            population: 250.0,
            population_cap: 1250.0,
            origin: Coord::new(0, 0),
            size: 5,
        });
        let client = CityClient::new(mock.client());
        assert_eq!(client.owner().await.unwrap(), Some(UserId::from("alice")));
        mock.verify();
    }

    #[tokio::test]
    async fn test_wrong_reply_shape_is_internal() {
        let mut mock = MockClient::<CityEntity>::new();
        mock.expect_action().return_ok(CityActionResult::Done);
        let client = CityClient::new(mock.client());
        assert!(matches!(
            client.adjust_population_cap(10.0).await,
            Err(CityError::Internal(_))
        ));
    }
}
