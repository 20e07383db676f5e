use crate::clients::actor_client::ActorClient;
use crate::clients::ArmyClient;
use crate::error::DomainError;
use crate::map_tile_actor::{MapTileAction, MapTileActionResult, MapTileEntity, MapTileError};
use crate::model::{Army, ArmyId, BuildingId, CityId, MapTile, TileView, UserId};
use actor_framework::{EntityClient, FrameworkError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with one MapTile actor.
#[derive(Clone, Debug)]
pub struct MapTileClient {
    inner: EntityClient<MapTileEntity>,
}

impl MapTileClient {
    pub fn new(inner: EntityClient<MapTileEntity>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<MapTileEntity> for MapTileClient {
    type Error = MapTileError;

    fn inner(&self) -> &EntityClient<MapTileEntity> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MapTileError::from_framework(e)
    }
}

impl MapTileClient {
    async fn request(&self, action: MapTileAction) -> Result<MapTileActionResult, MapTileError> {
        self.inner
            .perform_action(action)
            .await
            .map_err(Self::map_error)
    }

    async fn post(&self, action: MapTileAction) {
        if let Err(e) = self.inner.notify(action).await {
            warn!(error = %e, "Map tile notification dropped");
        }
    }

    /// Claims the building slot, failing with [`MapTileError::Occupied`] if it is taken.
    #[instrument(skip(self))]
    pub async fn assign_building(&self, building: BuildingId) -> Result<(), MapTileError> {
        debug!("Sending request");
        self.request(MapTileAction::AssignBuilding(building))
            .await
            .map(|_| ())
    }

    #[instrument(skip(self))]
    pub async fn occupancy(&self) -> Result<MapTile, MapTileError> {
        debug!("Sending request");
        match self.request(MapTileAction::Occupancy).await? {
            MapTileActionResult::Occupancy(tile) => Ok(tile),
            other => Err(MapTileError::Internal(format!("{other:?}"))),
        }
    }

    #[instrument(skip(self))]
    pub async fn describe(&self) -> Result<TileView, MapTileError> {
        debug!("Sending request");
        match self.request(MapTileAction::Describe).await? {
            MapTileActionResult::View(view) => Ok(view),
            other => Err(MapTileError::Internal(format!("{other:?}"))),
        }
    }

    pub async fn assign_city(&self, city: Option<CityId>) {
        self.post(MapTileAction::AssignCity(city)).await;
    }

    pub async fn release_city(&self, city: CityId) {
        self.post(MapTileAction::ReleaseCity(city)).await;
    }

    pub async fn release_building(&self, building: BuildingId) {
        self.post(MapTileAction::ReleaseBuilding(building)).await;
    }

    pub async fn add_army(&self, army: Army, handle: ArmyClient) {
        self.post(MapTileAction::AddArmy { army, handle }).await;
    }

    pub async fn remove_army(&self, owner: UserId, army: ArmyId) {
        self.post(MapTileAction::RemoveArmy { owner, army }).await;
    }

    pub async fn update_army(&self, army: Army) {
        self.post(MapTileAction::UpdateArmy(army)).await;
    }

    pub async fn city_owner_changed(&self, city: CityId) {
        self.post(MapTileAction::CityOwnerChanged(city)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coord;
    use actor_framework::mock::{create_mock_client, expect_action, expect_notify};

    #[tokio::test]
    async fn test_occupied_error_comes_back_typed() {
        let (inner, mut receiver) = create_mock_client::<MapTileEntity>(4);
        let client = MapTileClient::new(inner);

        let call = tokio::spawn(async move { client.assign_building(BuildingId::from("b2")).await });
        let (action, respond_to) = expect_action(&mut receiver).await.unwrap();
        assert!(matches!(action, MapTileAction::AssignBuilding(id) if id.as_str() == "b2"));
        let occupied = MapTileError::Occupied {
            coord: Coord::new(1, 2),
            building: BuildingId::from("b1"),
        };
        respond_to
            .send(Err(FrameworkError::EntityError(Box::new(occupied.clone()))))
            .unwrap();

        assert_eq!(call.await.unwrap().unwrap_err(), occupied);
    }

    #[tokio::test]
    async fn test_army_bookkeeping_is_fire_and_forget() {
        let (inner, mut receiver) = create_mock_client::<MapTileEntity>(4);
        let client = MapTileClient::new(inner);

        client
            .remove_army(UserId::from("alice"), ArmyId::from("a1"))
            .await;
        let action = expect_notify(&mut receiver).await.unwrap();
        assert!(matches!(
            action,
            MapTileAction::RemoveArmy { owner, army } if owner.as_str() == "alice" && army.as_str() == "a1"
        ));
    }
}
