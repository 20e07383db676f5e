use crate::building_actor::{self, BuildingError, TrainOrder};
use crate::clients::{ActorClient, UserClient};
use crate::directory::EntityKind;
use crate::error::{OrNotFound, WorldError};
use crate::lifecycle::WorldSystem;
use crate::model::{
    Building, BuildingId, CityId, NewBuilding, Training, UserId, MAX_BUILDING_LEVEL,
};
use std::time::SystemTime;
use tracing::{info, instrument, warn};

impl WorldSystem {
    /// Places a level 1 building on a tile of the city.
    ///
    /// The city's owner pays the level 1 cost up front and is refunded if the building cannot
    /// be placed. Neutral cities build for free.
    #[instrument(skip(self))]
    pub async fn construct_building(&self, new: NewBuilding) -> Result<BuildingId, WorldError> {
        let city = self.get_city(&new.city_id).await?;
        if !city.contains(new.coord) {
            return Err(WorldError::Invalid(format!(
                "{} is not inside city {}",
                new.coord, city.id
            )));
        }
        self.tile_client(new.coord)?;

        let cost = i64::from(new.kind.cost(1));
        let payer = self.charge(city.owner.as_ref(), cost).await?;

        let building = Building {
            id: BuildingId::generate(),
            city_id: new.city_id,
            kind: new.kind,
            level: 1,
            coord: new.coord,
            construction_end: SystemTime::now() + new.kind.construction_time(1),
        };
        let id = building.id.clone();
        if let Err(e) = building_actor::start(building, self.context(), false).await {
            refund(payer, cost).await;
            return Err(e.into());
        }
        info!(%id, kind = ?new.kind, cost, "Building placed");
        Ok(id)
    }

    /// Raises a building one level, charging the owner the cost of the new level.
    #[instrument(skip(self))]
    pub async fn upgrade_building(&self, id: &BuildingId) -> Result<Building, WorldError> {
        let client = self.building_client(id)?;
        let current = client.get().await.or_not_found(EntityKind::Building, id)?;
        if current.level >= MAX_BUILDING_LEVEL {
            return Err(BuildingError::MaxLevelReached {
                id: id.clone(),
                level: current.level,
            }
            .into());
        }

        let owner = self.city_owner(&current.city_id).await?;
        let cost = i64::from(current.kind.cost(current.level + 1));
        let payer = self.charge(owner.as_ref(), cost).await?;

        match client.upgrade().await {
            Ok(upgraded) => Ok(upgraded),
            Err(e) => {
                refund(payer, cost).await;
                Err(e).or_not_found(EntityKind::Building, id)
            }
        }
    }

    /// Removes a building; its tile, city cap and any pending training are cleaned up.
    pub async fn demolish_building(&self, id: &BuildingId) -> Result<(), WorldError> {
        self.building_client(id)?
            .delete()
            .await
            .or_not_found(EntityKind::Building, id)
    }

    /// Starts troop training at a barracks. Fails with `TrainingAlreadyExists` while one runs.
    ///
    /// The trained army appears when the training duration has elapsed, marching to the
    /// center of `deploy_to` when that is another city.
    #[instrument(skip(self))]
    pub async fn train_troops(
        &self,
        barracks_id: &BuildingId,
        size: u32,
        deploy_to: Option<CityId>,
    ) -> Result<Training, WorldError> {
        if let Some(city) = &deploy_to {
            self.city_client(city)?;
        }
        self.building_client(barracks_id)?
            .train_troops(TrainOrder {
                barracks_id: barracks_id.clone(),
                size,
                deploy_to,
            })
            .await
            .or_not_found(EntityKind::Building, barracks_id)
    }

    pub async fn get_building(&self, id: &BuildingId) -> Result<Building, WorldError> {
        self.building_client(id)?
            .get()
            .await
            .or_not_found(EntityKind::Building, id)
    }

    pub async fn current_training(&self, id: &BuildingId) -> Result<Option<Training>, WorldError> {
        self.building_client(id)?
            .current_training()
            .await
            .or_not_found(EntityKind::Building, id)
    }

    async fn city_owner(&self, id: &CityId) -> Result<Option<UserId>, WorldError> {
        self.city_client(id)?
            .owner()
            .await
            .or_not_found(EntityKind::City, id)
    }

    /// Debits `cost` from `owner`. Returns the client to refund, if anything was charged.
    async fn charge(&self, owner: Option<&UserId>, cost: i64) -> Result<Option<UserClient>, WorldError> {
        let Some(owner) = owner else {
            return Ok(None);
        };
        if cost <= 0 {
            return Ok(None);
        }
        let user = self.user_client(owner)?;
        user.spend_gold(cost)
            .await
            .or_not_found(EntityKind::User, owner)?;
        Ok(Some(user))
    }
}

async fn refund(payer: Option<UserClient>, cost: i64) {
    if let Some(user) = payer {
        warn!(cost, "Refunding failed purchase");
        user.credit(cost, 0).await;
    }
}
