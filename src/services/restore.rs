//! Respawning single actors from persisted rows.
//!
//! Restored actors do not write their row again and do not re-claim tiles; the rows already
//! say who owns what. Call these in dependency order (users, tiles, cities, armies, buildings,
//! trainings), as [`WorldSystem::restore_rows`] does.

use crate::directory::EntityKind;
use crate::error::{OrNotFound, WorldError};
use crate::lifecycle::WorldSystem;
use crate::model::{Army, Building, City, MapTile, Training, User};
use crate::{army_actor, building_actor, city_actor, map_tile_actor, user_actor};

impl WorldSystem {
    pub async fn restore_user(&self, user: User) -> Result<(), WorldError> {
        user_actor::start(user, self.context(), true).await?;
        Ok(())
    }

    pub async fn restore_map_tile(&self, tile: MapTile) -> Result<(), WorldError> {
        map_tile_actor::start(tile, self.context(), true).await?;
        Ok(())
    }

    pub async fn restore_city(&self, city: City) -> Result<(), WorldError> {
        city_actor::start(city, self.context(), true).await?;
        Ok(())
    }

    pub async fn restore_army(&self, army: Army) -> Result<(), WorldError> {
        army_actor::start(army, self.context(), true).await?;
        Ok(())
    }

    pub async fn restore_building(&self, building: Building) -> Result<(), WorldError> {
        building_actor::start(building, self.context(), true).await?;
        Ok(())
    }

    /// Hands a training back to its barracks. A deadline already in the past completes at
    /// once: the army is spawned and the row removed before this returns.
    pub async fn restore_training(&self, training: Training) -> Result<(), WorldError> {
        let id = training.barracks_id.clone();
        self.building_client(&id)?
            .restore_training(training)
            .await
            .or_not_found(EntityKind::Building, id)
    }
}
