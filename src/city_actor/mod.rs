//! City entity logic: logistic population growth and tile/owner bookkeeping.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::CityEntity;
pub use error::*;

use crate::clients::CityClient;
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::City;
use actor_framework::EntityActor;

/// Spawns a city actor and waits until it is registered in the directory.
pub async fn start(city: City, ctx: &WorldContext, restore: bool) -> Result<CityClient, CityError> {
    let (client, _task) = EntityActor::start(
        CityEntity::new(city),
        ctx.clone(),
        ctx.spawn_options(),
        Some(ctx.directory.cities().clone()),
        restore,
    )
    .await
    .map_err(CityError::from_framework)?;
    Ok(CityClient::new(client))
}
