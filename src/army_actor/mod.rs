//! Army entity logic: the idle/marching state machine and its step ticker.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::ArmyEntity;
pub use error::*;

use crate::clients::ArmyClient;
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::Army;
use actor_framework::EntityActor;

/// Spawns an army actor and waits until it is registered in the directory.
///
/// Fails with [`ArmyError::TileNotFound`] when no tile exists at the army's coordinate.
pub async fn start(army: Army, ctx: &WorldContext, restore: bool) -> Result<ArmyClient, ArmyError> {
    let (client, _task) = EntityActor::start(
        ArmyEntity::new(army),
        ctx.clone(),
        ctx.spawn_options(),
        Some(ctx.directory.armies().clone()),
        restore,
    )
    .await
    .map_err(ArmyError::from_framework)?;
    Ok(ArmyClient::new(client))
}
