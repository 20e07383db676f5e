//! Map tile entity logic: city and building slots, stationed armies and the idle-army merge.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::MapTileEntity;
pub use error::*;

use crate::clients::MapTileClient;
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::MapTile;
use actor_framework::EntityActor;

/// Spawns a map tile actor and waits until it is registered in the directory.
pub async fn start(
    tile: MapTile,
    ctx: &WorldContext,
    restore: bool,
) -> Result<MapTileClient, MapTileError> {
    let (client, _task) = EntityActor::start(
        MapTileEntity::new(tile),
        ctx.clone(),
        ctx.spawn_options(),
        Some(ctx.directory.tiles().clone()),
        restore,
    )
    .await
    .map_err(MapTileError::from_framework)?;
    Ok(MapTileClient::new(client))
}
