//! Building entity logic shared by the six building kinds.
//!
//! Kinds differ only in their tables and side effects:
//!
//! | Kind | On create / demolish | On production tick |
//! |------|----------------------|--------------------|
//! | CityCenter, TownCenter | adjusts population cap | gold and food |
//! | House | adjusts population cap | - |
//! | Farm, Mine | - | gold |
//! | Barracks | - | - (trains troops) |

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::BuildingEntity;
pub use error::*;

use crate::clients::BuildingClient;
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::Building;
use actor_framework::EntityActor;

/// Spawns a building actor and waits until it is registered in the directory.
///
/// A fresh building claims its tile first and fails if the tile is taken.
pub async fn start(
    building: Building,
    ctx: &WorldContext,
    restore: bool,
) -> Result<BuildingClient, BuildingError> {
    let (client, _task) = EntityActor::start(
        BuildingEntity::new(building),
        ctx.clone(),
        ctx.spawn_options(),
        Some(ctx.directory.buildings().clone()),
        restore,
    )
    .await
    .map_err(BuildingError::from_framework)?;
    Ok(BuildingClient::new(client))
}
