//! User-specific entity logic: wallet, alliances and periodic self-backup.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::UserEntity;
pub use error::*;

use crate::clients::UserClient;
use crate::error::DomainError;
use crate::lifecycle::WorldContext;
use crate::model::User;
use actor_framework::EntityActor;

/// Spawns a user actor and waits until it is registered in the directory.
pub async fn start(user: User, ctx: &WorldContext, restore: bool) -> Result<UserClient, UserError> {
    let (client, _task) = EntityActor::start(
        UserEntity::new(user),
        ctx.clone(),
        ctx.spawn_options(),
        Some(ctx.directory.users().clone()),
        restore,
    )
    .await
    .map_err(UserError::from_framework)?;
    Ok(UserClient::new(client))
}
