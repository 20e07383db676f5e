//! # Generic Messages
//!
//! This module defines the message type carried by every entity inbox.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to an [`EntityActor`](crate::EntityActor).
///
/// # Lifecycle
/// - **Create**: first message of every actor; runs [`ActorEntity::on_create`].
/// - **Get**: returns [`ActorEntity::snapshot`].
/// - **Action**: runs [`ActorEntity::handle_action`]. `respond_to` is `None` for
///   fire-and-forget notifications.
/// - **Tick**: produced by the actor's own timers.
/// - **Delete**: runs [`ActorEntity::on_delete`] and terminates the actor.
/// - **Stop**: terminates the actor without the delete hook (process shutdown).
pub enum EntityRequest<T: ActorEntity> {
    Create {
        restore: bool,
        respond_to: Response<T::Id>,
    },
    Get {
        respond_to: Response<T::Snapshot>,
    },
    Action {
        action: T::Action,
        respond_to: Option<Response<T::ActionResult>>,
    },
    Tick(T::Tick),
    Delete {
        respond_to: Response<()>,
    },
    Stop,
}

impl<T: ActorEntity> EntityRequest<T> {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            EntityRequest::Create { .. } => "Create",
            EntityRequest::Get { .. } => "Get",
            EntityRequest::Action { .. } => "Action",
            EntityRequest::Tick(_) => "Tick",
            EntityRequest::Delete { .. } => "Delete",
            EntityRequest::Stop => "Stop",
        }
    }
}
