//! # ActorClient Trait
//!
//! Provides a common interface for entity-specific clients, adding default `get` and `delete`
//! methods built on top of a generic [`EntityClient`].
use crate::{ActorEntity, EntityClient, FrameworkError};
use async_trait::async_trait;

/// Trait for entity-specific clients to inherit the standard operations.
///
/// Implementors provide access to the inner [`EntityClient`] and a mapping from
/// [`FrameworkError`] into their own error type. A typical `map_error` first tries
/// [`FrameworkError::downcast_entity`] so errors raised by the entity itself come back typed.
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The entity-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic EntityClient.
    fn inner(&self) -> &EntityClient<T>;

    /// Map framework errors to the specific entity error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// True once the actor behind this client has stopped.
    fn is_closed(&self) -> bool {
        self.inner().is_closed()
    }

    /// Fetch the entity's current snapshot.
    #[tracing::instrument(skip(self))]
    async fn get(&self) -> Result<T::Snapshot, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get().await.map_err(Self::map_error)
    }

    /// Delete the entity and terminate its actor.
    #[tracing::instrument(skip(self))]
    async fn delete(&self) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete().await.map_err(Self::map_error)
    }
}
