//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every world entity (user, city, tile,
//! building, army) implements to be driven by the generic [`EntityActor`](crate::EntityActor).
//! One actor task owns exactly one entity value, so every hook receives `&mut self` and never
//! needs a lock.
//!
//! # Provided Methods (Hooks)
//! Lifecycle hooks with default implementations:
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_tick`]
//! - [`ActorEntity::on_delete`]
//!
//! Only [`ActorEntity::handle_action`] and the two accessors are required.

use crate::scope::ActorScope;
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any entity must implement to be managed by an [`EntityActor`](crate::EntityActor).
///
/// # Async & Context
/// Hooks are `async` so an entity can call other actors while handling a message. The
/// `Context` type is injected into every hook and carries the shared services
/// (directory, persistence handle, configuration) the entity needs.
///
/// # Scope
/// Every hook also receives the actor's [`ActorScope`], which owns the entity's timers and
/// can hand out a client pointing back at the actor itself.
#[async_trait]
pub trait ActorEntity: Send + Sized + 'static {
    /// The logical identity of the entity (user id, coordinate, ...).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// Read-only view returned by `Get` requests.
    type Snapshot: Clone + Send + Debug + 'static;

    /// Enum of entity-specific operations.
    type Action: Send + Debug + 'static;

    /// The result type returned by actions.
    type ActionResult: Send + Debug + 'static;

    /// Messages produced by the entity's own timers.
    type Tick: Clone + Send + Debug + 'static;

    /// The runtime context (dependencies) injected into the actor.
    type Context: Send + Sync + 'static;

    /// The error type for this entity.
    ///
    /// One enum covers every action of the entity; clients downcast it back out of
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    fn snapshot(&self) -> Self::Snapshot;

    // --- Lifecycle Hooks (Async) ---

    /// Called once when the actor receives its `Create` message.
    ///
    /// `restore` is true when the entity is being rebuilt from a persisted row, in which
    /// case it must not write a fresh create record.
    /// Returning an error terminates the actor before it is registered anywhere.
    async fn on_create(
        &mut self,
        _restore: bool,
        _ctx: &Self::Context,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom entity-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
        scope: &mut ActorScope<Self>,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Called for every message produced by one of the entity's timers.
    async fn on_tick(
        &mut self,
        _tick: Self::Tick,
        _ctx: &Self::Context,
        _scope: &mut ActorScope<Self>,
    ) {
    }

    /// Called before the actor terminates on a `Delete` request.
    ///
    /// Timers are stopped by the actor right after this hook returns `Ok`.
    async fn on_delete(
        &mut self,
        _ctx: &Self::Context,
        _scope: &mut ActorScope<Self>,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}
