//! # Generic Entity Actor
//!
//! This module defines the `EntityActor`, the server half of the actor model. Each instance
//! owns exactly one entity value and processes its inbox sequentially inside its own Tokio
//! task, so entity state is never shared and never locked.

use crate::client::EntityClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{EntityRequest, Response};
use crate::registry::Partition;
use crate::scope::ActorScope;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Options shared by every actor of a given kind.
#[derive(Debug, Clone, Copy)]
pub struct SpawnOptions {
    /// Capacity of the inbox. Senders wait for space when it is full.
    pub buffer_size: usize,
    /// Bound applied to every request made through the actor's clients.
    pub request_timeout: Duration,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            buffer_size: 64,
            request_timeout: crate::client::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Removes the actor's registry entry when dropped.
///
/// Held by the run loop, so the entry also goes away when a hook panics and Tokio drops the
/// task's future. Only an entry that still points at this actor is removed.
struct Registration<T: ActorEntity> {
    registry: Option<Partition<T::Id, EntityClient<T>>>,
    id: T::Id,
    this: mpsc::WeakSender<EntityRequest<T>>,
}

impl<T: ActorEntity> Drop for Registration<T> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.take() else {
            return;
        };
        let this = self.this.upgrade().map(EntityClient::new);
        registry.remove_if(&self.id, |stored| {
            this.as_ref().map(|c| c.same_actor(stored)).unwrap_or(false)
        });
    }
}

/// ## EntityActor
///
/// The `EntityActor<T>` owns one `T: ActorEntity` and the receiving end of its inbox.
///
/// # Usage Pattern
///
/// 1.  **Create**: `EntityActor::new(entity, options)` returns the actor and its client.
/// 2.  **Register**: optionally attach a [`Partition`] with [`EntityActor::with_registry`].
/// 3.  **Run**: spawn `actor.run(context)` and send `Create` through the client.
///
/// [`EntityActor::start`] does all three and waits for the create reply.
///
/// # Lifecycle
///
/// * **Create** – runs `on_create`. On success the client is put into the registry before the
///   reply is sent, so the caller can immediately find the entity. On failure the actor ends.
/// * **Delete** – runs `on_delete`, stops timers, closes the inbox, deregisters and then
///   replies. Messages still queued are dropped and their callers see `ActorDropped`.
/// * **Stop** – stops timers and deregisters without the delete hook.
/// * Dropping every strong client also ends the loop.
pub struct EntityActor<T: ActorEntity> {
    entity: T,
    receiver: mpsc::Receiver<EntityRequest<T>>,
    scope: ActorScope<T>,
    registry: Option<Partition<T::Id, EntityClient<T>>>,
}

impl<T: ActorEntity> EntityActor<T> {
    pub fn new(entity: T, options: SpawnOptions) -> (Self, EntityClient<T>) {
        let (sender, receiver) = mpsc::channel(options.buffer_size);
        let client = EntityClient::new(sender).with_timeout(options.request_timeout);
        let actor = Self {
            entity,
            receiver,
            scope: ActorScope::new(&client),
            registry: None,
        };
        (actor, client)
    }

    pub fn with_registry(mut self, registry: Partition<T::Id, EntityClient<T>>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Spawns the actor, sends `Create` and waits for the reply.
    pub async fn start(
        entity: T,
        context: T::Context,
        options: SpawnOptions,
        registry: Option<Partition<T::Id, EntityClient<T>>>,
        restore: bool,
    ) -> Result<(EntityClient<T>, JoinHandle<()>), FrameworkError> {
        let (mut actor, client) = Self::new(entity, options);
        actor.registry = registry;
        let handle = tokio::spawn(actor.run(context));
        client.create(restore).await?;
        Ok((client, handle))
    }

    /// Runs the actor's event loop until it is deleted, stopped, or every client is gone.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "ArmyEntity" instead of the full path)
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let id = self.entity.id();
        debug!(entity_type, %id, "Actor started");

        let registration = Registration {
            registry: self.registry.take(),
            id: id.clone(),
            this: self.scope.downgrade(),
        };

        let mut pending_delete: Option<Response<()>> = None;

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                EntityRequest::Create {
                    restore,
                    respond_to,
                } => {
                    if let Err(e) = self
                        .entity
                        .on_create(restore, &context, &mut self.scope)
                        .await
                    {
                        warn!(entity_type, %id, error = %e, "on_create failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        break;
                    }
                    if let (Some(registry), Some(client)) =
                        (&registration.registry, self.scope.client())
                    {
                        registry.put(id.clone(), client);
                    }
                    info!(entity_type, %id, restore, "Created");
                    let _ = respond_to.send(Ok(id.clone()));
                }
                EntityRequest::Get { respond_to } => {
                    debug!(entity_type, %id, "Get");
                    let _ = respond_to.send(Ok(self.entity.snapshot()));
                }
                EntityRequest::Action { action, respond_to } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = self
                        .entity
                        .handle_action(action, &context, &mut self.scope)
                        .await;
                    if let Err(e) = &result {
                        warn!(entity_type, %id, error = %e, "Action failed");
                    }
                    if let Some(respond_to) = respond_to {
                        let _ = respond_to
                            .send(result.map_err(|e| FrameworkError::EntityError(Box::new(e))));
                    }
                }
                EntityRequest::Tick(tick) => {
                    self.entity.on_tick(tick, &context, &mut self.scope).await;
                }
                EntityRequest::Delete { respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Err(e) = self.entity.on_delete(&context, &mut self.scope).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    pending_delete = Some(respond_to);
                    break;
                }
                EntityRequest::Stop => {
                    debug!(entity_type, %id, "Stop");
                    break;
                }
            }
        }

        self.scope.stop_all();
        self.receiver.close();
        drop(registration);

        match pending_delete {
            Some(respond_to) => {
                info!(entity_type, %id, "Deleted");
                let _ = respond_to.send(Ok(()));
            }
            None => debug!(entity_type, %id, "Shutdown"),
        }
    }
}
