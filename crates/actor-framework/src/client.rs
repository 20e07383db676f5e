//! # Generic Client
//!
//! This module defines the generic handle for communicating with one entity actor.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{EntityRequest, Response};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Default bound for request/reply exchanges.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// ## EntityClient
///
/// The `EntityClient<T>` is the handle stored in the directory and passed between actors.
/// It forwards requests over a bounded Tokio mpsc channel and receives replies over oneshot
/// channels. The client is cheap to clone and can be shared across tasks.
///
/// * **Fire-and-forget** – [`EntityClient::notify`] only waits for the enqueue.
/// * **Requests** – every reply-bearing call is bounded by the client's timeout. On expiry the
///   request is abandoned and the late reply, if any, is discarded with its oneshot.
pub struct EntityClient<T: ActorEntity> {
    sender: mpsc::Sender<EntityRequest<T>>,
    timeout: Duration,
}

impl<T: ActorEntity> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: ActorEntity> std::fmt::Debug for EntityClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityClient")
            .field("closed", &self.sender.is_closed())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<T: ActorEntity> EntityClient<T> {
    pub fn new(sender: mpsc::Sender<EntityRequest<T>>) -> Self {
        Self {
            sender,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// True when both handles address the same actor.
    pub fn same_actor(&self, other: &Self) -> bool {
        self.sender.same_channel(&other.sender)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub(crate) fn downgrade(&self) -> mpsc::WeakSender<EntityRequest<T>> {
        self.sender.downgrade()
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> EntityRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        };
        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| FrameworkError::Timeout(self.timeout))?
    }

    pub async fn create(&self, restore: bool) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| EntityRequest::Create {
            restore,
            respond_to,
        })
        .await
    }

    pub async fn get(&self) -> Result<T::Snapshot, FrameworkError> {
        self.request(|respond_to| EntityRequest::Get { respond_to })
            .await
    }

    pub async fn delete(&self) -> Result<(), FrameworkError> {
        self.request(|respond_to| EntityRequest::Delete { respond_to })
            .await
    }

    pub async fn perform_action(&self, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| EntityRequest::Action {
            action,
            respond_to: Some(respond_to),
        })
        .await
    }

    /// Enqueues an action without waiting for it to be processed.
    pub async fn notify(&self, action: T::Action) -> Result<(), FrameworkError> {
        self.sender
            .send(EntityRequest::Action {
                action,
                respond_to: None,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Asks the actor to stop without running its delete hook.
    pub async fn stop(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(EntityRequest::Stop)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }
}
