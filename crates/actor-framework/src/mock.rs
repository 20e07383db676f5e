//! # Mock Framework & Testing Guide
//!
//! [`MockClient<T>`] hands out a real [`EntityClient<T>`] whose inbox is served by a scripted
//! task instead of an [`EntityActor`](crate::EntityActor). It lets unit tests exercise client
//! wrappers and actors that depend on other actors without spawning those dependencies.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast (but involves tokio spawn) |
//! | **Determinism** | Scripted replies | Subject to scheduler and timers |
//! | **Error Injection** | Easy (`return_err`) | Requires specific state |
//!
//! ## Testing Patterns
//!
//! - **Pattern 0 – client logic**: script replies with [`MockClient`] or drive the raw receiver
//!   from [`create_mock_client`] with [`expect_action`] / [`expect_notify`].
//! - **Pattern 1 – single actor**: spawn one real actor with an isolated context.
//! - **Pattern 2 – actor with mocked dependencies**: put mock clients where the actor would find
//!   its collaborators.
//! - **Pattern 3 – full system**: run everything through the lifecycle object.
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, ActorScope, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Debug)] struct Counter { id: u32, value: u64 }
//! #[derive(Debug)] enum CounterAction { Add(u64) }
//! #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32; type Snapshot = u64; type Action = CounterAction;
//!     type ActionResult = u64; type Tick = (); type Context = (); type Error = CounterError;
//!     fn id(&self) -> u32 { self.id }
//!     fn snapshot(&self) -> u64 { self.value }
//!     async fn handle_action(&mut self, action: CounterAction, _: &(), _: &mut ActorScope<Self>)
//!         -> Result<u64, CounterError> {
//!         match action { CounterAction::Add(n) => { self.value += n; Ok(self.value) } }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Counter>::new();
//!     mock.expect_get().return_ok(41);
//!     mock.expect_action().return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.get().await.unwrap(), 41);
//!     assert!(client.perform_action(CounterAction::Add(1)).await.is_err());
//!     mock.verify();
//! }
//! ```

use crate::client::EntityClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{EntityRequest, Response};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the reply the mock should give.
enum Expectation<T: ActorEntity> {
    Create(Result<T::Id, FrameworkError>),
    Get(Result<T::Snapshot, FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
    Delete(Result<(), FrameworkError>),
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Requests are matched against expectations in FIFO order. An unexpected request makes the
/// serving task panic, which the test observes as a dropped reply. Fire-and-forget
/// notifications are recorded instead and can be inspected with [`MockClient::notifications`].
pub struct MockClient<T: ActorEntity> {
    client: EntityClient<T>,
    expectations: Expectations<T>,
    notifications: Arc<Mutex<Vec<T::Action>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<EntityRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let notifications = Arc::new(Mutex::new(Vec::new()));
        let exps = expectations.clone();
        let notes = notifications.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                if let EntityRequest::Action {
                    action,
                    respond_to: None,
                } = request
                {
                    notes.lock().push(action);
                    continue;
                }
                let expectation = exps.lock().pop_front();
                match (request, expectation) {
                    (EntityRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (EntityRequest::Get { respond_to }, Some(Expectation::Get(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        EntityRequest::Action {
                            respond_to: Some(respond_to),
                            ..
                        },
                        Some(Expectation::Action(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (EntityRequest::Delete { respond_to }, Some(Expectation::Delete(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (request, _) => {
                        panic!("Unexpected {} request or expectation mismatch", request.kind());
                    }
                }
            }
        });

        Self {
            client: EntityClient::new(sender),
            expectations,
            notifications,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> EntityClient<T> {
        self.client.clone()
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(Expectation::Create)
    }

    pub fn expect_get(&mut self) -> ExpectationBuilder<T, T::Snapshot> {
        self.builder(Expectation::Get)
    }

    pub fn expect_action(&mut self) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Expectation::Action)
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<T, ()> {
        self.builder(Expectation::Delete)
    }

    fn builder<R>(
        &self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Fire-and-forget actions received so far, in arrival order.
    pub fn notifications(&self) -> Vec<T::Action>
    where
        T::Action: Clone,
    {
        self.notifications.lock().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.expectations.lock().push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.expectations.lock().push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// RAW RECEIVER HELPERS
// =============================================================================

/// Creates a client and the receiver standing in for the actor's inbox.
///
/// Tests read requests off the receiver with the helpers below and answer them by hand,
/// which makes delays and odd replies easy to simulate.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (EntityClient<T>, mpsc::Receiver<EntityRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (EntityClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<EntityRequest<T>>,
) -> Option<Response<T::Snapshot>> {
    match receiver.recv().await {
        Some(EntityRequest::Get { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request expecting a reply.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<EntityRequest<T>>,
) -> Option<(T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(EntityRequest::Action {
            action,
            respond_to: Some(respond_to),
        }) => Some((action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a fire-and-forget Action.
pub async fn expect_notify<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<EntityRequest<T>>,
) -> Option<T::Action> {
    match receiver.recv().await {
        Some(EntityRequest::Action {
            action,
            respond_to: None,
        }) => Some(action),
        _ => None,
    }
}
