//! # Actor Framework
//!
//! This crate provides the building blocks for running many small, independently addressable
//! units of state ("entity actors") on Tokio. Every entity gets its own task, its own bounded
//! inbox, and its own timers. Nothing outside the task can touch the entity's fields; all
//! interaction is a message.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and the hooks that mutate it
//! 2. **Runtime Layer** ([`EntityActor`], [`ActorScope`]) - message loop, lifecycle and timers
//! 3. **Interface Layer** ([`EntityClient`], [`ActorClient`]) - typed, timeout-bounded requests
//! 4. **Discovery** ([`Partition`]) - reader/writer-locked id → handle maps
//!
//! ## Messaging Semantics
//!
//! - [`EntityClient::notify`] enqueues and returns. Messages from one sender to one actor are
//!   delivered in order.
//! - Every reply-bearing call is a request bounded by the client's timeout. A timed-out request is
//!   abandoned, the actor may still process it, and its reply is discarded.
//! - An actor processes one message at a time, so hooks take `&mut self` without locks.
//!
//! ## Quick Start
//!
//! ```rust
//! use actor_framework::{ActorEntity, ActorScope, EntityActor, SpawnOptions};
//! use async_trait::async_trait;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct Granary { id: u32, grain: u64 }
//!
//! #[derive(Debug)] enum GranaryAction { Store(u64) }
//! #[derive(Debug, Clone)] enum GranaryTick { Spoil }
//! #[derive(Debug, thiserror::Error)] #[error("granary error")] struct GranaryError;
//!
//! #[async_trait]
//! impl ActorEntity for Granary {
//!     type Id = u32;
//!     type Snapshot = u64;
//!     type Action = GranaryAction;
//!     type ActionResult = u64;
//!     type Tick = GranaryTick;
//!     type Context = ();
//!     type Error = GranaryError;
//!
//!     fn id(&self) -> u32 { self.id }
//!     fn snapshot(&self) -> u64 { self.grain }
//!
//!     async fn on_create(&mut self, _restore: bool, _: &(), scope: &mut ActorScope<Self>)
//!         -> Result<(), GranaryError> {
//!         scope.start_ticker("spoil", Duration::from_secs(60), Duration::from_secs(60), GranaryTick::Spoil);
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, action: GranaryAction, _: &(), _: &mut ActorScope<Self>)
//!         -> Result<u64, GranaryError> {
//!         match action { GranaryAction::Store(n) => { self.grain += n; Ok(self.grain) } }
//!     }
//!
//!     async fn on_tick(&mut self, _tick: GranaryTick, _: &(), _: &mut ActorScope<Self>) {
//!         self.grain -= self.grain / 10;
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let granary = Granary { id: 1, grain: 0 };
//!     let (client, _handle) = EntityActor::start(granary, (), SpawnOptions::default(), None, false)
//!         .await
//!         .unwrap();
//!     assert_eq!(client.perform_action(GranaryAction::Store(50)).await.unwrap(), 50);
//!     client.delete().await.unwrap();
//! }
//! ```
//!
//! ## Testing
//!
//! See [`mock`] for client-level mocks and the testing patterns used across the workspace.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod lazy;
pub mod message;
pub mod mock;
pub mod registry;
pub mod scope;

// Re-export core types for convenience
pub use actor::{EntityActor, SpawnOptions};
pub use client::EntityClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use lazy::LazyRef;
pub use message::{EntityRequest, Response};
pub use registry::Partition;
pub use scope::ActorScope;
