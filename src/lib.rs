//! # cityio
//!
//! A persistent virtual world of map tiles, cities, buildings and roaming armies, built as a
//! population of small entity actors on Tokio.
//!
//! Every user, tile, city, building and army is its own actor: one task, one bounded inbox,
//! its own timers. Actors find each other through the [`Directory`](directory::Directory) and
//! talk only through typed clients. Rows are written through a single persistence actor and
//! read back on start.
//!
//! ## Module Tour
//!
//! ### 1. The Engine (`actor_framework`)
//! The generic entity actor, its clients, timers, lazy references and mocks live in the
//! `crates/actor-framework` workspace member.
//!
//! ### 2. The World ([`model`], [`directory`], [`persistence`])
//! - [`model`] - plain rows: [`User`](model::User), [`MapTile`](model::MapTile),
//!   [`City`](model::City), [`Building`](model::Building), [`Army`](model::Army),
//!   [`Training`](model::Training)
//! - [`directory`] - id → live actor handle, one partition per kind
//! - [`persistence`] - the [`Store`](persistence::Store) trait, the in-memory and JSON file
//!   stores and the batching [`PersistenceActor`](persistence::PersistenceActor)
//!
//! ### 3. The Actors
//! - [`user_actor`] - wallet, alliances, holdings
//! - [`map_tile_actor`] - city and building slots, stationed armies and the idle merge
//! - [`city_actor`] - logistic population growth
//! - [`building_actor`] - production, upgrades and barracks training
//! - [`army_actor`] - the march state machine
//!
//! ### 4. The Interface ([`clients`], [`services`], [`lifecycle`])
//! - [`clients`] - one typed client per actor kind
//! - [`lifecycle`] - [`WorldSystem`](lifecycle::WorldSystem): start, restore, shutdown
//! - [`services`] - the call surface, as methods on `WorldSystem`
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! CITYIO_CONFIG=world.toml RUST_LOG=debug cargo run
//! ```

pub mod army_actor;
pub mod building_actor;
pub mod city_actor;
pub mod clients;
pub mod config;
pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod map_tile_actor;
pub mod model;
pub mod password;
pub mod persistence;
pub mod services;
pub mod user_actor;

pub use error::WorldError;
pub use lifecycle::WorldSystem;
