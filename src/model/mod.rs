//! # World Model
//!
//! Plain data for every persisted row. Actors own these values; the persistence layer
//! serializes them; services hand out clones as snapshots.

pub mod army;
pub mod building;
pub mod city;
pub mod coord;
pub mod ids;
pub mod map_tile;
pub mod training;
pub mod user;

pub use army::*;
pub use building::*;
pub use city::*;
pub use coord::*;
pub use ids::*;
pub use map_tile::*;
pub use training::*;
pub use user::*;
