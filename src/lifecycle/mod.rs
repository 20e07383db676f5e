//! Runtime orchestration and lifecycle management.
//!
//! - [`WorldContext`] - the dependencies every entity actor receives at spawn
//! - [`WorldSystem`] - owns the persistence task, restores the world from a store and shuts
//!   everything down again
//! - [`setup_tracing`] - installs the log subscriber

pub mod context;
pub mod tracing;
pub mod world_system;

pub use self::tracing::*;
pub use context::*;
pub use world_system::*;

#[cfg(test)]
pub(crate) use context::test_context;
