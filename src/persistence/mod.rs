//! # Persistence
//!
//! Durable storage sits behind one serialized actor. Entity actors send it fire-and-forget
//! notifications; creates and deletes are written at once, updates are buffered per kind and
//! flushed in batches on a fixed interval. Storage failures are logged and swallowed: the
//! in-memory actors stay authoritative.
//!
//! ## Structure
//!
//! - [`record`] - [`Record`] / [`RecordKey`] / [`RecordKind`] and the [`WorldRows`] snapshot
//! - [`store`] - the [`Store`] trait, [`StoreError`] and the in-memory [`MemoryStore`]
//! - [`json_file`] - [`JsonFileStore`], the whole world as one JSON document on disk
//! - [`actor`] - [`PersistenceActor`] and its [`PersistenceClient`]

pub mod actor;
pub mod json_file;
pub mod record;
pub mod store;

pub use actor::*;
pub use json_file::*;
pub use record::*;
pub use store::*;
