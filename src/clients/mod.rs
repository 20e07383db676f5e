//! Type-safe wrappers around [`EntityClient`](actor_framework::EntityClient), one per entity kind.
//!
//! Requests (`adjust_gold`, `describe`, `train_troops`, ...) wait for a reply within the
//! request timeout. Notifications (`credit`, `add_army`, `shift_population_cap`, ...) only
//! enqueue; a closed recipient is logged and otherwise ignored.

pub mod actor_client;
pub mod army_client;
pub mod building_client;
pub mod city_client;
pub mod map_tile_client;
pub mod user_client;

pub use actor_client::ActorClient;
pub use army_client::*;
pub use building_client::*;
pub use city_client::*;
pub use map_tile_client::*;
pub use user_client::*;
