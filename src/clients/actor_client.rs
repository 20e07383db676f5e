//! The shared client surface.
//!
//! Every typed client wraps one [`EntityClient`](actor_framework::EntityClient) and implements
//! [`ActorClient`], which supplies `get`, `delete` and `is_closed`. Errors raised inside an
//! entity come back through `map_error` as that entity's own error type.

pub use actor_framework::ActorClient;
