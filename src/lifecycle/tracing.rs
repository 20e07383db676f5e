//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: every actor logs `Created` (with `restore`), `Deleted` and `Shutdown`
//!   with `entity_type` and `id` fields
//! - **Client requests**: client methods carry `#[instrument]` spans, so a request made while
//!   handling another request nests under it
//! - **Timers**: growth, production and march steps log at `trace`; completions at `info`
//! - **Persistence**: flushes at `debug`, write failures at `error`
//!
//! ## Usage
//!
//! ```bash
//! # Lifecycle and completions only
//! RUST_LOG=info cargo run
//!
//! # Every request and flush
//! RUST_LOG=debug cargo run
//!
//! # One module only
//! RUST_LOG=cityio::building_actor=trace cargo run
//! ```
//!
//! A training completing at `info` looks like:
//!
//! ```text
//! INFO Created entity_type="ArmyEntity" id=army_3f9c0d1e22b4a871 restore=false
//! INFO Training complete id=building_0a1b army=army_3f9c0d1e22b4a871 size=10 owner=user_77
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type already says where a line comes from
        .compact()
        .init();
}
