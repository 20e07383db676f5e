#![allow(dead_code)]

use cityio::config::WorldConfig;
use cityio::model::{CityKind, Coord, NewCity, NewUser, UserId};
use cityio::persistence::MemoryStore;
use cityio::WorldSystem;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Millisecond timers so whole scenarios finish in well under a second.
pub fn fast_config() -> WorldConfig {
    WorldConfig {
        request_timeout_ms: 1_000,
        flush_interval_ms: 50,
        user_backup_interval_ms: 1_000,
        city_growth_interval_ms: 20,
        city_tick_jitter_ms: 0,
        building_production_interval_ms: 20,
        army_step_interval_ms: 10,
        army_backup_every: 2,
        training_duration_ms: 60,
        map_size: 32,
        city_size: 3,
        password_cost: cityio::password::MIN_COST,
        ..WorldConfig::default()
    }
}

pub fn world_with(config: WorldConfig) -> (WorldSystem, MemoryStore) {
    let store = MemoryStore::new();
    let world = WorldSystem::new(Arc::new(store.clone()), config).expect("valid config");
    (world, store)
}

pub fn world() -> (WorldSystem, MemoryStore) {
    world_with(fast_config())
}

/// Creates every tile of the `width × height` rectangle at the origin.
pub async fn tiles(world: &WorldSystem, width: i32, height: i32) {
    for x in 0..width {
        for y in 0..height {
            world.create_map_tile(Coord::new(x, y)).await.unwrap();
        }
    }
}

pub async fn user(world: &WorldSystem, name: &str) -> UserId {
    world
        .register_user(NewUser::new(format!("{name}@example.com"), name, "secret"))
        .await
        .unwrap()
}

pub fn capital(owner: &UserId, origin: Coord) -> NewCity {
    NewCity {
        kind: CityKind::Capital,
        owner: Some(owner.clone()),
        name: "Uruk".into(),
        size: 3,
        origin: Some(origin),
    }
}

/// Polls `check` until it holds, panicking after five seconds.
pub async fn eventually<F, Fut>(what: &str, mut check: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if check().await {
            return;
        }
        if Instant::now() > deadline {
            panic!("timed out waiting for {what}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
