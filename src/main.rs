//! # cityio demo
//!
//! Boots a world from the JSON file named in the config (`CITYIO_CONFIG`, defaults apply when
//! unset), seeds a small map on first run, trains a handful of troops and shuts down cleanly so
//! the next run restores everything.

use cityio::config::WorldConfig;
use cityio::lifecycle::{setup_tracing, WorldSystem};
use cityio::model::{BuildingKind, CityKind, Coord, NewBuilding, NewCity, NewUser};
use cityio::persistence::JsonFileStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = match std::env::var("CITYIO_CONFIG") {
        Ok(path) => WorldConfig::load(&path).map_err(|e| e.to_string())?,
        Err(_) => WorldConfig {
            map_size: 16,
            training_duration_ms: 2_000,
            ..WorldConfig::default()
        },
    };
    let store = JsonFileStore::open(&config.data_path)
        .await
        .map_err(|e| e.to_string())?;
    info!(path = %store.path().display(), "Starting world");

    let world = WorldSystem::bootstrap(Arc::new(store), config.clone())
        .await
        .map_err(|e| e.to_string())?;

    if world.directory().tiles().is_empty() {
        async {
            info!("Seeding the map");
            seed(&world, &config).await
        }
        .instrument(tracing::info_span!("seed"))
        .await
        .map_err(|e| e.to_string())?;
    }

    for (kind, count) in world.directory().counts() {
        info!(%kind, count, "Live entities");
    }

    world.flush().await.map_err(|e| e.to_string())?;
    world.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}

async fn seed(world: &WorldSystem, config: &WorldConfig) -> Result<(), cityio::WorldError> {
    let size = config.map_size.min(16);
    for x in 0..size {
        for y in 0..size {
            world.create_map_tile(Coord::new(x, y)).await?;
        }
    }

    let alice = world
        .register_user(NewUser::new("alice@example.com", "alice", "correct horse"))
        .await?;
    let capital = world
        .create_city(NewCity {
            kind: CityKind::Capital,
            owner: Some(alice.clone()),
            name: "Uruk".into(),
            size: config.city_size,
            origin: None,
        })
        .await?;
    info!(id = %capital.id, origin = %capital.origin, "Capital founded");

    let barracks = world
        .construct_building(NewBuilding {
            city_id: capital.id.clone(),
            kind: BuildingKind::Barracks,
            coord: capital.origin,
        })
        .await?;
    world.train_troops(&barracks, 10, None).await?;

    let army = world.create_army(&alice, capital.center(), 5).await?;
    info!(%army, "Army raised");

    tokio::time::sleep(config.training_duration() + Duration::from_millis(200)).await;
    let tile = world.get_map_tile(capital.origin.x, capital.origin.y).await?;
    info!(armies = ?tile.armies, "Barracks tile after training");
    Ok(())
}
