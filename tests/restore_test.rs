mod common;

use cityio::model::{
    Army, ArmyId, Building, BuildingId, BuildingKind, City, CityId, CityKind, Coord, MapTile,
    NewBuilding, Training, User, UserId,
};
use cityio::persistence::{JsonFileStore, MemoryStore, WorldRows};
use cityio::WorldSystem;
use common::{capital, eventually, fast_config, tiles, user};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

fn alice() -> User {
    User {
        id: UserId::from("user_alice"),
        email: "alice@example.com".into(),
        username: "alice".into(),
        password_hash: cityio::password::hash_password("secret", cityio::password::MIN_COST).unwrap(),
        gold: 1_234,
        food: 56,
        allies: Vec::new(),
    }
}

/// A 3x3 capital at the origin with a barracks on (1, 1) and an idle army on (2, 2).
fn saved_world() -> WorldRows {
    let mut map_tiles: Vec<MapTile> = (0..3)
        .flat_map(|x| (0..3).map(move |y| Coord::new(x, y)))
        .map(|coord| MapTile {
            city_id: Some(CityId::from("city_uruk")),
            ..MapTile::empty(coord)
        })
        .collect();
    for tile in &mut map_tiles {
        if tile.coord == Coord::new(1, 1) {
            tile.building_id = Some(BuildingId::from("building_barracks"));
        }
    }

    WorldRows {
        users: vec![alice()],
        map_tiles,
        cities: vec![City {
            id: CityId::from("city_uruk"),
            kind: CityKind::Capital,
            owner: Some(UserId::from("user_alice")),
            name: "Uruk".into(),
            population: 300.0,
            population_cap: 1250.0,
            origin: Coord::new(0, 0),
            size: 3,
        }],
        buildings: vec![Building {
            id: BuildingId::from("building_barracks"),
            city_id: CityId::from("city_uruk"),
            kind: BuildingKind::Barracks,
            level: 2,
            coord: Coord::new(1, 1),
            construction_end: SystemTime::UNIX_EPOCH,
        }],
        armies: vec![Army::new(
            ArmyId::from("army_guard"),
            UserId::from("user_alice"),
            Coord::new(2, 2),
            12,
        )],
        trainings: Vec::new(),
    }
}

#[tokio::test]
async fn test_bootstrap_restores_every_kind() {
    let store = MemoryStore::with_rows(saved_world());
    let world = WorldSystem::bootstrap(Arc::new(store.clone()), fast_config())
        .await
        .unwrap();

    let user = world.get_user(&UserId::from("user_alice")).await.unwrap();
    assert_eq!((user.gold, user.food), (1_234, 56));
    assert!(cityio::password::verify_password("secret", &user.password_hash));

    let city = world.get_city(&CityId::from("city_uruk")).await.unwrap();
    assert_eq!(city.population_cap, 1250.0);

    let view = world.get_map_tile(1, 1).await.unwrap();
    assert_eq!(view.city.map(|c| c.name), Some("Uruk".to_string()));
    assert_eq!(view.city_owner.as_deref(), Some("alice"));
    assert_eq!(view.building.map(|b| b.level), Some(2));

    let w = &world;
    eventually("restored army stationed", || async move {
        let view = w.get_map_tile(2, 2).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a[0].id == ArmyId::from("army_guard"))
    })
    .await;

    // Restoring writes nothing new
    world.flush().await.unwrap();
    assert_eq!(store.rows().map_tiles.len(), 9);
    assert_eq!(store.rows().buildings.len(), 1);
    world.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restored_owner_cascade_reaches_restored_armies() {
    let store = MemoryStore::with_rows(saved_world());
    let world = WorldSystem::bootstrap(Arc::new(store), fast_config())
        .await
        .unwrap();

    world.delete_user(&UserId::from("user_alice")).await.unwrap();
    assert!(world
        .get_army(&ArmyId::from("army_guard"))
        .await
        .unwrap_err()
        .is_not_found());
    assert!(world
        .get_city(&CityId::from("city_uruk"))
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_overdue_training_completes_during_restore() {
    let mut rows = saved_world();
    rows.trainings.push(Training {
        barracks_id: BuildingId::from("building_barracks"),
        size: 25,
        deploy_to: None,
        ends_at: SystemTime::now() - Duration::from_secs(60),
    });
    let store = MemoryStore::with_rows(rows);
    let world = WorldSystem::bootstrap(Arc::new(store.clone()), fast_config())
        .await
        .unwrap();

    // No waiting: the army exists as soon as bootstrap returns
    let view = world.get_map_tile(1, 1).await.unwrap();
    let armies = view.armies.get("alice").expect("trained army");
    assert_eq!(armies.len(), 1);
    assert_eq!(armies[0].size, 25);
    assert_eq!(armies[0].owner, UserId::from("user_alice"));

    assert_eq!(
        world
            .current_training(&BuildingId::from("building_barracks"))
            .await
            .unwrap(),
        None
    );
    world.flush().await.unwrap();
    assert!(store.rows().trainings.is_empty());
}

#[tokio::test]
async fn test_pending_training_resumes_after_restore() {
    let mut rows = saved_world();
    rows.trainings.push(Training {
        barracks_id: BuildingId::from("building_barracks"),
        size: 3,
        deploy_to: None,
        ends_at: SystemTime::now() + Duration::from_millis(80),
    });
    let world = WorldSystem::bootstrap(Arc::new(MemoryStore::with_rows(rows)), fast_config())
        .await
        .unwrap();

    let barracks = BuildingId::from("building_barracks");
    assert_eq!(
        world.current_training(&barracks).await.unwrap().map(|t| t.size),
        Some(3)
    );
    let w = &world;
    eventually("resumed training done", || async move {
        let view = w.get_map_tile(1, 1).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a[0].size == 3)
    })
    .await;
}

#[tokio::test]
async fn test_world_survives_a_restart_through_a_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.json");

    let (alice, city_id, barracks) = {
        let store = JsonFileStore::open(&path).await.unwrap();
        let world = WorldSystem::new(Arc::new(store), fast_config()).unwrap();
        tiles(&world, 3, 3).await;
        let alice = user(&world, "alice").await;
        let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
        let barracks = world
            .construct_building(NewBuilding {
                city_id: city.id.clone(),
                kind: BuildingKind::Barracks,
                coord: Coord::new(2, 0),
            })
            .await
            .unwrap();
        world.create_army(&alice, Coord::new(1, 2), 8).await.unwrap();
        world.shutdown().await.unwrap();
        (alice, city.id, barracks)
    };

    let store = JsonFileStore::open(&path).await.unwrap();
    let world = WorldSystem::bootstrap(Arc::new(store), fast_config())
        .await
        .unwrap();

    assert_eq!(world.get_user(&alice).await.unwrap().gold, 100_000 - 500);
    assert_eq!(world.get_city(&city_id).await.unwrap().name, "Uruk");
    let view = world.get_map_tile(2, 0).await.unwrap();
    assert_eq!(view.building.map(|b| b.id), Some(barracks));
    let w = &world;
    eventually("army back on its tile", || async move {
        let view = w.get_map_tile(1, 2).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a[0].size == 8)
    })
    .await;
    world.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_restored_march_resumes_and_arrives() {
    let mut rows = saved_world();
    let scout = ArmyId::from("army_scout");
    rows.armies.push(Army {
        coord: Coord::new(1, 0),
        ..Army::marching(
            scout.clone(),
            UserId::from("user_alice"),
            Coord::new(0, 0),
            Coord::new(2, 0),
            4,
        )
    });
    let store = MemoryStore::with_rows(rows);
    let world = WorldSystem::bootstrap(Arc::new(store.clone()), fast_config())
        .await
        .unwrap();

    let (w, id) = (&world, &scout);
    eventually("scout arrived", || async move {
        let army = w.get_army(id).await.unwrap();
        army.coord == Coord::new(2, 0) && !army.marching
    })
    .await;
    eventually("scout listed on the target tile", || async move {
        let view = w.get_map_tile(2, 0).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a[0].id == *id)
    })
    .await;
    let origin = world.get_map_tile(1, 0).await.unwrap();
    assert!(origin.armies.is_empty());

    world.flush().await.unwrap();
    let row = store
        .rows()
        .armies
        .into_iter()
        .find(|a| a.id == scout)
        .unwrap();
    assert_eq!(row.coord, Coord::new(2, 0));
    assert!(!row.marching);
}
