mod common;

use cityio::building_actor::BuildingError;
use cityio::config::WorldConfig;
use cityio::map_tile_actor::MapTileError;
use cityio::model::{BuildingKind, CityKind, Coord, NewBuilding, NewCity, UserId};
use cityio::user_actor::UserError;
use cityio::WorldError;
use common::{capital, eventually, fast_config, tiles, user, world, world_with};
use std::time::{Duration, Instant};

#[tokio::test]
async fn test_idle_armies_of_one_owner_merge_into_one() {
    let (world, _store) = world();
    world.create_map_tile(Coord::new(10, 10)).await.unwrap();
    let alice = user(&world, "alice").await;

    let first = world.create_army(&alice, Coord::new(10, 10), 5).await.unwrap();
    world.create_army(&alice, Coord::new(10, 10), 3).await.unwrap();

    let w = &world;
    eventually("5 + 3 merged", || async move {
        let view = w.get_map_tile(10, 10).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a.len() == 1 && a[0].size == 8)
    })
    .await;

    world.create_army(&alice, Coord::new(10, 10), 2).await.unwrap();
    eventually("5 + 3 + 2 merged", || async move {
        let view = w.get_map_tile(10, 10).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a.len() == 1 && a[0].size == 10)
    })
    .await;

    // The oldest army survives
    assert_eq!(world.get_army(&first).await.unwrap().size, 10);
}

#[tokio::test]
async fn test_armies_of_different_owners_stay_apart() {
    let (world, _store) = world();
    world.create_map_tile(Coord::new(1, 1)).await.unwrap();
    let alice = user(&world, "alice").await;
    let bob = user(&world, "bob").await;

    world.create_army(&alice, Coord::new(1, 1), 4).await.unwrap();
    world.create_army(&bob, Coord::new(1, 1), 6).await.unwrap();

    let w = &world;
    eventually("both owners listed", || async move {
        let view = w.get_map_tile(1, 1).await.unwrap();
        view.armies.get("alice").map(|a| a[0].size) == Some(4)
            && view.armies.get("bob").map(|a| a[0].size) == Some(6)
    })
    .await;
}

#[tokio::test]
async fn test_marching_army_is_never_merged() {
    let (world, _store) = world_with(WorldConfig {
        army_step_interval_ms: 60_000,
        ..fast_config()
    });
    tiles(&world, 4, 1).await;
    let alice = user(&world, "alice").await;

    let marcher = world.create_army(&alice, Coord::new(0, 0), 5).await.unwrap();
    let army = world.start_march(&marcher, Coord::new(3, 0)).await.unwrap();
    assert!(army.marching);
    world.create_army(&alice, Coord::new(0, 0), 3).await.unwrap();

    let w = &world;
    eventually("two armies on the tile", || async move {
        let view = w.get_map_tile(0, 0).await.unwrap();
        view.armies.get("alice").map(Vec::len) == Some(2)
    })
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let view = world.get_map_tile(0, 0).await.unwrap();
    let mut sizes: Vec<u32> = view.armies["alice"].iter().map(|a| a.size).collect();
    sizes.sort();
    assert_eq!(sizes, vec![3, 5]);
}

#[tokio::test]
async fn test_march_ends_on_target_and_moves_the_tile_entry() {
    let (world, _store) = world();
    tiles(&world, 5, 5).await;
    let alice = user(&world, "alice").await;
    let army = world.create_army(&alice, Coord::new(0, 0), 7).await.unwrap();

    // Marching to the current tile changes nothing
    let same = world.start_march(&army, Coord::new(0, 0)).await.unwrap();
    assert!(!same.marching);

    world.start_march(&army, Coord::new(3, 2)).await.unwrap();
    let (w, id) = (&world, &army);
    eventually("arrival", || async move {
        let army = w.get_army(id).await.unwrap();
        army.coord == Coord::new(3, 2) && !army.marching
    })
    .await;

    let arrived = world.get_army(&army).await.unwrap();
    assert!(arrived.from.is_unset() && arrived.to.is_unset());
    eventually("tile entries moved", || async move {
        let target = w.get_map_tile(3, 2).await.unwrap();
        let origin = w.get_map_tile(0, 0).await.unwrap();
        target.armies.contains_key("alice") && origin.armies.is_empty()
    })
    .await;
}

#[tokio::test]
async fn test_march_to_missing_tile_is_rejected() {
    let (world, _store) = world();
    tiles(&world, 2, 2).await;
    let alice = user(&world, "alice").await;
    let army = world.create_army(&alice, Coord::new(0, 0), 1).await.unwrap();

    let err = world.start_march(&army, Coord::new(20, 20)).await.unwrap_err();
    assert!(matches!(
        err,
        WorldError::Army(cityio::army_actor::ArmyError::TileNotFound(c)) if c == Coord::new(20, 20)
    ));
    assert!(world.create_army(&alice, Coord::new(9, 9), 1).await.is_err());
}

#[tokio::test]
async fn test_barracks_trains_an_army_on_its_tile() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let barracks = world
        .construct_building(NewBuilding {
            city_id: city.id.clone(),
            kind: BuildingKind::Barracks,
            coord: Coord::new(0, 0),
        })
        .await
        .unwrap();

    let training = world.train_troops(&barracks, 10, None).await.unwrap();
    assert_eq!(training.size, 10);

    let w = &world;
    eventually("trained army", || async move {
        let view = w.get_map_tile(0, 0).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a.len() == 1 && a[0].size == 10)
    })
    .await;
    assert_eq!(world.current_training(&barracks).await.unwrap(), None);
}

#[tokio::test]
async fn test_second_training_waits_for_the_first() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let barracks = world
        .construct_building(NewBuilding {
            city_id: city.id,
            kind: BuildingKind::Barracks,
            coord: Coord::new(1, 1),
        })
        .await
        .unwrap();

    world.train_troops(&barracks, 4, None).await.unwrap();
    let err = world.train_troops(&barracks, 4, None).await.unwrap_err();
    assert!(matches!(
        err,
        WorldError::Building(BuildingError::TrainingAlreadyExists(_))
    ));

    let (w, id) = (&world, &barracks);
    eventually("training finished", || async move {
        w.current_training(id).await.unwrap().is_none()
    })
    .await;
    world.train_troops(&barracks, 4, None).await.unwrap();
}

#[tokio::test]
async fn test_trained_army_marches_to_another_city() {
    let (world, _store) = world();
    tiles(&world, 8, 8).await;
    let alice = user(&world, "alice").await;
    let home = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let town = world
        .create_city(NewCity {
            kind: CityKind::Town,
            owner: Some(alice.clone()),
            name: "Kish".into(),
            size: 3,
            origin: Some(Coord::new(5, 5)),
        })
        .await
        .unwrap();
    assert_eq!(town.population, 100.0);

    let barracks = world
        .construct_building(NewBuilding {
            city_id: home.id,
            kind: BuildingKind::Barracks,
            coord: Coord::new(0, 0),
        })
        .await
        .unwrap();
    world
        .train_troops(&barracks, 7, Some(town.id.clone()))
        .await
        .unwrap();

    let w = &world;
    eventually("army at the town center", || async move {
        let view = w.get_map_tile(6, 6).await.unwrap();
        matches!(view.armies.get("alice"), Some(a) if a.iter().any(|army| army.size == 7 && !army.marching))
    })
    .await;
}

#[tokio::test]
async fn test_construction_charges_and_refunds_the_owner() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();

    world
        .construct_building(NewBuilding {
            city_id: city.id.clone(),
            kind: BuildingKind::Farm,
            coord: Coord::new(2, 2),
        })
        .await
        .unwrap();
    assert_eq!(world.get_user(&alice).await.unwrap().gold, 100_000 - 100);

    let err = world
        .construct_building(NewBuilding {
            city_id: city.id.clone(),
            kind: BuildingKind::Mine,
            coord: Coord::new(2, 2),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorldError::Building(BuildingError::Tile(MapTileError::Occupied { .. }))
    ));
    assert_eq!(world.get_user(&alice).await.unwrap().gold, 100_000 - 100);

    let outside = world
        .construct_building(NewBuilding {
            city_id: city.id,
            kind: BuildingKind::Mine,
            coord: Coord::new(5, 5),
        })
        .await
        .unwrap_err();
    assert!(matches!(outside, WorldError::Invalid(_)));
}

#[tokio::test]
async fn test_construction_needs_gold() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let (gold, _) = world.adjust_resources(&alice, -99_900, 0).await.unwrap();
    assert_eq!(gold, 100);

    let err = world
        .construct_building(NewBuilding {
            city_id: city.id,
            kind: BuildingKind::Barracks,
            coord: Coord::new(0, 0),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorldError::User(UserError::InsufficientFunds {
            requested: 500,
            available: 100
        })
    ));
}

#[tokio::test]
async fn test_city_center_produces_gold_and_food() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    world
        .construct_building(NewBuilding {
            city_id: city.id,
            kind: BuildingKind::CityCenter,
            coord: Coord::new(1, 1),
        })
        .await
        .unwrap();

    let (w, id) = (&world, &alice);
    eventually("production credited", || async move {
        let user = w.get_user(id).await.unwrap();
        user.gold > 99_000 && user.food > 100_000
    })
    .await;
}

#[tokio::test]
async fn test_city_grows_toward_a_raised_cap() {
    let (world, _store) = world_with(WorldConfig {
        population_growth_rate: 0.5,
        ..fast_config()
    });
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    assert_eq!(city.population, 250.0);
    assert_eq!(city.population_cap, 250.0);

    world
        .construct_building(NewBuilding {
            city_id: city.id.clone(),
            kind: BuildingKind::House,
            coord: Coord::new(0, 1),
        })
        .await
        .unwrap();

    let (w, id) = (&world, &city.id);
    eventually("growth", || async move {
        let city = w.get_city(id).await.unwrap();
        city.population_cap == 500.0 && city.population > 250.0
    })
    .await;
    let grown = world.get_city(&city.id).await.unwrap();
    assert!(grown.population <= grown.population_cap);
}

#[tokio::test]
async fn test_upgrade_charges_next_level_and_stops_at_max() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let farm = world
        .construct_building(NewBuilding {
            city_id: city.id,
            kind: BuildingKind::Farm,
            coord: Coord::new(0, 0),
        })
        .await
        .unwrap();

    let upgraded = world.upgrade_building(&farm).await.unwrap();
    assert_eq!(upgraded.level, 2);
    assert_eq!(world.get_user(&alice).await.unwrap().gold, 100_000 - 100 - 200);

    for _ in 3..=10 {
        world.upgrade_building(&farm).await.unwrap();
    }
    let gold = world.get_user(&alice).await.unwrap().gold;
    let err = world.upgrade_building(&farm).await.unwrap_err();
    assert!(matches!(
        err,
        WorldError::Building(BuildingError::MaxLevelReached { level: 10, .. })
    ));
    assert_eq!(world.get_user(&alice).await.unwrap().gold, gold);
}

#[tokio::test]
async fn test_delete_user_cascades() {
    let (world, store) = world();
    tiles(&world, 4, 4).await;
    let alice = user(&world, "alice").await;
    let bob = user(&world, "bob").await;
    world.add_alliance(&alice, &bob).await.unwrap();

    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();
    let barracks = world
        .construct_building(NewBuilding {
            city_id: city.id.clone(),
            kind: BuildingKind::Barracks,
            coord: Coord::new(1, 1),
        })
        .await
        .unwrap();
    let army = world.create_army(&alice, Coord::new(3, 3), 9).await.unwrap();

    world.delete_user(&alice).await.unwrap();

    assert!(world.get_army(&army).await.unwrap_err().is_not_found());
    assert!(world.get_city(&city.id).await.unwrap_err().is_not_found());
    assert!(world.get_building(&barracks).await.unwrap_err().is_not_found());
    assert!(world.get_user(&alice).await.unwrap_err().is_not_found());
    assert!(world.get_user(&bob).await.unwrap().allies.is_empty());

    let tile = world.get_map_tile(1, 1).await.unwrap();
    assert_eq!(tile.tile.city_id, None);
    assert_eq!(tile.tile.building_id, None);

    world.flush().await.unwrap();
    let rows = store.rows();
    assert!(rows.armies.is_empty());
    assert!(rows.cities.is_empty());
    assert_eq!(rows.users.len(), 1);
}

#[tokio::test]
async fn test_alliances_are_symmetric() {
    let (world, _store) = world();
    let alice = user(&world, "alice").await;
    let bob = user(&world, "bob").await;

    world.add_alliance(&alice, &bob).await.unwrap();
    world.add_alliance(&alice, &bob).await.unwrap();
    assert_eq!(world.get_user(&alice).await.unwrap().allies, vec![bob.clone()]);
    assert_eq!(world.get_user(&bob).await.unwrap().allies, vec![alice.clone()]);

    assert!(world.remove_alliance(&bob, &alice).await.unwrap());
    assert!(!world.remove_alliance(&bob, &alice).await.unwrap());
    assert!(world.get_user(&alice).await.unwrap().allies.is_empty());
    assert!(matches!(
        world.add_alliance(&alice, &alice).await,
        Err(WorldError::Invalid(_))
    ));
}

#[tokio::test]
async fn test_lookups_of_unknown_entities_are_not_found() {
    let (world, _store) = world();
    assert!(world.get_map_tile(9, 9).await.unwrap_err().is_not_found());
    assert!(world
        .get_user(&"user_nobody".into())
        .await
        .unwrap_err()
        .is_not_found());
    assert!(world
        .train_troops(&"building_nope".into(), 1, None)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_random_city_placement_avoids_other_cities() {
    let (world, _store) = world_with(WorldConfig {
        map_size: 6,
        ..fast_config()
    });
    tiles(&world, 6, 6).await;
    let alice = user(&world, "alice").await;
    let first = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();

    let second = world
        .create_city(NewCity {
            kind: CityKind::Town,
            owner: None,
            name: "Nippur".into(),
            size: 3,
            origin: None,
        })
        .await
        .unwrap();
    assert!(second.tiles().all(|c| !first.contains(c)));

    let overlap = world.create_city(capital(&alice, Coord::new(1, 1))).await;
    assert!(matches!(overlap, Err(WorldError::Invalid(_))));
}

#[tokio::test]
async fn test_production_follows_a_new_city_owner() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let bob = user(&world, "bob").await;
    let town = world
        .create_city(NewCity {
            kind: CityKind::Town,
            owner: Some(alice.clone()),
            name: "Lagash".into(),
            size: 3,
            origin: Some(Coord::new(0, 0)),
        })
        .await
        .unwrap();
    world
        .construct_building(NewBuilding {
            city_id: town.id.clone(),
            kind: BuildingKind::CityCenter,
            coord: Coord::new(1, 1),
        })
        .await
        .unwrap();
    let paid = world.get_user(&alice).await.unwrap().gold;

    let (w, a, b) = (&world, &alice, &bob);
    eventually("alice credited", || async move {
        w.get_user(a).await.unwrap().gold > paid
    })
    .await;

    world.set_city_owner(&town.id, Some(bob.clone())).await.unwrap();
    eventually("bob credited", || async move {
        w.get_user(b).await.unwrap().gold > 100_000
    })
    .await;

    let settled = world.get_user(&alice).await.unwrap().gold;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(world.get_user(&alice).await.unwrap().gold, settled);
    assert!(world.get_user(&bob).await.unwrap().gold > 100_000);
}

#[tokio::test]
async fn test_set_city_owner_requires_a_known_user() {
    let (world, _store) = world();
    tiles(&world, 3, 3).await;
    let alice = user(&world, "alice").await;
    let city = world.create_city(capital(&alice, Coord::new(0, 0))).await.unwrap();

    let err = world
        .set_city_owner(&city.id, Some(UserId::from("user_nobody")))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    world.set_city_owner(&city.id, None).await.unwrap();
    assert_eq!(world.get_city(&city.id).await.unwrap().owner, None);
}

#[tokio::test]
async fn test_balance_overflow_is_rejected_and_user_stays_reachable() {
    let (world, _store) = world();
    let alice = user(&world, "alice").await;

    let err = world
        .adjust_resources(&alice, i64::MAX, 0)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorldError::User(UserError::BalanceOverflow {
            balance: 100_000,
            delta: i64::MAX
        })
    ));

    assert!(world.directory().user(&alice).is_some());
    let user = world.get_user(&alice).await.unwrap();
    assert_eq!((user.gold, user.food), (100_000, 100_000));
    assert_eq!(
        world.adjust_resources(&alice, -1_000, 5).await.unwrap(),
        (99_000, 100_005)
    );
}

#[tokio::test]
async fn test_marching_army_is_written_every_other_step() {
    let (world, store) = world_with(WorldConfig {
        army_step_interval_ms: 150,
        army_backup_every: 2,
        flush_interval_ms: 20,
        ..fast_config()
    });
    tiles(&world, 6, 1).await;
    let alice = user(&world, "alice").await;
    let army = world.create_army(&alice, Coord::new(0, 0), 4).await.unwrap();
    let target = Coord::new(5, 0);
    world.start_march(&army, target).await.unwrap();

    let mut seen = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(row) = store.rows().armies.into_iter().find(|a| a.id == army) {
            if seen.last() != Some(&row.coord) {
                seen.push(row.coord);
            }
            if row.coord == target && !row.marching {
                break;
            }
        }
        assert!(Instant::now() < deadline, "army row stuck, saw {seen:?}");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Rows only change on even steps and on arrival
    assert!(seen.contains(&Coord::new(2, 0)), "saw {seen:?}");
    assert!(!seen.contains(&Coord::new(1, 0)), "saw {seen:?}");
    assert!(!seen.contains(&Coord::new(3, 0)), "saw {seen:?}");
}
