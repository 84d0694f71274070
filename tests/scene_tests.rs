//! Scene orchestration validation for all three scenes

use rand::rngs::StdRng;
use rand::SeedableRng;

use eco_city_sim::simulation::{
    air_quality, congestion_ratio, GreenCityScene, GrowthStage, PlantingScene, Position, Scene,
    SimConfig, SmartCityScene, Vehicle, VehicleId, VehicleKind, Walker, WalkerKind, WRAP_JITTER,
};

fn config() -> SimConfig {
    SimConfig::default()
}

fn manual_smart_city() -> SmartCityScene {
    let mut config = config();
    config.smart_city.auto_spawn = false;
    SmartCityScene::with_seed(&config, 11)
}

// ---------------------------------------------------------------------------
// Smart city
// ---------------------------------------------------------------------------

#[test]
fn test_smart_city_add_and_remove_vehicles() {
    let mut scene = manual_smart_city();

    assert!(scene.remove_vehicle(Some(VehicleKind::Car)).is_none());
    assert!(scene.remove_vehicle(None).is_none());
    assert!(scene.vehicles.is_empty());

    let car = scene.add_vehicle(VehicleKind::Car);
    let bus = scene.add_vehicle(VehicleKind::Bus);
    assert!(car.is_some() && bus.is_some());
    assert!(scene.add_vehicle(VehicleKind::Bike).is_none(), "bikes are never spawned");
    assert_eq!(scene.vehicles.len(), 2);

    for vehicle in &scene.vehicles {
        assert_eq!(vehicle.position.x, -100.0);
        assert!(scene.lanes().contains(&vehicle.lane()));
    }
    let car_speed = scene.vehicles[0].speed();
    assert!((1.5..=3.0).contains(&car_speed));
    assert!(scene.vehicles[0].exhaust.is_some());
    assert!(scene.vehicles[1].exhaust.is_none());

    // Removing a kind with no instances leaves the collection alone
    scene.remove_vehicle(Some(VehicleKind::Car));
    assert_eq!(scene.remove_vehicle(Some(VehicleKind::Car)), None);
    assert_eq!(scene.vehicles.len(), 1);

    assert_eq!(scene.remove_vehicle(None), bus);
    assert!(scene.vehicles.is_empty());
}

#[test]
fn test_smart_city_auto_spawn_timer() {
    let mut scene = SmartCityScene::with_seed(&config(), 3);
    assert!(scene.auto_spawn());

    for _ in 0..50 {
        assert!(scene.update().spawned.is_empty());
    }
    let summary = scene.update();
    assert_eq!(summary.spawned.len(), 1);
    assert_eq!(scene.vehicles.len(), 1);

    assert!(!scene.toggle_auto_spawn());
    for _ in 0..200 {
        assert!(scene.update().spawned.is_empty());
    }
}

#[test]
fn test_smart_city_despawns_far_vehicles_and_bikes() {
    let mut scene = manual_smart_city();
    let id = scene.add_vehicle(VehicleKind::Car);
    scene.vehicles[0].position.x = 1399.0;
    scene.vehicles[0].set_speed(2.0);

    let mut bike = scene.vehicles[0].clone();
    bike.kind = VehicleKind::Bike;
    bike.position.x = 500.0;
    scene.vehicles.push(bike);

    let summary = scene.update();
    assert_eq!(summary.despawned.len(), 2);
    assert_eq!(summary.despawned.first().copied(), id);
    assert!(scene.vehicles.is_empty());
}

#[test]
fn test_smart_city_red_light_holds_approaching_vehicles() {
    let mut scene = manual_smart_city();
    let mut held = 0;

    for tick in 0..2000 {
        if tick % 40 == 0 && tick < 480 {
            scene.add_vehicle(VehicleKind::Car);
        }
        let before: Vec<(VehicleId, f32)> = scene
            .vehicles
            .iter()
            .map(|v| (v.id, v.position.x))
            .collect();

        scene.update();

        // The signal is updated before the vehicles, so its state after the
        // tick is the one the vehicles were gated against
        if !scene.signal.is_red() {
            continue;
        }
        for vehicle in &scene.vehicles {
            let Some(&(_, x)) = before.iter().find(|(id, _)| *id == vehicle.id) else {
                continue;
            };
            if scene.signal.holds(x) {
                assert_eq!(vehicle.position.x, x, "vehicle ran a red light");
                held += 1;
            }
        }
    }
    assert!(held > 0, "some vehicle should have met a red light");
}

#[test]
fn test_smart_city_trees_and_congestion() {
    let mut scene = manual_smart_city();
    let tree = scene.add_tree();
    assert_eq!(scene.trees.len(), 1);
    let planted = &scene.trees[0];
    assert!((50.0..=1150.0).contains(&planted.x));
    assert_eq!(planted.ground_y, 280.0);
    assert!(matches!(
        planted.stage(),
        GrowthStage::Sprout | GrowthStage::Young
    ));
    assert_eq!(scene.remove_tree(), Some(tree));
    assert_eq!(scene.remove_tree(), None);

    for _ in 0..18 {
        scene.add_vehicle(VehicleKind::Car);
    }
    assert!(!scene.metrics().is_congested());
    scene.add_vehicle(VehicleKind::Bus);
    let metrics = scene.metrics();
    assert!(metrics.is_congested());
    assert_eq!(metrics.congestion_ratio, 1.0);
    assert_eq!(metrics.occupants, 18 * 2 + 15);
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[test]
fn test_air_quality_formula() {
    let config = config();
    let air = &config.air_quality;

    assert_eq!(air_quality(0, 0.0, air), 1.0);
    assert!((air_quality(3, 0.0, air) - 0.76).abs() < 1e-5);
    // Trees soften the same load
    assert!(air_quality(3, 2.0, air) > air_quality(3, 0.0, air));
    // Heavy traffic bottoms out at zero
    assert_eq!(air_quality(100, 0.0, air), 0.0);

    assert_eq!(congestion_ratio(9, 18), 0.5);
    assert_eq!(congestion_ratio(40, 18), 1.0);
}

#[test]
fn test_tree_power_grows_with_stage() {
    let mut scene = manual_smart_city();
    scene.add_tree();
    let tree = &scene.trees[0];
    let expected = 1.0 + 0.5 * f32::from(tree.stage().index());
    assert!((scene.metrics().tree_power - expected).abs() < 1e-6);
}

// ---------------------------------------------------------------------------
// Planting
// ---------------------------------------------------------------------------

#[test]
fn test_planting_slot_commands() {
    let mut scene = PlantingScene::with_seed(&config(), 5);
    assert_eq!(scene.slot_count(), 8);

    assert!(scene.plant_seed(8).is_none(), "out of range slot");
    assert!(!scene.water_slot(0), "nothing to water yet");
    assert!(scene.remove_tree(0).is_none());

    let id = scene.plant_seed(0);
    assert!(id.is_some());
    assert!(scene.plant_seed(0).is_none(), "slot already taken");
    assert_eq!(scene.tree(0).map(|t| t.stage()), Some(GrowthStage::Seed));
    assert_eq!(scene.tree(0).map(|t| t.x), Some(140.0));
    assert!(scene.insight.is_visible());

    assert!(scene.water_slot(0));
    assert!(!scene.water_slot(100));
    assert_eq!(scene.remove_tree(0), id);
    assert!(scene.tree(0).is_none());
}

#[test]
fn test_planting_selected_slot_commands() {
    let mut scene = PlantingScene::with_seed(&config(), 6);
    assert!(scene.plant_selected().is_none());
    assert!(!scene.water_selected());

    assert!(!scene.select_slot(8));
    assert!(scene.select_slot(3));
    assert_eq!(scene.selected_slot(), Some(3));
    assert!(scene.plant_selected().is_some());
    assert!(scene.water_selected());
    assert!(scene.tree(3).is_some_and(|t| t.is_watered()));
    assert!(scene.remove_selected().is_some());
    assert!(scene.tree(3).is_none());
}

#[test]
fn test_planting_slot_hit_areas() {
    let scene = PlantingScene::with_seed(&config(), 8);
    assert_eq!(scene.slot_at(Position::new(140.0, 500.0)), Some(0));
    assert_eq!(scene.slot_at(Position::new(90.0, 500.0)), Some(0));
    assert_eq!(scene.slot_at(Position::new(190.0, 500.0)), None, "gap between slots");
    assert_eq!(scene.slot_at(Position::new(260.0, 460.0)), Some(1));
    assert_eq!(scene.slot_at(Position::new(260.0, 459.0)), None, "above the slot");
    assert_eq!(scene.slot_at(Position::new(260.0, 520.0)), None, "below the ground");
    assert_eq!(scene.slot_at(Position::new(1000.0, 500.0)), Some(7));
    assert_eq!(scene.slot_at(Position::new(1100.0, 500.0)), None);
}

#[test]
fn test_planting_growth_spawns_reward_and_insight() {
    let mut scene = PlantingScene::with_seed(&config(), 7);
    scene.plant_seed(2);
    scene.water_slot(2);

    let mut rewards = 0;
    for _ in 0..180 {
        rewards += scene.update().rewards_collected;
    }
    assert_eq!(rewards, 1);
    assert_eq!(scene.effects.len(), 1);
    assert_eq!(scene.insight.stage(), Some(GrowthStage::Sprout));
    assert!(scene.insight.current().is_some());

    let effect = &scene.effects[0];
    assert!((effect.position.x - scene.slot_x(2)).abs() <= 1.0);

    for _ in 0..100 {
        scene.update();
    }
    assert!(scene.effects.is_empty(), "effects expire");

    for _ in 0..300 {
        scene.update();
    }
    assert!(!scene.insight.is_visible(), "the panel closes on its own");
}

// ---------------------------------------------------------------------------
// Green city
// ---------------------------------------------------------------------------

#[test]
fn test_green_city_initial_population() {
    let scene = GreenCityScene::with_seed(&config(), 9);
    assert_eq!(scene.trees.len(), 8);
    assert!(scene.trees.iter().all(|t| t.stage() == GrowthStage::Sprout));
    assert!(scene.trees.iter().all(|t| t.ground_y == 510.0));
    assert_eq!(scene.count(VehicleKind::Car), 2);
    assert_eq!(scene.count(VehicleKind::Bus), 1);
    assert_eq!(scene.walkers.len(), 9);
    assert_eq!(scene.birds.len(), 5);
    assert!(scene.vehicles.iter().all(|v| v.position.y == 535.0));
}

#[test]
fn test_green_city_first_tick_drops_car_behind_window() {
    let mut scene = GreenCityScene::with_seed(&config(), 10);
    let summary = scene.update();
    assert_eq!(summary.despawned.len(), 1);
    assert_eq!(scene.count(VehicleKind::Car), 1);
    assert_eq!(scene.count(VehicleKind::Bus), 1, "buses have no left edge");
}

#[test]
fn test_green_city_spawn_waits_for_timer() {
    let mut scene = GreenCityScene::with_seed(&config(), 12);
    for _ in 0..180 {
        assert!(scene.update().spawned.is_empty());
    }
}

#[test]
fn test_green_city_spawn_respects_clearance() {
    let mut scene = GreenCityScene::with_seed(&config(), 13);
    scene.vehicles.clear();
    let first = scene.try_spawn(VehicleKind::Car, 250.0);
    assert!(first.is_some());
    assert!(scene.try_spawn(VehicleKind::Car, 250.0).is_none());
    assert!(scene.try_spawn(VehicleKind::Bike, 0.0).is_none());

    let car: &Vehicle = &scene.vehicles[0];
    assert_eq!(car.safe_gap, 80.0);
    assert_eq!(car.position, Position::new(-100.0, 535.0));
}

#[test]
fn test_green_city_spawn_retries_until_entry_is_clear() {
    let mut config = config();
    config.green_city.car_spawn_probability = 1.0;
    config.green_city.bus_spawn_probability = 0.0;
    let mut scene = GreenCityScene::with_seed(&config, 15);
    scene.vehicles.clear();

    // Park a car on the entry point so every spawn attempt is rejected
    assert!(scene.try_spawn(VehicleKind::Car, 0.0).is_some());
    scene.vehicles[0].set_speed(0.0);

    for _ in 0..200 {
        assert!(scene.update().spawned.is_empty());
    }
    assert_eq!(scene.count(VehicleKind::Car), 1);

    // The timer kept running while blocked, so the first clear tick spawns
    scene.vehicles[0].position.x = 600.0;
    assert_eq!(scene.update().spawned.len(), 1);
    assert_eq!(scene.count(VehicleKind::Car), 2);

    // A successful spawn restarts the timer
    for _ in 0..180 {
        assert!(scene.update().spawned.is_empty());
    }
    assert_eq!(scene.update().spawned.len(), 1);
    assert_eq!(scene.count(VehicleKind::Bus), 0);
}

#[test]
fn test_walkers_wrap_with_narrow_jitter() {
    let mut rng = StdRng::seed_from_u64(16);
    for _ in 0..200 {
        let mut walker = Walker::new(WalkerKind::Pedestrian, 100.0, 500.0, 10, &mut rng);
        walker.direction = 1.0;
        walker.position.x = 1251.0;
        walker.update(1200.0, &mut rng);

        assert_eq!(walker.position.x, -50.0);
        let offset = walker.position.y - 500.0;
        assert!(
            offset.abs() <= WRAP_JITTER as f32,
            "wrapped {} away from the sidewalk",
            offset
        );
    }
}

#[test]
fn test_green_city_add_and_remove_trees() {
    let mut scene = GreenCityScene::with_seed(&config(), 14);
    let id = scene.add_tree();
    assert_eq!(scene.trees.len(), 9);
    assert_eq!(scene.remove_tree(), Some(id));
    for _ in 0..8 {
        assert!(scene.remove_tree().is_some());
    }
    assert!(scene.remove_tree().is_none());
    assert_eq!(scene.metrics().trees, 0);
}

#[test]
fn test_scene_views_expose_scene_state() {
    let smart = manual_smart_city();
    let view = smart.view();
    assert!(view.signal.is_some());
    assert_eq!(view.road_y, Some(340.0));

    let planting = PlantingScene::with_seed(&config(), 1);
    let view = planting.view();
    assert!(view.signal.is_none());
    assert!(view.vehicles.is_empty());

    let green = GreenCityScene::with_seed(&config(), 1);
    let view = green.view();
    assert_eq!(view.trees.len(), 8);
    assert_eq!(view.metrics.total_vehicles, 3);
}
