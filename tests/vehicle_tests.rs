//! Vehicle motion and spacing validation

use rand::rngs::StdRng;
use rand::SeedableRng;

use eco_city_sim::simulation::{
    despawn_vehicles, has_clearance, remove_last_of_kind, update_vehicles, MotionGate, Position,
    SignalConfig, SignalPhase, SimId, SpacingMode, TrafficSignal, Vehicle, VehicleConfig,
    VehicleId, VehicleKind, VehicleUpdateResult, VisibilityWindow,
};

const LANE: f32 = 325.0;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn vehicle(id: usize, kind: VehicleKind, x: f32, speed: f32, rng: &mut StdRng) -> Vehicle {
    Vehicle::new(
        VehicleId(SimId(id)),
        kind,
        Position::new(x, LANE),
        speed,
        1.3,
        &VehicleConfig::default(),
        rng,
    )
}

fn red_signal() -> TrafficSignal {
    let mut signal = TrafficSignal::new(Position::new(950.0, 300.0), &SignalConfig::default());
    while signal.phase() != SignalPhase::Red {
        signal.update();
    }
    signal
}

#[test]
fn test_footprint_and_safe_gap_follow_scale() {
    let mut rng = rng();
    let bus = vehicle(1, VehicleKind::Bus, 0.0, 1.5, &mut rng);
    assert_eq!(bus.width, 88.0);
    assert_eq!(bus.height, 36.0);
    assert!((bus.safe_gap - 88.0 * 1.6).abs() < 1e-3);
    assert!((1..=4).contains(&bus.passengers));

    let car = vehicle(2, VehicleKind::Car, 0.0, 2.0, &mut rng).with_safe_gap(80.0);
    assert_eq!(car.safe_gap, 80.0);
    assert_eq!(car.passengers, 1);
}

#[test]
fn test_red_signal_holds_vehicle_until_green() {
    let mut rng = rng();
    let mut signal = red_signal();
    let mut car = vehicle(1, VehicleKind::Car, 900.0, 2.0, &mut rng);

    while signal.is_red() {
        let result = car.update(Some(&signal), std::iter::empty(), &mut rng);
        assert_eq!(result, VehicleUpdateResult::Held(MotionGate::Signal));
        assert_eq!(car.position.x, 900.0);
        signal.update();
    }

    // The first tick after the light changes already moves the car
    let result = car.update(Some(&signal), std::iter::empty(), &mut rng);
    assert_eq!(result, VehicleUpdateResult::Moved);
    assert_eq!(car.position.x, 902.0);
}

#[test]
fn test_red_signal_ignores_vehicles_outside_stop_zone() {
    let mut rng = rng();
    let signal = red_signal();
    let mut far = vehicle(1, VehicleKind::Car, 700.0, 2.0, &mut rng);
    let mut past = vehicle(2, VehicleKind::Car, 960.0, 2.0, &mut rng);

    assert_eq!(far.update(Some(&signal), std::iter::empty(), &mut rng), VehicleUpdateResult::Moved);
    assert_eq!(past.update(Some(&signal), std::iter::empty(), &mut rng), VehicleUpdateResult::Moved);
}

#[test]
fn test_spacing_holds_follower_on_same_lane_only() {
    let mut rng = rng();
    let leader = vehicle(1, VehicleKind::Car, 100.0, 2.0, &mut rng);
    let follower = vehicle(2, VehicleKind::Car, 70.0, 2.0, &mut rng).with_safe_gap(50.0);
    let mut other_lane = follower.clone();
    other_lane.id = VehicleId(SimId(3));
    other_lane.position.y = LANE + 30.0;

    assert_eq!(follower.gate(None, [&leader]), Some(MotionGate::Spacing));
    assert_eq!(other_lane.gate(None, [&leader]), None);
    assert_eq!(leader.gate(None, [&follower]), None, "peers behind never block");
    assert_eq!(follower.gap_to_leader([&leader, &other_lane]), Some(30.0));
}

#[test]
fn test_follower_never_closes_in_below_its_safe_gap() {
    let mut rng = rng();
    let mut vehicles = vec![
        vehicle(1, VehicleKind::Car, 300.0, 1.5, &mut rng),
        vehicle(2, VehicleKind::Car, 100.0, 3.0, &mut rng).with_safe_gap(60.0),
    ];

    let mut caught_up = false;
    for _ in 0..400 {
        let follower_before = vehicles[1].position.x;
        update_vehicles(&mut vehicles, None, SpacingMode::Sequential, &mut rng);
        let leader_after = vehicles[0].position.x;
        let follower_after = vehicles[1].position.x;

        // The leader is updated first, so the follower judged the gap
        // against the leader's new position
        if follower_after > follower_before {
            assert!(
                leader_after - follower_before >= 60.0,
                "follower moved while its leader was inside the safe gap"
            );
        }

        let gap = leader_after - follower_after;
        assert!(gap >= 60.0 - 3.0, "gap {} overshot the safety threshold", gap);
        caught_up |= gap < 60.0;
    }
    assert!(caught_up, "the faster follower should have caught up");
}

#[test]
fn test_sequential_and_snapshot_spacing_differ() {
    let mut rng = rng();
    let leader = vehicle(1, VehicleKind::Car, 100.0, 2.0, &mut rng);
    let follower = vehicle(2, VehicleKind::Car, 51.0, 2.0, &mut rng).with_safe_gap(50.0);

    // Sequential: the leader moves first and the follower sees its new position
    let mut sequential = vec![leader.clone(), follower.clone()];
    let tally = update_vehicles(&mut sequential, None, SpacingMode::Sequential, &mut rng);
    assert_eq!(tally.moved, 2);
    assert_eq!(sequential[1].position.x, 53.0);

    // Snapshot: the follower sees where the leader started the tick
    let mut snapshot = vec![leader, follower];
    let tally = update_vehicles(&mut snapshot, None, SpacingMode::Snapshot, &mut rng);
    assert_eq!(tally.moved, 1);
    assert_eq!(tally.held_by_spacing, 1);
    assert_eq!(snapshot[1].position.x, 51.0);
}

#[test]
fn test_exhaust_never_changes_motion() {
    let mut rng = rng();
    let config = VehicleConfig::default();
    let mut plain = vehicle(1, VehicleKind::Car, 0.0, 2.0, &mut rng);
    let mut smoky = plain.clone().with_exhaust(&config);

    for _ in 0..100 {
        plain.advance(&mut rng);
        smoky.advance(&mut rng);
    }
    assert_eq!(plain.position, smoky.position);

    let particles = smoky.exhaust.as_ref().map(|e| e.particles.len()).unwrap_or(0);
    assert!(particles > 0, "a moving car leaves exhaust behind");
    assert!(particles <= 3, "puffs expire after their life");
}

#[test]
fn test_held_vehicle_emits_no_exhaust() {
    let mut rng = rng();
    let signal = red_signal();
    let mut car = vehicle(1, VehicleKind::Car, 900.0, 2.0, &mut rng)
        .with_exhaust(&VehicleConfig::default());

    for _ in 0..50 {
        car.update(Some(&signal), std::iter::empty(), &mut rng);
    }
    assert_eq!(car.exhaust.as_ref().map(|e| e.particles.len()), Some(0));
}

#[test]
fn test_remove_missing_kind_is_noop() {
    let mut rng = rng();
    let mut vehicles = vec![
        vehicle(1, VehicleKind::Car, 0.0, 2.0, &mut rng),
        vehicle(2, VehicleKind::Car, 50.0, 2.0, &mut rng),
    ];

    assert!(remove_last_of_kind(&mut vehicles, Some(VehicleKind::Bus)).is_none());
    assert_eq!(vehicles.len(), 2);

    let removed = remove_last_of_kind(&mut vehicles, Some(VehicleKind::Car));
    assert_eq!(removed.map(|v| v.id), Some(VehicleId(SimId(2))));

    let mut empty: Vec<Vehicle> = Vec::new();
    assert!(remove_last_of_kind(&mut empty, None).is_none());
}

#[test]
fn test_despawn_drops_outside_window_and_bikes() {
    let mut rng = rng();
    let mut vehicles = vec![
        vehicle(1, VehicleKind::Car, 500.0, 2.0, &mut rng),
        vehicle(2, VehicleKind::Car, 1500.0, 2.0, &mut rng),
        vehicle(3, VehicleKind::Bike, 500.0, 2.0, &mut rng),
        vehicle(4, VehicleKind::Bus, -250.0, 2.0, &mut rng),
    ];
    let window = VisibilityWindow::around(1200.0, 200.0);

    let removed = despawn_vehicles(&mut vehicles, |v| window.contains(v.position.x));
    assert_eq!(
        removed,
        vec![VehicleId(SimId(2)), VehicleId(SimId(3)), VehicleId(SimId(4))]
    );
    assert_eq!(vehicles.len(), 1);
}

#[test]
fn test_clearance_checks_both_directions() {
    let mut rng = rng();
    let vehicles = vec![vehicle(1, VehicleKind::Car, 100.0, 2.0, &mut rng)];
    assert!(!has_clearance(&vehicles, -100.0, 250.0));
    assert!(has_clearance(&vehicles, -100.0, 200.0));
    assert!(!has_clearance(&vehicles, 300.0, 250.0));
}
