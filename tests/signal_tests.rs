//! Traffic signal phase cycle validation

use eco_city_sim::simulation::{Position, SignalConfig, SignalPhase, TrafficSignal};

fn signal() -> TrafficSignal {
    TrafficSignal::new(Position::new(950.0, 300.0), &SignalConfig::default())
}

fn run(signal: &mut TrafficSignal, ticks: u32) {
    for _ in 0..ticks {
        signal.update();
    }
}

/// Phase after `n` ticks for the default 300/120/300 cycle, where a phase
/// of duration `d` is left on its `d + 1`-th tick
fn expected_phase(n: u32) -> SignalPhase {
    let cycle = 301 + 121 + 301;
    match n % cycle {
        t if t < 301 => SignalPhase::Green,
        t if t < 301 + 121 => SignalPhase::Yellow,
        _ => SignalPhase::Red,
    }
}

#[test]
fn test_signal_starts_green() {
    let signal = signal();
    assert_eq!(signal.phase(), SignalPhase::Green);
    assert_eq!(signal.elapsed(), 0);
    assert!(!signal.is_red());
}

#[test]
fn test_yellow_after_301_ticks() {
    let mut signal = signal();
    run(&mut signal, 300);
    assert_eq!(signal.phase(), SignalPhase::Green);
    run(&mut signal, 1);
    assert_eq!(signal.phase(), SignalPhase::Yellow);
    assert_eq!(signal.elapsed(), 0);
}

#[test]
fn test_phase_is_a_function_of_tick_count() {
    let mut signal = signal();
    for n in 1..=2000 {
        let changed = signal.update();
        assert_eq!(signal.phase(), expected_phase(n), "wrong phase after {} ticks", n);
        assert_eq!(changed, expected_phase(n) != expected_phase(n - 1));
    }
}

#[test]
fn test_holds_only_inside_stop_distance_while_red() {
    let mut signal = signal();
    assert!(!signal.holds(900.0), "green must not hold anyone");

    run(&mut signal, 301 + 121);
    assert_eq!(signal.phase(), SignalPhase::Red);

    assert!(signal.holds(900.0));
    assert!(signal.holds(811.0));
    assert!(!signal.holds(810.0), "exactly at stop distance is free");
    assert!(!signal.holds(950.0), "at the signal line is free");
    assert!(!signal.holds(1000.0), "past the signal is free");
}

#[test]
fn test_custom_durations() {
    let config = SignalConfig {
        green_ticks: 2,
        yellow_ticks: 1,
        red_ticks: 2,
        ..SignalConfig::default()
    };
    let mut signal = TrafficSignal::new(Position::new(0.0, 0.0), &config);
    let phases: Vec<SignalPhase> = (0..9)
        .map(|_| {
            signal.update();
            signal.phase()
        })
        .collect();
    use SignalPhase::*;
    assert_eq!(
        phases,
        vec![Green, Green, Yellow, Yellow, Red, Red, Red, Green, Green]
    );
}
