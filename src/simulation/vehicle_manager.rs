//! Vehicle spawning and management for the city simulation
//!
//! This module contains functions for updating, despawning and removing
//! vehicles. It separates collection-level logic from the scenes that own
//! the collections.

use log::debug;
use rand::Rng;

use super::config::SpacingMode;
use super::signal::TrafficSignal;
use super::types::{VehicleId, VehicleKind};
use super::vehicle::{MotionGate, Vehicle, VehicleUpdateResult};

/// Tally of what happened to the vehicles updated in one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionTally {
    pub moved: usize,
    pub held_by_signal: usize,
    pub held_by_spacing: usize,
}

impl MotionTally {
    fn record(&mut self, result: VehicleUpdateResult) {
        match result {
            VehicleUpdateResult::Moved => self.moved += 1,
            VehicleUpdateResult::Held(MotionGate::Signal) => self.held_by_signal += 1,
            VehicleUpdateResult::Held(MotionGate::Spacing) => self.held_by_spacing += 1,
        }
    }
}

/// Update every vehicle in the collection
pub fn update_vehicles(
    vehicles: &mut [Vehicle],
    signal: Option<&TrafficSignal>,
    mode: SpacingMode,
    rng: &mut impl Rng,
) -> MotionTally {
    update_vehicles_where(vehicles, signal, mode, rng, |_| true)
}

/// Update the vehicles matching `selected`, in collection order.
///
/// Every vehicle, selected or not, counts as a peer for spacing. In
/// `Sequential` mode a vehicle sees peers that already moved earlier in the
/// same tick; in `Snapshot` mode all gates are evaluated against the
/// positions at the start of the call.
pub fn update_vehicles_where(
    vehicles: &mut [Vehicle],
    signal: Option<&TrafficSignal>,
    mode: SpacingMode,
    rng: &mut impl Rng,
    selected: impl Fn(&Vehicle) -> bool,
) -> MotionTally {
    let mut tally = MotionTally::default();

    match mode {
        SpacingMode::Sequential => {
            for index in 0..vehicles.len() {
                if !selected(&vehicles[index]) {
                    continue;
                }
                let (before, rest) = vehicles.split_at_mut(index);
                if let Some((vehicle, after)) = rest.split_first_mut() {
                    let result = vehicle.update(signal, before.iter().chain(after.iter()), rng);
                    tally.record(result);
                }
            }
        }
        SpacingMode::Snapshot => {
            let start_of_tick: Vec<Vehicle> = vehicles.to_vec();
            for vehicle in vehicles.iter_mut().filter(|v| selected(v)) {
                let result = vehicle.update(signal, start_of_tick.iter(), rng);
                tally.record(result);
            }
        }
    }

    tally
}

/// Drop vehicles that left their visibility window, plus any bikes.
/// Returns the ids that were removed.
pub fn despawn_vehicles(
    vehicles: &mut Vec<Vehicle>,
    is_visible: impl Fn(&Vehicle) -> bool,
) -> Vec<VehicleId> {
    let mut removed = Vec::new();
    vehicles.retain(|vehicle| {
        let keep = vehicle.kind != VehicleKind::Bike && is_visible(vehicle);
        if !keep {
            debug!(
                "Despawning {} {:?} at x={:.1}",
                vehicle.kind.label(),
                vehicle.id.0,
                vehicle.position.x
            );
            removed.push(vehicle.id);
        }
        keep
    });
    removed
}

/// Remove the most recently added vehicle of `kind` (or of any kind).
/// Returns `None` without touching the collection when nothing matches.
pub fn remove_last_of_kind(
    vehicles: &mut Vec<Vehicle>,
    kind: Option<VehicleKind>,
) -> Option<Vehicle> {
    let index = vehicles
        .iter()
        .rposition(|vehicle| kind.is_none_or(|kind| vehicle.kind == kind))?;
    Some(vehicles.remove(index))
}

/// Whether no vehicle lies within `clearance` of `x`, in either direction
pub fn has_clearance(vehicles: &[Vehicle], x: f32, clearance: f32) -> bool {
    vehicles
        .iter()
        .all(|vehicle| (vehicle.position.x - x).abs() >= clearance)
}

pub fn count_kind(vehicles: &[Vehicle], kind: VehicleKind) -> usize {
    vehicles.iter().filter(|vehicle| vehicle.kind == kind).count()
}
