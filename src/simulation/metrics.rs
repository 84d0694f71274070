//! Derived scene metrics
//!
//! Metrics are recomputed from the live collections whenever they are
//! asked for. Nothing here is cached.

use super::config::AirQualityConfig;
use super::tree::Tree;
use super::types::VehicleKind;
use super::vehicle::Vehicle;

/// Aggregate numbers shown alongside a scene
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneMetrics {
    pub cars: usize,
    pub buses: usize,
    pub total_vehicles: usize,
    /// Estimated people on the road
    pub occupants: u32,
    pub trees: usize,
    /// Sum of every tree's mitigating contribution
    pub tree_power: f32,
    /// Vehicle count over capacity, clamped to [0, 1]
    pub congestion_ratio: f32,
    /// 1.0 is clean air, 0.0 is fully polluted
    pub air_quality: f32,
    pub capacity: usize,
}

impl SceneMetrics {
    pub fn compute<'a>(
        vehicles: &[Vehicle],
        trees: impl IntoIterator<Item = &'a Tree>,
        capacity: usize,
        config: &AirQualityConfig,
    ) -> Self {
        let cars = vehicles.iter().filter(|v| v.kind == VehicleKind::Car).count();
        let buses = vehicles.iter().filter(|v| v.kind == VehicleKind::Bus).count();
        let total_vehicles = vehicles.len();
        let occupants = cars as u32 * config.car_occupants + buses as u32 * config.bus_occupants;

        let mut tree_count = 0;
        let mut tree_power = 0.0;
        for tree in trees {
            tree_count += 1;
            tree_power += tree_power_of(tree, config);
        }

        Self {
            cars,
            buses,
            total_vehicles,
            occupants,
            trees: tree_count,
            tree_power,
            congestion_ratio: congestion_ratio(total_vehicles, capacity),
            air_quality: air_quality(total_vehicles, tree_power, config),
            capacity,
        }
    }

    /// More vehicles than the road can take
    pub fn is_congested(&self) -> bool {
        self.total_vehicles > self.capacity
    }
}

/// Mitigating contribution of one tree, growing with its stage
pub fn tree_power_of(tree: &Tree, config: &AirQualityConfig) -> f32 {
    config.tree_base_power + config.power_per_stage * f32::from(tree.stage().index())
}

pub fn congestion_ratio(total_vehicles: usize, capacity: usize) -> f32 {
    if capacity == 0 {
        return 1.0;
    }
    (total_vehicles as f32 / capacity as f32).min(1.0)
}

pub fn air_quality(total_vehicles: usize, tree_power: f32, config: &AirQualityConfig) -> f32 {
    let load = total_vehicles as f32 * config.load_per_vehicle;
    let mitigation = 1.0 + tree_power * config.mitigation_factor;
    (1.0 - (load / mitigation).min(1.0)).max(0.0)
}
