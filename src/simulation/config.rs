//! Tunable parameters for every scene
//!
//! All values that used to be process-wide constants (screen size, frame
//! rate, timer lengths, spawn tuning) live in `SimConfig`. A config is built
//! once, optionally loaded from JSON, and passed by reference into every
//! scene constructor. Every section is `#[serde(default)]`, so a JSON file
//! only needs the fields it overrides.

use anyhow::{ensure, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How vehicles see each other's positions during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpacingMode {
    /// Vehicles are updated in collection order and each one reads the
    /// current positions of its peers, including peers already moved this tick.
    #[default]
    Sequential,
    /// Every vehicle is gated against the positions all vehicles had at the
    /// start of the tick.
    Snapshot,
}

/// Inclusive range of floating point values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedRange {
    pub min: f32,
    pub max: f32,
}

impl SpeedRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Inclusive range of counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Unscaled body size of a vehicle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    /// Nominal ticks per second
    pub fps: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 750.0,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub green_ticks: u32,
    pub yellow_ticks: u32,
    pub red_ticks: u32,
    /// Vehicles closer than this behind a red signal hold their position
    pub stop_distance: f32,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            green_ticks: 300,
            yellow_ticks: 120,
            red_ticks: 300,
            stop_distance: 140.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub car: Footprint,
    pub bus: Footprint,
    pub bike: Footprint,
    pub default_scale: f32,
    /// Safety gap as a multiple of the vehicle's own width
    pub spacing_factor: f32,
    /// Ticks of movement between two exhaust puffs
    pub exhaust_interval: u32,
    pub exhaust_life: u32,
    pub bus_passengers: CountRange,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            car: Footprint {
                width: 30.0,
                height: 18.0,
            },
            bus: Footprint {
                width: 68.0,
                height: 28.0,
            },
            bike: Footprint {
                width: 18.0,
                height: 18.0,
            },
            default_scale: 1.3,
            spacing_factor: 1.6,
            exhaust_interval: 10,
            exhaust_life: 30,
            bus_passengers: CountRange::new(1, 4),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Watered ticks needed to advance one stage
    pub growth_ticks: u32,
    /// Ticks a mature, fruitless tree waits before fruiting
    pub fruit_regrow_ticks: u32,
    pub fruit_count: CountRange,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            growth_ticks: 180,
            fruit_regrow_ticks: 300,
            fruit_count: CountRange::new(3, 6),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirQualityConfig {
    pub load_per_vehicle: f32,
    pub mitigation_factor: f32,
    pub tree_base_power: f32,
    pub power_per_stage: f32,
    pub car_occupants: u32,
    pub bus_occupants: u32,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            load_per_vehicle: 0.08,
            mitigation_factor: 0.6,
            tree_base_power: 1.0,
            power_per_stage: 0.5,
            car_occupants: 2,
            bus_occupants: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartCityConfig {
    pub road_y: f32,
    pub lane_offset: f32,
    pub signal_x: f32,
    pub signal_y: f32,
    pub auto_spawn: bool,
    pub spawn_interval: u32,
    pub bus_probability: f64,
    pub spawn_x: f32,
    pub despawn_margin: f32,
    /// Vehicle count treated as a fully congested road
    pub capacity: usize,
    /// Trees stand this far above the road
    pub tree_ground_offset: f32,
    /// Trees are never placed closer than this to the viewport edges
    pub tree_margin: f32,
    pub car_speed: SpeedRange,
    pub bus_speed: SpeedRange,
}

impl Default for SmartCityConfig {
    fn default() -> Self {
        Self {
            road_y: 340.0,
            lane_offset: 15.0,
            signal_x: 950.0,
            signal_y: 300.0,
            auto_spawn: true,
            spawn_interval: 50,
            bus_probability: 0.5,
            spawn_x: -100.0,
            despawn_margin: 200.0,
            capacity: 18,
            tree_ground_offset: 60.0,
            tree_margin: 50.0,
            car_speed: SpeedRange::new(1.5, 3.0),
            bus_speed: SpeedRange::new(1.2, 2.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantingConfig {
    pub slot_count: usize,
    pub ground_y: f32,
    pub first_slot_x: f32,
    pub slot_spacing: f32,
    pub insight_duration: u32,
    pub reward_effect_life: u32,
}

impl Default for PlantingConfig {
    fn default() -> Self {
        Self {
            slot_count: 8,
            ground_y: 520.0,
            first_slot_x: 140.0,
            slot_spacing: 120.0,
            insight_duration: 300,
            reward_effect_life: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenCityConfig {
    /// Road y measured up from the bottom of the viewport
    pub road_from_bottom: f32,
    /// Tree line y measured up from the bottom of the viewport
    pub tree_line_from_bottom: f32,
    pub initial_tree_xs: Vec<f32>,
    /// Trees added later are never placed closer than this to the edges
    pub tree_margin: f32,
    pub initial_cars: usize,
    pub initial_car_spacing: f32,
    pub initial_buses: usize,
    pub initial_bus_x: f32,
    pub initial_bus_spacing: f32,
    pub car_scale: f32,
    pub car_gap: f32,
    pub bus_gap: f32,
    pub spawn_x: f32,
    pub car_spawn_after: u32,
    pub car_spawn_probability: f64,
    pub car_clearance: f32,
    pub bus_spawn_after: u32,
    pub bus_spawn_probability: f64,
    pub bus_clearance: f32,
    pub car_despawn_margin: f32,
    /// Buses are only dropped once they leave on the far side
    pub bus_despawn_margin: f32,
    pub car_speed: SpeedRange,
    pub bus_speed: SpeedRange,
    pub capacity: usize,
    pub pedestrians: usize,
    pub cyclists: usize,
    pub birds: usize,
}

impl Default for GreenCityConfig {
    fn default() -> Self {
        Self {
            road_from_bottom: 215.0,
            tree_line_from_bottom: 240.0,
            initial_tree_xs: vec![100.0, 230.0, 360.0, 490.0, 620.0, 750.0, 880.0, 1010.0],
            tree_margin: 50.0,
            initial_cars: 2,
            initial_car_spacing: 350.0,
            initial_buses: 1,
            initial_bus_x: -500.0,
            initial_bus_spacing: 400.0,
            car_scale: 1.0,
            car_gap: 80.0,
            bus_gap: 100.0,
            spawn_x: -100.0,
            car_spawn_after: 180,
            car_spawn_probability: 0.3,
            car_clearance: 250.0,
            bus_spawn_after: 240,
            bus_spawn_probability: 0.25,
            bus_clearance: 300.0,
            car_despawn_margin: 300.0,
            bus_despawn_margin: 200.0,
            car_speed: SpeedRange::new(1.5, 2.0),
            bus_speed: SpeedRange::new(1.0, 1.4),
            capacity: 18,
            pedestrians: 5,
            cyclists: 4,
            birds: 5,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub viewport: ViewportConfig,
    pub signal: SignalConfig,
    pub vehicles: VehicleConfig,
    pub growth: GrowthConfig,
    pub air_quality: AirQualityConfig,
    pub smart_city: SmartCityConfig,
    pub planting: PlantingConfig,
    pub green_city: GreenCityConfig,
    pub spacing_mode: SpacingMode,
}

impl SimConfig {
    /// Load a config from a JSON file, filling unspecified fields with defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        if let Err(err) = config.validate() {
            warn!("Rejected config file {}: {err:#}", path.display());
            return Err(err);
        }
        Ok(config)
    }

    /// Reject values that would stall or break the tick loop
    pub fn validate(&self) -> Result<()> {
        ensure!(self.viewport.fps > 0, "viewport.fps must be positive");
        ensure!(
            self.viewport.width > 0.0 && self.viewport.height > 0.0,
            "viewport dimensions must be positive"
        );
        ensure!(
            self.signal.green_ticks > 0 && self.signal.yellow_ticks > 0 && self.signal.red_ticks > 0,
            "signal phase durations must be positive"
        );
        ensure!(self.growth.growth_ticks > 0, "growth.growth_ticks must be positive");
        ensure!(
            self.growth.fruit_regrow_ticks > 0,
            "growth.fruit_regrow_ticks must be positive"
        );
        check_count_range("growth.fruit_count", self.growth.fruit_count)?;
        check_count_range("vehicles.bus_passengers", self.vehicles.bus_passengers)?;
        check_speed_range("smart_city.car_speed", self.smart_city.car_speed)?;
        check_speed_range("smart_city.bus_speed", self.smart_city.bus_speed)?;
        check_speed_range("green_city.car_speed", self.green_city.car_speed)?;
        check_speed_range("green_city.bus_speed", self.green_city.bus_speed)?;
        check_probability("smart_city.bus_probability", self.smart_city.bus_probability)?;
        check_probability(
            "green_city.car_spawn_probability",
            self.green_city.car_spawn_probability,
        )?;
        check_probability(
            "green_city.bus_spawn_probability",
            self.green_city.bus_spawn_probability,
        )?;
        ensure!(self.smart_city.capacity > 0, "smart_city.capacity must be positive");
        ensure!(self.green_city.capacity > 0, "green_city.capacity must be positive");
        ensure!(self.planting.slot_count > 0, "planting.slot_count must be positive");
        ensure!(
            self.smart_city.tree_margin * 2.0 <= self.viewport.width,
            "smart_city.tree_margin leaves no room for trees"
        );
        ensure!(
            self.green_city.tree_margin * 2.0 <= self.viewport.width,
            "green_city.tree_margin leaves no room for trees"
        );
        Ok(())
    }
}

fn check_count_range(name: &str, range: CountRange) -> Result<()> {
    ensure!(range.min <= range.max, "{name}: min must not exceed max");
    Ok(())
}

fn check_speed_range(name: &str, range: SpeedRange) -> Result<()> {
    ensure!(
        range.min > 0.0 && range.min <= range.max,
        "{name}: expected 0 < min <= max"
    );
    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    ensure!((0.0..=1.0).contains(&p), "{name}: probability must be within [0, 1]");
    Ok(())
}
