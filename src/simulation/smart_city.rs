//! Smart city traffic scene
//!
//! A two-lane road with one traffic signal. Vehicles are spawned on a timer
//! (or by command) off-screen on the left, queue behind the signal and each
//! other, and are dropped once they leave the far side of the viewport.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::config::SimConfig;
use super::metrics::SceneMetrics;
use super::scene::{Scene, SceneKind, SceneView, TickSummary};
use super::signal::TrafficSignal;
use super::tree::{GrowthStage, Tree};
use super::types::{IdAllocator, Position, TreeId, VehicleId, VehicleKind};
use super::vehicle::{Vehicle, VisibilityWindow};
use super::vehicle_manager::{
    count_kind, despawn_vehicles, remove_last_of_kind, update_vehicles,
};

/// The smart city scene
pub struct SmartCityScene<R: Rng = StdRng> {
    config: SimConfig,

    /// The signal gating both lanes
    pub signal: TrafficSignal,

    /// All vehicles, in spawn order
    pub vehicles: Vec<Vehicle>,

    /// Roadside trees, in planting order
    pub trees: Vec<Tree>,

    /// Whether the spawn timer is running
    auto_spawn: bool,

    spawn_timer: u32,

    ticks: u64,

    ids: IdAllocator,

    rng: R,
}

impl SmartCityScene<StdRng> {
    /// Create a scene seeded from the operating system
    pub fn new(config: &SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a scene with a seeded RNG for reproducible runs
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SmartCityScene<R> {
    /// Create a scene drawing all randomness from `rng`
    pub fn with_rng(config: &SimConfig, rng: R) -> Self {
        let smart = &config.smart_city;
        let signal = TrafficSignal::new(
            Position::new(smart.signal_x, smart.signal_y),
            &config.signal,
        );

        Self {
            config: config.clone(),
            signal,
            vehicles: Vec::new(),
            trees: Vec::new(),
            auto_spawn: smart.auto_spawn,
            spawn_timer: 0,
            ticks: 0,
            ids: IdAllocator::default(),
            rng,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn auto_spawn(&self) -> bool {
        self.auto_spawn
    }

    /// Flip the spawn timer on or off. Returns the new setting.
    pub fn toggle_auto_spawn(&mut self) -> bool {
        self.auto_spawn = !self.auto_spawn;
        info!("Auto spawn {}", if self.auto_spawn { "on" } else { "off" });
        self.auto_spawn
    }

    /// The two lane coordinates of the road
    pub fn lanes(&self) -> [f32; 2] {
        let smart = &self.config.smart_city;
        [smart.road_y - smart.lane_offset, smart.road_y + smart.lane_offset]
    }

    /// Visibility window outside which vehicles are dropped
    pub fn visibility_window(&self) -> VisibilityWindow {
        VisibilityWindow::around(
            self.config.viewport.width,
            self.config.smart_city.despawn_margin,
        )
    }

    /// Spawn a vehicle off-screen on a random lane.
    /// Bikes are never spawned; asking for one is a no-op.
    pub fn add_vehicle(&mut self, kind: VehicleKind) -> Option<VehicleId> {
        let smart = &self.config.smart_city;
        let speed_range = match kind {
            VehicleKind::Car => smart.car_speed,
            VehicleKind::Bus => smart.bus_speed,
            VehicleKind::Bike => return None,
        };

        let lanes = self.lanes();
        let lane = *lanes.choose(&mut self.rng)?;
        let speed = self.rng.random_range(speed_range.min..=speed_range.max);
        let id = self.ids.next_vehicle_id();
        let vehicles = &self.config.vehicles;

        let mut vehicle = Vehicle::new(
            id,
            kind,
            Position::new(smart.spawn_x, lane),
            speed,
            vehicles.default_scale,
            vehicles,
            &mut self.rng,
        );
        if kind == VehicleKind::Car {
            vehicle = vehicle.with_exhaust(vehicles);
        }

        debug!("Spawned {} {:?} on lane {:.0} at speed {:.2}", kind.label(), id.0, lane, speed);
        self.vehicles.push(vehicle);
        Some(id)
    }

    /// Remove the most recently added vehicle of `kind`, or of any kind when
    /// `kind` is `None`. Returns `None` if nothing matched.
    pub fn remove_vehicle(&mut self, kind: Option<VehicleKind>) -> Option<VehicleId> {
        let removed = remove_last_of_kind(&mut self.vehicles, kind)?;
        debug!("Removed {} {:?}", removed.kind.label(), removed.id.0);
        Some(removed.id)
    }

    /// Plant a young tree at a random spot along the roadside
    pub fn add_tree(&mut self) -> TreeId {
        let width = self.config.viewport.width;
        let margin = self.config.smart_city.tree_margin;
        let x = self.rng.random_range(margin..=width - margin).round();
        let ground_y = self.config.smart_city.road_y - self.config.smart_city.tree_ground_offset;
        let stage = *[GrowthStage::Sprout, GrowthStage::Young]
            .choose(&mut self.rng)
            .unwrap_or(&GrowthStage::Sprout);

        let id = self.ids.next_tree_id();
        self.trees.push(Tree::new(
            id,
            x,
            ground_y,
            stage,
            &self.config.growth,
            &mut self.rng,
        ));
        debug!("Planted tree {:?} at x={:.0} ({})", id.0, x, stage.label());
        id
    }

    /// Remove the most recently planted tree
    pub fn remove_tree(&mut self) -> Option<TreeId> {
        let tree = self.trees.pop()?;
        debug!("Removed tree {:?}", tree.id.0);
        Some(tree.id)
    }

    pub fn count(&self, kind: VehicleKind) -> usize {
        count_kind(&self.vehicles, kind)
    }

    fn run_spawn_timer(&mut self) -> Option<VehicleId> {
        if !self.auto_spawn {
            return None;
        }
        self.spawn_timer += 1;
        if self.spawn_timer <= self.config.smart_city.spawn_interval {
            return None;
        }
        self.spawn_timer = 0;
        let kind = if self.rng.random_bool(self.config.smart_city.bus_probability) {
            VehicleKind::Bus
        } else {
            VehicleKind::Car
        };
        self.add_vehicle(kind)
    }
}

impl<R: Rng> Scene for SmartCityScene<R> {
    fn kind(&self) -> SceneKind {
        SceneKind::SmartCity
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Signal first, then spawning, trees, vehicles and finally despawning
    fn update(&mut self) -> TickSummary {
        self.ticks += 1;
        let mut summary = TickSummary::default();

        self.signal.update();

        if let Some(id) = self.run_spawn_timer() {
            summary.spawned.push(id);
        }

        for tree in &mut self.trees {
            let events = tree.update(&mut self.rng);
            summary.trees_grown += usize::from(events.stage_advanced);
            summary.trees_fruited += usize::from(events.fruited);
        }

        summary.motion = update_vehicles(
            &mut self.vehicles,
            Some(&self.signal),
            self.config.spacing_mode,
            &mut self.rng,
        );

        let window = self.visibility_window();
        summary.despawned = despawn_vehicles(&mut self.vehicles, |vehicle| {
            window.contains(vehicle.position.x)
        });

        summary
    }

    fn metrics(&self) -> SceneMetrics {
        SceneMetrics::compute(
            &self.vehicles,
            &self.trees,
            self.config.smart_city.capacity,
            &self.config.air_quality,
        )
    }

    fn view(&self) -> SceneView<'_> {
        SceneView {
            kind: SceneKind::SmartCity,
            ticks: self.ticks,
            vehicles: &self.vehicles,
            trees: self.trees.iter().collect(),
            signal: Some(&self.signal),
            metrics: self.metrics(),
            road_y: Some(self.config.smart_city.road_y),
            viewport_width: self.config.viewport.width,
        }
    }
}
