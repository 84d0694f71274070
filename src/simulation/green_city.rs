//! Green city diorama scene
//!
//! A single-lane road without a signal. Cars and buses keep fixed gaps to
//! whatever is ahead of them, new vehicles only appear when the entry point
//! is clear, and pedestrians, cyclists and birds wander around a row of
//! trees.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use super::ambient::{Bird, Walker, WalkerKind};
use super::config::{SimConfig, SpeedRange};
use super::metrics::SceneMetrics;
use super::scene::{Scene, SceneKind, SceneView, TickSummary};
use super::tree::{GrowthStage, Tree};
use super::types::{IdAllocator, Position, TreeId, VehicleId, VehicleKind};
use super::vehicle::{Vehicle, VisibilityWindow};
use super::vehicle_manager::{
    count_kind, despawn_vehicles, has_clearance, remove_last_of_kind, update_vehicles_where,
};

/// The green city scene
pub struct GreenCityScene<R: Rng = StdRng> {
    config: SimConfig,

    /// Cars and buses sharing the single lane
    pub vehicles: Vec<Vehicle>,

    pub trees: Vec<Tree>,

    pub walkers: Vec<Walker>,

    pub birds: Vec<Bird>,

    spawn_timer: u32,

    ticks: u64,

    ids: IdAllocator,

    rng: R,
}

impl GreenCityScene<StdRng> {
    /// Create a scene seeded from the operating system
    pub fn new(config: &SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a scene with a seeded RNG for reproducible runs
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GreenCityScene<R> {
    /// Create a scene populated with its initial trees, traffic and walkers
    pub fn with_rng(config: &SimConfig, rng: R) -> Self {
        let mut scene = Self {
            config: config.clone(),
            vehicles: Vec::new(),
            trees: Vec::new(),
            walkers: Vec::new(),
            birds: Vec::new(),
            spawn_timer: 0,
            ticks: 0,
            ids: IdAllocator::default(),
            rng,
        };
        scene.populate();
        scene
    }

    fn populate(&mut self) {
        let green = self.config.green_city.clone();
        let width = self.config.viewport.width;
        let height = self.config.viewport.height;

        for &x in &green.initial_tree_xs {
            self.plant_at(x, GrowthStage::Sprout);
        }

        for _ in 0..green.pedestrians {
            let x = self.rng.random_range(0.0..=width).round();
            let walker = Walker::new(WalkerKind::Pedestrian, x, height - 170.0, 10, &mut self.rng);
            self.walkers.push(walker);
        }
        for _ in 0..green.cyclists {
            let x = self.rng.random_range(0.0..=width).round();
            let walker = Walker::new(WalkerKind::Cyclist, x, height - 200.0, 8, &mut self.rng);
            self.walkers.push(walker);
        }

        for i in 0..green.initial_cars {
            let x = green.spawn_x - i as f32 * green.initial_car_spacing;
            self.spawn(VehicleKind::Car, x);
        }
        for i in 0..green.initial_buses {
            let x = green.initial_bus_x - i as f32 * green.initial_bus_spacing;
            self.spawn(VehicleKind::Bus, x);
        }

        for _ in 0..green.birds {
            let bird = Bird::new(width, &mut self.rng);
            self.birds.push(bird);
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn road_y(&self) -> f32 {
        self.config.viewport.height - self.config.green_city.road_from_bottom
    }

    pub fn tree_line_y(&self) -> f32 {
        self.config.viewport.height - self.config.green_city.tree_line_from_bottom
    }

    /// Visibility window for vehicles of `kind`
    pub fn visibility_window(&self, kind: VehicleKind) -> VisibilityWindow {
        let width = self.config.viewport.width;
        let green = &self.config.green_city;
        match kind {
            VehicleKind::Bus => VisibilityWindow::far_side(width, green.bus_despawn_margin),
            _ => VisibilityWindow::around(width, green.car_despawn_margin),
        }
    }

    fn spawn(&mut self, kind: VehicleKind, x: f32) -> Option<VehicleId> {
        let green = &self.config.green_city;
        let (speed_range, scale, gap): (SpeedRange, f32, f32) = match kind {
            VehicleKind::Car => (green.car_speed, green.car_scale, green.car_gap),
            VehicleKind::Bus => (
                green.bus_speed,
                self.config.vehicles.default_scale,
                green.bus_gap,
            ),
            VehicleKind::Bike => return None,
        };

        let speed = self.rng.random_range(speed_range.min..=speed_range.max);
        let id = self.ids.next_vehicle_id();
        let vehicle = Vehicle::new(
            id,
            kind,
            Position::new(x, self.road_y()),
            speed,
            scale,
            &self.config.vehicles,
            &mut self.rng,
        )
        .with_safe_gap(gap);

        debug!("Spawned {} {:?} at x={:.0}", kind.label(), id.0, x);
        self.vehicles.push(vehicle);
        Some(id)
    }

    /// Spawn a vehicle at the entry point if nothing is within `clearance`
    /// of it. Rejected spawns are simply retried on a later tick.
    pub fn try_spawn(&mut self, kind: VehicleKind, clearance: f32) -> Option<VehicleId> {
        let spawn_x = self.config.green_city.spawn_x;
        if !has_clearance(&self.vehicles, spawn_x, clearance) {
            return None;
        }
        self.spawn(kind, spawn_x)
    }

    fn plant_at(&mut self, x: f32, stage: GrowthStage) -> TreeId {
        let id = self.ids.next_tree_id();
        let ground_y = self.tree_line_y();
        self.trees.push(Tree::new(
            id,
            x,
            ground_y,
            stage,
            &self.config.growth,
            &mut self.rng,
        ));
        id
    }

    /// Plant a tree at a random spot on the tree line
    pub fn add_tree(&mut self) -> TreeId {
        let width = self.config.viewport.width;
        let margin = self.config.green_city.tree_margin;
        let x = self.rng.random_range(margin..=width - margin).round();
        let stage = *[GrowthStage::Sprout, GrowthStage::Young]
            .choose(&mut self.rng)
            .unwrap_or(&GrowthStage::Sprout);
        let id = self.plant_at(x, stage);
        debug!("Planted tree {:?} at x={:.0} ({})", id.0, x, stage.label());
        id
    }

    /// Remove the most recently planted tree
    pub fn remove_tree(&mut self) -> Option<TreeId> {
        let tree = self.trees.pop()?;
        debug!("Removed tree {:?}", tree.id.0);
        Some(tree.id)
    }

    /// Remove the most recently added vehicle of `kind`, or of any kind
    pub fn remove_vehicle(&mut self, kind: Option<VehicleKind>) -> Option<VehicleId> {
        remove_last_of_kind(&mut self.vehicles, kind).map(|vehicle| vehicle.id)
    }

    pub fn count(&self, kind: VehicleKind) -> usize {
        count_kind(&self.vehicles, kind)
    }

    /// Move every vehicle of `kind`, drop the ones that left their window,
    /// then give the spawn timer a chance to add one more of that kind.
    fn step_kind(&mut self, kind: VehicleKind, summary: &mut TickSummary) {
        let tally = update_vehicles_where(
            &mut self.vehicles,
            None,
            self.config.spacing_mode,
            &mut self.rng,
            |vehicle| vehicle.kind == kind,
        );
        summary.motion.moved += tally.moved;
        summary.motion.held_by_spacing += tally.held_by_spacing;

        let window = self.visibility_window(kind);
        let despawned = despawn_vehicles(&mut self.vehicles, |vehicle| {
            vehicle.kind != kind || window.contains(vehicle.position.x)
        });
        summary.despawned.extend(despawned);

        let green = &self.config.green_city;
        let (spawn_after, probability, clearance) = match kind {
            VehicleKind::Bus => (
                green.bus_spawn_after,
                green.bus_spawn_probability,
                green.bus_clearance,
            ),
            _ => (
                green.car_spawn_after,
                green.car_spawn_probability,
                green.car_clearance,
            ),
        };
        if self.spawn_timer > spawn_after && self.rng.random_bool(probability) {
            if let Some(id) = self.try_spawn(kind, clearance) {
                self.spawn_timer = 0;
                summary.spawned.push(id);
            }
        }
    }
}

impl<R: Rng> Scene for GreenCityScene<R> {
    fn kind(&self) -> SceneKind {
        SceneKind::GreenCity
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn update(&mut self) -> TickSummary {
        self.ticks += 1;
        self.spawn_timer += 1;
        let mut summary = TickSummary::default();

        for tree in &mut self.trees {
            let events = tree.update(&mut self.rng);
            summary.trees_grown += usize::from(events.stage_advanced);
            summary.trees_fruited += usize::from(events.fruited);
        }

        let width = self.config.viewport.width;
        for walker in &mut self.walkers {
            walker.update(width, &mut self.rng);
        }

        self.step_kind(VehicleKind::Car, &mut summary);
        self.step_kind(VehicleKind::Bus, &mut summary);

        for bird in &mut self.birds {
            bird.update(width, &mut self.rng);
        }

        summary
    }

    fn metrics(&self) -> SceneMetrics {
        SceneMetrics::compute(
            &self.vehicles,
            &self.trees,
            self.config.green_city.capacity,
            &self.config.air_quality,
        )
    }

    fn view(&self) -> SceneView<'_> {
        SceneView {
            kind: SceneKind::GreenCity,
            ticks: self.ticks,
            vehicles: &self.vehicles,
            trees: self.trees.iter().collect(),
            signal: None,
            metrics: self.metrics(),
            road_y: Some(self.road_y()),
            viewport_width: self.config.viewport.width,
        }
    }
}
