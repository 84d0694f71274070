//! Shared scene interface
//!
//! Every scene owns its actors and advances them once per tick. Renderers
//! and the headless runner only ever see a scene through `SceneView`.

use super::metrics::SceneMetrics;
use super::signal::TrafficSignal;
use super::tree::Tree;
use super::types::VehicleId;
use super::vehicle::Vehicle;
use super::vehicle_manager::MotionTally;

/// The three playable scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    SmartCity,
    Planting,
    GreenCity,
}

impl SceneKind {
    pub fn title(&self) -> &'static str {
        match self {
            SceneKind::SmartCity => "Smart City Traffic",
            SceneKind::Planting => "Tree Planting",
            SceneKind::GreenCity => "Green City",
        }
    }
}

/// What changed during one scene tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickSummary {
    pub motion: MotionTally,
    pub spawned: Vec<VehicleId>,
    pub despawned: Vec<VehicleId>,
    pub trees_grown: usize,
    pub trees_fruited: usize,
    pub rewards_collected: usize,
}

/// Read-only state handed to renderers once per frame
#[derive(Debug, Clone)]
pub struct SceneView<'a> {
    pub kind: SceneKind,
    pub ticks: u64,
    pub vehicles: &'a [Vehicle],
    pub trees: Vec<&'a Tree>,
    pub signal: Option<&'a TrafficSignal>,
    pub metrics: SceneMetrics,
    /// Center line of the road, if the scene has one
    pub road_y: Option<f32>,
    pub viewport_width: f32,
}

/// A simulation scene driven by a fixed tick
pub trait Scene {
    fn kind(&self) -> SceneKind;

    /// Ticks run since the scene was created
    fn ticks(&self) -> u64;

    /// Advance the scene by one tick
    fn update(&mut self) -> TickSummary;

    /// Metrics derived fresh from the current state
    fn metrics(&self) -> SceneMetrics;

    fn view(&self) -> SceneView<'_>;
}
