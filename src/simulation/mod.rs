//! Standalone city simulation module
//!
//! All scene logic lives here and runs independently of the Bevy engine, so
//! it can be driven from the console or from tests without opening a window.

mod ambient;
mod app;
mod config;
mod effects;
mod green_city;
mod metrics;
mod planting;
mod report;
mod scene;
mod signal;
mod smart_city;
mod tree;
mod types;
mod vehicle;
mod vehicle_manager;

pub use ambient::{Bird, Walker, WalkerKind, WRAP_JITTER};
pub use app::{AppState, Command, SimApp};
pub use config::{
    AirQualityConfig, CountRange, Footprint, GreenCityConfig, GrowthConfig, PlantingConfig,
    SignalConfig, SimConfig, SmartCityConfig, SpacingMode, SpeedRange, VehicleConfig,
    ViewportConfig,
};
pub use effects::{update_particles, Particle, RewardEffect, RewardKind};
pub use green_city::GreenCityScene;
pub use metrics::{air_quality, congestion_ratio, tree_power_of, SceneMetrics};
pub use planting::{insight_for, Insight, InsightPanel, PlantingScene};
pub use scene::{Scene, SceneKind, SceneView, TickSummary};
pub use signal::{PhaseDurations, SignalPhase, TrafficSignal};
pub use smart_city::SmartCityScene;
pub use tree::{foliage_radius, trunk_height, GrowthEvents, GrowthStage, Tree};
pub use types::{IdAllocator, Position, SimId, TreeId, VehicleId, VehicleKind};
pub use vehicle::{ExhaustEmitter, MotionGate, Vehicle, VehicleUpdateResult, VisibilityWindow};
pub use vehicle_manager::{
    count_kind, despawn_vehicles, has_clearance, remove_last_of_kind, update_vehicles,
    update_vehicles_where, MotionTally,
};
