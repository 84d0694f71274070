//! Core types for the city simulation
//!
//! These are standalone types that don't depend on Bevy.

use serde::{Deserialize, Serialize};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

/// A wrapper type for tree IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeId(pub SimId);

/// Hands out monotonically increasing ids within one scene
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_id: usize,
}

impl IdAllocator {
    pub fn next_sim_id(&mut self) -> SimId {
        let id = SimId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn next_vehicle_id(&mut self) -> VehicleId {
        VehicleId(self.next_sim_id())
    }

    pub fn next_tree_id(&mut self) -> TreeId {
        TreeId(self.next_sim_id())
    }
}

/// Type of vehicle in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Car,
    Bus,
    /// Never produced by any spawn path; scenes filter it out of their
    /// vehicle collections every tick.
    Bike,
}

impl VehicleKind {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleKind::Car => "car",
            VehicleKind::Bus => "bus",
            VehicleKind::Bike => "bike",
        }
    }
}

/// A 2D position in screen-space units (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
