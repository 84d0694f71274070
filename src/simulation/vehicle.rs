//! Vehicle movement logic for the city simulation
//!
//! Standalone implementation that doesn't depend on Bevy.
//!
//! Motion is a kinematic walk: each tick a vehicle either moves forward by
//! its fixed speed or holds. It holds when a red signal is just ahead of it
//! or when a peer on the same lane sits inside its safety gap.

use ordered_float::OrderedFloat;
use rand::Rng;

use super::config::VehicleConfig;
use super::effects::{update_particles, Particle};
use super::signal::TrafficSignal;
use super::types::{Position, VehicleId, VehicleKind};

/// Why a vehicle did not advance this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionGate {
    /// Red signal within the stop distance ahead
    Signal,
    /// A same-lane peer inside the safety gap ahead
    Spacing,
}

/// Result of a vehicle update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleUpdateResult {
    Moved,
    Held(MotionGate),
}

/// Horizontal band a vehicle must stay inside to be kept by its scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityWindow {
    pub min_x: f32,
    pub max_x: f32,
}

impl VisibilityWindow {
    /// A window extending `margin` beyond both edges of a viewport
    pub fn around(viewport_width: f32, margin: f32) -> Self {
        Self {
            min_x: -margin,
            max_x: viewport_width + margin,
        }
    }

    /// A window only bounded on the far (right) side
    pub fn far_side(viewport_width: f32, margin: f32) -> Self {
        Self {
            min_x: f32::NEG_INFINITY,
            max_x: viewport_width + margin,
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        self.min_x < x && x < self.max_x
    }
}

/// Periodic exhaust puffs left behind a moving vehicle
#[derive(Debug, Clone)]
pub struct ExhaustEmitter {
    timer: u32,
    interval: u32,
    life: u32,
    pub particles: Vec<Particle>,
}

impl ExhaustEmitter {
    pub fn new(interval: u32, life: u32) -> Self {
        Self {
            timer: 0,
            interval,
            life,
            particles: Vec::new(),
        }
    }

    fn update(&mut self, origin: Position, rng: &mut impl Rng) {
        self.timer += 1;
        if self.timer > self.interval {
            self.timer = 0;
            let puff = Position::new(origin.x - 5.0, origin.y + 5.0);
            self.particles
                .push(Particle::new(puff, -0.5, 0.0, self.life, rng));
        }
        update_particles(&mut self.particles);
    }
}

/// A vehicle driving left to right along a lane
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub kind: VehicleKind,
    /// `position.y` doubles as the lane coordinate
    pub position: Position,
    speed: f32,
    pub width: f32,
    pub height: f32,
    pub passengers: u32,
    /// Peers closer than this ahead on the same lane block movement
    pub safe_gap: f32,
    pub exhaust: Option<ExhaustEmitter>,
}

impl Vehicle {
    /// Create a vehicle with the footprint of its kind scaled by `scale`.
    /// The safety gap defaults to the configured multiple of its width.
    pub fn new(
        id: VehicleId,
        kind: VehicleKind,
        position: Position,
        speed: f32,
        scale: f32,
        config: &VehicleConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let footprint = match kind {
            VehicleKind::Car => config.car,
            VehicleKind::Bus => config.bus,
            VehicleKind::Bike => config.bike,
        };
        let width = (footprint.width * scale).trunc();
        let height = (footprint.height * scale).trunc();
        let passengers = match kind {
            VehicleKind::Bus => {
                rng.random_range(config.bus_passengers.min..=config.bus_passengers.max)
            }
            _ => 1,
        };

        Self {
            id,
            kind,
            position,
            speed,
            width,
            height,
            passengers,
            safe_gap: width * config.spacing_factor,
            exhaust: None,
        }
    }

    /// Replace the width-derived safety gap with a fixed distance
    pub fn with_safe_gap(mut self, safe_gap: f32) -> Self {
        self.safe_gap = safe_gap;
        self
    }

    /// Enable exhaust puffs
    pub fn with_exhaust(mut self, config: &VehicleConfig) -> Self {
        self.exhaust = Some(ExhaustEmitter::new(config.exhaust_interval, config.exhaust_life));
        self
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Externally reset the speed. The motion model never changes it.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn lane(&self) -> f32 {
        self.position.y
    }

    /// Whether `other` sits inside this vehicle's safety gap on the same lane
    pub fn is_blocked_by(&self, other: &Vehicle) -> bool {
        if other.id == self.id || other.lane() != self.lane() {
            return false;
        }
        let ahead = other.position.x - self.position.x;
        0.0 < ahead && ahead < self.safe_gap
    }

    /// Check both gating rules without moving
    pub fn gate<'a>(
        &self,
        signal: Option<&TrafficSignal>,
        peers: impl IntoIterator<Item = &'a Vehicle>,
    ) -> Option<MotionGate> {
        if signal.is_some_and(|signal| signal.holds(self.position.x)) {
            return Some(MotionGate::Signal);
        }
        if peers.into_iter().any(|other| self.is_blocked_by(other)) {
            return Some(MotionGate::Spacing);
        }
        None
    }

    /// Run one tick of motion against the signal and the current peer positions
    pub fn update<'a>(
        &mut self,
        signal: Option<&TrafficSignal>,
        peers: impl IntoIterator<Item = &'a Vehicle>,
        rng: &mut impl Rng,
    ) -> VehicleUpdateResult {
        if let Some(gate) = self.gate(signal, peers) {
            return VehicleUpdateResult::Held(gate);
        }
        self.advance(rng);
        VehicleUpdateResult::Moved
    }

    /// Move forward by one tick's worth of speed, ignoring every gate
    pub fn advance(&mut self, rng: &mut impl Rng) {
        self.position.x += self.speed;
        if let Some(exhaust) = &mut self.exhaust {
            exhaust.update(self.position, rng);
        }
    }

    /// The nearest peer strictly ahead on the same lane
    pub fn leader<'a>(&self, peers: impl IntoIterator<Item = &'a Vehicle>) -> Option<&'a Vehicle> {
        peers
            .into_iter()
            .filter(|other| other.id != self.id && other.lane() == self.lane())
            .filter(|other| other.position.x > self.position.x)
            .min_by_key(|other| OrderedFloat(other.position.x - self.position.x))
    }

    /// Distance to the nearest peer ahead on the same lane, if any
    pub fn gap_to_leader<'a>(&self, peers: impl IntoIterator<Item = &'a Vehicle>) -> Option<f32> {
        self.leader(peers)
            .map(|leader| leader.position.x - self.position.x)
    }
}
