//! Traffic signal logic for the city simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::debug;

use super::config::SignalConfig;
use super::types::Position;

/// Phase of a traffic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalPhase {
    Green,
    Yellow,
    Red,
}

impl SignalPhase {
    /// The phase that follows this one in the fixed cycle
    pub fn next(self) -> Self {
        match self {
            SignalPhase::Green => SignalPhase::Yellow,
            SignalPhase::Yellow => SignalPhase::Red,
            SignalPhase::Red => SignalPhase::Green,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalPhase::Green => "GREEN",
            SignalPhase::Yellow => "YELLOW",
            SignalPhase::Red => "RED",
        }
    }
}

/// Ticks each phase lasts before the signal moves on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
}

impl PhaseDurations {
    pub fn get(&self, phase: SignalPhase) -> u32 {
        match phase {
            SignalPhase::Green => self.green,
            SignalPhase::Yellow => self.yellow,
            SignalPhase::Red => self.red,
        }
    }
}

impl From<&SignalConfig> for PhaseDurations {
    fn from(config: &SignalConfig) -> Self {
        Self {
            green: config.green_ticks,
            yellow: config.yellow_ticks,
            red: config.red_ticks,
        }
    }
}

/// A traffic signal cycling GREEN -> YELLOW -> RED -> GREEN on a timer
#[derive(Debug, Clone)]
pub struct TrafficSignal {
    pub position: Position,
    phase: SignalPhase,
    /// Ticks spent in the current phase
    elapsed: u32,
    durations: PhaseDurations,
    /// Vehicles within this distance behind a red signal must hold
    stop_distance: f32,
    /// Cosmetic pulse angle in degrees, only read by renderers
    pub glow: u32,
}

impl TrafficSignal {
    pub fn new(position: Position, config: &SignalConfig) -> Self {
        Self {
            position,
            phase: SignalPhase::Green,
            elapsed: 0,
            durations: PhaseDurations::from(config),
            stop_distance: config.stop_distance,
            glow: 0,
        }
    }

    pub fn phase(&self) -> SignalPhase {
        self.phase
    }

    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn is_red(&self) -> bool {
        self.phase == SignalPhase::Red
    }

    /// Advance one tick. Returns true when the phase changed.
    pub fn update(&mut self) -> bool {
        self.elapsed += 1;
        self.glow = (self.glow + 3) % 360;

        if self.elapsed > self.durations.get(self.phase) {
            self.elapsed = 0;
            self.phase = self.phase.next();
            debug!("Signal at x={:.0} switched to {}", self.position.x, self.phase.label());
            return true;
        }
        false
    }

    /// Whether a vehicle at `x` must hold its position this tick
    pub fn holds(&self, x: f32) -> bool {
        self.is_red() && x < self.position.x && self.position.x - x < self.stop_distance
    }
}
