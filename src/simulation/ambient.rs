//! Ambient actors that only decorate the green city
//!
//! Pedestrians, cyclists and birds wander across the viewport and wrap
//! around at the edges. They never interact with vehicles or trees.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::types::Position;

/// Distance past the viewport edge at which actors wrap around
const WRAP_MARGIN: f32 = 50.0;

/// Vertical scatter applied when a walker re-enters the viewport
pub const WRAP_JITTER: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerKind {
    Pedestrian,
    Cyclist,
}

impl WalkerKind {
    fn speed_range(self) -> (f32, f32) {
        match self {
            WalkerKind::Pedestrian => (0.8, 1.2),
            WalkerKind::Cyclist => (2.0, 3.0),
        }
    }

    fn animation_period(self) -> u32 {
        match self {
            WalkerKind::Pedestrian => 30,
            WalkerKind::Cyclist => 20,
        }
    }
}

/// A pedestrian or cyclist on the sidewalk
#[derive(Debug, Clone, PartialEq)]
pub struct Walker {
    pub kind: WalkerKind,
    pub position: Position,
    /// +1.0 walks right, -1.0 walks left
    pub direction: f32,
    pub speed: f32,
    pub anim_frame: u32,
    base_y: f32,
}

impl Walker {
    /// `jitter` only scatters the starting height; wrapping always uses
    /// `WRAP_JITTER`
    pub fn new(kind: WalkerKind, x: f32, base_y: f32, jitter: i32, rng: &mut impl Rng) -> Self {
        let (min_speed, max_speed) = kind.speed_range();
        let period = kind.animation_period();
        Self {
            kind,
            position: Position::new(x, base_y + rng.random_range(-jitter..=jitter) as f32),
            direction: *[-1.0, 1.0].choose(rng).unwrap_or(&1.0),
            speed: rng.random_range(min_speed..=max_speed),
            anim_frame: rng.random_range(0..period),
            base_y,
        }
    }

    pub fn update(&mut self, viewport_width: f32, rng: &mut impl Rng) {
        self.position.x += self.direction * self.speed;
        self.anim_frame = (self.anim_frame + 1) % self.kind.animation_period();

        let wrapped_x = if self.position.x < -WRAP_MARGIN {
            Some(viewport_width + WRAP_MARGIN)
        } else if self.position.x > viewport_width + WRAP_MARGIN {
            Some(-WRAP_MARGIN)
        } else {
            None
        };

        if let Some(x) = wrapped_x {
            self.position.x = x;
            self.position.y = self.base_y + rng.random_range(-WRAP_JITTER..=WRAP_JITTER) as f32;
        }
    }
}

/// A bird gliding across the sky
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub position: Position,
    pub vx: f32,
    pub vy: f32,
    /// Wing flap angle in degrees
    pub wing: u32,
}

impl Bird {
    pub fn new(viewport_width: f32, rng: &mut impl Rng) -> Self {
        Self {
            position: Position::new(
                rng.random_range(0.0..=viewport_width).round(),
                rng.random_range(200..=300) as f32,
            ),
            vx: rng.random_range(-1.0..=1.0),
            vy: rng.random_range(-0.3..=0.3),
            wing: 0,
        }
    }

    pub fn update(&mut self, viewport_width: f32, rng: &mut impl Rng) {
        self.position.x += self.vx;
        self.position.y += self.vy;
        self.wing = (self.wing + 5) % 360;

        if self.position.x < -WRAP_MARGIN || self.position.x > viewport_width + WRAP_MARGIN {
            self.position.x = if self.vx < 0.0 {
                viewport_width + WRAP_MARGIN
            } else {
                -WRAP_MARGIN
            };
            self.position.y = rng.random_range(200..=300) as f32;
        }
    }
}
