//! Short-lived cosmetic actors
//!
//! Particles and reward effects carry no rules of their own. They drift and
//! expire, and renderers draw whatever is alive.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::types::Position;

/// A single puff of exhaust or sparkle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Position,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Create a particle with a little random drift added to the given velocity
    pub fn new(position: Position, vx: f32, vy: f32, life: u32, rng: &mut impl Rng) -> Self {
        Self {
            position,
            vx: vx + rng.random_range(-0.5..=0.5),
            vy: vy + rng.random_range(-2.0..=-0.5),
            life,
            max_life: life,
        }
    }

    pub fn update(&mut self) {
        self.position.x += self.vx;
        self.position.y += self.vy;
        self.vy += 0.1;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// Remaining life in [0, 1], used for fading
    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Visual flavour of a reward effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardKind {
    Star,
    Butterfly,
    Rainbow,
}

impl RewardKind {
    const ALL: [RewardKind; 3] = [RewardKind::Star, RewardKind::Butterfly, RewardKind::Rainbow];

    pub fn random(rng: &mut impl Rng) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&RewardKind::Star)
    }
}

/// Floating reward shown when a tree advances a stage
#[derive(Debug, Clone, PartialEq)]
pub struct RewardEffect {
    pub kind: RewardKind,
    pub position: Position,
    pub vx: f32,
    pub vy: f32,
    pub life: u32,
}

impl RewardEffect {
    pub fn new(position: Position, kind: RewardKind, life: u32, rng: &mut impl Rng) -> Self {
        Self {
            kind,
            position,
            vx: rng.random_range(-1.0..=1.0),
            vy: rng.random_range(-2.0..=-0.5),
            life,
        }
    }

    pub fn update(&mut self) {
        self.position.x += self.vx;
        self.position.y += self.vy;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Advance every particle and drop the expired ones
pub fn update_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.update();
    }
    particles.retain(Particle::is_alive);
}
