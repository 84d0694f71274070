//! Tree growth logic for the city simulation
//!
//! Standalone implementation that doesn't depend on Bevy.
//!
//! A tree only grows while watered. Each completed growth interval advances
//! the stage by one, clears the watered flag and leaves a reward for the
//! owning scene to collect. Mature trees regrow fruit on their own timer.

use log::debug;
use rand::Rng;

use super::config::GrowthConfig;
use super::types::{Position, TreeId};

/// Maturity of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GrowthStage {
    Seed,
    Sprout,
    Young,
    Mature,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 4] = [
        GrowthStage::Seed,
        GrowthStage::Sprout,
        GrowthStage::Young,
        GrowthStage::Mature,
    ];

    pub fn index(self) -> u8 {
        match self {
            GrowthStage::Seed => 0,
            GrowthStage::Sprout => 1,
            GrowthStage::Young => 2,
            GrowthStage::Mature => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index)).copied()
    }

    /// The following stage, saturating at `Mature`
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(GrowthStage::Mature)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GrowthStage::Seed => "seed",
            GrowthStage::Sprout => "sprout",
            GrowthStage::Young => "young",
            GrowthStage::Mature => "mature",
        }
    }
}

/// Radius of the leaf canopy at a given stage
pub fn foliage_radius(stage: GrowthStage) -> f32 {
    20.0 + f32::from(stage.index()) * 20.0
}

/// Height of the trunk at a given stage
pub fn trunk_height(stage: GrowthStage) -> f32 {
    20.0 + f32::from(stage.index()) * 35.0
}

/// What happened to a tree during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthEvents {
    /// A growth interval completed (the stage may already have been mature)
    pub stage_advanced: bool,
    pub fruited: bool,
}

/// A tree standing on the ground line
#[derive(Debug, Clone)]
pub struct Tree {
    pub id: TreeId,
    pub x: f32,
    pub ground_y: f32,
    stage: GrowthStage,
    watered: bool,
    growth_timer: u32,
    fruit: Option<Vec<Position>>,
    fruit_timer: u32,
    reward_pending: bool,
    /// Cosmetic sway angle in degrees
    pub sway: u32,
    rules: GrowthConfig,
}

impl Tree {
    pub fn new(
        id: TreeId,
        x: f32,
        ground_y: f32,
        stage: GrowthStage,
        rules: &GrowthConfig,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            x,
            ground_y,
            stage,
            watered: false,
            growth_timer: 0,
            fruit: None,
            fruit_timer: 0,
            reward_pending: false,
            sway: rng.random_range(0..360),
            rules: rules.clone(),
        }
    }

    pub fn stage(&self) -> GrowthStage {
        self.stage
    }

    pub fn is_watered(&self) -> bool {
        self.watered
    }

    pub fn growth_timer(&self) -> u32 {
        self.growth_timer
    }

    pub fn fruit_timer(&self) -> u32 {
        self.fruit_timer
    }

    pub fn has_fruit(&self) -> bool {
        self.fruit.is_some()
    }

    pub fn fruit_positions(&self) -> &[Position] {
        self.fruit.as_deref().unwrap_or(&[])
    }

    pub fn reward_pending(&self) -> bool {
        self.reward_pending
    }

    /// Collect the pending reward, clearing it. Returns whether one was pending.
    pub fn take_reward(&mut self) -> bool {
        std::mem::take(&mut self.reward_pending)
    }

    /// Point where the trunk meets the ground
    pub fn base(&self) -> Position {
        Position::new(self.x, self.ground_y)
    }

    /// Center of the leaf canopy
    pub fn foliage_center(&self) -> Position {
        let radius = foliage_radius(self.stage);
        let center_y = self.ground_y - trunk_height(self.stage) - (radius / 2.0).floor();
        Position::new(self.x, center_y)
    }

    /// Water the tree. Watering an already watered tree changes nothing.
    pub fn water(&mut self) {
        self.watered = true;
    }

    /// Advance one tick
    pub fn update(&mut self, rng: &mut impl Rng) -> GrowthEvents {
        let mut events = GrowthEvents::default();
        self.sway = (self.sway + 1) % 360;

        if self.watered {
            self.growth_timer += 1;
            if self.growth_timer >= self.rules.growth_ticks {
                self.stage = self.stage.next();
                self.growth_timer = 0;
                self.watered = false;
                self.reward_pending = true;
                events.stage_advanced = true;
                debug!("Tree {:?} grew to {}", self.id.0, self.stage.label());
            }
        }

        if self.stage == GrowthStage::Mature && self.fruit.is_none() {
            self.fruit_timer += 1;
            if self.fruit_timer >= self.rules.fruit_regrow_ticks {
                self.fruit_timer = 0;
                self.grow_fruit(rng);
                events.fruited = true;
            }
        }

        events
    }

    fn grow_fruit(&mut self, rng: &mut impl Rng) {
        let leaf_radius = foliage_radius(self.stage);
        let center = self.foliage_center();
        let count = rng.random_range(self.rules.fruit_count.min..=self.rules.fruit_count.max);

        let inner = (leaf_radius * 0.3).trunc() as u32;
        let outer = (leaf_radius * 0.8).trunc() as u32;
        let positions: Vec<Position> = (0..count)
            .map(|_| {
                let radius = rng.random_range(inner..=outer) as f32;
                let angle: f32 = rng.random_range(0.5..=2.5);
                let drop = rng.random_range(5..=15) as f32;
                Position::new(
                    center.x + angle.cos() * radius,
                    center.y + angle.sin() * radius + drop,
                )
            })
            .collect();

        debug!("Tree {:?} grew {} fruit", self.id.0, positions.len());
        self.fruit = Some(positions);
    }
}
