//! Tree planting mini-game
//!
//! A row of fixed slots. The player selects a slot, plants a seed, waters
//! it and watches it grow. Every completed growth interval produces a
//! floating reward and opens an insight panel describing the new stage.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::SimConfig;
use super::effects::{RewardEffect, RewardKind};
use super::metrics::SceneMetrics;
use super::scene::{Scene, SceneKind, SceneView, TickSummary};
use super::tree::{GrowthStage, Tree};
use super::types::{IdAllocator, Position, TreeId};

/// Height above the ground at which reward effects appear
const REWARD_HEIGHT: f32 = 80.0;

/// Clickable area of a slot, centered on the slot and standing on the ground
const SLOT_HIT_WIDTH: f32 = 100.0;
const SLOT_HIT_HEIGHT: f32 = 60.0;

/// Educational text shown for a growth stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insight {
    pub title: &'static str,
    pub trigger: &'static str,
    pub fact: &'static str,
}

pub fn insight_for(stage: GrowthStage) -> Insight {
    match stage {
        GrowthStage::Seed => Insight {
            title: "Seedling appears",
            trigger: "After the seed is planted",
            fact: "A single tree can absorb up to 22 kg of CO2 per year.",
        },
        GrowthStage::Sprout => Insight {
            title: "Young tree",
            trigger: "After a few interactions such as watering",
            fact: "Green spaces can lower city temperatures by 2-4 C.",
        },
        GrowthStage::Young => Insight {
            title: "Large tree",
            trigger: "After growing fully",
            fact: "One tree produces enough oxygen for two people every day.",
        },
        GrowthStage::Mature => Insight {
            title: "Fruiting tree",
            trigger: "Final level",
            fact: "Planting trees protects not only the earth but the lives of the next generation.",
        },
    }
}

/// Timed panel describing the most recently touched tree's stage
#[derive(Debug, Clone, PartialEq)]
pub struct InsightPanel {
    visible: bool,
    timer: u32,
    duration: u32,
    stage: Option<GrowthStage>,
}

impl InsightPanel {
    fn new(duration: u32) -> Self {
        Self {
            visible: false,
            timer: 0,
            duration,
            stage: None,
        }
    }

    /// Open (or re-open) the panel for `stage`, restarting its timer
    pub fn show(&mut self, stage: GrowthStage) {
        self.visible = true;
        self.timer = 0;
        self.stage = Some(stage);
    }

    fn update(&mut self) {
        if !self.visible {
            return;
        }
        self.timer += 1;
        if self.timer > self.duration {
            self.visible = false;
            self.timer = 0;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stage(&self) -> Option<GrowthStage> {
        self.stage
    }

    /// The insight to display, if the panel is open
    pub fn current(&self) -> Option<Insight> {
        self.stage.filter(|_| self.visible).map(insight_for)
    }
}

/// The planting scene
pub struct PlantingScene<R: Rng = StdRng> {
    config: SimConfig,

    /// One entry per slot; `None` is an empty plot
    slots: Vec<Option<Tree>>,

    selected_slot: Option<usize>,

    /// Floating rewards still alive
    pub effects: Vec<RewardEffect>,

    pub insight: InsightPanel,

    ticks: u64,

    ids: IdAllocator,

    rng: R,
}

impl PlantingScene<StdRng> {
    /// Create a scene seeded from the operating system
    pub fn new(config: &SimConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a scene with a seeded RNG for reproducible runs
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PlantingScene<R> {
    pub fn with_rng(config: &SimConfig, rng: R) -> Self {
        Self {
            config: config.clone(),
            slots: vec![None; config.planting.slot_count],
            selected_slot: None,
            effects: Vec::new(),
            insight: InsightPanel::new(config.planting.insight_duration),
            ticks: 0,
            ids: IdAllocator::default(),
            rng,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<Tree>] {
        &self.slots
    }

    pub fn tree(&self, slot: usize) -> Option<&Tree> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Horizontal center of a slot
    pub fn slot_x(&self, slot: usize) -> f32 {
        self.config.planting.first_slot_x + slot as f32 * self.config.planting.slot_spacing
    }

    /// The slot whose clickable area contains `point`, if any
    pub fn slot_at(&self, point: Position) -> Option<usize> {
        let top = self.ground_y() - SLOT_HIT_HEIGHT;
        if point.y < top || point.y >= self.ground_y() {
            return None;
        }
        (0..self.slots.len()).find(|&slot| {
            let left = self.slot_x(slot) - SLOT_HIT_WIDTH / 2.0;
            left <= point.x && point.x < left + SLOT_HIT_WIDTH
        })
    }

    pub fn ground_y(&self) -> f32 {
        self.config.planting.ground_y
    }

    pub fn selected_slot(&self) -> Option<usize> {
        self.selected_slot
    }

    /// Select a slot for the `*_selected` actions. Out of range is ignored.
    pub fn select_slot(&mut self, slot: usize) -> bool {
        if slot >= self.slots.len() {
            return false;
        }
        self.selected_slot = Some(slot);
        true
    }

    /// Plant a seed into an empty slot
    pub fn plant_seed(&mut self, slot: usize) -> Option<TreeId> {
        if !matches!(self.slots.get(slot), Some(None)) {
            return None;
        }

        let id = self.ids.next_tree_id();
        let tree = Tree::new(
            id,
            self.slot_x(slot),
            self.config.planting.ground_y,
            GrowthStage::Seed,
            &self.config.growth,
            &mut self.rng,
        );
        self.slots[slot] = Some(tree);
        self.insight.show(GrowthStage::Seed);
        info!("Planted seed in slot {}", slot + 1);
        Some(id)
    }

    /// Water the tree in a slot. Empty or unknown slots are ignored.
    pub fn water_slot(&mut self, slot: usize) -> bool {
        let Some(tree) = self.slots.get_mut(slot).and_then(Option::as_mut) else {
            return false;
        };
        tree.water();
        let stage = tree.stage();
        self.insight.show(stage);
        debug!("Watered slot {}", slot + 1);
        true
    }

    /// Clear a slot, returning the id of the tree that stood there
    pub fn remove_tree(&mut self, slot: usize) -> Option<TreeId> {
        let tree = self.slots.get_mut(slot)?.take()?;
        debug!("Removed tree from slot {}", slot + 1);
        Some(tree.id)
    }

    pub fn plant_selected(&mut self) -> Option<TreeId> {
        let slot = self.selected_slot?;
        self.plant_seed(slot)
    }

    pub fn water_selected(&mut self) -> bool {
        match self.selected_slot {
            Some(slot) => self.water_slot(slot),
            None => false,
        }
    }

    pub fn remove_selected(&mut self) -> Option<TreeId> {
        let slot = self.selected_slot?;
        self.remove_tree(slot)
    }
}

impl<R: Rng> Scene for PlantingScene<R> {
    fn kind(&self) -> SceneKind {
        SceneKind::Planting
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn update(&mut self) -> TickSummary {
        self.ticks += 1;
        let mut summary = TickSummary::default();

        self.insight.update();

        let effect_life = self.config.planting.reward_effect_life;
        for tree in self.slots.iter_mut().flatten() {
            let events = tree.update(&mut self.rng);
            summary.trees_grown += usize::from(events.stage_advanced);
            summary.trees_fruited += usize::from(events.fruited);

            if tree.take_reward() {
                let at = Position::new(tree.x, tree.ground_y - REWARD_HEIGHT);
                let kind = RewardKind::random(&mut self.rng);
                self.effects
                    .push(RewardEffect::new(at, kind, effect_life, &mut self.rng));
                self.insight.show(tree.stage());
                summary.rewards_collected += 1;
            }
        }

        for effect in &mut self.effects {
            effect.update();
        }
        self.effects.retain(RewardEffect::is_alive);

        summary
    }

    fn metrics(&self) -> SceneMetrics {
        SceneMetrics::compute(
            &[],
            self.slots.iter().flatten(),
            self.config.smart_city.capacity,
            &self.config.air_quality,
        )
    }

    fn view(&self) -> SceneView<'_> {
        SceneView {
            kind: SceneKind::Planting,
            ticks: self.ticks,
            vehicles: &[],
            trees: self.slots.iter().flatten().collect(),
            signal: None,
            metrics: self.metrics(),
            road_y: None,
            viewport_width: self.config.viewport.width,
        }
    }
}
