//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI ticks `SimApp` on a fixed 60 Hz schedule, draws the active scene
//! with 2D gizmos and forwards key presses as commands.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::SimAppResource;

use crate::simulation::{SimApp, SimConfig};
use input::{handle_input, handle_slot_click};
use sync::{draw_scene, tick_simulation, update_hud_text};
use world::setup_world;

/// Plugin to register all UI systems
pub struct EcoCityUiPlugin {
    pub config: SimConfig,
    /// Seed for reproducible runs, OS randomness when `None`
    pub seed: Option<u64>,
}

impl Plugin for EcoCityUiPlugin {
    fn build(&self, app: &mut App) {
        let sim = match self.seed {
            Some(seed) => SimApp::with_seed(&self.config, seed),
            None => SimApp::new(&self.config),
        };

        app.insert_resource(SimAppResource {
            app: sim,
            viewport: self.config.viewport.clone(),
        })
        .insert_resource(Time::<Fixed>::from_hz(f64::from(self.config.viewport.fps)))
        .insert_resource(ClearColor(Color::srgb(0.75, 0.88, 0.95)))
        .add_systems(Startup, setup_world)
        .add_systems(FixedUpdate, tick_simulation)
        .add_systems(Update, (handle_input, handle_slot_click, draw_scene, update_hud_text).chain());
    }
}
