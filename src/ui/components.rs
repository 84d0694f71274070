//! UI components and resources for linking Bevy to the simulation

use bevy::prelude::*;

use crate::simulation::{SimApp, ViewportConfig};

/// Resource wrapper for the simulation app
#[derive(Resource)]
pub struct SimAppResource {
    pub app: SimApp,
    pub viewport: ViewportConfig,
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for the heads-up text showing metrics and hints
#[derive(Component)]
pub struct HudText;

/// Marker for the insight panel text in the planting scene
#[derive(Component)]
pub struct InsightText;
