//! World setup systems for camera and overlay text

use bevy::prelude::*;

use super::components::{HudText, InsightText, MainCamera};

/// System to setup the camera and the text overlays
pub fn setup_world(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));

    commands.spawn((
        HudText,
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
    ));

    commands.spawn((
        InsightText,
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgb(0.1, 0.35, 0.1)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            right: Val::Px(12.0),
            max_width: Val::Px(360.0),
            ..default()
        },
    ));
}
