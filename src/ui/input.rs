//! Input handling systems

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::components::SimAppResource;
use crate::simulation::{AppState, Command, Position, SceneKind, VehicleKind};

const SLOT_KEYS: [KeyCode; 8] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
];

/// Translate key presses into simulation commands for the active screen
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim: ResMut<SimAppResource>,
    mut exit: MessageWriter<AppExit>,
) {
    let state = sim.app.state();

    if keyboard.just_pressed(KeyCode::Escape) {
        if state == AppState::Menu {
            exit.write(AppExit::Success);
        } else {
            sim.app.handle(Command::ReturnToMenu);
        }
        return;
    }

    let commands = match state {
        AppState::Menu => menu_commands(&keyboard),
        AppState::SmartCity => smart_city_commands(&keyboard),
        AppState::Planting => planting_commands(&keyboard),
        AppState::GreenCity => green_city_commands(&keyboard),
    };

    for command in commands {
        sim.app.handle(command);
    }
}

fn menu_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<Command> {
    [
        (KeyCode::Digit1, SceneKind::SmartCity),
        (KeyCode::Digit2, SceneKind::Planting),
        (KeyCode::Digit3, SceneKind::GreenCity),
    ]
    .into_iter()
    .filter(|(key, _)| keyboard.just_pressed(*key))
    .map(|(_, kind)| Command::OpenScene(kind))
    .take(1)
    .collect()
}

fn smart_city_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<Command> {
    [
        (KeyCode::KeyA, Command::AddVehicle(VehicleKind::Car)),
        (KeyCode::KeyS, Command::AddVehicle(VehicleKind::Bus)),
        (KeyCode::KeyZ, Command::RemoveVehicle(Some(VehicleKind::Car))),
        (KeyCode::KeyX, Command::RemoveVehicle(Some(VehicleKind::Bus))),
        (KeyCode::KeyD, Command::AddTree),
        (KeyCode::KeyC, Command::RemoveTree),
        (KeyCode::Space, Command::ToggleAutoSpawn),
    ]
    .into_iter()
    .filter(|(key, _)| keyboard.just_pressed(*key))
    .map(|(_, command)| command)
    .collect()
}

fn planting_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<Command> {
    let mut commands: Vec<Command> = SLOT_KEYS
        .iter()
        .enumerate()
        .filter(|(_, key)| keyboard.just_pressed(**key))
        .map(|(slot, _)| Command::SelectSlot(slot))
        .collect();

    commands.extend(
        [
            (KeyCode::KeyP, Command::PlantSelected),
            (KeyCode::KeyW, Command::WaterSelected),
            (KeyCode::KeyR, Command::RemoveSelected),
        ]
        .into_iter()
        .filter(|(key, _)| keyboard.just_pressed(*key))
        .map(|(_, command)| command),
    );
    commands
}

fn green_city_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<Command> {
    [
        (KeyCode::KeyT, Command::AddTree),
        (KeyCode::KeyY, Command::RemoveTree),
    ]
    .into_iter()
    .filter(|(key, _)| keyboard.just_pressed(*key))
    .map(|(_, command)| command)
    .collect()
}

/// Select a planting slot by clicking on it
pub fn handle_slot_click(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sim: ResMut<SimAppResource>,
) {
    if sim.app.state() != AppState::Planting || !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    // Window cursor coordinates share the simulation's top-left origin but
    // may be scaled when the window was resized
    let point = Position::new(
        cursor.x * sim.viewport.width / window.width(),
        cursor.y * sim.viewport.height / window.height(),
    );
    let clicked = sim.app.planting.slot_at(point);
    if let Some(slot) = clicked {
        sim.app.handle(Command::SelectSlot(slot));
    }
}
