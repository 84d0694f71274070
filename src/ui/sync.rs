//! Systems for ticking the simulation and drawing its state

use bevy::prelude::*;

use super::components::{HudText, InsightText, SimAppResource};
use crate::simulation::{
    foliage_radius, AppState, Position, RewardKind, SignalPhase, Tree, Vehicle, VehicleKind,
    ViewportConfig, WalkerKind,
};

const ROAD_COLOR: Color = Color::srgb(0.25, 0.25, 0.28);
const LANE_COLOR: Color = Color::srgb(0.9, 0.9, 0.9);
const GROUND_COLOR: Color = Color::srgb(0.45, 0.3, 0.15);
const TRUNK_COLOR: Color = Color::srgb(0.4, 0.25, 0.1);
const FOLIAGE_COLOR: Color = Color::srgb(0.2, 0.6, 0.2);
const FRUIT_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);
const CAR_COLOR: Color = Color::srgb(0.8, 0.2, 0.2);
const BUS_COLOR: Color = Color::srgb(0.95, 0.75, 0.1);

/// System to run one simulation tick
pub fn tick_simulation(mut sim: ResMut<SimAppResource>) {
    sim.app.update();
}

/// Converts screen-style coordinates (origin top left, y down) into the
/// centered, y-up space of the 2D camera
fn to_world(viewport: &ViewportConfig, position: Position) -> Vec2 {
    Vec2::new(
        position.x - viewport.width / 2.0,
        viewport.height / 2.0 - position.y,
    )
}

fn draw_road(gizmos: &mut Gizmos, viewport: &ViewportConfig, road_y: f32, height: f32) {
    let center = to_world(viewport, Position::new(viewport.width / 2.0, road_y));
    gizmos.rect_2d(
        Isometry2d::from_translation(center),
        Vec2::new(viewport.width, height),
        ROAD_COLOR,
    );
}

fn draw_vehicle(gizmos: &mut Gizmos, viewport: &ViewportConfig, vehicle: &Vehicle) {
    let color = match vehicle.kind {
        VehicleKind::Car => CAR_COLOR,
        VehicleKind::Bus => BUS_COLOR,
        VehicleKind::Bike => LANE_COLOR,
    };
    gizmos.rect_2d(
        Isometry2d::from_translation(to_world(viewport, vehicle.position)),
        Vec2::new(vehicle.width, vehicle.height),
        color,
    );

    if let Some(exhaust) = &vehicle.exhaust {
        for particle in &exhaust.particles {
            gizmos.circle_2d(
                Isometry2d::from_translation(to_world(viewport, particle.position)),
                3.0,
                Color::srgba(0.5, 0.5, 0.5, particle.opacity()),
            );
        }
    }
}

fn draw_tree(gizmos: &mut Gizmos, viewport: &ViewportConfig, tree: &Tree) {
    let base = to_world(viewport, tree.base());
    let center = to_world(viewport, tree.foliage_center());
    gizmos.line_2d(base, center, TRUNK_COLOR);
    gizmos.circle_2d(
        Isometry2d::from_translation(center),
        foliage_radius(tree.stage()),
        FOLIAGE_COLOR,
    );
    for fruit in tree.fruit_positions() {
        gizmos.circle_2d(
            Isometry2d::from_translation(to_world(viewport, *fruit)),
            4.0,
            FRUIT_COLOR,
        );
    }
}

/// System to draw the active scene with gizmos
pub fn draw_scene(mut gizmos: Gizmos, sim: Res<SimAppResource>) {
    let viewport = &sim.viewport;
    let app = &sim.app;

    match app.state() {
        AppState::Menu => {
            // A slowly turning sun behind the menu text
            let t = app.menu_ticks as f32 / 60.0;
            let sun = Vec2::new(0.0, 120.0);
            gizmos.circle_2d(Isometry2d::from_translation(sun), 60.0, BUS_COLOR);
            for i in 0..12 {
                let angle = t + i as f32 * std::f32::consts::TAU / 12.0;
                let dir = Vec2::from_angle(angle);
                gizmos.line_2d(sun + dir * 70.0, sun + dir * 95.0, BUS_COLOR);
            }
        }
        AppState::SmartCity => {
            let scene = &app.smart_city;
            draw_road(&mut gizmos, viewport, scene.config().smart_city.road_y, 60.0);
            for lane in scene.lanes() {
                let y = to_world(viewport, Position::new(0.0, lane)).y;
                gizmos.line_2d(
                    Vec2::new(-viewport.width / 2.0, y),
                    Vec2::new(viewport.width / 2.0, y),
                    LANE_COLOR.with_alpha(0.2),
                );
            }

            let signal = &scene.signal;
            let color = match signal.phase() {
                SignalPhase::Green => Color::srgb(0.1, 0.8, 0.2),
                SignalPhase::Yellow => Color::srgb(0.95, 0.8, 0.1),
                SignalPhase::Red => Color::srgb(0.9, 0.1, 0.1),
            };
            let glow = 12.0 + (signal.glow as f32).to_radians().sin() * 2.0;
            gizmos.circle_2d(
                Isometry2d::from_translation(to_world(viewport, signal.position)),
                glow,
                color,
            );

            for tree in &scene.trees {
                draw_tree(&mut gizmos, viewport, tree);
            }
            for vehicle in &scene.vehicles {
                draw_vehicle(&mut gizmos, viewport, vehicle);
            }
        }
        AppState::Planting => {
            let scene = &app.planting;
            let ground = to_world(viewport, Position::new(0.0, scene.ground_y())).y;
            gizmos.line_2d(
                Vec2::new(-viewport.width / 2.0, ground),
                Vec2::new(viewport.width / 2.0, ground),
                GROUND_COLOR,
            );

            for slot in 0..scene.slot_count() {
                let at = to_world(viewport, Position::new(scene.slot_x(slot), scene.ground_y()));
                let color = if scene.selected_slot() == Some(slot) {
                    BUS_COLOR
                } else {
                    GROUND_COLOR
                };
                gizmos.rect_2d(Isometry2d::from_translation(at), Vec2::new(60.0, 12.0), color);
            }

            for tree in scene.slots().iter().flatten() {
                draw_tree(&mut gizmos, viewport, tree);
            }

            for effect in &scene.effects {
                let at = to_world(viewport, effect.position);
                let color = match effect.kind {
                    RewardKind::Star => Color::srgb(1.0, 0.85, 0.2),
                    RewardKind::Butterfly => Color::srgb(0.7, 0.4, 0.9),
                    RewardKind::Rainbow => Color::srgb(0.3, 0.7, 1.0),
                };
                gizmos.circle_2d(Isometry2d::from_translation(at), 8.0, color);
            }
        }
        AppState::GreenCity => {
            let scene = &app.green_city;
            draw_road(&mut gizmos, viewport, scene.road_y(), 50.0);

            for tree in &scene.trees {
                draw_tree(&mut gizmos, viewport, tree);
            }
            for walker in &scene.walkers {
                let radius = match walker.kind {
                    WalkerKind::Pedestrian => 5.0,
                    WalkerKind::Cyclist => 7.0,
                };
                gizmos.circle_2d(
                    Isometry2d::from_translation(to_world(viewport, walker.position)),
                    radius,
                    LANE_COLOR,
                );
            }
            for vehicle in &scene.vehicles {
                draw_vehicle(&mut gizmos, viewport, vehicle);
            }
            for bird in &scene.birds {
                let at = to_world(viewport, bird.position);
                let flap = (bird.wing as f32).to_radians().sin() * 5.0;
                gizmos.line_2d(at, at + Vec2::new(-8.0, flap), ROAD_COLOR);
                gizmos.line_2d(at, at + Vec2::new(8.0, flap), ROAD_COLOR);
            }
        }
    }
}

/// System to refresh the overlay text from the active scene
pub fn update_hud_text(
    sim: Res<SimAppResource>,
    mut hud: Query<&mut Text, (With<HudText>, Without<InsightText>)>,
    mut insight: Query<&mut Text, (With<InsightText>, Without<HudText>)>,
) {
    let app = &sim.app;

    let hud_text = match app.view() {
        None => "Eco City\n\n1 - Smart City Traffic\n2 - Tree Planting\n3 - Green City\nESC - Quit"
            .to_string(),
        Some(view) => {
            let m = &view.metrics;
            let mut lines = vec![
                view.kind.title().to_string(),
                format!("Air quality: {:.0}%", m.air_quality * 100.0),
                format!("Trees: {} (power {:.1})", m.trees, m.tree_power),
            ];
            if let Some(signal) = view.signal {
                lines.push(format!("Signal: {}", signal.phase().label()));
            }
            if app.state() != AppState::Planting {
                lines.push(format!(
                    "Vehicles: {} (cars {}, buses {}), people {}",
                    m.total_vehicles, m.cars, m.buses, m.occupants
                ));
                lines.push(format!("Congestion: {:.0}%", m.congestion_ratio * 100.0));
                if m.is_congested() {
                    lines.push("Traffic is congested!".to_string());
                }
            }
            match app.state() {
                AppState::SmartCity => lines.push(format!(
                    "Auto spawn: {}",
                    if app.smart_city.auto_spawn() { "on" } else { "off" }
                )),
                AppState::Planting => lines.push(match app.planting.selected_slot() {
                    Some(slot) => format!("Selected slot: {}", slot + 1),
                    None => "Select a slot with 1-8 or a click".to_string(),
                }),
                _ => {}
            }
            lines.push("ESC - Menu".to_string());
            lines.join("\n")
        }
    };

    for mut text in &mut hud {
        text.0.clone_from(&hud_text);
    }

    let insight_text = match (app.state(), app.planting.insight.current()) {
        (AppState::Planting, Some(insight)) => {
            format!("{}\n{}\n\n{}", insight.title, insight.trigger, insight.fact)
        }
        _ => String::new(),
    };
    for mut text in &mut insight {
        text.0.clone_from(&insight_text);
    }
}
