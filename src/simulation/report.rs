//! Console output for headless runs

use super::scene::{SceneKind, SceneView};
use super::types::VehicleKind;

/// Characters across the console lane map
const MAP_COLUMNS: usize = 96;

impl SceneView<'_> {
    /// Print the state of the scene in a human readable form
    pub fn print_summary(&self) {
        let m = &self.metrics;
        println!("=== {} ===", self.kind.title());
        println!("Ticks: {}", self.ticks);

        if let Some(signal) = self.signal {
            println!(
                "Signal: {} ({}/{} ticks)",
                signal.phase().label(),
                signal.elapsed(),
                signal.durations().get(signal.phase())
            );
        }

        if self.kind != SceneKind::Planting {
            println!(
                "Vehicles: {} (cars={}, buses={}), occupants={}",
                m.total_vehicles, m.cars, m.buses, m.occupants
            );
            println!(
                "Congestion: {:.0}% of {}{}",
                m.congestion_ratio * 100.0,
                m.capacity,
                if m.is_congested() { "  [CONGESTED]" } else { "" }
            );
        }
        println!("Trees: {}, tree power={:.1}", m.trees, m.tree_power);
        println!("Air quality: {:.0}%", m.air_quality * 100.0);
        println!();

        if !self.trees.is_empty() {
            println!("--- Trees ---");
            for tree in &self.trees {
                println!(
                    "  Tree {:?}: x={:.0}, stage={}, watered={}, fruit={}",
                    tree.id.0,
                    tree.x,
                    tree.stage().label(),
                    tree.is_watered(),
                    tree.fruit_positions().len()
                );
            }
        }

        if !self.vehicles.is_empty() {
            println!("--- Vehicles ---");
            for vehicle in self.vehicles {
                println!(
                    "  {} {:?}: x={:.1}, lane={:.0}, speed={:.2}, passengers={}",
                    vehicle.kind.label(),
                    vehicle.id.0,
                    vehicle.position.x,
                    vehicle.lane(),
                    vehicle.speed(),
                    vehicle.passengers
                );
            }
        }
    }

    /// Draw a one-line-per-lane ASCII strip of the road.
    ///
    /// `C` is a car, `B` a bus, `|` the signal stop line with its phase
    /// letter above it, and digits on the tree row are growth stages.
    pub fn draw_lane_map(&self) {
        let width = self.viewport_width.max(1.0);
        let to_col = |x: f32| -> Option<usize> {
            if x < 0.0 || x >= width {
                return None;
            }
            let col = ((x / width) * MAP_COLUMNS as f32) as usize;
            Some(col.min(MAP_COLUMNS - 1))
        };

        let mut tree_row = vec![' '; MAP_COLUMNS];
        for tree in &self.trees {
            if let Some(col) = to_col(tree.x) {
                tree_row[col] = char::from(b'0' + tree.stage().index());
            }
        }

        let mut lanes: Vec<f32> = self.vehicles.iter().map(|v| v.lane()).collect();
        if let Some(road_y) = self.road_y {
            lanes.push(road_y);
        }
        lanes.sort_by(f32::total_cmp);
        lanes.dedup();
        // A lone road center is only kept when no vehicle lane exists
        if lanes.len() > 1 {
            if let Some(road_y) = self.road_y {
                if !self.vehicles.iter().any(|v| v.lane() == road_y) {
                    lanes.retain(|&y| y != road_y);
                }
            }
        }

        let signal_col = self.signal.and_then(|s| to_col(s.position.x));

        println!("+{}+", "-".repeat(MAP_COLUMNS));
        println!("|{}|", tree_row.iter().collect::<String>());

        if let (Some(signal), Some(col)) = (self.signal, signal_col) {
            let mut row = vec![' '; MAP_COLUMNS];
            row[col] = signal.phase().label().chars().next().unwrap_or('?');
            println!("|{}|", row.iter().collect::<String>());
        }

        for lane in lanes {
            let mut row = vec!['.'; MAP_COLUMNS];
            if let Some(col) = signal_col {
                row[col] = '|';
            }
            for vehicle in self.vehicles.iter().filter(|v| v.lane() == lane) {
                if let Some(col) = to_col(vehicle.position.x) {
                    row[col] = match vehicle.kind {
                        VehicleKind::Car => 'C',
                        VehicleKind::Bus => 'B',
                        VehicleKind::Bike => 'b',
                    };
                }
            }
            println!("|{}| y={:.0}", row.iter().collect::<String>(), lane);
        }
        println!("+{}+", "-".repeat(MAP_COLUMNS));
    }
}
