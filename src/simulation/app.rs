//! Top-level application state
//!
//! `SimApp` owns one instance of every scene plus the menu state, routes
//! discrete commands to the active scene and advances only that scene on
//! each tick. Leaving a scene for the menu keeps its state intact.

use log::{debug, info};

use super::config::SimConfig;
use super::green_city::GreenCityScene;
use super::planting::PlantingScene;
use super::scene::{Scene, SceneKind, SceneView, TickSummary};
use super::smart_city::SmartCityScene;
use super::types::VehicleKind;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppState {
    Menu,
    SmartCity,
    Planting,
    GreenCity,
}

impl AppState {
    /// The scene shown in this state, `None` for the menu
    pub fn scene(self) -> Option<SceneKind> {
        match self {
            AppState::Menu => None,
            AppState::SmartCity => Some(SceneKind::SmartCity),
            AppState::Planting => Some(SceneKind::Planting),
            AppState::GreenCity => Some(SceneKind::GreenCity),
        }
    }
}

impl From<SceneKind> for AppState {
    fn from(kind: SceneKind) -> Self {
        match kind {
            SceneKind::SmartCity => AppState::SmartCity,
            SceneKind::Planting => AppState::Planting,
            SceneKind::GreenCity => AppState::GreenCity,
        }
    }
}

/// A discrete user command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    OpenScene(SceneKind),
    ReturnToMenu,
    AddVehicle(VehicleKind),
    /// Remove the newest vehicle of a kind, or of any kind with `None`
    RemoveVehicle(Option<VehicleKind>),
    AddTree,
    RemoveTree,
    ToggleAutoSpawn,
    SelectSlot(usize),
    PlantTree(usize),
    WaterTree(usize),
    RemoveTreeAt(usize),
    PlantSelected,
    WaterSelected,
    RemoveSelected,
}

/// The whole simulation behind the menu
pub struct SimApp {
    state: AppState,
    pub smart_city: SmartCityScene,
    pub planting: PlantingScene,
    pub green_city: GreenCityScene,
    /// Ticks spent on the menu screen, drives menu animation
    pub menu_ticks: u64,
}

impl SimApp {
    /// Create every scene with OS-seeded randomness
    pub fn new(config: &SimConfig) -> Self {
        Self::from_scenes(
            SmartCityScene::new(config),
            PlantingScene::new(config),
            GreenCityScene::new(config),
        )
    }

    /// Create every scene from one seed for reproducible runs
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self::from_scenes(
            SmartCityScene::with_seed(config, seed),
            PlantingScene::with_seed(config, seed.wrapping_add(1)),
            GreenCityScene::with_seed(config, seed.wrapping_add(2)),
        )
    }

    fn from_scenes(
        smart_city: SmartCityScene,
        planting: PlantingScene,
        green_city: GreenCityScene,
    ) -> Self {
        Self {
            state: AppState::Menu,
            smart_city,
            planting,
            green_city,
            menu_ticks: 0,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn active_scene(&self) -> Option<&dyn Scene> {
        match self.state {
            AppState::Menu => None,
            AppState::SmartCity => Some(&self.smart_city),
            AppState::Planting => Some(&self.planting),
            AppState::GreenCity => Some(&self.green_city),
        }
    }

    fn active_scene_mut(&mut self) -> Option<&mut dyn Scene> {
        match self.state {
            AppState::Menu => None,
            AppState::SmartCity => Some(&mut self.smart_city),
            AppState::Planting => Some(&mut self.planting),
            AppState::GreenCity => Some(&mut self.green_city),
        }
    }

    /// Read-only view of the active scene, `None` on the menu
    pub fn view(&self) -> Option<SceneView<'_>> {
        self.active_scene().map(|scene| scene.view())
    }

    /// Advance the active screen by one tick
    pub fn update(&mut self) -> Option<TickSummary> {
        if self.state == AppState::Menu {
            self.menu_ticks += 1;
        }
        self.active_scene_mut().map(|scene| scene.update())
    }

    /// Apply a command. Returns whether it changed anything; commands that
    /// do not apply to the active screen are ignored.
    pub fn handle(&mut self, command: Command) -> bool {
        let applied = match (self.state, command) {
            (_, Command::OpenScene(kind)) => {
                info!("Entering {}", kind.title());
                self.state = AppState::from(kind);
                true
            }
            (_, Command::ReturnToMenu) => {
                let was_in_scene = self.state != AppState::Menu;
                self.state = AppState::Menu;
                was_in_scene
            }
            (AppState::SmartCity, command) => self.handle_smart_city(command),
            (AppState::Planting, command) => self.handle_planting(command),
            (AppState::GreenCity, command) => self.handle_green_city(command),
            (AppState::Menu, _) => false,
        };

        if !applied {
            debug!("Ignored {:?} in {:?}", command, self.state);
        }
        applied
    }

    fn handle_smart_city(&mut self, command: Command) -> bool {
        let scene = &mut self.smart_city;
        match command {
            Command::AddVehicle(kind) => scene.add_vehicle(kind).is_some(),
            Command::RemoveVehicle(kind) => scene.remove_vehicle(kind).is_some(),
            Command::AddTree => {
                scene.add_tree();
                true
            }
            Command::RemoveTree => scene.remove_tree().is_some(),
            Command::ToggleAutoSpawn => {
                scene.toggle_auto_spawn();
                true
            }
            _ => false,
        }
    }

    fn handle_planting(&mut self, command: Command) -> bool {
        let scene = &mut self.planting;
        match command {
            Command::SelectSlot(slot) => scene.select_slot(slot),
            Command::PlantTree(slot) => scene.plant_seed(slot).is_some(),
            Command::WaterTree(slot) => scene.water_slot(slot),
            Command::RemoveTreeAt(slot) => scene.remove_tree(slot).is_some(),
            Command::PlantSelected => scene.plant_selected().is_some(),
            Command::WaterSelected => scene.water_selected(),
            Command::RemoveSelected => scene.remove_selected().is_some(),
            _ => false,
        }
    }

    fn handle_green_city(&mut self, command: Command) -> bool {
        let scene = &mut self.green_city;
        match command {
            Command::AddTree => {
                scene.add_tree();
                true
            }
            Command::RemoveTree => scene.remove_tree().is_some(),
            _ => false,
        }
    }
}
