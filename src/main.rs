use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use eco_city_sim::simulation::{Command, SceneKind, SimApp, SimConfig};

/// Default log filter when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "warn,eco_city_sim=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SceneArg {
    Smart,
    Planting,
    Green,
}

impl From<SceneArg> for SceneKind {
    fn from(arg: SceneArg) -> Self {
        match arg {
            SceneArg::Smart => SceneKind::SmartCity,
            SceneArg::Planting => SceneKind::Planting,
            SceneArg::Green => SceneKind::GreenCity,
        }
    }
}

#[derive(Parser)]
#[command(name = "eco_city_sim")]
#[command(about = "City traffic and tree growth simulation with optional UI")]
struct Cli {
    /// Run with the Bevy game engine UI
    #[arg(long)]
    ui: bool,

    /// Scene to run in headless mode
    #[arg(long, value_enum, default_value = "smart")]
    scene: SceneArg,

    /// Number of simulation ticks to run in headless mode
    #[arg(long, default_value = "1200")]
    ticks: u64,

    /// Print a summary and lane map every N ticks
    #[arg(long, default_value = "60")]
    report_every: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Planting scene only: plant every slot, then water all trees every N ticks
    #[arg(long)]
    water_every: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };

    if cli.ui {
        #[cfg(feature = "ui")]
        {
            run_with_ui(config, cli.seed);
            Ok(())
        }
        #[cfg(not(feature = "ui"))]
        {
            anyhow::bail!("UI feature is not enabled. Rebuild with --features ui");
        }
    } else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
        )
        .init();
        run_headless(&cli, &config)
    }
}

/// Run one scene in headless mode (no graphics)
fn run_headless(cli: &Cli, config: &SimConfig) -> Result<()> {
    anyhow::ensure!(cli.report_every > 0, "--report-every must be at least 1");
    if let Some(0) = cli.water_every {
        anyhow::bail!("--water-every must be at least 1");
    }

    let kind = SceneKind::from(cli.scene);
    let mut app = match cli.seed {
        Some(seed) => SimApp::with_seed(config, seed),
        None => SimApp::new(config),
    };
    app.handle(Command::OpenScene(kind));

    println!("Running {} in headless mode...", kind.title());
    println!("Ticks: {}, report every {} ticks", cli.ticks, cli.report_every);
    println!();

    if kind == SceneKind::Planting && cli.water_every.is_some() {
        for slot in 0..app.planting.slot_count() {
            app.handle(Command::PlantTree(slot));
        }
    }

    println!("Initial state:");
    report(&app);

    for tick in 1..=cli.ticks {
        if let Some(every) = cli.water_every {
            if kind == SceneKind::Planting && tick % every == 0 {
                for slot in 0..app.planting.slot_count() {
                    app.handle(Command::WaterTree(slot));
                }
            }
        }

        if let Some(summary) = app.update() {
            if summary.rewards_collected > 0 {
                info!("Tick {}: {} reward(s) collected", tick, summary.rewards_collected);
            }
        }

        if tick % cli.report_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ---", tick);
            report(&app);
        }
    }

    println!("=== Final State ===");
    report(&app);
    Ok(())
}

fn report(app: &SimApp) {
    if let Some(view) = app.view() {
        view.print_summary();
        if view.kind != SceneKind::Planting {
            view.draw_lane_map();
        }
        println!();
    }
}

#[cfg(feature = "ui")]
fn run_with_ui(config: SimConfig, seed: Option<u64>) {
    use bevy::log::LogPlugin;
    use bevy::prelude::*;

    println!("Starting Eco City UI...");
    println!();
    println!("Controls:");
    println!("  1/2/3       - Open Smart City / Tree Planting / Green City (from menu)");
    println!("  ESC         - Return to menu");
    println!("  A/S         - Smart City: add car / bus");
    println!("  Z/X         - Smart City: remove car / bus");
    println!("  D/C         - Smart City: add / remove tree");
    println!("  Space       - Smart City: toggle auto spawn");
    println!("  1-8, click  - Tree Planting: select slot");
    println!("  P/W/R       - Tree Planting: plant / water / remove in selected slot");
    println!("  T/Y         - Green City: add / remove tree");
    println!();

    let width = config.viewport.width as u32;
    let height = config.viewport.height as u32;

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(LogPlugin {
                    filter: DEFAULT_LOG_FILTER.to_string(),
                    level: bevy::log::Level::DEBUG,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Eco City".into(),
                        resolution: (width, height).into(),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins(eco_city_sim::ui::EcoCityUiPlugin { config, seed })
        .run();
}
