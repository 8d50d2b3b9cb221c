use std::{path::PathBuf, time::Duration};

use anyhow::{bail, ensure, Result};
use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use clap::Parser;

use happy_beam::interaction::input::autopilot::{Autopilot, AutopilotPlugin};
use happy_beam::interaction::session::auto_close::AutoClosePlugin;
use happy_beam::{AssetsReady, GameConfig, GamePlugin, InputKind};

#[derive(Parser, Debug)]
#[command(about = "Run Happy Beam sessions headless with an autopilot player", version)]
struct Args {
    /// RON config layers; later files override earlier ones.
    #[arg(long = "config", default_values = ["assets/config/game.ron", "assets/config/game.local.ron"])]
    configs: Vec<PathBuf>,
    /// Seed for hit sounds and the autopilot (overrides app.rng_seed).
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 0.6)]
    hit_chance: f64,
    #[arg(long, default_value_t = 1)]
    rounds: u32,
    #[arg(long, value_enum, default_value_t = InputKind::Hands)]
    input: InputKind,
    /// Print the round summary as JSON.
    #[arg(long)]
    json: bool,
}

/// Config loading outcome, logged once the log plugin is up.
#[derive(Resource, Debug, Default)]
struct ConfigReport {
    used: Vec<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(
        (0.0..=1.0).contains(&args.hit_chance),
        "--hit-chance must be within 0..=1 (got {})",
        args.hit_chance
    );
    ensure!(args.rounds > 0, "--rounds must be at least 1");

    let (mut cfg, used, errors) = GameConfig::load_layered(&args.configs);
    if let Some(parse_err) = errors.iter().find(|e| e.contains("parse error")) {
        bail!("invalid config {parse_err}");
    }
    if args.seed.is_some() {
        cfg.app.rng_seed = args.seed;
    }
    let report = ConfigReport {
        used,
        errors,
        warnings: cfg.validate(),
    };

    let exit = App::new()
        .insert_resource(cfg)
        .insert_resource(report)
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(GamePlugin)
        .add_plugins(AutopilotPlugin(Autopilot {
            input: args.input,
            hit_chance: args.hit_chance,
            ..default()
        }))
        .add_plugins(AutoClosePlugin {
            rounds: args.rounds,
            json: args.json,
        })
        .add_systems(Startup, (log_config_report, load_headless_assets))
        .run();

    match exit {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => bail!("app exited with code {code}"),
    }
}

fn log_config_report(report: Res<ConfigReport>) {
    if report.used.is_empty() {
        warn!(target: "config", "No config file found; using defaults");
    }
    for path in &report.used {
        info!(target: "config", "Loaded {path}");
    }
    for e in &report.errors {
        debug!(target: "config", "{e}");
    }
    for w in &report.warnings {
        warn!(target: "config", "{w}");
    }
}

/// Headless scene has nothing to load; report ready straight away.
fn load_headless_assets(mut ready: EventWriter<AssetsReady>) {
    ready.write(AssetsReady);
}
