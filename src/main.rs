//! A headless 2D flight simulator.
//!
//! Loads a scenario (a JSON file given as the first argument, or the built-in
//! demo), flies the player ship through it on a fixed timestep and logs
//! telemetry along the way.

use std::{path::Path, time::Duration};

use bevy::{app::ScheduleRunnerPlugin, log::LogPlugin, prelude::*};
use flight_control::FlightControlPlugin;

// Recommended alias.
extern crate nalgebra as na;

mod scenario;
mod ship;
mod telemetry;

use scenario::Scenario;
use ship::ShipPlugin;
use telemetry::TelemetryPlugin;

fn main() -> anyhow::Result<()> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => Scenario::load(Path::new(&path))?,
        None => Scenario::demo(),
    };
    // Validates the settings too, so the tick rate below is positive.
    let loadout = scenario.loadout()?;
    let tick = Duration::from_secs_f64(1.0 / scenario.settings.ticks_per_second);

    let exit = App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)))
        .add_plugins(LogPlugin::default())
        .add_plugins(FlightControlPlugin::new(scenario.settings.clone()))
        .add_plugins(ShipPlugin::new(scenario, loadout))
        .add_plugins(TelemetryPlugin)
        .run();

    if let AppExit::Error(code) = exit {
        anyhow::bail!("simulation exited with code {code}");
    }
    Ok(())
}
