//! Scenario files: who flies, with what engine, and which commands.

use std::path::Path;

use anyhow::Context;
use bevy::prelude::*;
use flight_control::{Engine, EngineProfile, FlightSettings, PilotInput, Pose};
use serde::{Deserialize, Serialize};

/// A complete flight to run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub settings: FlightSettings,
    pub engine: EngineProfile,
    pub start: StartPose,
    pub maneuvers: Vec<Maneuver>,
    /// Replace the engine mid-flight.
    pub upgrade: Option<Upgrade>,
    /// Log telemetry every this many ticks.
    pub report_every: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StartPose {
    /// World position; must have two coordinates.
    pub position: Vec<f64>,
    pub orientation: f64,
}

/// Hold `input` for `ticks` ticks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Maneuver {
    pub ticks: u64,
    #[serde(default)]
    pub input: PilotInput,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Upgrade {
    pub at_tick: u64,
    pub engine: EngineProfile,
}

impl Default for StartPose {
    fn default() -> Self {
        StartPose {
            position: vec![0.0, 0.0],
            orientation: 0.0,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            settings: FlightSettings::default(),
            engine: EngineProfile::default(),
            start: StartPose::default(),
            maneuvers: Vec::new(),
            upgrade: None,
            report_every: 30,
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Strafe, turn, burn, coast, then stabilize, with an engine upgrade
    /// halfway through.
    pub fn demo() -> Self {
        let maneuver = |ticks, input| Maneuver { ticks, input };
        Scenario {
            maneuvers: vec![
                maneuver(
                    60,
                    PilotInput {
                        movement_width: 1.0,
                        ..Default::default()
                    },
                ),
                maneuver(
                    90,
                    PilotInput {
                        orientation: 90.0,
                        orientation_strength: 1.0,
                        ..Default::default()
                    },
                ),
                maneuver(
                    120,
                    PilotInput {
                        burst: 0.8,
                        orientation: 90.0,
                        orientation_strength: 1.0,
                        ..Default::default()
                    },
                ),
                maneuver(60, PilotInput::default()),
                maneuver(
                    240,
                    PilotInput {
                        stabilize: true,
                        ..Default::default()
                    },
                ),
            ],
            upgrade: Some(Upgrade {
                at_tick: 300,
                engine: EngineProfile {
                    max_maneuver_acceleration: 1.5,
                    time_for_one_rotation: 0.6,
                    ..Default::default()
                },
            }),
            ..Default::default()
        }
    }

    /// Validate the scenario and build everything the player ship needs.
    pub fn loadout(&self) -> anyhow::Result<PlayerLoadout> {
        self.settings.validate().context("invalid flight settings")?;
        let pose = Pose::try_from_slice(&self.start.position, self.start.orientation)
            .context("invalid start pose")?;
        let engine = Engine::new(self.engine.clone(), &self.settings).context("invalid engine")?;
        let upgrade = match &self.upgrade {
            Some(upgrade) if upgrade.at_tick >= self.total_ticks() => {
                anyhow::bail!(
                    "upgrade at tick {} comes after the last maneuver ends at tick {}",
                    upgrade.at_tick,
                    self.total_ticks()
                );
            }
            Some(upgrade) => Some(ScheduledUpgrade {
                at_tick: upgrade.at_tick,
                engine: Engine::new(upgrade.engine.clone(), &self.settings)
                    .context("invalid upgrade engine")?,
            }),
            None => None,
        };
        Ok(PlayerLoadout {
            pose,
            engine,
            upgrade,
        })
    }

    /// Saturates rather than overflowing on absurd plans.
    pub fn total_ticks(&self) -> u64 {
        self.maneuvers
            .iter()
            .fold(0, |total, m| total.saturating_add(m.ticks))
    }

    /// The command held at `tick`, or `None` once the plan is exhausted.
    pub fn input_at(&self, tick: u64) -> Option<&PilotInput> {
        let mut start: u64 = 0;
        for maneuver in &self.maneuvers {
            let end = start.saturating_add(maneuver.ticks);
            if tick < end {
                return Some(&maneuver.input);
            }
            start = end;
        }
        None
    }
}

/// The validated player ship, ready to spawn.
#[derive(Resource, Clone, Debug)]
pub struct PlayerLoadout {
    pub pose: Pose,
    pub engine: Engine,
    pub upgrade: Option<ScheduledUpgrade>,
}

#[derive(Clone, Debug)]
pub struct ScheduledUpgrade {
    pub at_tick: u64,
    pub engine: Engine,
}
