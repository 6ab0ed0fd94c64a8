//! The player's ship and the scripted pilot flying it.
//!
//! Flight physics lives in the `flight-control` crate. This module spawns the
//! ship from a validated loadout and feeds it commands from the flight plan.

use bevy::prelude::*;
use flight_control::{FlightSet, FlightSettings, PilotInput, vehicle_bundle};

use crate::scenario::{PlayerLoadout, Scenario};

#[derive(Component)]
pub struct PlayerShip;

/// The scripted commands and how far through them we are.
#[derive(Resource, Debug)]
pub struct FlightPlan {
    scenario: Scenario,
    total_ticks: u64,
    tick: u64,
}

impl FlightPlan {
    pub fn new(scenario: Scenario) -> Self {
        let total_ticks = scenario.total_ticks();
        FlightPlan {
            scenario,
            total_ticks,
            tick: 0,
        }
    }

    /// Ticks flown so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.tick >= self.total_ticks
    }

    pub fn report_every(&self) -> u64 {
        self.scenario.report_every
    }
}

/// Plugin to spawn the player ship and fly it through a scenario.
pub struct ShipPlugin {
    scenario: Scenario,
    loadout: PlayerLoadout,
}

impl ShipPlugin {
    pub fn new(scenario: Scenario, loadout: PlayerLoadout) -> Self {
        ShipPlugin { scenario, loadout }
    }
}

impl Plugin for ShipPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.loadout.clone());
        app.insert_resource(FlightPlan::new(self.scenario.clone()));
        app.add_systems(Startup, setup_ship);
        app.add_systems(FixedUpdate, fly_flight_plan.before(FlightSet));
    }
}

fn setup_ship(
    loadout: Res<PlayerLoadout>,
    settings: Res<FlightSettings>,
    mut commands: Commands,
) -> bevy::ecs::error::Result {
    let bundle = vehicle_bundle(
        loadout.pose.clone(),
        loadout.engine.clone(),
        settings.dynamics,
        &settings,
    )?;
    commands.spawn((Name::new("PlayerShip"), bundle, PlayerShip));
    info!(
        "player ship at {:?} heading {:.1}",
        loadout.pose.position,
        loadout.pose.orientation()
    );
    Ok(())
}

/// Hand the ship the command for this tick, and swap its engine when the
/// plan says so.
fn fly_flight_plan(
    mut plan: ResMut<FlightPlan>,
    loadout: Res<PlayerLoadout>,
    mut ships: Query<(Entity, &mut PilotInput), With<PlayerShip>>,
    mut commands: Commands,
) {
    let tick = plan.tick;
    let Some(input) = plan.scenario.input_at(tick).cloned() else {
        return;
    };

    for (entity, mut pilot) in ships.iter_mut() {
        if *pilot != input {
            info!("tick {tick}: pilot command {input:?}");
            *pilot = input.clone();
        }
        if let Some(upgrade) = &loadout.upgrade
            && upgrade.at_tick == tick
        {
            info!("tick {tick}: installing upgraded engine {:?}", upgrade.engine.profile());
            commands.entity(entity).insert(upgrade.engine.clone());
        }
    }

    plan.tick += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Maneuver, Upgrade};
    use flight_control::{EngineProfile, FlightControlPlugin, MotionState, Pose};

    fn scenario() -> Scenario {
        Scenario {
            maneuvers: vec![
                Maneuver {
                    ticks: 3,
                    input: PilotInput {
                        movement_height: 1.0,
                        ..Default::default()
                    },
                },
                Maneuver {
                    ticks: 2,
                    input: PilotInput::default(),
                },
            ],
            upgrade: Some(Upgrade {
                at_tick: 2,
                engine: EngineProfile {
                    time_for_one_rotation: 2.0,
                    ..Default::default()
                },
            }),
            ..Scenario::demo()
        }
    }

    fn app(scenario: Scenario) -> App {
        let loadout = scenario.loadout().unwrap();
        let mut app = App::new();
        app.add_plugins(FlightControlPlugin::new(scenario.settings.clone()))
            .add_plugins(ShipPlugin::new(scenario, loadout));
        app.world_mut().run_schedule(Startup);
        app
    }

    fn player(app: &mut App) -> Entity {
        app.world_mut()
            .query_filtered::<Entity, With<PlayerShip>>()
            .single(app.world())
            .unwrap()
    }

    fn step(app: &mut App, ticks: usize) {
        for _ in 0..ticks {
            app.world_mut().run_schedule(FixedUpdate);
        }
    }

    #[test]
    fn test_plan_drives_ship() {
        let mut app = app(scenario());
        let ship = player(&mut app);

        step(&mut app, 3);
        let input = app.world().get::<PilotInput>(ship).unwrap();
        assert_eq!(input.movement_height, 1.0);
        let pose = app.world().get::<Pose>(ship).unwrap();
        assert!(pose.position.y > 0.0);

        step(&mut app, 2);
        assert_eq!(app.world().get::<PilotInput>(ship), Some(&PilotInput::default()));
        assert!(app.world().resource::<FlightPlan>().is_finished());
        assert_eq!(app.world().resource::<FlightPlan>().tick(), 5);

        // Past the end the plan holds still.
        step(&mut app, 2);
        assert_eq!(app.world().resource::<FlightPlan>().tick(), 5);
    }

    #[test]
    fn test_upgrade_installed_on_schedule() {
        let mut app = app(scenario());
        let ship = player(&mut app);

        step(&mut app, 2);
        let before = app.world().get::<MotionState>(ship).unwrap().rotation_speed_max();
        assert_eq!(before, 8.0);

        step(&mut app, 1);
        let after = app.world().get::<MotionState>(ship).unwrap().rotation_speed_max();
        assert_eq!(after, 3.0);
    }
}
