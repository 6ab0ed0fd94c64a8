//! Motion and flight control for 2D vehicles.
//!
//! Pilot commands become momentum changes on rigid bodies that carry inertia
//! and respect speed limits, and rotations are driven to a target heading
//! with a bang-bang controller that stops exactly on it.
//!
//! Angles are degrees, clockwise positive, 0 = up (+Y).

extern crate nalgebra as na;
use bevy::prelude::*;

pub mod controller;
pub mod dynamics;
pub mod engine;
pub mod error;
pub mod math;
pub mod motion;
pub mod pilot;
pub mod pose;
pub mod settings;

pub use dynamics::Dynamics;
pub use engine::{Engine, EngineProfile, EngineStatus, EngineTuning};
pub use error::{FlightError, Result};
pub use motion::MotionState;
pub use pilot::PilotInput;
pub use pose::Pose;
pub use settings::{FlightSettings, SpeedCeiling};

/// Marks a piloted vehicle.
#[derive(Component, Debug, Default, Clone, Copy)]
#[require(PilotInput, EngineStatus)]
pub struct Vehicle;

/// Systems that advance flight state, in order: retune, steer, integrate.
///
/// Anything reading [`Pose`] for the current tick should run after this set;
/// anything writing [`PilotInput`] should run before it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightSet;

/// Runs flight control on the fixed timestep.
pub struct FlightControlPlugin {
    pub settings: FlightSettings,
}

impl FlightControlPlugin {
    pub fn new(settings: FlightSettings) -> Self {
        FlightControlPlugin { settings }
    }
}

impl Default for FlightControlPlugin {
    fn default() -> Self {
        FlightControlPlugin::new(FlightSettings::default())
    }
}

impl Plugin for FlightControlPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone());
        app.insert_resource(Time::<Fixed>::from_hz(self.settings.ticks_per_second));
        app.add_systems(
            FixedUpdate,
            (retune_engines, steer_vehicles, integrate_motion)
                .chain()
                .in_set(FlightSet),
        );
    }
}

/// Components for a new vehicle at `pose`, tuned by `engine`.
pub fn vehicle_bundle(
    pose: Pose,
    engine: Engine,
    dynamics: Dynamics,
    settings: &FlightSettings,
) -> Result<impl Bundle> {
    settings.validate()?;
    let motion = MotionState::for_engine(
        settings.ceiling(),
        engine.tuning(),
        engine.profile().max_maneuver_speed,
    )?;
    Ok((Vehicle, pose, motion, dynamics, engine))
}

/// Apply a newly added or replaced engine to the body it drives.
pub fn retune_engines(mut query: Query<(Entity, &Engine, &mut MotionState), Changed<Engine>>) {
    for (entity, engine, mut motion) in query.iter_mut() {
        motion.retune(engine.tuning());
        debug!(
            "retuned {entity}: translation inertia {:.4}, rotation inertia {:.4}, turn rate {:.3}",
            engine.tuning().translation_inertia(),
            engine.tuning().rotation_inertia(),
            engine.tuning().max_rotation_speed(),
        );
    }
}

/// Turn each vehicle's pilot input into impulses.
pub fn steer_vehicles(
    mut query: Query<(
        Entity,
        &Engine,
        &Dynamics,
        &Pose,
        &PilotInput,
        &mut MotionState,
        &mut EngineStatus,
    )>,
) {
    for (entity, engine, dynamics, pose, input, mut motion, mut status) in query.iter_mut() {
        let next = engine.steer(*dynamics, &mut motion, pose, input);
        if next != *status {
            debug!(
                "{entity}: burst {} -> {}, stabilize {} -> {}",
                status.burst_active,
                next.burst_active,
                status.stabilize_active,
                next.stabilize_active
            );
            *status = next;
        }
    }
}

/// Move every body by the momentum accumulated this tick.
pub fn integrate_motion(mut query: Query<(&Dynamics, &mut MotionState, &mut Pose)>) {
    for (dynamics, mut motion, mut pose) in query.iter_mut() {
        dynamics.update(&mut motion, &mut pose);
    }
}
