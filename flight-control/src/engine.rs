//! The engine capability slot: performance profile, derived tuning and the
//! translation of pilot commands into thrust.

use bevy::ecs::component::Component;
use serde::{Deserialize, Serialize};

use crate::dynamics::Dynamics;
use crate::error::{FlightError, Result, ensure_positive};
use crate::math::limit_vector;
use crate::motion::MotionState;
use crate::pilot::PilotInput;
use crate::pose::Pose;
use crate::settings::FlightSettings;

/// How a vehicle's thrusters perform. Speeds are per tick, times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineProfile {
    /// Top speed under maneuvering thrusters.
    pub max_maneuver_speed: f64,
    pub max_maneuver_acceleration: f64,
    /// Top speed while the main thruster burns.
    pub max_burst_speed: f64,
    pub max_burst_acceleration: f64,
    pub max_rotation_acceleration: f64,
    /// Time from rest to maneuvering top speed.
    pub time_to_max_speed_translation: f64,
    /// Time from rest to the full turn rate.
    pub time_to_max_speed_rotation: f64,
    /// Time for a full circle at the full turn rate.
    pub time_for_one_rotation: f64,
}

impl Default for EngineProfile {
    fn default() -> Self {
        EngineProfile {
            max_maneuver_speed: 2.0,
            max_maneuver_acceleration: 1.0,
            max_burst_speed: 6.0,
            max_burst_acceleration: 2.0,
            max_rotation_acceleration: 1.0,
            time_to_max_speed_translation: 2.0 / 3.0,
            time_to_max_speed_rotation: 1.0,
            time_for_one_rotation: 0.75,
        }
    }
}

impl EngineProfile {
    fn validate(&self) -> Result<()> {
        ensure_positive("max_maneuver_speed", self.max_maneuver_speed)?;
        ensure_positive("max_maneuver_acceleration", self.max_maneuver_acceleration)?;
        ensure_positive("max_burst_speed", self.max_burst_speed)?;
        ensure_positive("max_burst_acceleration", self.max_burst_acceleration)?;
        ensure_positive("max_rotation_acceleration", self.max_rotation_acceleration)?;
        ensure_positive("time_to_max_speed_translation", self.time_to_max_speed_translation)?;
        ensure_positive("time_to_max_speed_rotation", self.time_to_max_speed_rotation)?;
        ensure_positive("time_for_one_rotation", self.time_for_one_rotation)?;
        Ok(())
    }
}

/// Constants derived from a profile at the configured tick rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTuning {
    translation_inertia: f64,
    rotation_inertia: f64,
    max_rotation_speed: f64,
}

impl EngineTuning {
    /// Chosen so full maneuvering thrust reaches top speed in
    /// `time_to_max_speed_translation`, and full rotation thrust reaches the
    /// turn rate in `time_to_max_speed_rotation`.
    fn derive(profile: &EngineProfile, ticks_per_second: f64) -> Self {
        let max_rotation_speed = 360.0 / (profile.time_for_one_rotation * ticks_per_second);
        EngineTuning {
            translation_inertia: profile.max_maneuver_speed
                / (profile.max_maneuver_acceleration
                    * profile.time_to_max_speed_translation
                    * ticks_per_second),
            rotation_inertia: max_rotation_speed
                / (profile.max_rotation_acceleration
                    * profile.time_to_max_speed_rotation
                    * ticks_per_second),
            max_rotation_speed,
        }
    }

    pub fn translation_inertia(&self) -> f64 {
        self.translation_inertia
    }

    pub fn rotation_inertia(&self) -> f64 {
        self.rotation_inertia
    }

    /// Degrees per tick.
    pub fn max_rotation_speed(&self) -> f64 {
        self.max_rotation_speed
    }
}

/// What the engine did this tick, for HUD and telemetry readers.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStatus {
    pub burst_active: bool,
    pub stabilize_active: bool,
}

/// A vehicle's engine. Upgrading means inserting a new one; the flight
/// plugin then retunes the vehicle's [`MotionState`].
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Engine {
    profile: EngineProfile,
    tuning: EngineTuning,
    min_drift_strength: f64,
}

impl Engine {
    pub fn new(profile: EngineProfile, settings: &FlightSettings) -> Result<Self> {
        settings.validate()?;
        profile.validate()?;
        let tuning = EngineTuning::derive(&profile, settings.ticks_per_second);
        ensure_positive("translation_inertia", tuning.translation_inertia)?;
        ensure_positive("rotation_inertia", tuning.rotation_inertia)?;
        if !(0.0..1.0).contains(&settings.min_drift_strength) {
            return Err(FlightError::DriftStrength(settings.min_drift_strength));
        }
        Ok(Engine {
            profile,
            tuning,
            min_drift_strength: settings.min_drift_strength,
        })
    }

    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    pub fn tuning(&self) -> EngineTuning {
        self.tuning
    }

    /// Turn one tick of pilot commands into impulses on `state`.
    ///
    /// Stabilizing overrides every other command. Otherwise the main
    /// thruster and the maneuvering thrusters are exclusive: a burning ship
    /// can only push forward. Rotation is handled alongside either mode, with
    /// stick strength scaling the available rotational acceleration.
    pub fn steer(
        &self,
        dynamics: Dynamics,
        state: &mut MotionState,
        pose: &Pose,
        input: &PilotInput,
    ) -> EngineStatus {
        let input = input.clamped();
        let profile = &self.profile;

        if input.stabilize {
            dynamics.set_translation_speed_max(
                state,
                profile.max_maneuver_speed,
                Some(profile.max_maneuver_acceleration),
            );
            let brake =
                limit_vector(&-state.translation_momentum, profile.max_maneuver_acceleration);
            dynamics.apply_impulse(state, &brake);
            dynamics.absolute_rotate(
                state,
                pose,
                pose.orientation(),
                profile.max_rotation_acceleration,
            );
            return EngineStatus {
                burst_active: false,
                stabilize_active: true,
            };
        }

        let burst_active = input.burst > 0.0;
        if burst_active {
            dynamics.set_translation_speed_max(state, profile.max_burst_speed, None);
            dynamics.move_forward(state, pose, input.burst * profile.max_burst_acceleration);
        } else {
            dynamics.set_translation_speed_max(
                state,
                profile.max_maneuver_speed,
                Some(profile.max_maneuver_acceleration),
            );
            let thrust = limit_vector(&input.movement(), 1.0) * profile.max_maneuver_acceleration;
            dynamics.apply_impulse(state, &thrust);
        }

        if input.orientation_strength > self.min_drift_strength {
            dynamics.absolute_rotate(
                state,
                pose,
                input.orientation,
                profile.max_rotation_acceleration * input.orientation_strength,
            );
        }

        EngineStatus {
            burst_active,
            stabilize_active: false,
        }
    }
}
