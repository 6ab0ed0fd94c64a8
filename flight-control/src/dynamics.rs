//! Integration of momentum into pose.
//!
//! A body picks one [`Dynamics`] policy when it is created and keeps it for
//! its lifetime. All impulses for a tick must be applied before
//! [`Dynamics::update`] runs, since the update consumes and clamps whatever
//! momentum has accumulated.

use bevy::ecs::component::Component;
use serde::{Deserialize, Serialize};

use crate::controller::compute_rotation_impulse;
use crate::math::{limit_vector, smallest_angle_difference, vector_from_angle_magnitude};
use crate::motion::MotionState;
use crate::pose::Pose;

/// Translation momentum with every component within this of zero snaps to rest.
pub const TRANSLATION_SNAP: f64 = 0.01;

/// Rotation momentum within this of zero snaps to rest.
pub const ROTATION_SNAP: f64 = 0.0001;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dynamics {
    /// Inertia free: each impulse is the momentum for this tick, and the
    /// update consumes it completely. Instant response, instant stop.
    Static,
    /// Impulses are scaled by inertia and accumulate. Momentum persists until
    /// counter-impulses remove it; there is no friction.
    #[default]
    Inertial,
}

impl Dynamics {
    /// Apply one tick of momentum to the pose.
    ///
    /// Momentum is clamped to the speed limits first. The clamp, not the
    /// thrust, enforces the limits, so thrusting sideways at top speed also
    /// trims the existing velocity. That is intended.
    pub fn update(self, state: &mut MotionState, pose: &mut Pose) {
        state.translation_momentum =
            limit_vector(&state.translation_momentum, state.translation_speed_max());
        pose.translate(&state.translation_momentum);

        let rotation_max = state.rotation_speed_max();
        state.rotation_momentum = state.rotation_momentum.clamp(-rotation_max, rotation_max);
        pose.rotate(state.rotation_momentum);

        if self == Dynamics::Static {
            state.translation_momentum = na::Vector2::zeros();
            state.rotation_momentum = 0.0;
        }
    }

    /// Push towards world angle `angle` with strength `magnitude`.
    pub fn relative_move(self, state: &mut MotionState, angle: f64, magnitude: f64) {
        self.apply_impulse(state, &vector_from_angle_magnitude(angle, magnitude));
    }

    /// Push by a world-space impulse vector.
    pub fn apply_impulse(self, state: &mut MotionState, impulse: &na::Vector2<f64>) {
        match self {
            Dynamics::Static => state.translation_momentum += impulse,
            Dynamics::Inertial => {
                state.translation_momentum += impulse * state.translation_inertia();
                // A ship that can never quite stop feels broken.
                if state.translation_momentum.amax() <= TRANSLATION_SNAP {
                    state.translation_momentum = na::Vector2::zeros();
                }
            }
        }
    }

    /// Push along the body's current heading.
    pub fn move_forward(self, state: &mut MotionState, pose: &Pose, magnitude: f64) {
        let thrust = vector_from_angle_magnitude(pose.orientation(), magnitude);
        match self {
            Dynamics::Static => state.translation_momentum = thrust,
            Dynamics::Inertial => {
                state.translation_momentum += thrust * state.translation_inertia()
            }
        }
    }

    /// Turn clockwise with strength `magnitude`.
    pub fn relative_rotate(self, state: &mut MotionState, magnitude: f64) {
        match self {
            Dynamics::Static => state.rotation_momentum = magnitude,
            Dynamics::Inertial => {
                add_rotation_momentum(state, magnitude * state.rotation_inertia())
            }
        }
    }

    /// Turn towards the world angle `target_angle`.
    ///
    /// The static policy heads straight for the target at up to the rotation
    /// limit. The inertial policy asks the bang-bang controller for this
    /// tick's impulse, limited by `max_acceleration`, so arriving takes
    /// several ticks.
    pub fn absolute_rotate(
        self,
        state: &mut MotionState,
        pose: &Pose,
        target_angle: f64,
        max_acceleration: f64,
    ) {
        let relative_angle = smallest_angle_difference(pose.orientation(), target_angle);
        match self {
            Dynamics::Static => state.rotation_momentum = relative_angle,
            Dynamics::Inertial => {
                let delta = compute_rotation_impulse(
                    state.rotation_momentum,
                    relative_angle,
                    state.rotation_inertia(),
                    max_acceleration,
                );
                add_rotation_momentum(state, delta);
            }
        }
    }

    /// Lower or raise the translation speed limit.
    ///
    /// Under inertia the step is scaled like any other thrust, so the limit
    /// falls no faster than the thrusters could brake.
    pub fn set_translation_speed_max(
        self,
        state: &mut MotionState,
        max_speed: f64,
        step_decrease: Option<f64>,
    ) {
        let step_decrease = match self {
            Dynamics::Static => step_decrease,
            Dynamics::Inertial => step_decrease.map(|step| step * state.translation_inertia()),
        };
        state.set_translation_speed_max(max_speed, step_decrease);
    }
}

fn add_rotation_momentum(state: &mut MotionState, delta: f64) {
    state.rotation_momentum += delta;
    if state.rotation_momentum.abs() <= ROTATION_SNAP {
        state.rotation_momentum = 0.0;
    }
}
