use bevy::ecs::component::Component;

use crate::engine::EngineTuning;
use crate::error::{Result, ensure_positive};
use crate::settings::SpeedCeiling;

/// Momentum carried by a body between ticks, together with its speed limits.
///
/// Momentum is per tick: translation in world units, rotation in clockwise
/// degrees. The limits are enforced by clamping during the dynamics update,
/// never asserted.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MotionState {
    pub translation_momentum: na::Vector2<f64>,
    pub rotation_momentum: f64,
    translation_speed_max: f64,
    rotation_speed_max: f64,
    translation_inertia: f64,
    rotation_inertia: f64,
    ceiling: SpeedCeiling,
}

impl MotionState {
    /// A body at rest whose speed limits start at the ceiling.
    pub fn new(
        ceiling: SpeedCeiling,
        translation_inertia: f64,
        rotation_inertia: f64,
    ) -> Result<Self> {
        Ok(MotionState {
            translation_momentum: na::Vector2::zeros(),
            rotation_momentum: 0.0,
            translation_speed_max: ensure_positive("translation ceiling", ceiling.translation)?,
            rotation_speed_max: ensure_positive("rotation ceiling", ceiling.rotation)?,
            translation_inertia: ensure_positive("translation_inertia", translation_inertia)?,
            rotation_inertia: ensure_positive("rotation_inertia", rotation_inertia)?,
            ceiling,
        })
    }

    /// A body tuned by an engine: rotation limited to the engine's turn rate
    /// and translation to its maneuvering speed.
    pub fn for_engine(
        ceiling: SpeedCeiling,
        tuning: EngineTuning,
        maneuver_speed: f64,
    ) -> Result<Self> {
        let mut state =
            MotionState::new(ceiling, tuning.translation_inertia(), tuning.rotation_inertia())?;
        state.set_rotation_speed_max(tuning.max_rotation_speed());
        state.set_translation_speed_max(maneuver_speed, None);
        Ok(state)
    }

    pub fn translation_speed_max(&self) -> f64 {
        self.translation_speed_max
    }

    pub fn rotation_speed_max(&self) -> f64 {
        self.rotation_speed_max
    }

    pub fn translation_inertia(&self) -> f64 {
        self.translation_inertia
    }

    pub fn rotation_inertia(&self) -> f64 {
        self.rotation_inertia
    }

    pub fn speed(&self) -> f64 {
        self.translation_momentum.norm()
    }

    pub fn is_at_rest(&self) -> bool {
        self.translation_momentum == na::Vector2::zeros() && self.rotation_momentum == 0.0
    }

    /// Set a new translation speed limit.
    ///
    /// With a `step_decrease`, a lower limit is approached by at most that
    /// much per call so a vehicle leaving burst mode does not snap to a stop.
    /// The result never exceeds the ceiling. A NaN limit is ignored.
    pub fn set_translation_speed_max(&mut self, max_speed: f64, step_decrease: Option<f64>) {
        if max_speed.is_nan() {
            return;
        }
        let mut max_speed = max_speed;
        if let Some(step) = step_decrease
            && max_speed < self.translation_speed_max
        {
            max_speed = max_speed.max(self.translation_speed_max - step);
        }
        self.translation_speed_max = max_speed.clamp(0.0, self.ceiling.translation);
    }

    /// Clamped to the ceiling. A NaN limit is ignored.
    pub fn set_rotation_speed_max(&mut self, max_speed: f64) {
        if max_speed.is_nan() {
            return;
        }
        self.rotation_speed_max = max_speed.clamp(0.0, self.ceiling.rotation);
    }

    /// Swap in the inertia and turn rate of a new engine. Momentum is kept.
    pub fn retune(&mut self, tuning: EngineTuning) {
        self.translation_inertia = tuning.translation_inertia();
        self.rotation_inertia = tuning.rotation_inertia();
        self.set_rotation_speed_max(tuning.max_rotation_speed());
    }
}
