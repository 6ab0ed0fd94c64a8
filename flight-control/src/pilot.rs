use bevy::ecs::component::Component;
use serde::{Deserialize, Serialize};

use crate::math::normalize_angle;

/// Abstract pilot commands for one tick, as produced by an input mapper.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotInput {
    /// Maneuvering thrust across, in `[-1, 1]`.
    pub movement_width: f64,
    /// Maneuvering thrust along, in `[-1, 1]`.
    pub movement_height: f64,
    /// Main thruster power in `[0, 1]`.
    pub burst: f64,
    /// Ask the autopilot to kill all momentum.
    pub stabilize: bool,
    /// Desired heading in `[0, 360)`.
    pub orientation: f64,
    /// How hard the rotation stick is pushed, in `[0, 1]`.
    pub orientation_strength: f64,
}

impl PilotInput {
    /// The same commands forced into their documented ranges. Non-finite
    /// values count as no input.
    pub fn clamped(&self) -> PilotInput {
        PilotInput {
            movement_width: finite_or_zero(self.movement_width).clamp(-1.0, 1.0),
            movement_height: finite_or_zero(self.movement_height).clamp(-1.0, 1.0),
            burst: finite_or_zero(self.burst).clamp(0.0, 1.0),
            stabilize: self.stabilize,
            orientation: normalize_angle(finite_or_zero(self.orientation)),
            orientation_strength: finite_or_zero(self.orientation_strength).clamp(0.0, 1.0),
        }
    }

    pub fn movement(&self) -> na::Vector2<f64> {
        na::Vector2::new(self.movement_width, self.movement_height)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        let input = PilotInput {
            movement_width: 3.0,
            movement_height: f64::NAN,
            burst: -0.5,
            stabilize: true,
            orientation: -90.0,
            orientation_strength: 1.5,
        }
        .clamped();

        assert_eq!(
            input,
            PilotInput {
                movement_width: 1.0,
                movement_height: 0.0,
                burst: 0.0,
                stabilize: true,
                orientation: 270.0,
                orientation_strength: 1.0,
            }
        );
    }
}
