use bevy::ecs::component::Component;
use serde::Serialize;

use crate::error::{FlightError, Result, ensure_finite};
use crate::math::normalize_angle;

/// Position and heading of a body in the 2D world.
///
/// The orientation is kept in clockwise degrees within `[0, 360)`, 0 being
/// "up". Every mutation re-normalizes it; the position is unbounded.
#[derive(Component, Debug, Clone, PartialEq, Serialize)]
pub struct Pose {
    pub position: na::Vector2<f64>,
    orientation: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position: na::Vector2::zeros(),
            orientation: 0.0,
        }
    }
}

impl Pose {
    pub fn new(position: na::Vector2<f64>, orientation: f64) -> Self {
        Pose {
            position,
            orientation: normalize_angle(orientation),
        }
    }

    /// Build a pose from loosely typed coordinates, e.g. parsed from a file.
    pub fn try_from_slice(position: &[f64], orientation: f64) -> Result<Self> {
        let [x, y] = position else {
            return Err(FlightError::PositionDimension(position.len()));
        };
        let x = ensure_finite("position.x", *x)?;
        let y = ensure_finite("position.y", *y)?;
        let orientation = ensure_finite("orientation", orientation)?;
        Ok(Pose::new(na::Vector2::new(x, y), orientation))
    }

    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: f64) {
        self.orientation = normalize_angle(orientation);
    }

    /// Rotate clockwise by `angle` degrees.
    pub fn rotate(&mut self, angle: f64) {
        self.set_orientation(self.orientation + angle);
    }

    pub fn translate(&mut self, offset: &na::Vector2<f64>) {
        self.position += offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_stays_normalized() {
        let mut pose = Pose::new(na::Vector2::new(1.0, 2.0), -30.0);
        assert_eq!(pose.orientation(), 330.0);

        pose.rotate(45.0);
        assert_eq!(pose.orientation(), 15.0);

        pose.rotate(-735.0);
        assert_eq!(pose.orientation(), 0.0);

        pose.set_orientation(360.0);
        assert_eq!(pose.orientation(), 0.0);
    }

    #[test]
    fn test_translate_is_unbounded() {
        let mut pose = Pose::default();
        pose.translate(&na::Vector2::new(-1e9, 4.5));
        assert_eq!(pose.position, na::Vector2::new(-1e9, 4.5));
    }

    #[test]
    fn test_try_from_slice() {
        let pose = Pose::try_from_slice(&[3.0, -4.0], 370.0).unwrap();
        assert_eq!(pose.position, na::Vector2::new(3.0, -4.0));
        assert_eq!(pose.orientation(), 10.0);

        assert_eq!(
            Pose::try_from_slice(&[1.0, 2.0, 3.0], 0.0),
            Err(FlightError::PositionDimension(3))
        );
        assert!(matches!(
            Pose::try_from_slice(&[f64::NAN, 0.0], 0.0),
            Err(FlightError::NonFinite { field: "position.x", .. })
        ));
    }
}
