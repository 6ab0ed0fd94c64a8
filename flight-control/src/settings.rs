//! Game-wide flight configuration.
//!
//! The settings are a snapshot handed to vehicles when they are built or
//! upgraded. Nothing reads them during a tick.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::dynamics::Dynamics;
use crate::error::{FlightError, Result, ensure_positive};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightSettings {
    /// Simulation ticks per second.
    pub ticks_per_second: f64,
    /// Upper limit for any body's translation momentum, per tick.
    pub translation_speed_max: f64,
    /// Upper limit for any body's rotation momentum, in degrees per tick.
    pub rotation_speed_max: f64,
    /// Rotation stick strength below this is treated as drift and ignored.
    pub min_drift_strength: f64,
    /// Dynamics policy given to newly built vehicles.
    pub dynamics: Dynamics,
}

impl Default for FlightSettings {
    fn default() -> Self {
        FlightSettings {
            ticks_per_second: 60.0,
            translation_speed_max: 10.0,
            rotation_speed_max: 10.0,
            min_drift_strength: 0.1,
            dynamics: Dynamics::Inertial,
        }
    }
}

impl FlightSettings {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("ticks_per_second", self.ticks_per_second)?;
        ensure_positive("translation_speed_max", self.translation_speed_max)?;
        ensure_positive("rotation_speed_max", self.rotation_speed_max)?;
        if !(0.0..1.0).contains(&self.min_drift_strength) {
            return Err(FlightError::DriftStrength(self.min_drift_strength));
        }
        Ok(())
    }

    pub fn ceiling(&self) -> SpeedCeiling {
        SpeedCeiling {
            translation: self.translation_speed_max,
            rotation: self.rotation_speed_max,
        }
    }
}

/// Hard speed limits no engine may exceed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedCeiling {
    pub translation: f64,
    pub rotation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        assert_eq!(FlightSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let settings = FlightSettings {
            ticks_per_second: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(FlightError::NonPositive { field: "ticks_per_second", .. })
        ));

        let settings = FlightSettings {
            min_drift_strength: 1.0,
            ..Default::default()
        };
        assert_eq!(settings.validate(), Err(FlightError::DriftStrength(1.0)));
    }
}
