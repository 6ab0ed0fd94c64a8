//! Construction errors for the flight core.
//!
//! Only construction can fail. Degenerate numeric situations at runtime (a
//! body at rest, zero angular distance) are ordinary branches, not errors.

/// Result type for flight core constructors.
pub type Result<T> = std::result::Result<T, FlightError>;

/// Invalid input rejected while building poses, motion states or engines.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlightError {
    #[error("position must have exactly 2 components, got {0}")]
    PositionDimension(usize),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("minimum drift strength must be within [0, 1), got {0}")]
    DriftStrength(f64),
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FlightError::NonFinite { field, value })
    }
}

pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FlightError::NonPositive { field, value })
    }
}
