//! Angle and vector helpers.
//!
//! Angles are degrees, clockwise positive, with 0 pointing "up" along the
//! local +Y axis. Conventional rotation matrices are counter-clockwise
//! positive, so every rotation here negates the angle first.

/// Normalize an angle into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360.
    if angle >= 360.0 { 0.0 } else { angle }
}

/// Rotate `v` clockwise by `angle_deg` degrees.
pub fn rotate_vector(v: &na::Vector2<f64>, angle_deg: f64) -> na::Vector2<f64> {
    na::Rotation2::new(-angle_deg.to_radians()) * v
}

/// The "up" unit vector rotated by `angle` and scaled by `magnitude`.
pub fn vector_from_angle_magnitude(angle: f64, magnitude: f64) -> na::Vector2<f64> {
    rotate_vector(&na::Vector2::new(0.0, magnitude), angle)
}

/// Inverse of [`vector_from_angle_magnitude`].
///
/// The zero vector reports angle 0.
pub fn angle_magnitude_from_vector(v: &na::Vector2<f64>) -> (f64, f64) {
    (angle_from_vector(v.x, v.y), v.norm())
}

/// Clockwise angle in `[0, 360)` from "up" to the point `(relative_x, relative_y)`.
pub fn angle_from_vector(relative_x: f64, relative_y: f64) -> f64 {
    // Swapped atan2 arguments give 0 = up, clockwise positive.
    normalize_angle(relative_x.atan2(relative_y).to_degrees())
}

/// Shorten `v` to `max_magnitude` if it is longer; otherwise return it unchanged.
pub fn limit_vector(v: &na::Vector2<f64>, max_magnitude: f64) -> na::Vector2<f64> {
    let magnitude = v.norm();
    if magnitude > max_magnitude {
        v * (max_magnitude / magnitude)
    } else {
        *v
    }
}

/// Signed shortest rotation in `[-180, 180)` that takes `from` onto `to`.
///
/// Positive results mean "rotate clockwise".
pub fn smallest_angle_difference(from: f64, to: f64) -> f64 {
    normalize_angle(to - from + 180.0) - 180.0
}
