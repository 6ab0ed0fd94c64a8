//! Bang-bang rotation control.
//!
//! The controller is closed loop: it is asked once per tick for the best
//! momentum change given the live angle to the target, and keeps no state of
//! its own. Each tick it either accelerates at full strength, brakes at full
//! strength, or (close to the target) applies the partial correction that
//! lands exactly on it with zero momentum.
//!
//! Distances are measured the way the inertial integrator moves a body: the
//! momentum after this tick's impulse is travelled in full this tick, then the
//! momentum shrinks by the braking step every following tick.

/// Angles closer than this count as arrived.
pub const ARRIVAL_TOLERANCE: f64 = 0.001;

/// Beyond this many braking steps whole-tick counting stops being exact in
/// f64, and the continuous approximation is used instead.
const MAX_EXACT_STEPS: f64 = 4_503_599_627_370_496.0; // 2^52

/// Momentum change for this tick that turns a body through `relative_angle`
/// degrees and stops it there.
///
/// The result is additive and bounded by
/// `±max_rotation_acceleration * rotation_inertia`.
///
/// The direction is always that of the shortest angle. Carrying a large
/// momentum the long way round can occasionally be quicker than reversing it;
/// that case is not detected.
pub fn compute_rotation_impulse(
    current_momentum: f64,
    relative_angle: f64,
    rotation_inertia: f64,
    max_rotation_acceleration: f64,
) -> f64 {
    if relative_angle == 0.0 && current_momentum == 0.0 {
        return 0.0;
    }

    let highest_momentum_change = max_rotation_acceleration * rotation_inertia;
    if !(highest_momentum_change > 0.0) {
        // No authority over rotation at all.
        return 0.0;
    }

    // On target but still turning: keep braking along the current motion.
    let target_direction = if relative_angle != 0.0 {
        relative_angle.signum()
    } else {
        current_momentum.signum()
    };

    let projected_momentum = current_momentum + highest_momentum_change * target_direction;
    let braking_distance = stopping_distance(projected_momentum, highest_momentum_change);
    let distance = relative_angle.abs();

    if distance <= ARRIVAL_TOLERANCE && current_momentum.abs() <= highest_momentum_change {
        return -current_momentum;
    }

    if distance <= braking_distance {
        // Fastest momentum from which full braking still stops on target.
        let wanted = target_direction * momentum_for_distance(distance, highest_momentum_change);
        return (wanted - current_momentum).clamp(-highest_momentum_change, highest_momentum_change);
    }

    highest_momentum_change * target_direction
}

/// Degrees covered when moving with `momentum` this tick and then braking by
/// `step` every tick until stopped.
///
/// Sums the shrinking momenta `|m|, |m| - step, ...` over the whole ticks plus
/// the fractional remainder of the last one.
pub fn stopping_distance(momentum: f64, step: f64) -> f64 {
    let momentum = momentum.abs();
    let ticks_to_stop = momentum / step;
    if !(ticks_to_stop < MAX_EXACT_STEPS) {
        return momentum * momentum / (2.0 * step) + momentum / 2.0;
    }
    let whole_ticks = ticks_to_stop.floor();
    let remainder = (ticks_to_stop - whole_ticks) * step;
    whole_ticks * momentum - step * whole_ticks * (whole_ticks - 1.0) / 2.0 + remainder
}

/// Inverse of [`stopping_distance`]: the momentum whose stopping distance is
/// exactly `distance`.
pub fn momentum_for_distance(distance: f64, step: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }

    // Distance covered from the whole-step momentum n * step is
    // step * n * (n + 1) / 2. Find the largest such n that fits.
    let triangle = |n: f64| step * n * (n + 1.0) / 2.0;
    let mut n = ((-1.0 + (1.0 + 8.0 * distance / step).sqrt()) / 2.0).floor().max(0.0);
    if !(n < MAX_EXACT_STEPS) {
        return (2.0 * distance * step).sqrt();
    }
    // The closed form is at most one step off from rounding.
    if triangle(n + 1.0) <= distance {
        n += 1.0;
    } else if n > 0.0 && triangle(n) > distance {
        n -= 1.0;
    }

    // Between n and n + 1 steps the distance grows linearly with slope n + 1.
    (distance + triangle(n)) / (n + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{normalize_angle, smallest_angle_difference};
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Drive the controller against a bare orientation and return the
    /// orientation, the momentum and the number of ticks taken.
    fn rotate_until_settled(
        start: f64,
        target: f64,
        mut momentum: f64,
        inertia: f64,
        acceleration: f64,
    ) -> (f64, f64, usize) {
        let mut orientation = start;
        let initial_sign = smallest_angle_difference(start, target).signum();
        for tick in 0..500 {
            let relative = smallest_angle_difference(orientation, target);
            if relative.abs() <= ARRIVAL_TOLERANCE && momentum == 0.0 {
                return (orientation, momentum, tick);
            }
            if momentum == 0.0 || momentum.signum() == initial_sign {
                assert!(
                    relative * initial_sign >= -ARRIVAL_TOLERANCE,
                    "overshot target at tick {tick}: {relative}"
                );
            }
            momentum += compute_rotation_impulse(momentum, relative, inertia, acceleration);
            orientation = normalize_angle(orientation + momentum);
        }
        panic!("did not settle: orientation {orientation}, momentum {momentum}");
    }

    #[test]
    fn test_stationary_on_target() {
        assert_eq!(compute_rotation_impulse(0.0, 0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_no_authority() {
        assert_eq!(compute_rotation_impulse(2.0, 45.0, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_stopping_distance() {
        assert_abs_diff_eq!(stopping_distance(0.0, 1.0), 0.0);
        assert_abs_diff_eq!(stopping_distance(1.0, 1.0), 1.0);
        assert_abs_diff_eq!(stopping_distance(4.0, 1.0), 10.0);
        assert_abs_diff_eq!(stopping_distance(-4.0, 1.0), 10.0);
        // 2.5 + 1.5 + 0.5
        assert_abs_diff_eq!(stopping_distance(2.5, 1.0), 4.5);
        // 0.9 + 0.6 + 0.3
        assert_abs_diff_eq!(stopping_distance(0.9, 0.3), 1.8, epsilon = 1e-12);
    }

    #[test]
    fn test_momentum_for_distance_inverts_stopping_distance() {
        for step in [0.1, 0.5, 1.0, 2.0] {
            for momentum in [0.0, 0.05, 0.3, 1.0, 2.5, 4.0, 7.75] {
                let distance = stopping_distance(momentum, step);
                assert_abs_diff_eq!(
                    momentum_for_distance(distance, step),
                    momentum,
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_huge_step_counts_use_continuous_inverse() {
        let momentum = momentum_for_distance(1e40, 1.0);
        assert_relative_eq!(momentum, 2e40_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(stopping_distance(momentum, 1.0), 1e40, max_relative = 1e-12);
    }

    #[test]
    fn test_vanishing_authority_still_brakes() {
        let step = 1e-33 * 8.0 / 60.0;
        let impulse = compute_rotation_impulse(5.0, 30.0, 8.0 / 60.0, 1e-33);
        assert_relative_eq!(impulse, -step, max_relative = 1e-12);
        let impulse = compute_rotation_impulse(-5.0, 0.0, 8.0 / 60.0, 1e-300);
        assert!(impulse > 0.0 && impulse.is_finite());
    }

    #[test]
    fn test_accelerates_when_far() {
        assert_eq!(compute_rotation_impulse(0.0, 90.0, 1.0, 1.0), 1.0);
        assert_eq!(compute_rotation_impulse(0.0, -90.0, 0.5, 1.0), -0.5);
    }

    #[test]
    fn test_brakes_when_close() {
        // Moving at 9 with 36 left: must drop to 8.
        assert_abs_diff_eq!(compute_rotation_impulse(9.0, 36.0, 1.0, 1.0), -1.0);
        // Coasting is right when the stopping distance matches exactly.
        assert_abs_diff_eq!(compute_rotation_impulse(9.0, 45.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_arrival_zeroes_momentum() {
        assert_abs_diff_eq!(compute_rotation_impulse(0.4, 0.0, 1.0, 1.0), -0.4);
        assert_abs_diff_eq!(compute_rotation_impulse(-0.7, 0.0005, 1.0, 1.0), 0.7);
    }

    #[test]
    fn test_keeps_braking_past_target() {
        // On target but too fast to stop in one tick.
        assert_abs_diff_eq!(compute_rotation_impulse(3.0, 0.0, 1.0, 1.0), -1.0);
        assert_abs_diff_eq!(compute_rotation_impulse(-3.0, 0.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_reverses_wrong_way_momentum() {
        assert_abs_diff_eq!(compute_rotation_impulse(-5.0, 10.0, 1.0, 1.0), 1.0);
    }

    #[test]
    fn test_quarter_turn_arrives_without_overshoot() {
        let (orientation, momentum, ticks) = rotate_until_settled(0.0, 90.0, 0.0, 1.0, 1.0);
        assert_abs_diff_eq!(orientation, 90.0, epsilon = ARRIVAL_TOLERANCE);
        assert_eq!(momentum, 0.0);
        assert!(ticks <= 20, "took {ticks} ticks");
    }

    #[test]
    fn test_fractional_turns_arrive() {
        for (start, target, inertia, acceleration) in [
            (0.0, 10.0, 1.0, 1.0),
            (350.0, 20.0, 0.133, 1.0),
            (200.0, 10.0, 0.05, 2.0),
            (45.0, 44.0, 0.3, 0.5),
        ] {
            let (orientation, momentum, _) =
                rotate_until_settled(start, target, 0.0, inertia, acceleration);
            assert_abs_diff_eq!(
                smallest_angle_difference(orientation, target),
                0.0,
                epsilon = ARRIVAL_TOLERANCE
            );
            assert_eq!(momentum, 0.0);
        }
    }

    #[test]
    fn test_recovers_from_opposing_momentum() {
        let (orientation, momentum, _) = rotate_until_settled(0.0, 60.0, -4.0, 1.0, 1.0);
        assert_abs_diff_eq!(
            smallest_angle_difference(orientation, 60.0),
            0.0,
            epsilon = ARRIVAL_TOLERANCE
        );
        assert_eq!(momentum, 0.0);
    }
}
