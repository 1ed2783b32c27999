//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Linearly interpolate between `a` and `b`, where `frac` is 0 at `a` and 1 at `b`.
pub fn lerp<T>(a: T, b: T, frac: T) -> T
where
    T: Float
{
    a + (b - a) * frac
}

/// Wrap an angle into the range (-pi, pi].
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::nan);
    let tau_t: T = pi_t + pi_t;

    if angle > -pi_t && angle <= pi_t {
        return angle
    }

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid gives [-pi, pi), so move the lower bound onto the upper one
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

/// Get the signed angular distance from `a` to `b`.
///
/// This function will return the shortest signed distance between a and b accounting for
/// wrapping, in the range (-pi, pi]. Positive distances are anticlockwise.
pub fn get_ang_dist<T>(a: T, b: T) -> T
where
    T: Float
{
    wrap_pi(b - a)
}

/// Interpolate between two angles along the shortest arc.
///
/// The result is wrapped into (-pi, pi].
pub fn lerp_angle<T>(a: T, b: T, frac: T) -> T
where
    T: Float
{
    wrap_pi(a + get_ang_dist(a, b) * frac)
}

/// The unnormalised sinc function, `sin(x)/x`, with `sinc(0) = 1`.
pub fn sinc<T>(x: T) -> T
where
    T: Float
{
    if x.abs() < T::epsilon() {
        T::one()
    }
    else {
        x.sin() / x
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;

    const TAU: f64 = std::f64::consts::TAU;
    const PI: f64 = std::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{} != {}", a, b);
    }

    #[test]
    fn test_wrap_pi() {
        assert_eq!(wrap_pi(0f64), 0f64);
        assert_eq!(wrap_pi(PI), PI);
        assert_eq!(wrap_pi(-PI), PI);
        assert_close(wrap_pi(3.0 * PI / 2.0), -PI / 2.0);
        assert_close(wrap_pi(-3.0 * PI / 2.0), PI / 2.0);
        assert_close(wrap_pi(TAU + 1.0), 1.0);
        assert!(wrap_pi(f64::NAN).is_nan());
    }

    #[test]
    fn test_get_ang_dist() {
        assert_eq!(get_ang_dist(1f64, 2f64), 1f64);
        assert_eq!(get_ang_dist(2f64, 1f64), -1f64);
        assert_close(get_ang_dist(0f64, TAU), 0f64);
        assert_close(get_ang_dist(TAU, 0f64), 0f64);
        assert_close(get_ang_dist(1f64, TAU), -1f64);
        assert_close(get_ang_dist(0f64, TAU - 1f64), -1f64);
        assert_close(get_ang_dist(TAU - 1f64, 1f64), 2f64);
    }

    #[test]
    fn test_lerp_angle_crosses_pi() {
        // Going from just below pi to just above -pi should pass through pi, not zero
        let a = PI - 0.1;
        let b = -PI + 0.1;
        assert_close(lerp_angle(a, b, 0.25), PI - 0.05);
        assert_close(lerp_angle(a, b, 0.75), -PI + 0.05);
        assert_close(lerp_angle(a, b, 0.0), a);
        assert_close(lerp_angle(a, b, 1.0), b);
    }

    #[test]
    fn test_sinc() {
        assert_eq!(sinc(0f64), 1f64);
        assert_close(sinc(PI / 2.0), 2.0 / PI);
        assert_close(sinc(-PI / 2.0), 2.0 / PI);
    }

    #[test]
    fn test_lerp() {
        assert_close(lerp(2f64, 4f64, 0.25), 2.5);
        assert_close(lerp(-1f64, 1f64, 0.75), 0.5);
    }
}
