//! # Ramsete controller

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Serialize;
use util::maths::sinc;

// Internal
use super::RamseteParams;
use crate::{drive_ctrl::ChassisVelocity, loc::Pose, traj::TrajectoryState};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The Ramsete trajectory tracking controller.
#[derive(Debug, Clone)]
pub struct Ramsete {
    b: f64,
    zeta: f64,
    pos_tolerance_m: f64,
    heading_tolerance_rad: f64,
}

/// Pose error to the reference, in the drive base frame.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct TrackingError {
    /// Distance the reference is ahead of the drive base
    pub along_m: f64,

    /// Distance the reference is to the left of the drive base
    pub lateral_m: f64,

    /// Angle from the drive base's heading to the reference's, anticlockwise positive
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Ramsete {
    /// Create a new controller from the parameters.
    ///
    /// The gains are expected to have already been validated (`b > 0`, `0 < zeta < 1`).
    pub fn new(params: &RamseteParams) -> Self {
        Self {
            b: params.b,
            zeta: params.zeta,
            pos_tolerance_m: params.pos_tolerance_m,
            heading_tolerance_rad: params.heading_tolerance_rad,
        }
    }

    /// Get the error from the current pose to the reference.
    pub fn tracking_error(&self, pose: &Pose, reference: &TrajectoryState) -> TrackingError {
        let err = reference.pose.relative_to(pose);

        TrackingError {
            along_m: err.x(),
            lateral_m: err.y(),
            heading_rad: err.heading(),
        }
    }

    /// Returns true if the error is within the position and heading tolerances.
    pub fn at_reference(&self, error: &TrackingError) -> bool {
        error.along_m.abs() < self.pos_tolerance_m
            && error.lateral_m.abs() < self.pos_tolerance_m
            && error.heading_rad.abs() < self.heading_tolerance_rad
    }

    /// Calculate the chassis velocity demand which tracks the reference from the current pose.
    pub fn calc_velocity(&self, pose: &Pose, reference: &TrajectoryState) -> ChassisVelocity {
        self.calc_velocity_with_error(reference, &self.tracking_error(pose, reference))
    }

    /// As [`Ramsete::calc_velocity`], but with a precomputed tracking error.
    pub fn calc_velocity_with_error(
        &self,
        reference: &TrajectoryState,
        error: &TrackingError,
    ) -> ChassisVelocity {
        let v_ref = reference.velocity_ms;
        let w_ref = reference.angular_velocity_rads();

        // Gain is scheduled on the reference speed, so with a stationary reference nothing is
        // corrected
        let k = 2.0 * self.zeta * (w_ref.powi(2) + self.b * v_ref.powi(2)).sqrt();

        let linear_ms = v_ref * error.heading_rad.cos() + k * error.along_m;
        let angular_rads = w_ref
            + k * error.heading_rad
            + self.b * v_ref * sinc(error.heading_rad) * error.lateral_m;

        trace!(
            "Ramsete: err ({:.3}, {:.3}, {:.3}), k {:.3} -> ({:.3} m/s, {:.3} rad/s)",
            error.along_m,
            error.lateral_m,
            error.heading_rad,
            k,
            linear_ms,
            angular_rads
        );

        ChassisVelocity::new(linear_ms, angular_rads)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn reference(pose: Pose, velocity_ms: f64, curvature_m: f64) -> TrajectoryState {
        TrajectoryState {
            time_s: 0.0,
            pose,
            velocity_ms,
            acceleration_mss: 0.0,
            curvature_m,
        }
    }

    #[test]
    fn test_zero_error_passes_reference_through() {
        let ctrl = Ramsete::new(&RamseteParams::default());
        let pose = Pose::new(1.5, -0.3, 0.8);

        let vel = ctrl.calc_velocity(&pose, &reference(pose, 1.2, 0.5));
        assert_eq!(vel.linear_ms, 1.2);
        assert_eq!(vel.angular_rads, 1.2 * 0.5);
    }

    #[test]
    fn test_at_rest_gives_zero() {
        let ctrl = Ramsete::new(&RamseteParams::default());
        let pose = Pose::new(-4.0, 2.0, -2.0);

        let vel = ctrl.calc_velocity(&pose, &reference(pose, 0.0, 0.0));
        assert_eq!(vel, ChassisVelocity::new(0.0, 0.0));

        // With a stationary reference even a pose error isn't corrected
        let vel = ctrl.calc_velocity(&Pose::new(-3.0, 2.5, -1.0), &reference(pose, 0.0, 0.0));
        assert_eq!(vel, ChassisVelocity::new(0.0, 0.0));
    }

    #[test]
    fn test_corrects_behind_and_right() {
        let params = RamseteParams::default();
        let ctrl = Ramsete::new(&params);

        // Reference is 0.1 m ahead and 0.1 m to the left of the drive base, both facing +x
        let pose = Pose::new(0.0, 0.0, 0.0);
        let reference = reference(Pose::new(0.1, 0.1, 0.0), 1.0, 0.0);

        let err = ctrl.tracking_error(&pose, &reference);
        assert!((err.along_m - 0.1).abs() < 1e-12);
        assert!((err.lateral_m - 0.1).abs() < 1e-12);

        let k = 2.0 * params.zeta * params.b.sqrt();
        let vel = ctrl.calc_velocity(&pose, &reference);
        assert!((vel.linear_ms - (1.0 + k * 0.1)).abs() < 1e-12);
        assert!((vel.angular_rads - params.b * 0.1).abs() < 1e-12);

        // Should speed up and turn left
        assert!(vel.linear_ms > 1.0);
        assert!(vel.angular_rads > 0.0);
    }

    #[test]
    fn test_heading_error_in_drive_frame() {
        let ctrl = Ramsete::new(&RamseteParams::default());

        // Drive base facing +y, reference directly to its left (-x in the field) and facing -x
        let pose = Pose::new(0.0, 0.0, FRAC_PI_2);
        let reference = reference(Pose::new(-1.0, 0.0, std::f64::consts::PI), 0.5, 0.0);

        let err = ctrl.tracking_error(&pose, &reference);
        assert!(err.along_m.abs() < 1e-12);
        assert!((err.lateral_m - 1.0).abs() < 1e-12);
        assert!((err.heading_rad - FRAC_PI_2).abs() < 1e-12);
        assert!(!ctrl.at_reference(&err));
        assert!(ctrl.at_reference(&TrackingError::default()));
    }
}
