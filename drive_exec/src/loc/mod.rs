//! # Localisation module
//!
//! This module provides localisation for the drive base in the form of wheel odometry fused with
//! an absolute heading sensor.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod odometry;
pub use odometry::Odometry;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation2, Vector2};
use serde::Serialize;
use util::maths::wrap_pi;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The pose (position and heading in the field frame) of the drive base.
///
/// Heading is measured anticlockwise from the field X axis and is always held in the range
/// (-pi, pi].
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Pose {
    x_m: f64,
    y_m: f64,
    heading_rad: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {

    /// Create a new pose, normalising the heading.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            x_m,
            y_m,
            heading_rad: wrap_pi(heading_rad)
        }
    }

    /// X position in meters.
    pub fn x(&self) -> f64 {
        self.x_m
    }

    /// Y position in meters.
    pub fn y(&self) -> f64 {
        self.y_m
    }

    /// Heading in radians, in the range (-pi, pi].
    pub fn heading(&self) -> f64 {
        self.heading_rad
    }

    /// The 2D position vector of the pose.
    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x_m, self.y_m)
    }

    /// Express this pose in the frame of `other`.
    ///
    /// The result's position is the offset from `other` to `self` rotated into `other`'s heading,
    /// so that +x is "ahead of other" and +y is "to the left of other". The heading is the wrapped
    /// difference between the two headings.
    pub fn relative_to(&self, other: &Pose) -> Pose {
        let offset = Rotation2::new(-other.heading_rad) * (self.position() - other.position());

        Pose::new(offset[0], offset[1], self.heading_rad - other.heading_rad)
    }

    /// Apply an offset given in this pose's own frame, the inverse of [`Pose::relative_to`].
    pub fn transform_by(&self, delta: &Pose) -> Pose {
        let pos = self.position() + Rotation2::new(self.heading_rad) * delta.position();

        Pose::new(pos[0], pos[1], self.heading_rad + delta.heading_rad)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_pose_close(a: &Pose, b: &Pose) {
        assert!(
            (a.x() - b.x()).abs() < 1e-9
            && (a.y() - b.y()).abs() < 1e-9
            && util::maths::get_ang_dist(a.heading(), b.heading()).abs() < 1e-9,
            "{:?} != {:?}", a, b
        );
    }

    #[test]
    fn test_heading_normalised() {
        assert_eq!(Pose::new(0.0, 0.0, -PI).heading(), PI);
        assert!((Pose::new(0.0, 0.0, 3.0 * FRAC_PI_2).heading() + FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_relative_to() {
        // A point 1 m ahead of a pose facing +y is at (0, 1) in the field
        let origin = Pose::new(1.0, 1.0, FRAC_PI_2);
        let ahead = Pose::new(1.0, 2.0, FRAC_PI_2);
        assert_pose_close(&ahead.relative_to(&origin), &Pose::new(1.0, 0.0, 0.0));

        let left = Pose::new(0.0, 1.0, PI);
        assert_pose_close(&left.relative_to(&origin), &Pose::new(0.0, 1.0, FRAC_PI_2));

        // Identical poses give an exact zero
        assert_eq!(origin.relative_to(&origin), Pose::default());
    }

    #[test]
    fn test_transform_inverts_relative() {
        let a = Pose::new(-2.0, 0.5, 2.5);
        let b = Pose::new(3.0, -1.0, -2.9);
        assert_pose_close(&a.transform_by(&b.relative_to(&a)), &b);
    }
}
