//! Wheel odometry with absolute heading fusion

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::drive::DriveSensData;
use log::trace;
use util::maths::wrap_pi;

use super::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Dead-reckoning pose estimator.
///
/// Position is integrated from the average of the left and right wheel distance deltas, projected
/// along the heading measured by the (absolute) heading sensor. The heading itself is never
/// integrated from the wheels.
#[derive(Debug, Clone, Default)]
pub struct Odometry {
    /// Current estimate
    pose: Pose,

    /// Cumulative left wheel distance on the last update
    prev_left_m: f64,

    /// Cumulative right wheel distance on the last update
    prev_right_m: f64,

    /// Offset added to the measured heading, so that the sensor's zero need not line up with the
    /// field's X axis.
    heading_offset_rad: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Odometry {
    /// Create a new estimator at the given pose, assuming the wheel distances and heading sensor
    /// have just been zeroed.
    pub fn new(initial_pose: Pose) -> Self {
        let mut odom = Self::default();
        odom.reset(initial_pose);
        odom
    }

    /// Overwrite the estimate with the given pose.
    ///
    /// The distance baselines and the heading offset are zeroed, so the caller must have zeroed
    /// the encoders and heading sensor at the same time.
    pub fn reset(&mut self, initial_pose: Pose) {
        self.pose = initial_pose;
        self.prev_left_m = 0.0;
        self.prev_right_m = 0.0;
        self.heading_offset_rad = 0.0;
    }

    /// Overwrite the estimate with the given pose, latching the current sensor readings as the
    /// new baselines.
    ///
    /// The heading offset is chosen such that the current measured heading maps onto the heading
    /// of `initial_pose`, so the sensors don't need to be zeroed between runs.
    pub fn reset_at(&mut self, initial_pose: Pose, sens: &DriveSensData) {
        self.pose = initial_pose;
        self.prev_left_m = sens.left_dist_m;
        self.prev_right_m = sens.right_dist_m;
        self.heading_offset_rad = initial_pose.heading() - sens.heading_rad;
    }

    /// Update the estimate with a new set of readings, returning the new pose.
    ///
    /// Readings are cumulative, so a skipped cycle only degrades accuracy.
    pub fn update(&mut self, heading_rad: f64, left_m: f64, right_m: f64) -> Pose {
        let heading_rad = wrap_pi(heading_rad + self.heading_offset_rad);

        let delta_m = ((left_m - self.prev_left_m) + (right_m - self.prev_right_m)) / 2.0;
        let (sin, cos) = heading_rad.sin_cos();

        self.pose = Pose::new(
            self.pose.x() + delta_m * cos,
            self.pose.y() + delta_m * sin,
            heading_rad
        );

        self.prev_left_m = left_m;
        self.prev_right_m = right_m;

        trace!(
            "Odometry: ({:.3}, {:.3}, {:.3}) after delta {:.4} m",
            self.pose.x(), self.pose.y(), self.pose.heading(), delta_m
        );

        self.pose
    }

    /// Update the estimate from a sensor sample.
    pub fn update_from(&mut self, sens: &DriveSensData) -> Pose {
        self.update(sens.heading_rad, sens.left_dist_m, sens.right_dist_m)
    }

    /// The current pose estimate.
    pub fn pose(&self) -> Pose {
        self.pose
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_zero_delta_keeps_position() {
        let mut odom = Odometry::new(Pose::new(1.0, -2.0, 0.3));

        for heading in &[0.3, -1.0, 2.5, 3.1] {
            let pose = odom.update(*heading, 0.0, 0.0);
            assert_eq!(pose.x(), 1.0);
            assert_eq!(pose.y(), -2.0);
        }

        // With the same heading the pose doesn't change at all
        let before = odom.pose();
        assert_eq!(odom.update(3.1, 0.0, 0.0), before);
    }

    #[test]
    fn test_straight_line() {
        let mut odom = Odometry::new(Pose::default());
        let d = 0.25;

        for i in 1..=20 {
            let dist = d * i as f64;
            odom.update(0.0, dist, dist);
        }

        assert!((odom.pose().x() - 20.0 * d).abs() < 1e-12);
        assert_eq!(odom.pose().y(), 0.0);
    }

    #[test]
    fn test_average_of_wheels() {
        let mut odom = Odometry::new(Pose::default());

        // Left goes 1 m, right 3 m, heading +y
        let pose = odom.update(FRAC_PI_2, 1.0, 3.0);
        assert!(pose.x().abs() < 1e-12);
        assert!((pose.y() - 2.0).abs() < 1e-12);
        assert_eq!(pose.heading(), FRAC_PI_2);
    }

    #[test]
    fn test_reset_at_latches_sensors() {
        let mut odom = Odometry::new(Pose::default());
        odom.update(0.0, 5.0, 5.0);

        // Sensors read 5 m and a heading of 0, but the new run starts at (2, 1) facing +y
        let sens = DriveSensData {
            heading_rad: 0.0,
            left_dist_m: 5.0,
            right_dist_m: 5.0,
            ..Default::default()
        };
        odom.reset_at(Pose::new(2.0, 1.0, FRAC_PI_2), &sens);
        assert_eq!(odom.pose(), Pose::new(2.0, 1.0, FRAC_PI_2));

        // Moving 1 m with an unchanged sensor heading moves along +y
        let pose = odom.update(0.0, 6.0, 6.0);
        assert!((pose.x() - 2.0).abs() < 1e-12);
        assert!((pose.y() - 2.0).abs() < 1e-12);
        assert_eq!(pose.heading(), FRAC_PI_2);
    }

    #[test]
    fn test_nan_propagates() {
        let mut odom = Odometry::new(Pose::default());
        let pose = odom.update(0.0, f64::NAN, 0.0);
        assert!(pose.x().is_nan());
    }
}
