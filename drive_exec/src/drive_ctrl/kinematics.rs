//! Differential drive kinematics

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{ChassisVelocity, WheelSpeeds};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Kinematic model of a differential (skid steer) drive base.
#[derive(Clone, Copy, Debug)]
pub struct DiffDriveKinematics {
    /// Distance between the left and right wheel contact points.
    ///
    /// Units: meters
    pub track_width_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiffDriveKinematics {
    pub fn new(track_width_m: f64) -> Self {
        Self { track_width_m }
    }

    /// Speeds the two sides must run at to achieve the chassis velocity.
    pub fn to_wheel_speeds(&self, vel: &ChassisVelocity) -> WheelSpeeds {
        let half_diff_ms = vel.angular_rads * self.track_width_m / 2.0;

        WheelSpeeds::new(vel.linear_ms - half_diff_ms, vel.linear_ms + half_diff_ms)
    }

    /// Chassis velocity produced by the two sides running at the given speeds.
    pub fn to_chassis(&self, speeds: &WheelSpeeds) -> ChassisVelocity {
        ChassisVelocity::new(
            (speeds.left_ms + speeds.right_ms) / 2.0,
            (speeds.right_ms - speeds.left_ms) / self.track_width_m,
        )
    }
}
