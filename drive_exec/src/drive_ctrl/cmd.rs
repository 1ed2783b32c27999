//! Commands and measurements passed into DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::drive::DriveSensData;
use serde::Serialize;

pub use comms_if::eqpt::drive::WheelVoltages;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Speed of the body of the drive base.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ChassisVelocity {
    /// Forward speed.
    ///
    /// Units: meters/second
    pub linear_ms: f64,

    /// Turn rate, anticlockwise positive.
    ///
    /// Units: radians/second
    pub angular_rads: f64,
}

/// Speed of the left and right sides of the drive base over the ground.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WheelSpeeds {
    /// Units: meters/second
    pub left_ms: f64,

    /// Units: meters/second
    pub right_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ChassisVelocity {
    pub fn new(linear_ms: f64, angular_rads: f64) -> Self {
        Self {
            linear_ms,
            angular_rads,
        }
    }
}

impl WheelSpeeds {
    pub fn new(left_ms: f64, right_ms: f64) -> Self {
        Self { left_ms, right_ms }
    }
}

impl From<&DriveSensData> for WheelSpeeds {
    fn from(sens: &DriveSensData) -> Self {
        Self::new(sens.left_speed_ms, sens.right_speed_ms)
    }
}
