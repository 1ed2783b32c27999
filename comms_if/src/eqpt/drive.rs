//! # Drive Equipment Interface
//!
//! Sensor data read from, and demands sent to, the drive base equipment. The hardware drivers sit
//! behind the [`SensorSource`] and [`ActuatorSink`] traits, which are injected into the control
//! software rather than being reached globally.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One sample of the drive base sensors.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct DriveSensData {
    /// Absolute heading from the heading sensor.
    ///
    /// Units: radians, anticlockwise positive
    pub heading_rad: f64,

    /// Cumulative distance travelled by the left wheels.
    ///
    /// Units: meters
    pub left_dist_m: f64,

    /// Cumulative distance travelled by the right wheels.
    ///
    /// Units: meters
    pub right_dist_m: f64,

    /// Current speed of the left wheels.
    ///
    /// Units: meters/second
    pub left_speed_ms: f64,

    /// Current speed of the right wheels.
    ///
    /// Units: meters/second
    pub right_speed_ms: f64,
}

/// Voltage demands for the left and right sides of the drive base.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq)]
pub struct WheelVoltages {
    /// Units: volts
    pub left_v: f64,

    /// Units: volts
    pub right_v: f64,
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Something which can provide the drive sensor data each cycle.
pub trait SensorSource {
    /// Read the latest sensor sample.
    fn read(&mut self) -> DriveSensData;
}

/// Something which can actuate voltage demands on the drive motors.
pub trait ActuatorSink {
    /// Write the demands to the motors.
    fn write(&mut self, dems: WheelVoltages);
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl WheelVoltages {
    /// Create a new set of demands.
    pub fn new(left_v: f64, right_v: f64) -> Self {
        Self { left_v, right_v }
    }

    /// Demands which stop the drive base.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns true if both demands are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.left_v == 0.0 && self.right_v == 0.0
    }
}
