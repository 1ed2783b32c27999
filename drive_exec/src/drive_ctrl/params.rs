//! Parameters structure for DriveCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for drive control.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriveCtrlParams {

    // ---- GEOMETRY ----

    /// Distance between the left and right wheel contact points.
    ///
    /// Units: meters
    pub track_width_m: f64,

    // ---- CAPABILITIES ----

    /// Magnitude of the supply voltage, demands are limited to +/- this value.
    ///
    /// Units: volts
    pub max_voltage_v: f64,

    // ---- FEEDFORWARD ----

    /// Static friction voltage.
    ///
    /// Units: volts
    pub k_s: f64,

    /// Voltage per unit speed.
    ///
    /// Units: volts/(meters/second)
    pub k_v: f64,

    /// Voltage per unit acceleration.
    ///
    /// Units: volts/(meters/second^2)
    pub k_a: f64,

    // ---- SPEED PID ----

    /// Speed controller proportional gain
    pub k_p: f64,

    /// Speed controller integral gain
    pub k_i: f64,

    /// Speed controller derivative gain
    pub k_d: f64,
}
