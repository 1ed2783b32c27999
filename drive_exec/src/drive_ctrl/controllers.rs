//! # Drive controllers module
//!
//! This module provides the feedforward model and PID controller used by DriveCtrl.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A PID controller
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Previous error
    prev_error: Option<f64>,

    /// The integral accumulation
    integral: f64
}

/// Feedforward model of a DC motor driving the wheels.
///
/// Voltage is modelled as `k_s * sign(v) + k_v * v + k_a * a`.
#[derive(Debug, Serialize, Clone, Copy)]
pub struct Feedforward {
    /// Static friction voltage
    pub k_s: f64,

    /// Voltage per unit speed
    pub k_v: f64,

    /// Voltage per unit acceleration
    pub k_a: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidController {

    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64) -> Self {
        Self {
            k_p, k_i, k_d,
            integral: 0f64,
            prev_error: None
        }
    }

    /// Get the value of the controller for the given error.
    ///
    /// `dt` is the time since the previous call, or `None` if there was no previous call (or the
    /// controller has just been reset).
    pub fn get(&mut self, error: f64, dt: Option<f64>) -> f64 {
        // Ignore zero or negative time steps, they'd make the derivative blow up
        let dt = dt.filter(|t| *t > 0f64);

        // Accumulate the integral term.
        //
        // If there's no time difference then we don't accumulate the integral
        // The other option is to add on the error and that will produce a 
        // large spike in integral compared to normal operation, so we don't do
        // this.
        if let Some(t) = dt {
            self.integral += error * t;
        }

        // Calculate the derivative.
        //
        // If there's no time difference or previous error we assume no derivative, for the same
        // reasons as for integral.
        let deriv = match (self.prev_error, dt) {
            (Some(e), Some(t)) => (error - e) / t,
            _ => 0f64
        };

        // Calculate the output
        let out = 
            self.k_p * error 
            + self.k_i * self.integral 
            + self.k_d * deriv;
        
        // Remember the previous error
        self.prev_error = Some(error);

        out
    }

    /// Clear the integral accumulation and previous error.
    pub fn reset(&mut self) {
        self.integral = 0f64;
        self.prev_error = None;
    }

    /// The current integral accumulation.
    pub fn integral(&self) -> f64 {
        self.integral
    }
}

impl Feedforward {

    pub fn new(k_s: f64, k_v: f64, k_a: f64) -> Self {
        Self { k_s, k_v, k_a }
    }

    /// Voltage needed to run at `speed` while accelerating at `accel`.
    pub fn calc(&self, speed: f64, accel: f64) -> f64 {
        // f64::signum gives 1 for +0, but a stationary demand shouldn't get the friction voltage
        let sign = if speed == 0f64 { 0f64 } else { speed.signum() };

        self.k_s * sign + self.k_v * speed + self.k_a * accel
    }

    /// The acceleration given by a voltage while at `speed`, the inverse of [`Feedforward::calc`].
    pub fn accel_for(&self, voltage: f64, speed: f64) -> f64 {
        let sign = if speed == 0f64 { 0f64 } else { speed.signum() };

        (voltage - self.k_s * sign - self.k_v * speed) / self.k_a
    }
}
