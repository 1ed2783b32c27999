//! # Simulation Client
//!
//! Provides a simulated drive base for testing and development of the trajectory following
//! without the robot. The [`SimDrive`] implements both [`SensorSource`] and [`ActuatorSink`], with
//! each side of the drive modelled by the same friction, velocity and acceleration constants as
//! the feedforward, so a clone of the handle can be given to the execution as each of them.
//!
//! The simulation doesn't advance on its own, [`SimDrive::step`] must be called once per cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard};

use comms_if::eqpt::drive::{ActuatorSink, DriveSensData, SensorSource, WheelVoltages};
use log::trace;
use util::maths::wrap_pi;

use crate::{
    drive_ctrl::{DriveCtrlParams, Feedforward},
    loc::Pose,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Longest step used when integrating the model.
const MAX_SUBSTEP_S: f64 = 0.001;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Physical constants of the simulated drive base.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    pub track_width_m: f64,

    /// Motor model constants, in the same units as the feedforward gains.
    pub k_s: f64,
    pub k_v: f64,
    pub k_a: f64,

    /// Reading of the heading sensor when the true heading is zero.
    pub heading_offset_rad: f64,
}

/// Handle to a simulated drive base. Clones share the same simulation.
#[derive(Clone)]
pub struct SimDrive {
    state: Arc<Mutex<SimState>>,
}

struct SimState {
    params: SimParams,
    model: Feedforward,

    pose: Pose,

    left_speed_ms: f64,
    right_speed_ms: f64,
    left_dist_m: f64,
    right_dist_m: f64,

    dems: WheelVoltages,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimParams {
    /// A drive base which exactly matches the controller's model of it.
    pub fn from_drive_params(params: &DriveCtrlParams) -> Self {
        Self {
            track_width_m: params.track_width_m,
            k_s: params.k_s,
            k_v: params.k_v,
            k_a: params.k_a,
            heading_offset_rad: 0.0,
        }
    }
}

impl SimDrive {
    /// Create a new stationary drive base at the given pose.
    pub fn new(params: SimParams, start_pose: Pose) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                params,
                model: Feedforward::new(params.k_s, params.k_v, params.k_a),
                pose: start_pose,
                left_speed_ms: 0.0,
                right_speed_ms: 0.0,
                left_dist_m: 0.0,
                right_dist_m: 0.0,
                dems: WheelVoltages::zero(),
            })),
        }
    }

    /// Advance the simulation by `dt` seconds, holding the last demanded voltages.
    pub fn step(&self, dt: f64) {
        if !(dt > 0.0) || !dt.is_finite() {
            return;
        }

        let mut state = self.lock();

        let num_substeps = (dt / MAX_SUBSTEP_S).ceil().max(1.0) as usize;
        let sub_dt = dt / num_substeps as f64;

        for _ in 0..num_substeps {
            state.substep(sub_dt);
        }

        trace!(
            "SimDrive at ({:.3}, {:.3}, {:.3}), speeds ({:.3}, {:.3}) m/s",
            state.pose.x(),
            state.pose.y(),
            state.pose.heading(),
            state.left_speed_ms,
            state.right_speed_ms
        );
    }

    /// The true pose of the simulated drive base.
    pub fn true_pose(&self) -> Pose {
        self.lock().pose
    }

    /// The voltages currently applied to the motors.
    pub fn dems(&self) -> WheelVoltages {
        self.lock().dems
    }

    fn lock(&self) -> MutexGuard<SimState> {
        // The state is always left consistent so a panic elsewhere doesn't invalidate it
        match self.state.lock() {
            Ok(s) => s,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SimState {
    fn substep(&mut self, dt: f64) {
        self.left_speed_ms = side_step(&self.model, self.dems.left_v, self.left_speed_ms, dt);
        self.right_speed_ms = side_step(&self.model, self.dems.right_v, self.right_speed_ms, dt);

        self.left_dist_m += self.left_speed_ms * dt;
        self.right_dist_m += self.right_speed_ms * dt;

        let speed_ms = (self.left_speed_ms + self.right_speed_ms) / 2.0;
        let turn_rate_rads = (self.right_speed_ms - self.left_speed_ms) / self.params.track_width_m;

        // Integrate about the midpoint heading
        let mid_heading = self.pose.heading() + 0.5 * turn_rate_rads * dt;

        self.pose = Pose::new(
            self.pose.x() + speed_ms * mid_heading.cos() * dt,
            self.pose.y() + speed_ms * mid_heading.sin() * dt,
            self.pose.heading() + turn_rate_rads * dt,
        );
    }
}

impl SensorSource for SimDrive {
    fn read(&mut self) -> DriveSensData {
        let state = self.lock();

        DriveSensData {
            heading_rad: wrap_pi(state.pose.heading() + state.params.heading_offset_rad),
            left_dist_m: state.left_dist_m,
            right_dist_m: state.right_dist_m,
            left_speed_ms: state.left_speed_ms,
            right_speed_ms: state.right_speed_ms,
        }
    }
}

impl ActuatorSink for SimDrive {
    fn write(&mut self, dems: WheelVoltages) {
        self.lock().dems = dems;
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Find the new speed of one side of the drive after `dt` seconds at `voltage`.
fn side_step(model: &Feedforward, voltage: f64, speed: f64, dt: f64) -> f64 {
    if speed == 0.0 {
        // Static friction holds the wheel until overcome
        if voltage.abs() <= model.k_s {
            return 0.0;
        }

        return (voltage - model.k_s * voltage.signum()) / model.k_a * dt;
    }

    let new_speed = speed + model.accel_for(voltage, speed) * dt;

    // Friction stops the wheel rather than reversing it
    if new_speed.signum() != speed.signum() {
        0.0
    } else {
        new_speed
    }
}
