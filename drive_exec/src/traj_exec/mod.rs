//! # Trajectory Execution module
//!
//! This module implements [`TrajExec`], which drives the robot along a [`Trajectory`] by running
//! the estimation and control chain once per control cycle:
//!
//! 1. Read the drive sensors and update the [`Odometry`](crate::loc::Odometry) estimate.
//! 2. Sample the trajectory at the time since the run started.
//! 3. Find the chassis velocity to track the sample using [`Ramsete`](crate::traj_ctrl::Ramsete).
//! 4. Convert that velocity into voltages with [`DriveCtrl`](crate::drive_ctrl::DriveCtrl).
//! 5. Write the voltages to the motors.
//!
//! Each run moves through the states `NotStarted -> Running -> Finished`. Once the elapsed time
//! reaches the duration of the trajectory the motors are commanded to zero and the run finishes.
//!
//! Trajectories may also be chained into a routine, in which each trajectory is started only once
//! the one before it has finished.
//!
//! [`Trajectory`]: crate::traj::Trajectory

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod cmd;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use state::*;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The state of a single trajectory run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum ExecState {
    /// No trajectory has been started yet.
    NotStarted,

    /// A trajectory is being followed.
    Running,

    /// The last trajectory reached its end or was aborted, the motors have been commanded to zero.
    Finished,
}

/// Errors which can occur when starting a run.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TrajExecError {
    #[error("No trajectory was provided to follow")]
    MissingTrajectory,

    #[error("A trajectory is already running, it must finish or be aborted first")]
    AlreadyRunning,

    #[error("The routine contains no trajectories")]
    EmptyRoutine,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ExecState {
    fn default() -> Self {
        ExecState::NotStarted
    }
}
