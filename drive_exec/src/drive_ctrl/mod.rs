//! # Drive control module
//!
//! Drive control converts a chassis velocity demand (forward speed and turn rate) into voltage
//! demands for the left and right sides of the drive base. Each side is controlled independently:
//!
//! 1. Differential drive kinematics give the target speed of each side.
//! 2. A feedforward motor model gives the voltage needed to hold that speed.
//! 3. A PID controller on the error between the target and measured speed corrects for anything
//!    the model misses.
//!
//! The sum is saturated to the supply voltage. Saturation is reported in the status report but is
//! not an error.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cmd;
mod controllers;
mod kinematics;
pub mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use cmd::*;
pub use controllers::*;
pub use kinematics::DiffDriveKinematics;
pub use params::DriveCtrlParams;
pub use state::*;
