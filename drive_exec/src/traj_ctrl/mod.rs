//! # Trajectory control module
//!
//! Trajectory control is responsible for keeping the drive base on the reference trajectory. It
//! does this with the Ramsete nonlinear tracking law, which takes the error between the current
//! pose and the reference pose (expressed in the drive base's own frame) and corrects the
//! reference's speed and turn rate to drive that error to zero.
//!
//! The controller holds no state between cycles, it is a pure function of the current pose, the
//! sampled reference state and the gains.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
mod ramsete;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use params::RamseteParams;
pub use ramsete::*;
