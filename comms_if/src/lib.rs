//! # Communications interface crate.
//!
//! Provides the interfaces between the drive control software and the things
//! around it: the equipment drivers and the commanding surface.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Command definitions for the trajectory execution
pub mod tc;

/// Sensor and demand definitions for equipment (like the drive motors)
pub mod eqpt;
