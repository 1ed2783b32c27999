//! # Drive library.
//!
//! This library allows other crates in the workspace, the integration tests and the benchmarks to
//! access the trajectory following modules defined inside the drive crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Drive control module - converts chassis velocities into wheel voltages
pub mod drive_ctrl;

/// Localisation module - keeps track of the pose of the drive base
pub mod loc;

/// Parameters loaded at the start of execution
pub mod params;

/// Simulation client - a simulated drive base for testing without the robot
pub mod sim_client;

/// Trajectory module - stores, samples and loads the paths to be followed
pub mod traj;

/// Trajectory control module - keeps the drive base on the trajectory
pub mod traj_ctrl;

/// Trajectory execution module - runs the control chain each cycle
pub mod traj_exec;
