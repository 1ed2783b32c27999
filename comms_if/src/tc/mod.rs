//! # Telecommand module
//!
//! Commands which can be issued to the drive software by whatever is scheduling it.

pub mod traj;
