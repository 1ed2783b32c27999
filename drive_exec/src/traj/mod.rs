//! # Trajectory module
//!
//! A trajectory is a time-parameterised reference path: an ordered list of states, each giving the
//! pose, speed and curvature the drive base should have at that time since the start of the run.
//! Trajectories are produced offline by a path authoring tool and loaded from JSON files, see
//! [`file`]. Once constructed they are never modified.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod file;
mod library;
mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

pub use library::TrajLibrary;
pub use trajectory::{Trajectory, TrajectoryState};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur when building or loading a trajectory.
#[derive(Debug, thiserror::Error)]
pub enum TrajError {
    #[error("Invalid trajectory: {0}")]
    InvalidTrajectory(String),

    #[error("Trajectory file {0:?} does not exist")]
    FileNotFound(PathBuf),

    #[error("Could not read the trajectory file: {0}")]
    Io(std::io::Error),

    #[error("Could not parse the trajectory file: {0}")]
    Parse(serde_json::Error),
}
