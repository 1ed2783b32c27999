//! # Trajectory Telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command that can be performed by the trajectory execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, StructOpt)]
pub enum TrajCmd {
    /// Start following the trajectory with the given name.
    #[structopt(name = "start")]
    Start {
        /// Name of the trajectory, as loaded in the trajectory library.
        name: String,
    },

    /// Follow a number of trajectories back to back.
    #[structopt(name = "routine")]
    Routine {
        /// Names of the trajectories in the order they will be followed.
        names: Vec<String>,
    },

    /// Abort the currently executing trajectory, stopping the drive base.
    #[structopt(name = "abort")]
    Abort,
}
