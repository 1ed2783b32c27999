//! Telecommand processing for TrajExec

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::Arc;

use comms_if::{
    eqpt::drive::{ActuatorSink, SensorSource},
    tc::traj::TrajCmd,
};
use log::{info, warn};

use super::{TrajExec, TrajExecError};
use crate::traj::{TrajLibrary, Trajectory};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S, A> TrajExec<S, A>
where
    S: SensorSource,
    A: ActuatorSink,
{
    /// Execute a trajectory command, looking up trajectory names in the given library.
    ///
    /// A routine naming any trajectory missing from the library is rejected as a whole.
    pub fn exec_cmd(
        &mut self,
        cmd: &TrajCmd,
        library: &TrajLibrary,
        now_s: f64,
    ) -> Result<(), TrajExecError> {
        match cmd {
            TrajCmd::Start { name } => {
                let traj = library.get(name);
                if traj.is_none() {
                    warn!("No trajectory named \"{}\" has been loaded", name);
                }

                info!("Start command for trajectory \"{}\"", name);
                self.start(traj, now_s)
            }
            TrajCmd::Routine { names } => {
                let trajs = names
                    .iter()
                    .map(|name| {
                        library.get(name).ok_or_else(|| {
                            warn!("Routine names unknown trajectory \"{}\"", name);
                            TrajExecError::MissingTrajectory
                        })
                    })
                    .collect::<Result<Vec<Arc<Trajectory>>, _>>()?;

                info!("Routine command for {:?}", names);
                self.begin_routine(trajs)
            }
            TrajCmd::Abort => {
                info!("Abort command");
                self.abort();
                Ok(())
            }
        }
    }
}
