//! Named trajectory library

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{info, warn};

use super::{file, TrajError, Trajectory};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Extension given to trajectory files by the path authoring tool.
pub const TRAJ_FILE_EXTENSION: &str = "wpilib.json";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A set of trajectories loaded from a directory, indexed by name.
///
/// The trajectory named `foo` is loaded from `<dir>/foo.wpilib.json`. Trajectories are handed out
/// as `Arc`s so a run can hold on to its trajectory while the library is reloaded.
#[derive(Debug, Clone)]
pub struct TrajLibrary {
    dir: PathBuf,
    trajs: HashMap<String, Arc<Trajectory>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajLibrary {
    /// Create an empty library reading from the given directory.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            trajs: HashMap::new(),
        }
    }

    /// The file path a trajectory of the given name is loaded from.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, TRAJ_FILE_EXTENSION))
    }

    /// Load (or reload) the named trajectory from disk.
    ///
    /// If loading fails the error is logged and returned, and any trajectory previously loaded
    /// under this name stays in the library.
    pub fn load(&mut self, name: &str) -> Result<Arc<Trajectory>, TrajError> {
        let path = self.path_for(name);

        match file::load(&path) {
            Ok(t) => {
                let traj = Arc::new(t);
                info!(
                    "Loaded trajectory \"{}\" ({:.2} s, {} states)",
                    name,
                    traj.total_duration(),
                    traj.len()
                );
                self.trajs.insert(name.to_string(), traj.clone());
                Ok(traj)
            }
            Err(e) => {
                match self.trajs.contains_key(name) {
                    true => warn!(
                        "Could not load trajectory \"{}\", keeping the previous version: {}",
                        name, e
                    ),
                    false => warn!("Could not load trajectory \"{}\": {}", name, e),
                }
                Err(e)
            }
        }
    }

    /// Load all the named trajectories, returning the number successfully loaded.
    ///
    /// Failures are logged but don't stop the remaining trajectories from loading.
    pub fn load_all<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        names
            .iter()
            .filter(|n| self.load(n.as_ref()).is_ok())
            .count()
    }

    /// Add a trajectory under the given name, replacing any existing one.
    pub fn insert(&mut self, name: &str, traj: Trajectory) -> Arc<Trajectory> {
        let traj = Arc::new(traj);
        self.trajs.insert(name.to_string(), traj.clone());
        traj
    }

    /// Get the named trajectory, if it has been loaded.
    pub fn get(&self, name: &str) -> Option<Arc<Trajectory>> {
        self.trajs.get(name).cloned()
    }

    /// Number of loaded trajectories.
    pub fn len(&self) -> usize {
        self.trajs.len()
    }
}
