//! # Trajectory files
//!
//! Trajectories are stored as a JSON array of states in the layout written by the path authoring
//! tool:
//!
//! ```json
//! [
//!     {
//!         "time": 0.0,
//!         "velocity": 0.0,
//!         "acceleration": 0.0,
//!         "pose": {
//!             "translation": { "x": 0.0, "y": 0.0 },
//!             "rotation": { "radians": 0.0 }
//!         },
//!         "curvature": 0.0
//!     }
//! ]
//! ```
//!
//! `acceleration` may be omitted, in which case it is taken as zero. Unknown fields are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{io::ErrorKind, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{TrajError, Trajectory, TrajectoryState};
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
struct StateRecord {
    time: f64,
    velocity: f64,
    #[serde(default)]
    acceleration: f64,
    pose: PoseRecord,
    curvature: f64,
}

#[derive(Serialize, Deserialize)]
struct PoseRecord {
    translation: TranslationRecord,
    rotation: RotationRecord,
}

#[derive(Serialize, Deserialize)]
struct TranslationRecord {
    x: f64,
    y: f64,
}

#[derive(Serialize, Deserialize)]
struct RotationRecord {
    radians: f64,
}

// ---------------------------------------------------------------------------
// CONVERSIONS
// ---------------------------------------------------------------------------

impl From<&TrajectoryState> for StateRecord {
    fn from(state: &TrajectoryState) -> Self {
        Self {
            time: state.time_s,
            velocity: state.velocity_ms,
            acceleration: state.acceleration_mss,
            pose: PoseRecord {
                translation: TranslationRecord {
                    x: state.pose.x(),
                    y: state.pose.y(),
                },
                rotation: RotationRecord {
                    radians: state.pose.heading(),
                },
            },
            curvature: state.curvature_m,
        }
    }
}

impl From<StateRecord> for TrajectoryState {
    fn from(rec: StateRecord) -> Self {
        Self {
            time_s: rec.time,
            pose: Pose::new(
                rec.pose.translation.x,
                rec.pose.translation.y,
                rec.pose.rotation.radians,
            ),
            velocity_ms: rec.velocity,
            acceleration_mss: rec.acceleration,
            curvature_m: rec.curvature,
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a trajectory from a JSON string.
pub fn from_json_str(json: &str) -> Result<Trajectory, TrajError> {
    let records: Vec<StateRecord> = serde_json::from_str(json).map_err(TrajError::Parse)?;

    Trajectory::new(records.into_iter().map(TrajectoryState::from).collect())
}

/// Serialise a trajectory into a JSON string.
pub fn to_json_string(traj: &Trajectory) -> Result<String, TrajError> {
    let records: Vec<StateRecord> = traj.states().iter().map(StateRecord::from).collect();

    serde_json::to_string_pretty(&records).map_err(TrajError::Parse)
}

/// Load a trajectory from the file at the given path.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Trajectory, TrajError> {
    let path = path.as_ref();

    let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TrajError::FileNotFound(path.to_path_buf()),
        _ => TrajError::Io(e),
    })?;

    let traj = from_json_str(&json)?;

    debug!(
        "Loaded trajectory from {:?}: {} states over {:.2} s",
        path,
        traj.len(),
        traj.total_duration()
    );

    Ok(traj)
}

/// Save a trajectory to the file at the given path, overwriting any existing file.
pub fn save<P: AsRef<Path>>(traj: &Trajectory, path: P) -> Result<(), TrajError> {
    let json = to_json_string(traj)?;

    std::fs::write(path, json).map_err(TrajError::Io)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traj::trajectory::test::straight_traj;

    const AUTHORED_JSON: &str = r#"[
        {"time": 0.0, "velocity": 0.0, "acceleration": 1.5,
         "pose": {"translation": {"x": 1.0, "y": 2.0}, "rotation": {"radians": 0.5}},
         "curvature": 0.0},
        {"time": 0.2, "velocity": 0.3, "acceleration": 1.5,
         "pose": {"translation": {"x": 1.026, "y": 2.014}, "rotation": {"radians": 0.52, "cos": 0.86, "sin": 0.5}},
         "curvature": 0.4}
    ]"#;

    #[test]
    fn test_parse_authored_file() {
        let traj = from_json_str(AUTHORED_JSON).unwrap();

        assert_eq!(traj.len(), 2);
        assert_eq!(traj.total_duration(), 0.2);
        assert_eq!(traj.initial_pose(), Pose::new(1.0, 2.0, 0.5));
        assert_eq!(traj.states()[1].curvature_m, 0.4);
        assert_eq!(traj.states()[1].acceleration_mss, 1.5);
    }

    #[test]
    fn test_missing_acceleration_defaults() {
        let traj = from_json_str(
            r#"[{"time": 0.0, "velocity": 0.0, "curvature": 0.0,
                 "pose": {"translation": {"x": 0.0, "y": 0.0}, "rotation": {"radians": 0.0}}}]"#,
        )
        .unwrap();

        assert_eq!(traj.states()[0].acceleration_mss, 0.0);
    }

    #[test]
    fn test_parse_errors() {
        match from_json_str("[") {
            Err(TrajError::Parse(_)) => (),
            r => panic!("Expected a parse error, got {:?}", r),
        }

        match from_json_str("[]") {
            Err(TrajError::InvalidTrajectory(_)) => (),
            r => panic!("Expected an invalid trajectory, got {:?}", r),
        }
    }

    #[test]
    fn test_round_trip_file() {
        let traj = straight_traj();
        let path = std::env::temp_dir().join("drive_lib_round_trip.wpilib.json");

        save(&traj, &path).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, traj);
    }

    #[test]
    fn test_load_missing_file() {
        match load("/no/such/dir/missing.wpilib.json") {
            Err(TrajError::FileNotFound(p)) => {
                assert_eq!(p, std::path::PathBuf::from("/no/such/dir/missing.wpilib.json"))
            }
            r => panic!("Expected file not found, got {:?}", r),
        }
    }
}
