//! Trajectory storage and sampling

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use util::maths::{lerp, lerp_angle};

use super::TrajError;
use crate::loc::Pose;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One point on a trajectory.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct TrajectoryState {
    /// Time since the start of the trajectory.
    ///
    /// Units: seconds
    pub time_s: f64,

    /// The reference pose at this time.
    pub pose: Pose,

    /// Forward speed of the reference.
    ///
    /// Units: meters/second
    pub velocity_ms: f64,

    /// Forward acceleration of the reference.
    ///
    /// Units: meters/second^2
    pub acceleration_mss: f64,

    /// Curvature of the path at this point, positive turning left.
    ///
    /// Units: 1/meters
    pub curvature_m: f64,
}

/// A validated trajectory.
///
/// Always contains at least one state, the first of which is at time zero, and the states are in
/// strictly increasing time order.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<TrajectoryState>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryState {
    /// Angular velocity of the reference, the product of speed and curvature.
    ///
    /// Units: radians/second
    pub fn angular_velocity_rads(&self) -> f64 {
        self.velocity_ms * self.curvature_m
    }

    /// Interpolate between this state and `other` at time `time_s`, which should lie between the
    /// two states' times.
    fn interpolate(&self, other: &TrajectoryState, time_s: f64) -> TrajectoryState {
        let frac = (time_s - self.time_s) / (other.time_s - self.time_s);

        TrajectoryState {
            time_s,
            pose: Pose::new(
                lerp(self.pose.x(), other.pose.x(), frac),
                lerp(self.pose.y(), other.pose.y(), frac),
                lerp_angle(self.pose.heading(), other.pose.heading(), frac),
            ),
            velocity_ms: lerp(self.velocity_ms, other.velocity_ms, frac),
            acceleration_mss: lerp(self.acceleration_mss, other.acceleration_mss, frac),
            curvature_m: lerp(self.curvature_m, other.curvature_m, frac),
        }
    }
}

impl Trajectory {
    /// Build a trajectory from a list of states.
    ///
    /// Fails with [`TrajError::InvalidTrajectory`] if the list is empty, the first state isn't at
    /// time zero, or the times are not finite and strictly increasing.
    pub fn new(states: Vec<TrajectoryState>) -> Result<Self, TrajError> {
        let first = match states.first() {
            Some(s) => s,
            None => {
                return Err(TrajError::InvalidTrajectory(
                    "trajectory contains no states".into(),
                ))
            }
        };

        if first.time_s != 0.0 {
            return Err(TrajError::InvalidTrajectory(format!(
                "first state is at {} s, expected 0 s",
                first.time_s
            )));
        }

        if let Some(i) = states.iter().position(|s| !s.time_s.is_finite()) {
            return Err(TrajError::InvalidTrajectory(format!(
                "state {} has a non-finite time",
                i
            )));
        }

        // Catch equal or decreasing times
        if let Some(i) = states
            .windows(2)
            .position(|pair| pair[1].time_s <= pair[0].time_s)
        {
            return Err(TrajError::InvalidTrajectory(format!(
                "state {} at {} s does not come after state {} at {} s",
                i + 1,
                states[i + 1].time_s,
                i,
                states[i].time_s
            )));
        }

        Ok(Self { states })
    }

    /// Sample the trajectory at the given time since its start.
    ///
    /// Position, speed, acceleration and curvature are linearly interpolated between the two
    /// states either side of `time_s`, and the heading is interpolated along the shortest arc.
    ///
    /// Times before the start give the first state. Times after the end give the final state with
    /// zero speed and acceleration, so the drive base is commanded to stop there rather than
    /// carrying on.
    pub fn sample(&self, time_s: f64) -> TrajectoryState {
        let first = &self.states[0];
        let last = &self.states[self.states.len() - 1];

        // NaN fails both range checks below, treat it as the start
        if time_s.is_nan() || time_s <= first.time_s {
            return *first;
        }

        if time_s > last.time_s {
            return TrajectoryState {
                velocity_ms: 0.0,
                acceleration_mss: 0.0,
                ..*last
            };
        }

        // Index of the first state at or after the sample time. This is at least 1 since the
        // sample time is after the first state, and within bounds since it's not after the last.
        let upper = self.states.partition_point(|s| s.time_s < time_s);
        let lower = &self.states[upper - 1];
        let upper = &self.states[upper];

        if upper.time_s == time_s {
            return *upper;
        }

        lower.interpolate(upper, time_s)
    }

    /// Total duration of the trajectory, i.e. the time of the final state.
    ///
    /// Units: seconds
    pub fn total_duration(&self) -> f64 {
        self.states[self.states.len() - 1].time_s
    }

    /// The pose the trajectory starts at.
    pub fn initial_pose(&self) -> Pose {
        self.states[0].pose
    }

    /// The pose the trajectory ends at.
    pub fn final_pose(&self) -> Pose {
        self.states[self.states.len() - 1].pose
    }

    /// All states in the trajectory.
    pub fn states(&self) -> &[TrajectoryState] {
        &self.states
    }

    /// The number of states in the trajectory.
    pub fn len(&self) -> usize {
        self.states.len()
    }
}
