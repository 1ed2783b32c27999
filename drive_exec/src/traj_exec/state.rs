//! Implementations for the TrajExec state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{collections::VecDeque, sync::Arc};

use comms_if::eqpt::drive::{ActuatorSink, SensorSource, WheelVoltages};
use log::{debug, error, info, trace, warn};

use super::{ExecState, TrajExecError};
use crate::{
    drive_ctrl::{self, ChassisVelocity, DriveCtrl, WheelSpeeds},
    loc::{Odometry, Pose},
    params::ControllerGains,
    traj::{Trajectory, TrajectoryState},
    traj_ctrl::{Ramsete, TrackingError},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Trajectory execution
///
/// Owns the estimator and both controllers, and the injected sensor and actuator handles. All
/// processing happens inside [`TrajExec::tick`], which must be called once per control cycle.
pub struct TrajExec<S, A> {
    sensors: S,
    actuators: A,

    odometry: Odometry,
    ramsete: Ramsete,
    drive_ctrl: DriveCtrl,

    state: ExecState,

    /// The trajectory of the current (or most recent) run
    traj: Option<Arc<Trajectory>>,

    /// Trajectories of the routine still to be run
    queue: VecDeque<Arc<Trajectory>>,

    /// Time at which the current run was started
    start_time_s: f64,

    /// Time of the previous tick in this run, `None` before the first tick
    prev_tick_s: Option<f64>,
}

/// Status report for one tick of the execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusReport {
    /// Time since the start of the run.
    pub elapsed_s: f64,

    /// Pose estimate after the odometry update.
    pub pose: Pose,

    /// Sample of the trajectory being tracked, `None` on the tick that finishes the run.
    pub reference: Option<TrajectoryState>,

    pub tracking_error: TrackingError,

    /// True if the pose is within tolerance of the reference.
    pub at_reference: bool,

    /// Chassis velocity demanded by the tracking controller.
    pub chassis_vel: ChassisVelocity,

    /// Voltages written to the motors this tick.
    pub dems: WheelVoltages,

    pub drive: drive_ctrl::StatusReport,

    /// True if this tick finished the run.
    pub finished: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S, A> TrajExec<S, A>
where
    S: SensorSource,
    A: ActuatorSink,
{
    /// Create a new execution from the controller gains and the equipment handles.
    ///
    /// The gains should already have been validated.
    pub fn new(gains: &ControllerGains, sensors: S, actuators: A) -> Self {
        Self {
            sensors,
            actuators,
            odometry: Odometry::new(Pose::default()),
            ramsete: Ramsete::new(&gains.ramsete),
            drive_ctrl: DriveCtrl::new(&gains.drive),
            state: ExecState::NotStarted,
            traj: None,
            queue: VecDeque::new(),
            start_time_s: 0.0,
            prev_tick_s: None,
        }
    }

    /// Start following a trajectory.
    ///
    /// The pose estimate is reset to the start of the trajectory and `now_s` is taken as the start
    /// time. Any routine still queued is discarded.
    pub fn start(
        &mut self,
        traj: Option<Arc<Trajectory>>,
        now_s: f64,
    ) -> Result<(), TrajExecError> {
        if self.state == ExecState::Running {
            warn!("Cannot start a new trajectory while one is running");
            return Err(TrajExecError::AlreadyRunning);
        }

        let traj = match traj {
            Some(t) => t,
            None => {
                error!("Cannot start execution, no trajectory given");
                return Err(TrajExecError::MissingTrajectory);
            }
        };

        if !self.queue.is_empty() {
            debug!("Discarding {} queued trajectories", self.queue.len());
            self.queue.clear();
        }

        self.start_run(traj, now_s);

        Ok(())
    }

    /// Queue a routine of trajectories to be followed one after another.
    ///
    /// The first trajectory is started on the next call to [`TrajExec::tick`], and each following
    /// one on the tick after its predecessor finishes.
    pub fn begin_routine(&mut self, trajs: Vec<Arc<Trajectory>>) -> Result<(), TrajExecError> {
        if self.state == ExecState::Running {
            warn!("Cannot begin a routine while a trajectory is running");
            return Err(TrajExecError::AlreadyRunning);
        }

        if trajs.is_empty() {
            warn!("Cannot begin an empty routine");
            return Err(TrajExecError::EmptyRoutine);
        }

        info!("Routine of {} trajectories queued", trajs.len());
        self.queue = trajs.into();

        Ok(())
    }

    /// Run one control cycle at time `now_s`.
    ///
    /// Returns `None` if there is nothing to run, otherwise the status of the cycle.
    pub fn tick(&mut self, now_s: f64) -> Option<StatusReport> {
        if self.state != ExecState::Running {
            match self.queue.pop_front() {
                Some(next) => self.start_run(next, now_s),
                None => return None,
            }
        }

        let mut report = StatusReport::default();

        // Estimate is updated on every running tick, including the last one
        let sens = self.sensors.read();
        report.pose = self.odometry.update_from(&sens);

        report.elapsed_s = now_s - self.start_time_s;
        let dt = self.prev_tick_s.map(|prev| now_s - prev);
        self.prev_tick_s = Some(now_s);

        let traj = match self.traj.as_ref() {
            Some(t) => t,
            None => {
                // Can't be running without a trajectory, stop rather than drive blind
                warn!("TrajExec running without a trajectory, stopping");
                self.finish();
                report.finished = true;
                return Some(report);
            }
        };

        if !report.elapsed_s.is_finite() {
            warn!("Non-finite elapsed time ({}), stopping", report.elapsed_s);
            self.finish();
            report.finished = true;
            return Some(report);
        }

        if report.elapsed_s >= traj.total_duration() {
            self.finish();
            info!(
                "Trajectory finished after {:.3} s at ({:.3}, {:.3}, {:.3})",
                report.elapsed_s,
                report.pose.x(),
                report.pose.y(),
                report.pose.heading()
            );
            report.finished = true;
            return Some(report);
        }

        let reference = traj.sample(report.elapsed_s);
        report.tracking_error = self.ramsete.tracking_error(&report.pose, &reference);
        report.at_reference = self.ramsete.at_reference(&report.tracking_error);
        report.chassis_vel = self
            .ramsete
            .calc_velocity_with_error(&reference, &report.tracking_error);
        report.reference = Some(reference);

        let (dems, drive_report) =
            self.drive_ctrl
                .proc(&report.chassis_vel, &WheelSpeeds::from(&sens), dt);
        self.actuators.write(dems);
        report.dems = dems;
        report.drive = drive_report;

        trace!(
            "TrajExec t = {:.3} s, pose ({:.3}, {:.3}, {:.3}), dems ({:.2}, {:.2}) V",
            report.elapsed_s,
            report.pose.x(),
            report.pose.y(),
            report.pose.heading(),
            dems.left_v,
            dems.right_v
        );

        Some(report)
    }

    /// Stop immediately, commanding zero voltage and discarding any queued routine.
    pub fn abort(&mut self) {
        if self.state == ExecState::Running || !self.queue.is_empty() {
            warn!("Trajectory execution aborted");
            self.state = ExecState::Finished;
        }

        self.queue.clear();

        self.actuators.write(WheelVoltages::zero());
    }

    /// True once the current run has ended.
    pub fn is_finished(&self) -> bool {
        self.state == ExecState::Finished
    }

    /// True when nothing is running and no trajectories are queued.
    pub fn is_routine_complete(&self) -> bool {
        self.state != ExecState::Running && self.queue.is_empty()
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// The current pose estimate.
    pub fn pose(&self) -> Pose {
        self.odometry.pose()
    }

    /// The trajectory of the current or most recent run.
    pub fn current_traj(&self) -> Option<&Arc<Trajectory>> {
        self.traj.as_ref()
    }

    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }

    pub fn actuators_mut(&mut self) -> &mut A {
        &mut self.actuators
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    fn start_run(&mut self, traj: Arc<Trajectory>, now_s: f64) {
        let sens = self.sensors.read();
        self.odometry.reset_at(traj.initial_pose(), &sens);
        self.drive_ctrl.reset();

        self.start_time_s = now_s;
        self.prev_tick_s = None;
        self.state = ExecState::Running;

        info!(
            "Starting trajectory of {} states ({:.3} s)",
            traj.len(),
            traj.total_duration()
        );

        self.traj = Some(traj);
    }

    fn finish(&mut self) {
        self.actuators.write(WheelVoltages::zero());
        self.state = ExecState::Finished;
    }
}
