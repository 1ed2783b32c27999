//! Implementations for the DriveCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};
use serde::Serialize;

// Internal
use super::{
    ChassisVelocity, DiffDriveKinematics, DriveCtrlParams, Feedforward, PidController,
    WheelSpeeds, WheelVoltages,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Drive control module state
#[derive(Debug, Clone)]
pub struct DriveCtrl {
    kinematics: DiffDriveKinematics,
    feedforward: Feedforward,
    max_voltage_v: f64,

    left_pid: PidController,
    right_pid: PidController,

    /// Target wheel speeds on the previous cycle, used to find the target acceleration
    prev_target: Option<WheelSpeeds>,
}

/// Status report for DriveCtrl processing.
#[derive(Clone, Copy, Default, Serialize, Debug, PartialEq)]
pub struct StatusReport {
    /// Target wheel speeds from the kinematics
    pub target: WheelSpeeds,

    /// Feedforward part of the left voltage
    pub left_ff_v: f64,

    /// Feedforward part of the right voltage
    pub right_ff_v: f64,

    /// True if the left voltage was limited to the supply range
    pub left_saturated: bool,

    /// True if the right voltage was limited to the supply range
    pub right_saturated: bool,

    /// True if a non-finite voltage was calculated and replaced with zero
    pub non_finite_output: bool,

    /// Integral accumulation of each side's speed controller
    pub left_integral: f64,
    pub right_integral: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DriveCtrl {
    /// Create a new instance of drive control from the parameters.
    pub fn new(params: &DriveCtrlParams) -> Self {
        Self {
            kinematics: DiffDriveKinematics::new(params.track_width_m),
            feedforward: Feedforward::new(params.k_s, params.k_v, params.k_a),
            max_voltage_v: params.max_voltage_v,
            left_pid: PidController::new(params.k_p, params.k_i, params.k_d),
            right_pid: PidController::new(params.k_p, params.k_i, params.k_d),
            prev_target: None,
        }
    }

    /// Reset the controllers' memory, must be called before each new run.
    pub fn reset(&mut self) {
        self.left_pid.reset();
        self.right_pid.reset();
        self.prev_target = None;
    }

    /// Calculate the voltage demands needed to achieve the given chassis velocity.
    ///
    /// `measured` is the current speed of each side, and `dt` the time since the last call, or
    /// `None` if this is the first call since a reset.
    pub fn proc(
        &mut self,
        vel: &ChassisVelocity,
        measured: &WheelSpeeds,
        dt: Option<f64>,
    ) -> (WheelVoltages, StatusReport) {
        let mut report = StatusReport::default();

        let target = self.kinematics.to_wheel_speeds(vel);
        report.target = target;

        // Target accelerations, zero if we don't know the previous target
        let (left_accel, right_accel) = match (self.prev_target, dt) {
            (Some(prev), Some(t)) if t > 0.0 => (
                (target.left_ms - prev.left_ms) / t,
                (target.right_ms - prev.right_ms) / t,
            ),
            _ => (0.0, 0.0),
        };
        self.prev_target = Some(target);

        report.left_ff_v = self.feedforward.calc(target.left_ms, left_accel);
        report.right_ff_v = self.feedforward.calc(target.right_ms, right_accel);

        let left_v = report.left_ff_v
            + self.left_pid.get(target.left_ms - measured.left_ms, dt);
        let right_v = report.right_ff_v
            + self.right_pid.get(target.right_ms - measured.right_ms, dt);
        report.left_integral = self.left_pid.integral();
        report.right_integral = self.right_pid.integral();

        let (left_v, left_sat) = self.saturate(left_v, &mut report.non_finite_output);
        let (right_v, right_sat) = self.saturate(right_v, &mut report.non_finite_output);
        report.left_saturated = left_sat;
        report.right_saturated = right_sat;

        if left_sat || right_sat {
            trace!(
                "DriveCtrl output saturated (left: {}, right: {})",
                left_sat,
                right_sat
            );
        }

        let dems = WheelVoltages::new(left_v, right_v);

        trace!(
            "DriveCtrl: target ({:.3}, {:.3}) m/s, measured ({:.3}, {:.3}) m/s -> ({:.2}, {:.2}) V",
            target.left_ms,
            target.right_ms,
            measured.left_ms,
            measured.right_ms,
            dems.left_v,
            dems.right_v
        );

        (dems, report)
    }

    /// Limit a voltage to the supply range, returning the limited voltage and whether it was
    /// limited. Non-finite voltages are replaced with zero.
    fn saturate(&self, voltage: f64, non_finite: &mut bool) -> (f64, bool) {
        if !voltage.is_finite() {
            warn!("DriveCtrl calculated a non-finite voltage ({}), demanding zero", voltage);
            *non_finite = true;
            return (0.0, false);
        }

        let limited = voltage.clamp(-self.max_voltage_v, self.max_voltage_v);

        (limited, limited != voltage)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> DriveCtrlParams {
        DriveCtrlParams {
            track_width_m: 0.6,
            max_voltage_v: 12.0,
            k_s: 0.5,
            k_v: 2.0,
            k_a: 0.2,
            k_p: 1.0,
            k_i: 0.0,
            k_d: 0.0,
        }
    }

    #[test]
    fn test_feedforward_only_when_tracking() {
        let mut ctrl = DriveCtrl::new(&params());

        // Measured speed matches the target so only the feedforward contributes
        let (dems, report) = ctrl.proc(
            &ChassisVelocity::new(1.0, 0.0),
            &WheelSpeeds::new(1.0, 1.0),
            None,
        );

        assert_eq!(dems, WheelVoltages::new(2.5, 2.5));
        assert_eq!(report.target, WheelSpeeds::new(1.0, 1.0));
        assert!(!report.left_saturated && !report.right_saturated);
    }

    #[test]
    fn test_feedback_and_accel() {
        let mut ctrl = DriveCtrl::new(&params());

        ctrl.proc(&ChassisVelocity::new(1.0, 0.0), &WheelSpeeds::new(1.0, 1.0), None);

        // Target increases by 0.1 m/s over 0.02 s (5 m/s^2), left side lagging by 0.5 m/s
        let (dems, report) = ctrl.proc(
            &ChassisVelocity::new(1.1, 0.0),
            &WheelSpeeds::new(0.6, 1.1),
            Some(0.02),
        );

        let ff = 0.5 + 2.0 * 1.1 + 0.2 * 5.0;
        assert!((report.left_ff_v - ff).abs() < 1e-9);
        assert!((dems.left_v - (ff + 0.5)).abs() < 1e-9);
        assert!((dems.right_v - ff).abs() < 1e-9);
    }

    #[test]
    fn test_saturation() {
        let mut ctrl = DriveCtrl::new(&params());

        let (dems, report) = ctrl.proc(
            &ChassisVelocity::new(10.0, 0.0),
            &WheelSpeeds::new(0.0, 0.0),
            None,
        );

        assert_eq!(dems, WheelVoltages::new(12.0, 12.0));
        assert!(report.left_saturated && report.right_saturated);

        let (dems, _) = ctrl.proc(
            &ChassisVelocity::new(-10.0, 0.0),
            &WheelSpeeds::new(0.0, 0.0),
            None,
        );
        assert_eq!(dems, WheelVoltages::new(-12.0, -12.0));
    }

    #[test]
    fn test_non_finite_gives_zero() {
        let mut ctrl = DriveCtrl::new(&params());

        let (dems, report) = ctrl.proc(
            &ChassisVelocity::new(0.5, 0.0),
            &WheelSpeeds::new(f64::NAN, 0.5),
            None,
        );

        assert_eq!(dems.left_v, 0.0);
        assert!(report.non_finite_output);
    }

    #[test]
    fn test_stopped_gives_zero() {
        let mut ctrl = DriveCtrl::new(&params());

        let (dems, _) = ctrl.proc(
            &ChassisVelocity::new(0.0, 0.0),
            &WheelSpeeds::new(0.0, 0.0),
            None,
        );
        assert!(dems.is_zero());
    }
}
