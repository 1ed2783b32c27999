//! Closed loop tests of the trajectory execution against the simulated drive base.

use std::{path::PathBuf, sync::Arc};

use comms_if::{
    eqpt::drive::{ActuatorSink, WheelVoltages},
    tc::traj::TrajCmd,
};
use drive_lib::{
    loc::Pose,
    params::ControllerGains,
    sim_client::{SimDrive, SimParams},
    traj::{file, TrajLibrary, Trajectory},
    traj_exec::{StatusReport, TrajExec},
};
use util::maths::get_ang_dist;

const CYCLE_PERIOD_S: f64 = 0.02;

/// Passes demands through to the sim, keeping a copy of each.
struct Recorder {
    sim: SimDrive,
    log: Vec<WheelVoltages>,
}

impl ActuatorSink for Recorder {
    fn write(&mut self, dems: WheelVoltages) {
        self.log.push(dems);
        self.sim.write(dems);
    }
}

fn gains() -> ControllerGains {
    ControllerGains::from_toml_str(include_str!("../../params/controller_gains.toml")).unwrap()
}

fn paths_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../paths")
}

fn load(name: &str) -> Arc<Trajectory> {
    let lib_path = paths_dir().join(format!("{}.wpilib.json", name));
    Arc::new(file::load(lib_path).unwrap())
}

/// Tick until the routine completes, stepping the sim between ticks.
fn run<A: ActuatorSink>(
    exec: &mut TrajExec<SimDrive, A>,
    sim: &SimDrive,
    max_s: f64,
) -> Vec<StatusReport> {
    let mut reports = Vec::new();
    let mut num_cycles = 0u64;

    loop {
        let now_s = num_cycles as f64 * CYCLE_PERIOD_S;
        assert!(now_s < max_s, "execution didn't complete in {} s", max_s);

        if let Some(r) = exec.tick(now_s) {
            reports.push(r);
        }

        if exec.is_routine_complete() {
            return reports;
        }

        sim.step(CYCLE_PERIOD_S);
        num_cycles += 1;
    }
}

fn assert_near(pose: &Pose, target: &Pose, pos_tol_m: f64, heading_tol_rad: f64) {
    let dist_m = (pose.position() - target.position()).norm();
    let heading_err = get_ang_dist(pose.heading(), target.heading()).abs();

    assert!(
        dist_m < pos_tol_m && heading_err < heading_tol_rad,
        "pose {:?} too far from {:?} ({:.3} m, {:.3} rad)",
        pose,
        target,
        dist_m,
        heading_err
    );
}

#[test]
fn test_follow_s_curve() {
    let gains = gains();
    let traj = load("s_curve");

    let sim = SimDrive::new(SimParams::from_drive_params(&gains.drive), traj.initial_pose());
    let mut exec = TrajExec::new(&gains, sim.clone(), sim.clone());

    exec.start(Some(traj.clone()), 0.0).unwrap();
    let reports = run(&mut exec, &sim, 10.0);

    // Finishes exactly once, on the last tick
    assert_eq!(reports.iter().filter(|r| r.finished).count(), 1);
    assert!(reports.last().unwrap().finished);
    assert_eq!(sim.dems(), WheelVoltages::zero());

    for r in &reports {
        assert!(r.dems.left_v.abs() <= gains.drive.max_voltage_v);
        assert!(r.dems.right_v.abs() <= gains.drive.max_voltage_v);
    }

    assert_near(&exec.pose(), &traj.final_pose(), 0.1, 0.1);
    assert_near(&sim.true_pose(), &traj.final_pose(), 0.15, 0.1);
}

#[test]
fn test_follow_with_model_error() {
    let gains = gains();
    let traj = load("s_curve");

    // The real drive base is draggier than the model, and its heading sensor isn't zeroed
    let sim_params = SimParams {
        k_s: gains.drive.k_s * 1.5,
        k_v: gains.drive.k_v * 1.1,
        heading_offset_rad: 0.3,
        ..SimParams::from_drive_params(&gains.drive)
    };
    let sim = SimDrive::new(sim_params, traj.initial_pose());
    let mut exec = TrajExec::new(&gains, sim.clone(), sim.clone());

    exec.start(Some(traj.clone()), 0.0).unwrap();
    run(&mut exec, &sim, 10.0);

    assert_near(&exec.pose(), &traj.final_pose(), 0.15, 0.15);
    assert_near(&sim.true_pose(), &traj.final_pose(), 0.2, 0.15);
}

#[test]
fn test_routine_from_library() {
    let gains = gains();

    let mut library = TrajLibrary::new(paths_dir());
    assert_eq!(library.load_all(&["straight", "turn_left", "missing"]), 2);

    let straight = library.get("straight").unwrap();
    let turn = library.get("turn_left").unwrap();

    let sim = SimDrive::new(
        SimParams::from_drive_params(&gains.drive),
        straight.initial_pose(),
    );
    let recorder = Recorder {
        sim: sim.clone(),
        log: Vec::new(),
    };
    let mut exec = TrajExec::new(&gains, sim.clone(), recorder);

    let cmd = TrajCmd::Routine {
        names: vec!["straight".into(), "turn_left".into()],
    };
    exec.exec_cmd(&cmd, &library, 0.0).unwrap();

    let reports = run(&mut exec, &sim, 20.0);

    // Each segment finishes once with a zero demand, and the second starts from its own first pose
    let finish_idxs: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| r.finished)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(finish_idxs.len(), 2);

    let log = &exec.actuators().log;
    assert_eq!(log[finish_idxs[0]], WheelVoltages::zero());
    assert_eq!(log.last(), Some(&WheelVoltages::zero()));

    let second_start = &reports[finish_idxs[0] + 1];
    assert_eq!(second_start.elapsed_s, 0.0);
    assert_eq!(second_start.reference.map(|r| r.time_s), Some(0.0));

    assert_near(
        &reports[finish_idxs[0]].pose,
        &straight.final_pose(),
        0.1,
        0.1,
    );
    assert_near(&exec.pose(), &turn.final_pose(), 0.1, 0.1);
}

#[test]
fn test_missing_trajectory_stays_idle() {
    let gains = gains();
    let library = TrajLibrary::new(paths_dir());

    let sim = SimDrive::new(SimParams::from_drive_params(&gains.drive), Pose::default());
    let mut exec = TrajExec::new(&gains, sim.clone(), sim.clone());

    let cmd = TrajCmd::Start {
        name: "s_curve".into(),
    };
    assert!(exec.exec_cmd(&cmd, &library, 0.0).is_err());

    for i in 0..10 {
        assert!(exec.tick(i as f64 * CYCLE_PERIOD_S).is_none());
        sim.step(CYCLE_PERIOD_S);
    }

    assert_eq!(sim.true_pose(), Pose::default());
}
