//! Main drive executable entry point.
//!
//! # Architecture
//!
//! The executable follows a single trajectory or a routine of trajectories on the simulated drive
//! base:
//!
//!     - Initialise the session, logging and parameters
//!     - Load the trajectories named by the command
//!     - Main loop, once every `CYCLE_PERIOD_S`:
//!         - Trajectory execution (sensing, localisation, tracking, wheel control, actuation)
//!         - Archiving of the execution status
//!         - Simulation step
//!     - Exit once the routine is complete

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::tc::traj::TrajCmd;
use drive_lib::{
    loc::Pose,
    params::{ControllerGains, RoutineParams},
    sim_client::{SimDrive, SimParams},
    traj::TrajLibrary,
    traj_exec::{StatusReport, TrajExec},
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.02;

/// Directory containing the trajectory files, relative to the software root.
const PATHS_DIR: &str = "paths";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line arguments
#[derive(Debug, StructOpt)]
#[structopt(
    name = "drive_exec",
    about = "Follow trajectories on the simulated drive base"
)]
struct Opt {
    /// Controller gains file, relative to the params directory
    #[structopt(long, default_value = "controller_gains.toml")]
    gains: String,

    /// Predefined routines file, relative to the params directory
    #[structopt(long, default_value = "routines.toml")]
    routines: String,

    /// Directory containing the trajectory files [default: $DRIVE_SW_ROOT/paths]
    #[structopt(long, parse(from_os_str))]
    paths_dir: Option<PathBuf>,

    /// Abort execution if it hasn't completed after this many seconds
    #[structopt(long, default_value = "120")]
    timeout_s: f64,

    #[structopt(subcommand)]
    cmd: TrajCmd,
}

/// One row of the execution archive.
#[derive(Serialize)]
struct TickRecord {
    time_s: f64,
    elapsed_s: f64,
    x_m: f64,
    y_m: f64,
    heading_rad: f64,
    ref_x_m: Option<f64>,
    ref_y_m: Option<f64>,
    ref_heading_rad: Option<f64>,
    along_err_m: f64,
    lateral_err_m: f64,
    heading_err_rad: f64,
    linear_ms: f64,
    angular_rads: f64,
    left_v: f64,
    right_v: f64,
    saturated: bool,
    sim_x_m: f64,
    sim_y_m: f64,
    sim_heading_rad: f64,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opt);

    // ---- LOAD PARAMETERS ----

    let gains = ControllerGains::load(&opt.gains).wrap_err("Could not load controller gains")?;

    // Missing routines only matter if the command names one
    let routines = match RoutineParams::load(&opt.routines) {
        Ok(r) => r,
        Err(e) => {
            warn!("Could not load the routines, none will be available: {}", e);
            RoutineParams::default()
        }
    };

    info!("Exec parameters loaded");

    // ---- LOAD TRAJECTORIES ----

    let paths_dir = match opt.paths_dir {
        Some(ref p) => p.clone(),
        None => host::get_sw_root()
            .wrap_err("Could not get the software root")?
            .join(PATHS_DIR),
    };

    let cmd = expand_routines(&opt.cmd, &routines);
    let names = traj_names(&cmd);

    let mut library = TrajLibrary::new(&paths_dir);
    let num_loaded = library.load_all(&names);
    info!(
        "Loaded {} of {} trajectories from {:?}",
        num_loaded,
        names.len(),
        paths_dir
    );

    // ---- INITIALISE MODULES ----

    // The simulated drive base starts where the first trajectory does
    let start_pose = names
        .first()
        .and_then(|n| library.get(n))
        .map(|t| t.initial_pose())
        .unwrap_or_else(Pose::default);

    let sim = SimDrive::new(SimParams::from_drive_params(&gains.drive), start_pose);
    let mut exec = TrajExec::new(&gains, sim.clone(), sim.clone());

    let mut archiver = Archiver::from_path(&session, "traj_exec.csv")
        .wrap_err("Failed to initialise the TrajExec archive")?;

    info!("Module initialisation complete\n");

    exec.exec_cmd(&cmd, &library, 0.0)
        .wrap_err_with(|| format!("Failed to execute {:?}", cmd))?;

    if exec.is_routine_complete() {
        return Err(eyre!("Nothing to execute for {:?}", cmd));
    }

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let mut num_cycles: u64 = 0;

    loop {
        let cycle_start_instant = Instant::now();

        // Simulated time, the sim advances by exactly one period per cycle
        let now_s = num_cycles as f64 * CYCLE_PERIOD_S;

        // ---- TRAJECTORY EXECUTION ----

        if let Some(report) = exec.tick(now_s) {
            // ---- WRITE ARCHIVES ----

            let record = TickRecord::new(now_s, &report, &sim.true_pose());
            if let Err(e) = archiver.serialise(record) {
                warn!("Could not archive TrajExec status: {}", e);
            }
        }

        if exec.is_routine_complete() {
            break;
        }

        if now_s >= opt.timeout_s {
            warn!("Execution timed out after {:.02} s, aborting", now_s);
            exec.abort();
            break;
        }

        // ---- SIMULATION ----

        sim.step(CYCLE_PERIOD_S);

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => thread::sleep(d),
            None => warn!(
                "Cycle overran by {:.06} s",
                cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
            ),
        }

        num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    let true_pose = sim.true_pose();
    info!(
        "Final pose ({:.3}, {:.3}, {:.3}), estimated ({:.3}, {:.3}, {:.3})",
        true_pose.x(),
        true_pose.y(),
        true_pose.heading(),
        exec.pose().x(),
        exec.pose().y(),
        exec.pose().heading()
    );

    if let Some(traj) = exec.current_traj() {
        let target = traj.final_pose();
        info!(
            "Distance from the end of the last trajectory: {:.3} m",
            (true_pose.position() - target.position()).norm()
        );
    }

    info!("End of execution");

    Ok(())
}

/// Replace any routine names in a routine command with the trajectories they contain.
fn expand_routines(cmd: &TrajCmd, routines: &RoutineParams) -> TrajCmd {
    match cmd {
        TrajCmd::Routine { names } => TrajCmd::Routine {
            names: names
                .iter()
                .flat_map(|name| match routines.routines.get(name) {
                    Some(trajs) => {
                        debug!("Expanding routine \"{}\" into {:?}", name, trajs);
                        trajs.clone()
                    }
                    None => vec![name.clone()],
                })
                .collect(),
        },
        c => c.clone(),
    }
}

/// Names of all the trajectories a command refers to.
fn traj_names(cmd: &TrajCmd) -> Vec<String> {
    match cmd {
        TrajCmd::Start { name } => vec![name.clone()],
        TrajCmd::Routine { names } => names.clone(),
        TrajCmd::Abort => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TickRecord {
    fn new(time_s: f64, report: &StatusReport, sim_pose: &Pose) -> Self {
        Self {
            time_s,
            elapsed_s: report.elapsed_s,
            x_m: report.pose.x(),
            y_m: report.pose.y(),
            heading_rad: report.pose.heading(),
            ref_x_m: report.reference.map(|r| r.pose.x()),
            ref_y_m: report.reference.map(|r| r.pose.y()),
            ref_heading_rad: report.reference.map(|r| r.pose.heading()),
            along_err_m: report.tracking_error.along_m,
            lateral_err_m: report.tracking_error.lateral_m,
            heading_err_rad: report.tracking_error.heading_rad,
            linear_ms: report.chassis_vel.linear_ms,
            angular_rads: report.chassis_vel.angular_rads,
            left_v: report.dems.left_v,
            right_v: report.dems.right_v,
            saturated: report.drive.left_saturated || report.drive.right_saturated,
            sim_x_m: sim_pose.x(),
            sim_y_m: sim_pose.y(),
            sim_heading_rad: sim_pose.heading(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_expand_routines() {
        let mut routines = HashMap::new();
        routines.insert(
            "auto_s".to_string(),
            vec!["s_curve".to_string(), "return".to_string()],
        );
        let routines = RoutineParams { routines };

        let cmd = TrajCmd::Routine {
            names: vec!["straight".into(), "auto_s".into()],
        };

        assert_eq!(
            traj_names(&expand_routines(&cmd, &routines)),
            vec!["straight", "s_curve", "return"]
        );

        let start = TrajCmd::Start {
            name: "auto_s".into(),
        };
        assert_eq!(expand_routines(&start, &routines), start);
    }
}
