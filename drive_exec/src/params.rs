//! # Drive Executable Parameters
//!
//! This module provides the parameters which are loaded once at the start of the drive
//! executable, and are not changed while it runs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use serde::Deserialize;
use util::params::{self, LoadError};

use crate::{drive_ctrl::DriveCtrlParams, traj_ctrl::RamseteParams};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// All controller gains and drive base constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControllerGains {
    /// Trajectory tracking gains
    pub ramsete: RamseteParams,

    /// Wheel speed control gains and geometry
    pub drive: DriveCtrlParams,
}

/// Predefined routines, each a list of trajectory names to follow back to back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutineParams {
    pub routines: HashMap<String, Vec<String>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors which can occur while loading the controller gains.
#[derive(Debug, thiserror::Error)]
pub enum GainsError {
    #[error("Could not load the controller gains: {0}")]
    Load(#[from] LoadError),

    #[error("Invalid value {value} for gain {name}: {reason}")]
    InvalidGain {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControllerGains {
    /// Load the gains from the given file in the parameters directory, and validate them.
    pub fn load(param_file_path: &str) -> Result<Self, GainsError> {
        let gains: Self = params::load(param_file_path)?;
        gains.validate()?;
        Ok(gains)
    }

    /// Parse the gains from a TOML string, and validate them.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, GainsError> {
        let gains: Self = params::load_str(toml_str)?;
        gains.validate()?;
        Ok(gains)
    }

    /// Check that the gains are usable.
    ///
    /// The tracking law requires `b > 0` and `0 < zeta < 1`. The drive base needs a positive
    /// track width, supply voltage and acceleration gain, and all other gains must be finite and
    /// non-negative.
    pub fn validate(&self) -> Result<(), GainsError> {
        let r = &self.ramsete;
        let d = &self.drive;

        check("ramsete.b", r.b, r.b > 0.0, "must be greater than zero")?;
        check(
            "ramsete.zeta",
            r.zeta,
            r.zeta > 0.0 && r.zeta < 1.0,
            "must be between zero and one",
        )?;
        check_positive("drive.track_width_m", d.track_width_m)?;
        check_positive("drive.max_voltage_v", d.max_voltage_v)?;
        check_positive("drive.k_a", d.k_a)?;

        for (name, value) in [
            ("ramsete.pos_tolerance_m", r.pos_tolerance_m),
            ("ramsete.heading_tolerance_rad", r.heading_tolerance_rad),
            ("drive.k_s", d.k_s),
            ("drive.k_v", d.k_v),
            ("drive.k_p", d.k_p),
            ("drive.k_i", d.k_i),
            ("drive.k_d", d.k_d),
        ]
        .iter()
        {
            check(*name, *value, *value >= 0.0, "must not be negative")?;
        }

        Ok(())
    }
}

impl RoutineParams {
    /// Load the routines from the given file in the parameters directory.
    pub fn load(param_file_path: &str) -> Result<Self, LoadError> {
        params::load(param_file_path)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check(name: &'static str, value: f64, ok: bool, reason: &'static str) -> Result<(), GainsError> {
    // NaN fails every comparison so it's caught here too
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(GainsError::InvalidGain {
            name,
            value,
            reason,
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), GainsError> {
    check(name, value, value > 0.0, "must be greater than zero")
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub(crate) const GAINS_TOML: &str = r#"
        [ramsete]
        b = 2.0
        zeta = 0.7

        [drive]
        track_width_m = 0.6
        max_voltage_v = 12.0
        k_s = 0.2
        k_v = 2.5
        k_a = 0.4
        k_p = 2.0
        k_i = 0.0
        k_d = 0.0
    "#;

    pub(crate) fn gains() -> ControllerGains {
        ControllerGains::from_toml_str(GAINS_TOML).unwrap()
    }

    #[test]
    fn test_load_gains() {
        let g = gains();
        assert_eq!(g.ramsete.b, 2.0);
        assert_eq!(g.ramsete.pos_tolerance_m, 0.1);
        assert_eq!(g.drive.track_width_m, 0.6);
    }

    #[test]
    fn test_invalid_gains() {
        let mut g = gains();
        g.ramsete.b = 0.0;
        match g.validate() {
            Err(GainsError::InvalidGain { name, .. }) => assert_eq!(name, "ramsete.b"),
            r => panic!("Expected invalid b, got {:?}", r),
        }

        for zeta in &[0.0, 1.0, 1.5, f64::NAN] {
            let mut g = gains();
            g.ramsete.zeta = *zeta;
            match g.validate() {
                Err(GainsError::InvalidGain { name, .. }) => assert_eq!(name, "ramsete.zeta"),
                r => panic!("Expected invalid zeta, got {:?}", r),
            }
        }

        let mut g = gains();
        g.drive.k_p = -1.0;
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_missing_gain() {
        match ControllerGains::from_toml_str("[ramsete]\nb = 2.0\nzeta = 0.7") {
            Err(GainsError::Load(LoadError::DeserialiseError(_))) => (),
            r => panic!("Expected a deserialise error, got {:?}", r),
        }
    }

    #[test]
    fn test_routines() {
        let r: RoutineParams = params::load_str(
            "[routines]\ngalactic_a = [\"galacticA_0\"]\nslalom = [\"slalom_0\", \"slalom_1\"]",
        )
        .unwrap();

        assert_eq!(r.routines["slalom"], vec!["slalom_0", "slalom_1"]);
    }
}
