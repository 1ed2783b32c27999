//! Trajectory control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the Ramsete controller
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RamseteParams {
    /// Aggressiveness of the convergence, larger values correct errors harder. Must be greater
    /// than zero.
    ///
    /// Units: radians^2/meters^2
    pub b: f64,

    /// Damping of the convergence. Must be between zero and one (exclusive).
    ///
    /// Units: 1/radians
    pub zeta: f64,

    /// Position error within which the drive base is considered to be at the reference.
    ///
    /// Units: meters
    #[serde(default = "default_pos_tolerance_m")]
    pub pos_tolerance_m: f64,

    /// Heading error within which the drive base is considered to be at the reference.
    ///
    /// Units: radians
    #[serde(default = "default_heading_tolerance_rad")]
    pub heading_tolerance_rad: f64,
}

impl Default for RamseteParams {
    fn default() -> Self {
        Self {
            b: 2.0,
            zeta: 0.7,
            pos_tolerance_m: default_pos_tolerance_m(),
            heading_tolerance_rad: default_heading_tolerance_rad(),
        }
    }
}

fn default_pos_tolerance_m() -> f64 {
    0.1
}

fn default_heading_tolerance_rad() -> f64 {
    0.1
}
