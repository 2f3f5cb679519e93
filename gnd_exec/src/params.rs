//! Parameters structure for the ground executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use mission_if::MavFrame;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the ground executable.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// The frame new waypoints are created in.
    pub waypoint_frame: MavFrame,

    /// Acceptance radius of new waypoints.
    ///
    /// Units: meters
    pub acceptance_radius_m: f64,

    /// Hold time of new waypoints.
    ///
    /// Units: seconds
    pub hold_time_s: f64,
}
