//! Main ground-side executable entry point.
//!
//! Loads, inspects and edits mission files. Every invocation runs a single
//! subcommand within a new session, so that what was done to a mission file is
//! kept in the session log.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mission_edit;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

// Internal
use mission_if::{
    mission_file::{export_json, load_mission_file, save_mission_file},
    Coordinate, MissionItem,
};
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Ground mission file tool.
#[derive(Debug, StructOpt)]
#[structopt(name = "gnd_exec")]
enum GndCmd {
    /// Print a summary of every item in a mission file.
    #[structopt(name = "show")]
    Show {
        /// The mission file to show.
        path: PathBuf,
    },

    /// Check a mission file, failing if it contains errors.
    #[structopt(name = "check")]
    Check {
        /// The mission file to check.
        path: PathBuf,
    },

    /// Load a mission file and save it again in normalised form.
    #[structopt(name = "convert")]
    Convert {
        /// The mission file to read.
        input: PathBuf,

        /// The path to write the normalised mission file to.
        output: PathBuf,
    },

    /// Export the items of a mission file as JSON.
    #[structopt(name = "export")]
    Export {
        /// The mission file to read.
        input: PathBuf,

        /// The path to write the JSON to.
        output: PathBuf,
    },

    /// Append a waypoint to a mission file, creating the file if needed.
    #[structopt(name = "add-waypoint")]
    AddWaypoint {
        /// The mission file to edit.
        path: PathBuf,

        /// Latitude of the waypoint in degrees.
        #[structopt(allow_hyphen_values = true)]
        lat_deg: f64,

        /// Longitude of the waypoint in degrees.
        #[structopt(allow_hyphen_values = true)]
        lon_deg: f64,

        /// Altitude of the waypoint in meters.
        #[structopt(allow_hyphen_values = true)]
        alt_m: f64,
    },
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let cmd = GndCmd::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("gnd_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Ground Mission Executable\n");
    info!("Session directory: {:?}\n", session.session_root);
    debug!("Command: {:?}", cmd);

    // ---- LOAD PARAMETERS ----

    let params: params::Params = util::params::load("gnd_exec.toml")
        .wrap_err("Could not load gnd_exec params")?;

    info!("Exec parameters loaded");

    // ---- RUN COMMAND ----

    match cmd {
        GndCmd::Show { path } => {
            let items = load(&path)?;
            mission_edit::log_mission(&items);
            mission_edit::report_issues(&items);
        }
        GndCmd::Check { path } => {
            let items = load(&path)?;
            let num_errors = mission_edit::report_issues(&items);

            if num_errors > 0 {
                return Err(eyre!("Mission {:?} contains {} errors", path, num_errors));
            }

            info!("Mission {:?} is valid", path);
        }
        GndCmd::Convert { input, output } => {
            let items = load(&input)?;

            save_mission_file(&output, &items)
                .wrap_err_with(|| format!("Failed to save mission to {:?}", output))?;

            info!("Saved {} items to {:?}", items.len(), output);
        }
        GndCmd::Export { input, output } => {
            let items = load(&input)?;

            let file = File::create(&output)
                .wrap_err_with(|| format!("Failed to create {:?}", output))?;
            export_json(BufWriter::new(file), &items)
                .wrap_err("Failed to export the mission")?;

            info!("Exported {} items to {:?}", items.len(), output);
        }
        GndCmd::AddWaypoint {
            path,
            lat_deg,
            lon_deg,
            alt_m,
        } => {
            let mut items = if path.exists() {
                load(&path)?
            } else {
                info!("{:?} does not exist, starting a new mission", path);
                Vec::new()
            };

            let seq = mission_edit::append_waypoint(
                &mut items,
                Coordinate {
                    latitude_deg: lat_deg,
                    longitude_deg: lon_deg,
                    altitude_m: alt_m,
                },
                &params,
            )
            .wrap_err_with(|| format!("Failed to add a waypoint to {:?}", path))?;

            save_mission_file(&path, &items)
                .wrap_err_with(|| format!("Failed to save mission to {:?}", path))?;

            info!("Added waypoint {} to {:?}", seq, path);
        }
    }

    Ok(())
}

/// Load a mission file, adding the path to any error.
fn load(path: &Path) -> Result<Vec<MissionItem>, Report> {
    let items = load_mission_file(path)
        .wrap_err_with(|| format!("Failed to load mission from {:?}", path))?;

    info!("Loaded {} items from {:?}", items.len(), path);

    Ok(items)
}
