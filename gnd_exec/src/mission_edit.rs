//! # Mission editing
//!
//! Operations the ground executable performs on a loaded mission.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use color_eyre::{eyre::eyre, Report};
use log::{debug, error, info, warn};
use std::convert::TryFrom;
use mission_if::{
    mission_file::{check_mission, IssueSeverity, MissionIssue},
    Coordinate, MissionItem,
};

use crate::params::Params;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Append a waypoint at the given coordinate to the end of the mission.
///
/// The new waypoint becomes the current item if no other item is. Returns the
/// sequence number of the new waypoint, or an error if the mission already
/// holds as many items as a sequence number can address.
pub fn append_waypoint(
    items: &mut Vec<MissionItem>,
    coordinate: Coordinate,
    params: &Params,
) -> Result<u16, Report> {
    let seq = u16::try_from(items.len()).map_err(|_| {
        eyre!("Mission is full, it already contains {} items", items.len())
    })?;

    let mut item = MissionItem::new(seq, coordinate);
    let events = item.subscribe();

    item.set_frame(params.waypoint_frame);
    item.set_acceptance_radius(params.acceptance_radius_m);
    item.set_hold_time(params.hold_time_s);

    if !items.iter().any(|i| i.is_current_item()) {
        item.set_is_current_item(true);
    }

    for event in events.try_iter() {
        debug!("Waypoint {}: {:?}", seq, event);
    }

    items.push(item);

    Ok(seq)
}

/// Log a one line summary of every item in the mission.
pub fn log_mission(items: &[MissionItem]) {
    info!("Mission contains {} items", items.len());

    for item in items {
        let marker = if item.is_current_item() { "*" } else { " " };

        let values: Vec<String> = item
            .values()
            .iter()
            .map(|(label, value)| format!("{} {}", label, value))
            .collect();

        if item.specifies_coordinate() {
            let coord = item.coordinate();
            info!(
                "{}{:>4} {:<18} ({:.7}, {:.7}) [{}] {}",
                marker,
                item.sequence_number(),
                item.command_name(),
                coord.latitude_deg,
                coord.longitude_deg,
                item.frame().name(),
                values.join(" ")
            );
        } else {
            info!(
                "{}{:>4} {:<18} {}",
                marker,
                item.sequence_number(),
                item.command_name(),
                values.join(" ")
            );
        }
    }
}

/// Check the mission and log any issues found.
///
/// Returns the number of issues which are errors.
pub fn report_issues(items: &[MissionItem]) -> usize {
    let issues = check_mission(items);

    for MissionIssue {
        severity,
        seq,
        message,
    } in issues.iter()
    {
        let location = match seq {
            Some(s) => format!("item {}", s),
            None => String::from("mission"),
        };

        match severity {
            IssueSeverity::Warning => warn!("{}: {}", location, message),
            IssueSeverity::Error => error!("{}: {}", location, message),
        }
    }

    issues
        .iter()
        .filter(|i| i.severity == IssueSeverity::Error)
        .count()
}
