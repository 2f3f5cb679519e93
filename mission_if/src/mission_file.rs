//! # Mission files
//!
//! A mission file is a `QGC WPL 110` header line followed by one saved item line per mission
//! item, in sequence order. Blank lines are ignored when reading.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::item::{ItemData, ItemParseError, MissionItem};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Header written at the top of every mission file.
pub const WPL_HEADER: &str = "QGC WPL 110";

/// Header prefix, followed by the format version.
const WPL_HEADER_PREFIX: &str = "QGC WPL";

/// Versions of the format which share the item line layout.
const SUPPORTED_VERSIONS: [&str; 2] = ["110", "120"];

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A problem found in a mission by `check_mission`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionIssue {
    pub severity: IssueSeverity,

    /// Sequence number of the offending item, if the issue is about one item.
    pub seq: Option<u16>,

    pub message: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Warning,
    Error,
}

/// Errors which can occur while reading or writing a mission file.
#[derive(Debug, Error)]
pub enum MissionFileError {
    #[error("Mission file IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The mission file is empty, expected a \"{}\" header", WPL_HEADER)]
    MissingHeader,

    #[error("Unsupported mission file header: {0:?}")]
    UnsupportedHeader(String),

    #[error("Invalid mission item on line {line}: {source}")]
    InvalidItem {
        line: usize,
        source: ItemParseError,
    },

    #[error("Cannot serialise the mission to JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Read a mission from the stream.
pub fn read_mission<R: BufRead>(stream: R) -> Result<Vec<MissionItem>, MissionFileError> {
    let mut lines = stream.lines().enumerate();

    // Find the header, skipping any leading blank lines
    let header = loop {
        match lines.next() {
            Some((_, line)) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(MissionFileError::MissingHeader),
        }
    };

    check_header(&header)?;

    let mut items = Vec::new();

    for (idx, line) in lines {
        let line = line?;

        if line.trim().is_empty() {
            continue;
        }

        let data = ItemData::parse_line(&line)
            .map_err(|source| MissionFileError::InvalidItem {
                line: idx + 1,
                source,
            })?;

        items.push(MissionItem::from(data));
    }

    debug!("Read {} mission items", items.len());

    Ok(items)
}

/// Write the mission to the stream, header first.
pub fn write_mission<W: Write>(mut stream: W, items: &[MissionItem]) -> std::io::Result<()> {
    writeln!(stream, "{}", WPL_HEADER)?;

    for item in items {
        item.save(&mut stream)?;
    }

    stream.flush()
}

/// Load a mission file from disk.
pub fn load_mission_file<P: AsRef<Path>>(path: P) -> Result<Vec<MissionItem>, MissionFileError> {
    let file = File::open(path.as_ref())?;
    read_mission(BufReader::new(file))
}

/// Save a mission file to disk, replacing any existing file.
pub fn save_mission_file<P: AsRef<Path>>(
    path: P,
    items: &[MissionItem],
) -> Result<(), MissionFileError> {
    let file = File::create(path.as_ref())?;
    write_mission(BufWriter::new(file), items)?;

    debug!("Saved {} mission items to {:?}", items.len(), path.as_ref());

    Ok(())
}

/// Write the values of all items as a pretty printed JSON array.
pub fn export_json<W: Write>(stream: W, items: &[MissionItem]) -> Result<(), MissionFileError> {
    let data: Vec<&ItemData> = items.iter().map(|i| i.data()).collect();
    serde_json::to_writer_pretty(stream, &data)?;
    Ok(())
}

/// Check the mission for problems the items cannot detect on their own.
///
/// - Each item's sequence number must be its position in the mission.
/// - At most one item may be current (a warning is given if none is).
/// - Items with a coordinate in a global frame must have a valid latitude and longitude.
pub fn check_mission(items: &[MissionItem]) -> Vec<MissionIssue> {
    let mut issues = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let seq = item.sequence_number();

        if seq as usize != i {
            issues.push(MissionIssue {
                severity: IssueSeverity::Error,
                seq: Some(seq),
                message: format!("Item at position {} has sequence number {}", i, seq),
            });
        }

        if item.specifies_coordinate() && item.frame().is_global() {
            let coord = item.coordinate();

            if !(-90.0..=90.0).contains(&coord.latitude_deg) {
                issues.push(MissionIssue {
                    severity: IssueSeverity::Error,
                    seq: Some(seq),
                    message: format!("Latitude {} is out of range", coord.latitude_deg),
                });
            }
            if !(-180.0..=180.0).contains(&coord.longitude_deg) {
                issues.push(MissionIssue {
                    severity: IssueSeverity::Error,
                    seq: Some(seq),
                    message: format!("Longitude {} is out of range", coord.longitude_deg),
                });
            }
        }
    }

    let num_current = items.iter().filter(|i| i.is_current_item()).count();

    if num_current > 1 {
        issues.push(MissionIssue {
            severity: IssueSeverity::Error,
            seq: None,
            message: format!("{} items are marked as current, expected one", num_current),
        });
    } else if num_current == 0 && !items.is_empty() {
        issues.push(MissionIssue {
            severity: IssueSeverity::Warning,
            seq: None,
            message: String::from("No item is marked as current"),
        });
    }

    issues
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_header(header: &str) -> Result<(), MissionFileError> {
    let version = header
        .trim_start_matches('\u{feff}')
        .trim()
        .strip_prefix(WPL_HEADER_PREFIX)
        .map(|v| v.trim());

    match version {
        Some(v) if SUPPORTED_VERSIONS.contains(&v) => Ok(()),
        _ => Err(MissionFileError::UnsupportedHeader(header.to_string())),
    }
}
