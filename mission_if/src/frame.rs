//! # Coordinate frames

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The frame of reference a mission item's coordinate is expressed in.
///
/// Ids follow MAVLink's `MAV_FRAME`. Unrecognised ids are kept as `Other`.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum MavFrame {
    /// WGS84 latitude/longitude, altitude above mean sea level.
    Global,
    LocalNed,
    /// Not a coordinate frame, the item has no position.
    Mission,
    /// WGS84 latitude/longitude, altitude relative to home.
    GlobalRelativeAlt,
    LocalEnu,
    GlobalInt,
    GlobalRelativeAltInt,
    LocalOffsetNed,
    BodyNed,
    BodyOffsetNed,
    /// WGS84 latitude/longitude, altitude above terrain.
    GlobalTerrainAlt,
    GlobalTerrainAltInt,
    Other(u8),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MavFrame {
    pub fn from_id(id: u8) -> Self {
        match id {
            0 => MavFrame::Global,
            1 => MavFrame::LocalNed,
            2 => MavFrame::Mission,
            3 => MavFrame::GlobalRelativeAlt,
            4 => MavFrame::LocalEnu,
            5 => MavFrame::GlobalInt,
            6 => MavFrame::GlobalRelativeAltInt,
            7 => MavFrame::LocalOffsetNed,
            8 => MavFrame::BodyNed,
            9 => MavFrame::BodyOffsetNed,
            10 => MavFrame::GlobalTerrainAlt,
            11 => MavFrame::GlobalTerrainAltInt,
            id => MavFrame::Other(id),
        }
    }

    pub fn id(&self) -> u8 {
        match self {
            MavFrame::Global => 0,
            MavFrame::LocalNed => 1,
            MavFrame::Mission => 2,
            MavFrame::GlobalRelativeAlt => 3,
            MavFrame::LocalEnu => 4,
            MavFrame::GlobalInt => 5,
            MavFrame::GlobalRelativeAltInt => 6,
            MavFrame::LocalOffsetNed => 7,
            MavFrame::BodyNed => 8,
            MavFrame::BodyOffsetNed => 9,
            MavFrame::GlobalTerrainAlt => 10,
            MavFrame::GlobalTerrainAltInt => 11,
            MavFrame::Other(id) => *id,
        }
    }

    /// Short name of the frame for display.
    pub fn name(&self) -> &'static str {
        match self {
            MavFrame::Global => "Global",
            MavFrame::LocalNed => "Local NED",
            MavFrame::Mission => "Mission",
            MavFrame::GlobalRelativeAlt => "Global (relative alt)",
            MavFrame::LocalEnu => "Local ENU",
            MavFrame::GlobalInt => "Global (int)",
            MavFrame::GlobalRelativeAltInt => "Global (relative alt, int)",
            MavFrame::LocalOffsetNed => "Local offset NED",
            MavFrame::BodyNed => "Body NED",
            MavFrame::BodyOffsetNed => "Body offset NED",
            MavFrame::GlobalTerrainAlt => "Global (terrain alt)",
            MavFrame::GlobalTerrainAltInt => "Global (terrain alt, int)",
            MavFrame::Other(_) => "Other",
        }
    }

    /// Returns true if the frame's x/y are a WGS84 latitude/longitude.
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            MavFrame::Global
                | MavFrame::GlobalRelativeAlt
                | MavFrame::GlobalInt
                | MavFrame::GlobalRelativeAltInt
                | MavFrame::GlobalTerrainAlt
                | MavFrame::GlobalTerrainAltInt
        )
    }
}

impl Default for MavFrame {
    fn default() -> Self {
        MavFrame::Global
    }
}

impl From<u8> for MavFrame {
    fn from(id: u8) -> Self {
        MavFrame::from_id(id)
    }
}

impl From<MavFrame> for u8 {
    fn from(frame: MavFrame) -> Self {
        frame.id()
    }
}
