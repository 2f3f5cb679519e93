//! # Mission commands
//!
//! The command of a mission item selects how its seven generic parameters are interpreted. Only
//! the commands in `KNOWN_COMMANDS` are understood by the ground software, any other id is
//! carried through as `MavCmd::Unknown` so that missions written by newer tools survive a
//! load/save cycle untouched.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Command ids at or below this value are navigation commands.
pub const MAV_CMD_NAV_LAST: u16 = 95;

/// Display name used for commands outside the known table.
pub const UNKNOWN_COMMAND_NAME: &str = "Unknown";

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// All commands understood by the ground software, in display order.
pub static KNOWN_COMMANDS: [MavCmd; 9] = [
    MavCmd::NavWaypoint,
    MavCmd::NavLoiterUnlim,
    MavCmd::NavLoiterTurns,
    MavCmd::NavLoiterTime,
    MavCmd::NavReturnToLaunch,
    MavCmd::NavLand,
    MavCmd::NavTakeoff,
    MavCmd::ConditionDelay,
    MavCmd::DoJump,
];

/// Commands which place the vehicle at the item's coordinate.
static COORDINATE_COMMANDS: [MavCmd; 7] = [
    MavCmd::NavWaypoint,
    MavCmd::NavLoiterUnlim,
    MavCmd::NavLoiterTurns,
    MavCmd::NavLoiterTime,
    MavCmd::NavReturnToLaunch,
    MavCmd::NavLand,
    MavCmd::NavTakeoff,
];

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A MAVLink mission command.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum MavCmd {
    /// Navigate to the item's coordinate.
    NavWaypoint,

    /// Loiter around the coordinate until the mission is advanced by hand.
    NavLoiterUnlim,

    /// Loiter around the coordinate for `param1` turns.
    NavLoiterTurns,

    /// Loiter around the coordinate for `param1` seconds.
    NavLoiterTime,

    /// Return to the launch location.
    NavReturnToLaunch,

    /// Land at the coordinate.
    NavLand,

    /// Takeoff and climb to the coordinate's altitude.
    NavTakeoff,

    /// Delay the next command by `param1` seconds.
    ConditionDelay,

    /// Jump to item `param1`, `param2` times.
    DoJump,

    /// Any command id not in the known table.
    Unknown(u16),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MavCmd {
    /// Get the command matching the given MAVLink id.
    pub fn from_id(id: u16) -> Self {
        match id {
            16 => MavCmd::NavWaypoint,
            17 => MavCmd::NavLoiterUnlim,
            18 => MavCmd::NavLoiterTurns,
            19 => MavCmd::NavLoiterTime,
            20 => MavCmd::NavReturnToLaunch,
            21 => MavCmd::NavLand,
            22 => MavCmd::NavTakeoff,
            112 => MavCmd::ConditionDelay,
            177 => MavCmd::DoJump,
            id => MavCmd::Unknown(id),
        }
    }

    /// The MAVLink id of this command.
    pub fn id(&self) -> u16 {
        match self {
            MavCmd::NavWaypoint => 16,
            MavCmd::NavLoiterUnlim => 17,
            MavCmd::NavLoiterTurns => 18,
            MavCmd::NavLoiterTime => 19,
            MavCmd::NavReturnToLaunch => 20,
            MavCmd::NavLand => 21,
            MavCmd::NavTakeoff => 22,
            MavCmd::ConditionDelay => 112,
            MavCmd::DoJump => 177,
            MavCmd::Unknown(id) => *id,
        }
    }

    /// Human readable name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            MavCmd::NavWaypoint => "Waypoint",
            MavCmd::NavLoiterUnlim => "Loiter",
            MavCmd::NavLoiterTurns => "Loiter (turns)",
            MavCmd::NavLoiterTime => "Loiter (seconds)",
            MavCmd::NavReturnToLaunch => "Return Home",
            MavCmd::NavLand => "Land",
            MavCmd::NavTakeoff => "Takeoff",
            MavCmd::ConditionDelay => "Delay",
            MavCmd::DoJump => "Jump To Command",
            MavCmd::Unknown(_) => UNKNOWN_COMMAND_NAME,
        }
    }

    /// Returns true if the command makes use of the item's coordinate.
    pub fn specifies_coordinate(&self) -> bool {
        COORDINATE_COMMANDS.contains(self)
    }

    /// Returns true if the command is a navigation (rather than a DO or condition) command.
    pub fn is_navigation(&self) -> bool {
        self.id() <= MAV_CMD_NAV_LAST
    }

    /// Get the known command at the given position of the display table.
    pub fn from_index(index: usize) -> Option<Self> {
        KNOWN_COMMANDS.get(index).copied()
    }

    /// Position of this command in the display table, or `None` for unknown commands.
    pub fn index(&self) -> Option<usize> {
        KNOWN_COMMANDS.iter().position(|c| c == self)
    }
}

impl Default for MavCmd {
    fn default() -> Self {
        MavCmd::NavWaypoint
    }
}

impl From<u16> for MavCmd {
    fn from(id: u16) -> Self {
        MavCmd::from_id(id)
    }
}

impl From<MavCmd> for u16 {
    fn from(cmd: MavCmd) -> Self {
        cmd.id()
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Names of all known commands, in display order.
pub fn command_names() -> Vec<&'static str> {
    KNOWN_COMMANDS.iter().map(|c| c.name()).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_id_mapping() {
        for cmd in KNOWN_COMMANDS.iter() {
            assert_eq!(MavCmd::from_id(cmd.id()), *cmd);
        }

        assert_eq!(MavCmd::from_id(16), MavCmd::NavWaypoint);
        assert_eq!(MavCmd::from_id(177), MavCmd::DoJump);
        assert_eq!(MavCmd::from_id(400), MavCmd::Unknown(400));
        assert_eq!(MavCmd::Unknown(400).id(), 400);
    }

    #[test]
    fn test_specifies_coordinate() {
        let expected = [
            (MavCmd::NavWaypoint, true),
            (MavCmd::NavLoiterUnlim, true),
            (MavCmd::NavLoiterTurns, true),
            (MavCmd::NavLoiterTime, true),
            (MavCmd::NavReturnToLaunch, true),
            (MavCmd::NavLand, true),
            (MavCmd::NavTakeoff, true),
            (MavCmd::ConditionDelay, false),
            (MavCmd::DoJump, false),
        ];

        // Every known command must be covered by the table above
        assert_eq!(expected.len(), KNOWN_COMMANDS.len());

        for (cmd, has_coord) in expected.iter() {
            assert_eq!(cmd.specifies_coordinate(), *has_coord, "{:?}", cmd);
        }

        assert!(!MavCmd::Unknown(31000).specifies_coordinate());
    }

    #[test]
    fn test_names() {
        assert_eq!(MavCmd::NavWaypoint.name(), "Waypoint");
        assert_eq!(MavCmd::DoJump.name(), "Jump To Command");
        assert_eq!(MavCmd::Unknown(1234).name(), UNKNOWN_COMMAND_NAME);

        let names = command_names();
        assert_eq!(names.len(), KNOWN_COMMANDS.len());
        assert_eq!(names[0], "Waypoint");
        assert_eq!(names[8], "Jump To Command");
    }

    #[test]
    fn test_index() {
        assert_eq!(MavCmd::from_index(0), Some(MavCmd::NavWaypoint));
        assert_eq!(MavCmd::from_index(7), Some(MavCmd::ConditionDelay));
        assert_eq!(MavCmd::from_index(9), None);

        assert_eq!(MavCmd::NavLand.index(), Some(5));
        assert_eq!(MavCmd::Unknown(5).index(), None);
    }

    #[test]
    fn test_is_navigation() {
        assert!(MavCmd::NavWaypoint.is_navigation());
        assert!(MavCmd::Unknown(95).is_navigation());
        assert!(!MavCmd::Unknown(96).is_navigation());
        assert!(!MavCmd::ConditionDelay.is_navigation());
        assert!(!MavCmd::DoJump.is_navigation());
    }

    #[test]
    fn test_serde_as_id() {
        assert_eq!(serde_json::to_string(&MavCmd::NavLand).unwrap(), "21");
        assert_eq!(
            serde_json::from_str::<MavCmd>("500").unwrap(),
            MavCmd::Unknown(500)
        );
    }
}
