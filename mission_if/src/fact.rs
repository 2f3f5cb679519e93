//! # Facts
//!
//! A fact is one of a mission item's parameter slots viewed as a named, displayable quantity.
//! Which slots are facts, and what they are called, depends on the item's command; the tables
//! in this module give that mapping for every known command.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use crate::cmd::MavCmd;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Static description of a quantity stored in a parameter slot.
#[derive(Debug, PartialEq, Serialize)]
pub struct FactMetaData {
    /// Label shown next to the value.
    pub label: &'static str,

    /// Units of the displayed value, empty for unitless counts.
    pub units: &'static str,

    /// If true the slot stores radians but the value is displayed in degrees.
    pub display_degrees: bool,
}

/// A parameter slot of a mission item together with its metadata.
///
/// Facts are snapshots, changing the item does not change a fact taken from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub meta: &'static FactMetaData,

    /// Parameter slot, in the range `1..=7`.
    pub slot: usize,

    /// Value as stored in the slot.
    pub value: f64,
}

/// Associates a fact's metadata with the slot holding it for a given command.
#[derive(Debug)]
pub struct FactSlot {
    pub meta: &'static FactMetaData,
    pub slot: usize,
}

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

pub static ALTITUDE: FactMetaData = meta("Alt:", "m");
pub static ACCEPTANCE_RADIUS: FactMetaData = meta("Radius:", "m");
pub static HOLD_TIME: FactMetaData = meta("Hold:", "s");
pub static YAW: FactMetaData = FactMetaData {
    label: "Yaw:",
    units: "deg",
    display_degrees: true,
};
pub static LOITER_RADIUS: FactMetaData = meta("Radius:", "m");
pub static LOITER_TURNS: FactMetaData = meta("Turns:", "");
pub static LOITER_SECONDS: FactMetaData = meta("Seconds:", "s");
pub static TAKEOFF_PITCH: FactMetaData = meta("Pitch:", "deg");
pub static DELAY_SECONDS: FactMetaData = meta("Seconds:", "s");
pub static JUMP_SEQUENCE: FactMetaData = meta("Seq #:", "");
pub static JUMP_REPEAT: FactMetaData = meta("Repeats:", "");

/// Placeholders for commands the ground software does not know.
pub static GENERIC_PARAMS: [FactMetaData; 7] = [
    meta("Param1:", ""),
    meta("Param2:", ""),
    meta("Param3:", ""),
    meta("Param4:", ""),
    meta("Param5:", ""),
    meta("Param6:", ""),
    meta("Param7:", ""),
];

static WAYPOINT_FACTS: [FactSlot; 4] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &ACCEPTANCE_RADIUS, slot: 2 },
    FactSlot { meta: &HOLD_TIME, slot: 1 },
    FactSlot { meta: &YAW, slot: 4 },
];

static LOITER_UNLIM_FACTS: [FactSlot; 3] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &YAW, slot: 4 },
    FactSlot { meta: &LOITER_RADIUS, slot: 3 },
];

static LOITER_TURNS_FACTS: [FactSlot; 4] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &YAW, slot: 4 },
    FactSlot { meta: &LOITER_RADIUS, slot: 3 },
    FactSlot { meta: &LOITER_TURNS, slot: 1 },
];

static LOITER_TIME_FACTS: [FactSlot; 4] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &YAW, slot: 4 },
    FactSlot { meta: &LOITER_RADIUS, slot: 3 },
    FactSlot { meta: &LOITER_SECONDS, slot: 1 },
];

static LAND_FACTS: [FactSlot; 2] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &YAW, slot: 4 },
];

static TAKEOFF_FACTS: [FactSlot; 3] = [
    FactSlot { meta: &ALTITUDE, slot: 7 },
    FactSlot { meta: &TAKEOFF_PITCH, slot: 1 },
    FactSlot { meta: &YAW, slot: 4 },
];

static DELAY_FACTS: [FactSlot; 1] = [FactSlot { meta: &DELAY_SECONDS, slot: 1 }];

static JUMP_FACTS: [FactSlot; 2] = [
    FactSlot { meta: &JUMP_SEQUENCE, slot: 1 },
    FactSlot { meta: &JUMP_REPEAT, slot: 2 },
];

static GENERIC_FACTS: [FactSlot; 7] = [
    FactSlot { meta: &GENERIC_PARAMS[0], slot: 1 },
    FactSlot { meta: &GENERIC_PARAMS[1], slot: 2 },
    FactSlot { meta: &GENERIC_PARAMS[2], slot: 3 },
    FactSlot { meta: &GENERIC_PARAMS[3], slot: 4 },
    FactSlot { meta: &GENERIC_PARAMS[4], slot: 5 },
    FactSlot { meta: &GENERIC_PARAMS[5], slot: 6 },
    FactSlot { meta: &GENERIC_PARAMS[6], slot: 7 },
];

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Fact {
    pub fn label(&self) -> &'static str {
        self.meta.label
    }

    pub fn units(&self) -> &'static str {
        self.meta.units
    }

    /// The value in display units.
    pub fn display_value(&self) -> f64 {
        if self.meta.display_degrees {
            self.value.to_degrees()
        } else {
            self.value
        }
    }

    /// The display value formatted to one decimal place.
    pub fn value_string(&self) -> String {
        one_decimal_string(self.display_value())
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the ordered list of facts for the given command.
///
/// Commands with no meaningful parameters (like return to launch) give an empty list, unknown
/// commands expose all seven slots under generic labels.
pub fn fact_slots(cmd: MavCmd) -> &'static [FactSlot] {
    match cmd {
        MavCmd::NavWaypoint => &WAYPOINT_FACTS,
        MavCmd::NavLoiterUnlim => &LOITER_UNLIM_FACTS,
        MavCmd::NavLoiterTurns => &LOITER_TURNS_FACTS,
        MavCmd::NavLoiterTime => &LOITER_TIME_FACTS,
        MavCmd::NavReturnToLaunch => &[],
        MavCmd::NavLand => &LAND_FACTS,
        MavCmd::NavTakeoff => &TAKEOFF_FACTS,
        MavCmd::ConditionDelay => &DELAY_FACTS,
        MavCmd::DoJump => &JUMP_FACTS,
        MavCmd::Unknown(_) => &GENERIC_FACTS,
    }
}

/// Format a value for display with a single decimal place.
pub fn one_decimal_string(value: f64) -> String {
    format!("{:.1}", value)
}

const fn meta(label: &'static str, units: &'static str) -> FactMetaData {
    FactMetaData {
        label,
        units,
        display_degrees: false,
    }
}
