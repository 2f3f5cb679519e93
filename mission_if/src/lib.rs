//! # Mission interface crate.
//!
//! Provides the mission item record shared by all ground-side software, together with the
//! static command and frame tables it is interpreted against and the text formats it is stored
//! in.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Ground time source used to stamp reached items
pub mod clock;

/// MAVLink mission commands and their tables
pub mod cmd;

/// Named, displayable views of parameter slots
pub mod fact;

/// MAVLink coordinate frames
pub mod frame;

/// The observable mission item record and its line format
pub mod item;

/// Reading, writing and checking of whole mission files
pub mod mission_file;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use clock::{Clock, GroundClock};
pub use cmd::MavCmd;
pub use fact::{Fact, FactMetaData};
pub use frame::MavFrame;
pub use item::{Coordinate, ItemData, ItemEvent, ItemParseError, MissionItem};
