//! # Mission item
//!
//! A single step of a mission: a command, the seven generic parameters it is interpreted
//! against, and the bookkeeping the ground station keeps alongside (current item flag, reached
//! time).
//!
//! Parameters 5, 6 and 7 hold the item's coordinate (latitude, longitude, altitude), and the
//! named quantities (hold time, acceptance radius, loiter radius, yaw) are views onto
//! parameters 1 to 4. There is no other storage, so the generic and named views cannot
//! diverge.
//!
//! Changes are published to subscribers as `ItemEvent`s, see `MissionItem::subscribe`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;

use crate::clock::{Clock, GroundClock};
use crate::cmd::MavCmd;
use crate::fact::{fact_slots, Fact};
use crate::frame::MavFrame;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of generic parameter slots of an item.
pub const NUM_PARAMS: usize = 7;

/// Number of whitespace separated fields in a saved item line.
pub const NUM_LINE_FIELDS: usize = 12;

const SLOT_HOLD_TIME: usize = 1;
const SLOT_ACCEPTANCE_RADIUS: usize = 2;
const SLOT_LOITER_RADIUS: usize = 3;
const SLOT_YAW: usize = 4;
const SLOT_LATITUDE: usize = 5;
const SLOT_LONGITUDE: usize = 6;
const SLOT_ALTITUDE: usize = 7;

const PARAM_FIELD_NAMES: [&str; NUM_PARAMS] = [
    "param1", "param2", "param3", "param4", "param5", "param6", "param7",
];

// ------------------------------------------------------------------------------------------------
// MACROS
// ------------------------------------------------------------------------------------------------

macro_rules! param_accessors {
    ($(($get:ident, $set:ident, $slot:expr)),+) => {
        $(
            #[doc = concat!("Value of parameter slot ", stringify!($slot), ".")]
            pub fn $get(&self) -> f64 {
                self.data.params[$slot - 1]
            }

            #[doc = concat!("Set parameter slot ", stringify!($slot), ".")]
            pub fn $set(&mut self, value: f64) {
                self.write_slot($slot, value)
            }
        )+
    };
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A geographic position.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Units: degrees
    pub latitude_deg: f64,

    /// Units: degrees
    pub longitude_deg: f64,

    /// Units: meters, reference given by the item's frame
    pub altitude_m: f64,
}

/// The plain values of a mission item, as saved to and loaded from a mission file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    /// Position of the item in its mission.
    pub seq: u16,

    /// Whether this is the item the vehicle is currently executing.
    pub is_current: bool,

    pub frame: MavFrame,

    pub command: MavCmd,

    /// Generic parameters, `params[0]` is param1.
    ///
    /// Non-finite values (NaN meaning "unchanged" is common) are serialised as the strings
    /// `"NaN"`, `"inf"` and `"-inf"`, since JSON has no representation for them.
    #[serde(with = "param_values")]
    pub params: [f64; NUM_PARAMS],

    /// Whether the vehicle continues to the next item on its own.
    pub autocontinue: bool,
}

/// An observable mission item.
///
/// Cloning an item copies its values and reached time but not its subscribers.
#[derive(Debug, Default)]
pub struct MissionItem {
    data: ItemData,

    /// Ground time at which the item was reached, 0 if it has not been.
    reached_time_ms: u64,

    subscribers: Vec<Sender<ItemEvent>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Change notifications published by a `MissionItem`.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEvent {
    SequenceNumberChanged(u16),
    IsCurrentItemChanged(bool),
    CoordinateChanged(Coordinate),
    FrameChanged(MavFrame),
    AutocontinueChanged(bool),
    CommandChanged(MavCmd),
    SpecifiesCoordinateChanged(bool),

    /// A parameter slot (1 to 7) was written.
    ParamChanged { slot: usize, value: f64 },

    /// Yaw changed, in degrees.
    YawChanged(f64),

    /// Loiter orbit radius changed, in meters.
    LoiterOrbitRadiusChanged(f64),

    /// The displayed value strings of the item changed.
    ValueStringsChanged(Vec<String>),

    /// The item was reached at the given ground time.
    Reached(u64),

    /// Something affecting the meaning of the item changed.
    Changed,
}

/// Errors which can occur when reading an item line.
#[derive(Debug, Error)]
pub enum ItemParseError {
    #[error("Expected 12 fields in the item line, found {0}")]
    TooFewFields(usize),

    #[error("Field `{field}` is not a valid number: {token:?}")]
    InvalidNumber { field: &'static str, token: String },

    #[error("Field `{field}` must be 0 or 1, found {token:?}")]
    InvalidFlag { field: &'static str, token: String },

    #[error("No item line left to read")]
    EndOfStream,

    #[error("Cannot read the item line: {0}")]
    ReadError(std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for ItemData {
    fn default() -> Self {
        Self {
            seq: 0,
            is_current: false,
            frame: MavFrame::Global,
            command: MavCmd::NavWaypoint,
            params: [0.0; NUM_PARAMS],
            autocontinue: true,
        }
    }
}

impl ItemData {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude_deg: self.params[SLOT_LATITUDE - 1],
            longitude_deg: self.params[SLOT_LONGITUDE - 1],
            altitude_m: self.params[SLOT_ALTITUDE - 1],
        }
    }

    /// Parse an item from a saved line.
    ///
    /// Fields beyond the twelfth are ignored.
    pub fn parse_line(line: &str) -> Result<Self, ItemParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() < NUM_LINE_FIELDS {
            return Err(ItemParseError::TooFewFields(tokens.len()));
        }

        let mut params = [0f64; NUM_PARAMS];
        for (i, param) in params.iter_mut().enumerate() {
            *param = parse_number(PARAM_FIELD_NAMES[i], tokens[4 + i])?;
        }

        Ok(Self {
            seq: parse_number("seq", tokens[0])?,
            is_current: parse_flag("current", tokens[1])?,
            frame: MavFrame::from_id(parse_number("frame", tokens[2])?),
            command: MavCmd::from_id(parse_number("command", tokens[3])?),
            params,
            autocontinue: parse_flag("autocontinue", tokens[11])?,
        })
    }
}

/// Formats the item as a saved line, without the line terminator.
///
/// Parameters use the shortest representation which parses back to the same value.
impl fmt::Display for ItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.seq,
            self.is_current as u8,
            self.frame.id(),
            self.command.id()
        )?;

        for param in self.params.iter() {
            write!(f, " {}", param)?;
        }

        write!(f, " {}", self.autocontinue as u8)
    }
}

impl FromStr for ItemData {
    type Err = ItemParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

impl Clone for MissionItem {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            reached_time_ms: self.reached_time_ms,
            subscribers: Vec::new(),
        }
    }
}

impl From<ItemData> for MissionItem {
    fn from(data: ItemData) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }
}

impl MissionItem {
    /// Create a new waypoint at the given coordinate, with all other fields at their defaults.
    pub fn new(seq: u16, coordinate: Coordinate) -> Self {
        let mut data = ItemData {
            seq,
            ..Default::default()
        };
        data.params[SLOT_LATITUDE - 1] = coordinate.latitude_deg;
        data.params[SLOT_LONGITUDE - 1] = coordinate.longitude_deg;
        data.params[SLOT_ALTITUDE - 1] = coordinate.altitude_m;

        Self::from(data)
    }

    /// Subscribe to changes of this item.
    ///
    /// Events are sent as soon as the change is made. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<ItemEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    /// The plain values of the item.
    pub fn data(&self) -> &ItemData {
        &self.data
    }

    /// Replace all values of the item at once.
    ///
    /// The reached time is kept.
    pub fn set_data(&mut self, data: ItemData) {
        self.data = data;

        if self.subscribers.is_empty() {
            return;
        }

        self.emit(ItemEvent::SequenceNumberChanged(self.data.seq));
        self.emit(ItemEvent::IsCurrentItemChanged(self.data.is_current));
        self.emit(ItemEvent::FrameChanged(self.data.frame));
        self.emit(ItemEvent::CommandChanged(self.data.command));
        self.emit(ItemEvent::SpecifiesCoordinateChanged(
            self.specifies_coordinate(),
        ));
        for slot in 1..=NUM_PARAMS {
            let value = self.data.params[slot - 1];
            self.emit(ItemEvent::ParamChanged { slot, value });
        }
        self.emit(ItemEvent::CoordinateChanged(self.coordinate()));
        self.emit(ItemEvent::YawChanged(self.yaw_degrees()));
        self.emit(ItemEvent::LoiterOrbitRadiusChanged(
            self.loiter_orbit_radius(),
        ));
        self.emit(ItemEvent::AutocontinueChanged(self.data.autocontinue));
        self.emit_value_strings();
        self.emit(ItemEvent::Changed);
    }

    // ---- BOOKKEEPING ----

    pub fn sequence_number(&self) -> u16 {
        self.data.seq
    }

    pub fn set_sequence_number(&mut self, seq: u16) {
        self.data.seq = seq;
        self.emit(ItemEvent::SequenceNumberChanged(seq));
    }

    pub fn is_current_item(&self) -> bool {
        self.data.is_current
    }

    pub fn set_is_current_item(&mut self, is_current: bool) {
        self.data.is_current = is_current;
        self.emit(ItemEvent::IsCurrentItemChanged(is_current));
    }

    pub fn autocontinue(&self) -> bool {
        self.data.autocontinue
    }

    pub fn set_autocontinue(&mut self, autocontinue: bool) {
        self.data.autocontinue = autocontinue;
        self.emit(ItemEvent::AutocontinueChanged(autocontinue));
        self.emit(ItemEvent::Changed);
    }

    pub fn frame(&self) -> MavFrame {
        self.data.frame
    }

    pub fn set_frame(&mut self, frame: MavFrame) {
        self.data.frame = frame;
        self.emit(ItemEvent::FrameChanged(frame));
        self.emit(ItemEvent::Changed);
    }

    // ---- COMMAND ----

    pub fn command(&self) -> MavCmd {
        self.data.command
    }

    /// Set the item's command.
    ///
    /// Parameter values are left as they are, even if the new command gives them a different
    /// meaning.
    pub fn set_command(&mut self, command: MavCmd) {
        self.data.command = command;
        self.emit(ItemEvent::CommandChanged(command));
        self.emit(ItemEvent::SpecifiesCoordinateChanged(
            command.specifies_coordinate(),
        ));
        self.emit_value_strings();
        self.emit(ItemEvent::Changed);
    }

    /// Position of the command in the known command table.
    pub fn command_by_index(&self) -> Option<usize> {
        self.data.command.index()
    }

    /// Set the command from its position in the known command table.
    pub fn set_command_by_index(&mut self, index: usize) {
        match MavCmd::from_index(index) {
            Some(cmd) => self.set_command(cmd),
            None => warn!(
                "Ignoring command index {} on item {}, no such command",
                index, self.data.seq
            ),
        }
    }

    pub fn command_name(&self) -> &'static str {
        self.data.command.name()
    }

    pub fn specifies_coordinate(&self) -> bool {
        self.data.command.specifies_coordinate()
    }

    /// Returns true if the item's command is a navigation command.
    pub fn is_navigation_type(&self) -> bool {
        self.data.command.is_navigation()
    }

    // ---- COORDINATE ----

    pub fn coordinate(&self) -> Coordinate {
        self.data.coordinate()
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        let values = [
            (SLOT_LATITUDE, coordinate.latitude_deg),
            (SLOT_LONGITUDE, coordinate.longitude_deg),
            (SLOT_ALTITUDE, coordinate.altitude_m),
        ];

        for (slot, value) in values.iter() {
            self.data.params[slot - 1] = *value;
            self.emit(ItemEvent::ParamChanged {
                slot: *slot,
                value: *value,
            });
        }

        self.emit(ItemEvent::CoordinateChanged(coordinate));
        self.emit_value_strings();
        self.emit(ItemEvent::Changed);
    }

    pub fn latitude(&self) -> f64 {
        self.param5()
    }

    pub fn set_latitude(&mut self, latitude_deg: f64) {
        self.write_slot(SLOT_LATITUDE, latitude_deg)
    }

    pub fn longitude(&self) -> f64 {
        self.param6()
    }

    pub fn set_longitude(&mut self, longitude_deg: f64) {
        self.write_slot(SLOT_LONGITUDE, longitude_deg)
    }

    pub fn altitude(&self) -> f64 {
        self.param7()
    }

    pub fn set_altitude(&mut self, altitude_m: f64) {
        self.write_slot(SLOT_ALTITUDE, altitude_m)
    }

    // ---- PARAMETERS ----

    param_accessors!(
        (param1, set_param1, 1),
        (param2, set_param2, 2),
        (param3, set_param3, 3),
        (param4, set_param4, 4),
        (param5, set_param5, 5),
        (param6, set_param6, 6),
        (param7, set_param7, 7)
    );

    pub fn params(&self) -> &[f64; NUM_PARAMS] {
        &self.data.params
    }

    /// Hold time at a waypoint in seconds (param1).
    pub fn hold_time(&self) -> f64 {
        self.param1()
    }

    pub fn set_hold_time(&mut self, hold_time_s: f64) {
        self.write_slot(SLOT_HOLD_TIME, hold_time_s)
    }

    /// Distance from a waypoint at which it is considered reached, in meters (param2).
    pub fn acceptance_radius(&self) -> f64 {
        self.param2()
    }

    pub fn set_acceptance_radius(&mut self, radius_m: f64) {
        self.write_slot(SLOT_ACCEPTANCE_RADIUS, radius_m)
    }

    /// Radius of the loiter circle in meters (param3).
    pub fn loiter_orbit_radius(&self) -> f64 {
        self.param3()
    }

    pub fn set_loiter_orbit_radius(&mut self, radius_m: f64) {
        self.write_slot(SLOT_LOITER_RADIUS, radius_m)
    }

    /// Yaw in radians (param4).
    pub fn yaw_radians(&self) -> f64 {
        self.param4()
    }

    pub fn set_yaw_radians(&mut self, yaw_rad: f64) {
        self.write_slot(SLOT_YAW, yaw_rad)
    }

    pub fn yaw_degrees(&self) -> f64 {
        self.param4().to_degrees()
    }

    pub fn set_yaw_degrees(&mut self, yaw_deg: f64) {
        self.write_slot(SLOT_YAW, yaw_deg.to_radians())
    }

    // ---- DISPLAY ----

    /// The meaningful parameters of the item's command, in display order.
    pub fn facts(&self) -> Vec<Fact> {
        fact_slots(self.data.command)
            .iter()
            .map(|f| Fact {
                meta: f.meta,
                slot: f.slot,
                value: self.data.params[f.slot - 1],
            })
            .collect()
    }

    pub fn value_labels(&self) -> Vec<&'static str> {
        fact_slots(self.data.command)
            .iter()
            .map(|f| f.meta.label)
            .collect()
    }

    /// Values matching `value_labels`, formatted to one decimal place.
    pub fn value_strings(&self) -> Vec<String> {
        self.facts().iter().map(|f| f.value_string()).collect()
    }

    /// (label, value string) pairs of the item's meaningful parameters.
    pub fn values(&self) -> Vec<(&'static str, String)> {
        self.facts()
            .iter()
            .map(|f| (f.label(), f.value_string()))
            .collect()
    }

    // ---- REACHED STATE ----

    /// Mark the item as reached using the ground clock.
    pub fn mark_reached(&mut self) {
        self.mark_reached_with(&GroundClock)
    }

    /// Mark the item as reached using the given clock.
    ///
    /// Only the first call has an effect, an item is reached once per mission run.
    pub fn mark_reached_with<C: Clock + ?Sized>(&mut self, clock: &C) {
        if self.is_reached() {
            return;
        }

        self.reached_time_ms = clock.now_ms().max(1);
        self.emit(ItemEvent::Reached(self.reached_time_ms));
    }

    pub fn is_reached(&self) -> bool {
        self.reached_time_ms > 0
    }

    /// Ground time at which the item was reached, or 0 if it has not been.
    pub fn reached_timestamp(&self) -> u64 {
        self.reached_time_ms
    }

    // ---- SERIALISATION ----

    /// The item as a saved line, without the line terminator.
    pub fn to_line(&self) -> String {
        self.data.to_string()
    }

    /// Write the item as a single line.
    pub fn save<W: Write + ?Sized>(&self, stream: &mut W) -> std::io::Result<()> {
        writeln!(stream, "{}", self.data)
    }

    /// Read the next line from the stream into this item.
    ///
    /// The item is only modified if the whole line is valid.
    pub fn load<R: BufRead + ?Sized>(&mut self, stream: &mut R) -> Result<(), ItemParseError> {
        let mut line = String::new();

        match stream.read_line(&mut line) {
            Ok(0) => return Err(ItemParseError::EndOfStream),
            Ok(_) => (),
            Err(e) => return Err(ItemParseError::ReadError(e)),
        }

        let data = ItemData::parse_line(&line)?;
        self.set_data(data);

        Ok(())
    }

    // ---- PRIVATE ----

    /// Write a parameter slot, notifying every view that aliases it.
    fn write_slot(&mut self, slot: usize, value: f64) {
        self.data.params[slot - 1] = value;

        self.emit(ItemEvent::ParamChanged { slot, value });

        match slot {
            SLOT_LOITER_RADIUS => self.emit(ItemEvent::LoiterOrbitRadiusChanged(value)),
            SLOT_YAW => self.emit(ItemEvent::YawChanged(value.to_degrees())),
            SLOT_LATITUDE | SLOT_LONGITUDE | SLOT_ALTITUDE => {
                self.emit(ItemEvent::CoordinateChanged(self.coordinate()))
            }
            _ => (),
        }

        self.emit_value_strings();
        self.emit(ItemEvent::Changed);
    }

    fn emit_value_strings(&mut self) {
        if !self.subscribers.is_empty() {
            let strings = self.value_strings();
            self.emit(ItemEvent::ValueStringsChanged(strings));
        }
    }

    /// Send the event to all subscribers, forgetting those which have gone away.
    fn emit(&mut self, event: ItemEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn parse_number<T: FromStr>(field: &'static str, token: &str) -> Result<T, ItemParseError> {
    token.parse().map_err(|_| ItemParseError::InvalidNumber {
        field,
        token: token.to_string(),
    })
}

fn parse_flag(field: &'static str, token: &str) -> Result<bool, ItemParseError> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ItemParseError::InvalidFlag {
            field,
            token: token.to_string(),
        }),
    }
}

// ------------------------------------------------------------------------------------------------
// SERDE HELPERS
// ------------------------------------------------------------------------------------------------

/// (De)serialisation of the parameter array which survives non-finite values.
mod param_values {
    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    use super::NUM_PARAMS;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum ParamValue {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        params: &[f64; NUM_PARAMS],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let values: Vec<ParamValue> = params
            .iter()
            .map(|&v| {
                if v.is_finite() {
                    ParamValue::Number(v)
                } else {
                    ParamValue::Text(v.to_string())
                }
            })
            .collect();

        values.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[f64; NUM_PARAMS], D::Error> {
        let values = Vec::<ParamValue>::deserialize(deserializer)?;

        if values.len() != NUM_PARAMS {
            return Err(D::Error::invalid_length(values.len(), &"7 parameters"));
        }

        let mut params = [0f64; NUM_PARAMS];

        for (param, value) in params.iter_mut().zip(values) {
            *param = match value {
                ParamValue::Number(v) => v,
                ParamValue::Text(t) => t
                    .parse()
                    .map_err(|_| D::Error::custom(format!("invalid parameter value {:?}", t)))?,
            };
        }

        Ok(params)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    fn sample_item() -> MissionItem {
        MissionItem::from(ItemData {
            seq: 7,
            is_current: true,
            frame: MavFrame::GlobalRelativeAlt,
            command: MavCmd::NavLoiterTurns,
            params: [
                3.0,
                0.25,
                -45.5,
                std::f64::consts::PI,
                47.397742,
                8.545594,
                488.123456789,
            ],
            autocontinue: false,
        })
    }

    #[test]
    fn test_defaults() {
        let item = MissionItem::default();

        assert_eq!(item.sequence_number(), 0);
        assert_eq!(item.command(), MavCmd::NavWaypoint);
        assert_eq!(item.frame(), MavFrame::Global);
        assert!(item.autocontinue());
        assert!(!item.is_current_item());
        assert!(!item.is_reached());
        assert_eq!(item.reached_timestamp(), 0);
        assert_eq!(item.params(), &[0.0; NUM_PARAMS]);
        assert_eq!(item.coordinate(), Coordinate::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let items = vec![
            sample_item(),
            MissionItem::default(),
            MissionItem::from(ItemData {
                seq: 65535,
                command: MavCmd::Unknown(31010),
                frame: MavFrame::Other(99),
                params: [1e-300, -0.0, 1.0 / 3.0, -2.5e17, -89.999999, 179.9999999, -12.0],
                ..Default::default()
            }),
        ];

        for item in items.iter() {
            let mut buf = Vec::new();
            item.save(&mut buf).unwrap();

            let mut loaded = MissionItem::default();
            loaded.load(&mut Cursor::new(buf)).unwrap();

            assert_eq!(loaded.data(), item.data());
        }
    }

    #[test]
    fn test_load_example_line() {
        let mut item = MissionItem::default();
        item.load(&mut Cursor::new("3 1 3 16 0 0 0 0 47.397 8.545 500 1\n"))
            .unwrap();

        assert_eq!(item.sequence_number(), 3);
        assert!(item.is_current_item());
        assert_eq!(item.frame(), MavFrame::GlobalRelativeAlt);
        assert_eq!(item.frame().id(), 3);
        assert_eq!(item.command(), MavCmd::NavWaypoint);
        assert_eq!(
            item.coordinate(),
            Coordinate {
                latitude_deg: 47.397,
                longitude_deg: 8.545,
                altitude_m: 500.0
            }
        );
        assert!(item.autocontinue());
    }

    #[test]
    fn test_params_json() {
        let mut data = sample_item().data().clone();
        data.params[0] = f64::NAN;

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"NaN\""));

        let parsed: ItemData = serde_json::from_str(&json).unwrap();
        assert!(parsed.params[0].is_nan());
        assert_eq!(parsed.params[1..], data.params[1..]);

        // Integer params written by other tools are accepted
        let parsed: ItemData = serde_json::from_str(
            r#"{"seq":1,"is_current":false,"frame":3,"command":16,
                "params":[0,2,0,"inf",47.5,8.5,100],"autocontinue":true}"#,
        )
        .unwrap();
        assert_eq!(parsed.params[1], 2.0);
        assert_eq!(parsed.params[3], f64::INFINITY);

        let short = r#"{"seq":1,"is_current":false,"frame":3,"command":16,
            "params":[0,2,0],"autocontinue":true}"#;
        assert!(serde_json::from_str::<ItemData>(short).is_err());

        let bad = r#"{"seq":1,"is_current":false,"frame":3,"command":16,
            "params":[0,2,0,"north",0,0,0],"autocontinue":true}"#;
        assert!(serde_json::from_str::<ItemData>(bad).is_err());
    }

    #[test]
    fn test_load_tab_separated() {
        let data: ItemData = "0\t0\t0\t16\t0\t0\t0\t0\t1.5\t2.5\t10\t1".parse().unwrap();
        assert_eq!(data.coordinate().longitude_deg, 2.5);
    }

    #[test]
    fn test_load_malformed_leaves_item_untouched() {
        let mut item = sample_item();
        let before = item.data().clone();
        let rx = item.subscribe();

        match item.load(&mut Cursor::new("1 0 abc")) {
            Err(ItemParseError::TooFewFields(3)) => (),
            r => panic!("Expected TooFewFields(3), got {:?}", r),
        }

        match item.load(&mut Cursor::new("1 0 3 16 0 0 x 0 47.3 8.5 500 1")) {
            Err(ItemParseError::InvalidNumber { field, token }) => {
                assert_eq!(field, "param3");
                assert_eq!(token, "x");
            }
            r => panic!("Expected InvalidNumber, got {:?}", r),
        }

        match item.load(&mut Cursor::new("1 2 3 16 0 0 0 0 47.3 8.5 500 1")) {
            Err(ItemParseError::InvalidFlag { field, .. }) => assert_eq!(field, "current"),
            r => panic!("Expected InvalidFlag, got {:?}", r),
        }

        match item.load(&mut Cursor::new("-1 0 3 16 0 0 0 0 47.3 8.5 500 1")) {
            Err(ItemParseError::InvalidNumber { field, .. }) => assert_eq!(field, "seq"),
            r => panic!("Expected InvalidNumber, got {:?}", r),
        }

        assert_eq!(item.data(), &before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_load_end_of_stream() {
        let mut item = MissionItem::default();
        let mut stream = Cursor::new("0 0 0 16 0 0 0 0 1 2 3 1\n");

        item.load(&mut stream).unwrap();
        match item.load(&mut stream) {
            Err(ItemParseError::EndOfStream) => (),
            r => panic!("Expected EndOfStream, got {:?}", r),
        }
    }

    #[test]
    fn test_to_line() {
        let mut item = MissionItem::new(
            2,
            Coordinate {
                latitude_deg: 47.5,
                longitude_deg: 8.25,
                altitude_m: 100.0,
            },
        );
        item.set_acceptance_radius(5.0);

        assert_eq!(item.to_line(), "2 0 0 16 0 5 0 0 47.5 8.25 100 1");
    }

    #[test]
    fn test_yaw_degrees_round_trip() {
        let mut item = MissionItem::default();

        let mut deg = -180.0;
        while deg <= 180.0 {
            item.set_yaw_degrees(deg);
            assert!((item.yaw_degrees() - deg).abs() < 1e-6, "{}", deg);
            deg += 0.5;
        }
    }

    #[test]
    fn test_yaw_aliases_param4() {
        let mut a = MissionItem::default();
        let mut b = MissionItem::default();
        let rx_a = a.subscribe();
        let rx_b = b.subscribe();

        a.set_param4(1.25);
        b.set_yaw_radians(1.25);

        assert_eq!(a.yaw_radians(), 1.25);
        assert_eq!(b.param4(), 1.25);
        assert_eq!(a.data(), b.data());

        let events_a: Vec<ItemEvent> = rx_a.try_iter().collect();
        let events_b: Vec<ItemEvent> = rx_b.try_iter().collect();
        assert_eq!(events_a, events_b);
        assert!(events_a.contains(&ItemEvent::YawChanged(1.25f64.to_degrees())));
        assert!(events_a.contains(&ItemEvent::ParamChanged {
            slot: 4,
            value: 1.25
        }));
    }

    #[test]
    fn test_named_accessors_alias_params() {
        let mut item = MissionItem::default();

        item.set_hold_time(12.0);
        item.set_acceptance_radius(3.5);
        item.set_loiter_orbit_radius(60.0);
        item.set_latitude(-33.9);
        item.set_longitude(151.2);
        item.set_altitude(25.0);

        assert_eq!(item.param1(), 12.0);
        assert_eq!(item.param2(), 3.5);
        assert_eq!(item.param3(), 60.0);
        assert_eq!(item.param5(), -33.9);
        assert_eq!(item.param6(), 151.2);
        assert_eq!(item.param7(), 25.0);

        item.set_param1(4.0);
        item.set_param3(80.0);
        assert_eq!(item.hold_time(), 4.0);
        assert_eq!(item.loiter_orbit_radius(), 80.0);
    }

    #[test]
    fn test_coordinate_events() {
        let mut item = MissionItem::default();
        let rx = item.subscribe();

        let coord = Coordinate {
            latitude_deg: 1.0,
            longitude_deg: 2.0,
            altitude_m: 3.0,
        };
        item.set_coordinate(coord);

        let events: Vec<ItemEvent> = rx.try_iter().collect();
        let num_coord_events = events
            .iter()
            .filter(|e| matches!(e, ItemEvent::CoordinateChanged(_)))
            .count();

        assert_eq!(num_coord_events, 1);
        assert!(events.contains(&ItemEvent::CoordinateChanged(coord)));
        assert_eq!(events.last(), Some(&ItemEvent::Changed));
        assert_eq!(item.param6(), 2.0);
    }

    #[test]
    fn test_command_change_keeps_params() {
        let mut item = sample_item();
        let rx = item.subscribe();

        item.set_command(MavCmd::NavWaypoint);

        assert_eq!(item.loiter_orbit_radius(), -45.5);
        assert_eq!(item.param1(), 3.0);

        let events: Vec<ItemEvent> = rx.try_iter().collect();
        assert_eq!(events[0], ItemEvent::CommandChanged(MavCmd::NavWaypoint));
        assert_eq!(events[1], ItemEvent::SpecifiesCoordinateChanged(true));
        assert_eq!(events.last(), Some(&ItemEvent::Changed));

        item.set_command(MavCmd::DoJump);
        assert!(!item.specifies_coordinate());
        assert_eq!(item.command_name(), "Jump To Command");
    }

    #[test]
    fn test_command_by_index() {
        let mut item = MissionItem::default();
        assert_eq!(item.command_by_index(), Some(0));

        item.set_command_by_index(6);
        assert_eq!(item.command(), MavCmd::NavTakeoff);

        // Out of range indexes are ignored
        item.set_command_by_index(100);
        assert_eq!(item.command(), MavCmd::NavTakeoff);

        item.set_command(MavCmd::Unknown(3000));
        assert_eq!(item.command_by_index(), None);
    }

    #[test]
    fn test_value_strings() {
        let mut item = MissionItem::new(
            0,
            Coordinate {
                latitude_deg: 47.0,
                longitude_deg: 8.0,
                altitude_m: 120.04,
            },
        );
        item.set_acceptance_radius(2.0);
        item.set_hold_time(30.0);
        item.set_yaw_degrees(90.0);

        assert_eq!(item.value_labels(), vec!["Alt:", "Radius:", "Hold:", "Yaw:"]);
        assert_eq!(item.value_strings(), vec!["120.0", "2.0", "30.0", "90.0"]);
        assert_eq!(item.values()[3], ("Yaw:", String::from("90.0")));

        item.set_command(MavCmd::NavReturnToLaunch);
        assert!(item.value_labels().is_empty());
        assert!(item.value_strings().is_empty());

        item.set_command(MavCmd::Unknown(42000));
        assert_eq!(item.command_name(), "Unknown");
        assert_eq!(item.value_labels().len(), NUM_PARAMS);
        assert_eq!(item.value_strings()[6], "120.0");
    }

    #[test]
    fn test_facts() {
        let item = sample_item();
        let facts = item.facts();

        assert_eq!(facts.len(), 4);
        assert_eq!(facts[2].label(), "Radius:");
        assert_eq!(facts[2].slot, 3);
        assert_eq!(facts[2].value, -45.5);
        assert_eq!(facts[3].label(), "Turns:");
        assert_eq!(facts[3].value_string(), "3.0");
    }

    #[test]
    fn test_mark_reached() {
        let mut item = MissionItem::default();
        assert!(!item.is_reached());

        item.mark_reached();
        let first = item.reached_timestamp();
        assert!(item.is_reached());
        assert!(first > 0);

        item.mark_reached();
        assert!(item.reached_timestamp() >= first);

        let mut other = MissionItem::default();
        other.mark_reached();
        assert!(other.reached_timestamp() >= first);
    }

    #[test]
    fn test_mark_reached_once() {
        let mut item = MissionItem::default();
        let rx = item.subscribe();

        item.mark_reached_with(&FixedClock(1000));
        item.mark_reached_with(&FixedClock(2000));

        assert_eq!(item.reached_timestamp(), 1000);
        let events: Vec<ItemEvent> = rx.try_iter().collect();
        assert_eq!(events, vec![ItemEvent::Reached(1000)]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut item = sample_item();
        let rx = item.subscribe();
        item.mark_reached_with(&FixedClock(55));
        let _ = rx.try_iter().count();

        let mut copy = item.clone();
        assert_eq!(copy.data(), item.data());
        assert_eq!(copy.reached_timestamp(), 55);

        copy.set_param3(1.0);
        copy.set_sequence_number(8);

        assert_eq!(item.param3(), -45.5);
        assert_eq!(item.sequence_number(), 7);

        // The copy has no subscribers
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut item = MissionItem::default();
        let rx = item.subscribe();
        let keep = item.subscribe();
        drop(rx);

        item.set_frame(MavFrame::GlobalRelativeAlt);

        assert_eq!(item.subscribers.len(), 1);
        let events: Vec<ItemEvent> = keep.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ItemEvent::FrameChanged(MavFrame::GlobalRelativeAlt),
                ItemEvent::Changed
            ]
        );
    }

    #[test]
    fn test_load_notifies() {
        let mut item = MissionItem::default();
        let rx = item.subscribe();

        item.load(&mut Cursor::new("5 0 3 21 0 0 0 0 1 2 3 0")).unwrap();

        let events: Vec<ItemEvent> = rx.try_iter().collect();
        assert!(events.contains(&ItemEvent::SequenceNumberChanged(5)));
        assert!(events.contains(&ItemEvent::CommandChanged(MavCmd::NavLand)));
        assert!(events.contains(&ItemEvent::AutocontinueChanged(false)));
        assert_eq!(events.last(), Some(&ItemEvent::Changed));
    }
}
