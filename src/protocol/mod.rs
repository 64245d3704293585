//! Message types and decode/encode dispatch.
//!
//! - [`Command`] — messages we send to the train (APP → train)
//! - [`Message`] — notifications the train sends to us (train → APP)
//!
//! Decoding is total. A frame with an unrecognised tag or event code, or one
//! too short for its layout, becomes [`Message::Unknown`] carrying the whole
//! frame as hex. Query replies share their leading byte with the query
//! opcode, which is how the dispatcher pairs them.

pub mod command;
pub mod event;
pub mod info;
pub mod movement;
pub mod types;

use std::fmt;

use crate::codec;
use crate::error::{Result, WireError};

pub use command::{Command, Rgb};
pub use types::{
    Color, Decision, Direction, FeedbackType, PressDuration, SensorSide, Sound, SteeringDecision,
};

// ---------------------------------------------------------------------------
// Type ID constants
// ---------------------------------------------------------------------------

// Queries and their replies (same leading byte)
pub const TYPE_VERSION_DETAIL: u8 = 0x07;
pub const TYPE_LIFETIME_ODOMETER: u8 = 0x3E;
pub const TYPE_MAC_ADDRESS: u8 = 0x42;
pub const TYPE_TRAIN_UUID: u8 = 0x43;

// Notifications (train sends)
pub const TYPE_MOVEMENT: u8 = 0xB7;
pub const TYPE_EVENT: u8 = 0xE0;

// Commands (APP sends)
pub const TYPE_PLAY_SOUND: u8 = 0x24;
pub const TYPE_SNAP_COMMAND_EXECUTION: u8 = 0x41;
pub const TYPE_CLEAR_SNAP_COMMAND: u8 = 0x64;
pub const TYPE_SNAP_COMMAND_FEEDBACK: u8 = 0x65;
pub const TYPE_DECOUPLE_WAGON: u8 = 0x80;
pub const TYPE_TOP_LED_COLOR: u8 = 0xB1;
pub const TYPE_HEADLIGHT_COLOR: u8 = 0xB4;
pub const TYPE_DRIVE_SPEED_LEVEL: u8 = 0xB8;
pub const TYPE_STOP_DRIVING: u8 = 0xB9;
pub const TYPE_DRIVE_CONSTANT_PWM: u8 = 0xBC;
pub const TYPE_PAUSE_DRIVING: u8 = 0xBE;
pub const TYPE_SPLIT_DECISION: u8 = 0xBF;

// Event codes (byte 2 of a 0xE0 frame)
pub const EVENT_DIRECTION_CHANGED: u8 = 0x01;
pub const EVENT_LOW_BATTERY: u8 = 0x02;
pub const EVENT_LOW_BATTERY_CUTOFF: u8 = 0x03;
pub const EVENT_CHARGING_STATE: u8 = 0x04;
pub const EVENT_BUTTON_PRESS: u8 = 0x05;
pub const EVENT_SNAP_EXECUTED: u8 = 0x06;
pub const EVENT_FRONT_COLOR: u8 = 0x07;
pub const EVENT_REAR_COLOR: u8 = 0x08;
pub const EVENT_SNAP_DETECTED: u8 = 0x09;
pub const EVENT_SPLIT_DECISION: u8 = 0x0A;

// ---------------------------------------------------------------------------
// Message — notifications the train sends to us
// ---------------------------------------------------------------------------

/// A notification the train sends to us.
///
/// Covers both solicited replies (version, identity, odometer) and
/// unsolicited pushes (movement telemetry, events).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Message {
    // -- Query replies --
    VersionDetail(info::VersionDetail),
    MacAddress(info::MacAddress),
    TrainUuid(info::TrainUuid),
    StatsLifetimeOdometer(info::StatsLifetimeOdometer),

    // -- Telemetry --
    Movement(movement::Movement),

    // -- Events --
    EventMovementDirectionChanged(event::DirectionChanged),
    EventLowBattery(event::BatteryAlert),
    EventLowBatteryCutOff(event::BatteryAlert),
    EventChargingStateChanged(event::ChargingStateChanged),
    EventButtonPressDetected(event::ButtonPressDetected),
    EventSnapCommandExecuted(event::SnapCommand),
    EventSnapCommandDetected(event::SnapCommand),
    EventColorChanged(event::ColorChanged),
    EventSplitDecision(event::SplitDecision),

    // -- Forward compat --
    /// Unrecognised or truncated frame, as lowercase space-separated hex.
    Unknown { payload: String },
}

impl Message {
    /// Decode one notification frame. Never fails.
    pub fn decode(frame: &[u8]) -> Self {
        Self::try_decode(frame).unwrap_or_else(|_| Self::unknown(frame))
    }

    /// Decode one notification frame, reporting why a frame fell back to
    /// `Unknown` instead of degrading silently.
    ///
    /// Unrecognised tags are still `Ok(Message::Unknown { .. })`; only
    /// recognised frames that are too short produce an error.
    pub fn try_decode(frame: &[u8]) -> Result<Self> {
        let Some(&tag) = frame.first() else {
            return Err(WireError::EmptyFrame);
        };
        match tag {
            TYPE_VERSION_DETAIL => Ok(Message::VersionDetail(info::VersionDetail::decode(frame)?)),
            TYPE_MAC_ADDRESS => Ok(Message::MacAddress(info::MacAddress::decode(frame)?)),
            TYPE_TRAIN_UUID => Ok(Message::TrainUuid(info::TrainUuid::decode(frame)?)),
            TYPE_LIFETIME_ODOMETER => Ok(Message::StatsLifetimeOdometer(
                info::StatsLifetimeOdometer::decode(frame)?,
            )),
            TYPE_MOVEMENT => Ok(Message::Movement(movement::Movement::decode(frame)?)),
            TYPE_EVENT => Self::decode_event(frame),
            _ => Ok(Self::unknown(frame)),
        }
    }

    fn decode_event(frame: &[u8]) -> Result<Self> {
        let code = codec::read_uint8(frame, event::CODE_OFFSET)?;
        match code {
            EVENT_DIRECTION_CHANGED => Ok(Message::EventMovementDirectionChanged(
                event::DirectionChanged::decode(frame)?,
            )),
            EVENT_LOW_BATTERY => Ok(Message::EventLowBattery(event::BatteryAlert::decode(frame)?)),
            EVENT_LOW_BATTERY_CUTOFF => {
                Ok(Message::EventLowBatteryCutOff(event::BatteryAlert::decode(frame)?))
            }
            EVENT_CHARGING_STATE => Ok(Message::EventChargingStateChanged(
                event::ChargingStateChanged::decode(frame)?,
            )),
            EVENT_BUTTON_PRESS => Ok(Message::EventButtonPressDetected(
                event::ButtonPressDetected::decode(frame)?,
            )),
            EVENT_SNAP_EXECUTED => {
                Ok(Message::EventSnapCommandExecuted(event::SnapCommand::decode(frame)?))
            }
            EVENT_SNAP_DETECTED => {
                Ok(Message::EventSnapCommandDetected(event::SnapCommand::decode(frame)?))
            }
            EVENT_FRONT_COLOR => Ok(Message::EventColorChanged(event::ColorChanged::decode(
                frame,
                SensorSide::Front,
            )?)),
            EVENT_REAR_COLOR => Ok(Message::EventColorChanged(event::ColorChanged::decode(
                frame,
                SensorSide::Rear,
            )?)),
            EVENT_SPLIT_DECISION => {
                Ok(Message::EventSplitDecision(event::SplitDecision::decode(frame)?))
            }
            _ => Ok(Self::unknown(frame)),
        }
    }

    fn unknown(frame: &[u8]) -> Self {
        Message::Unknown {
            payload: codec::hex_string(frame, 0, " "),
        }
    }

    /// Discriminant of this message.
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::VersionDetail(_) => MessageType::VersionDetail,
            Message::MacAddress(_) => MessageType::MacAddress,
            Message::TrainUuid(_) => MessageType::TrainUuid,
            Message::StatsLifetimeOdometer(_) => MessageType::StatsLifetimeOdometer,
            Message::Movement(_) => MessageType::Movement,
            Message::EventMovementDirectionChanged(_) => MessageType::EventMovementDirectionChanged,
            Message::EventLowBattery(_) => MessageType::EventLowBattery,
            Message::EventLowBatteryCutOff(_) => MessageType::EventLowBatteryCutOff,
            Message::EventChargingStateChanged(_) => MessageType::EventChargingStateChanged,
            Message::EventButtonPressDetected(_) => MessageType::EventButtonPressDetected,
            Message::EventSnapCommandExecuted(_) => MessageType::EventSnapCommandExecuted,
            Message::EventSnapCommandDetected(_) => MessageType::EventSnapCommandDetected,
            Message::EventColorChanged(_) => MessageType::EventColorChanged,
            Message::EventSplitDecision(_) => MessageType::EventSplitDecision,
            Message::Unknown { .. } => MessageType::Unknown,
        }
    }
}

/// Discriminant tag of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MessageType {
    VersionDetail,
    MacAddress,
    TrainUuid,
    StatsLifetimeOdometer,
    Movement,
    EventMovementDirectionChanged,
    EventLowBattery,
    EventLowBatteryCutOff,
    EventChargingStateChanged,
    EventButtonPressDetected,
    EventSnapCommandExecuted,
    EventSnapCommandDetected,
    EventColorChanged,
    EventSplitDecision,
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
