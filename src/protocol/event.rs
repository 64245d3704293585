//! Timestamped event notifications. Tag 0xE0.
//!
//! Layout: `[E0 xx code ts(4B BE, ms) payload...]`. Byte 1 is reserved and
//! ignored; `code` selects the payload layout.

use crate::codec;
use crate::error::Result;
use crate::protocol::types::{Color, Decision, Direction, PressDuration, SensorSide};

pub(crate) const CODE_OFFSET: usize = 2;
const TIMESTAMP_OFFSET: usize = 3;
const PAYLOAD_OFFSET: usize = 7;

/// Device uptime at which an event fired, as sent (milliseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub u32);

impl Timestamp {
    fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self(codec::read_uint32(frame, TIMESTAMP_OFFSET)?))
    }

    pub fn as_millis(self) -> u32 {
        self.0
    }

    /// Fractional seconds (`ms / 1000`).
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    /// Whole seconds, truncated.
    pub fn as_secs(self) -> u32 {
        self.0 / 1000
    }
}

/// Direction changed. Code 0x01.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DirectionChanged {
    pub ts: Timestamp,
    pub direction: Option<Direction>,
}

impl DirectionChanged {
    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
            direction: Direction::from_index(codec::read_uint8(frame, PAYLOAD_OFFSET)?),
        })
    }
}

/// Low battery warning (code 0x02) and low-battery cut-off (code 0x03).
/// No payload beyond the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatteryAlert {
    pub ts: Timestamp,
}

impl BatteryAlert {
    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
        })
    }
}

/// Charger connected or removed. Code 0x04.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChargingStateChanged {
    pub ts: Timestamp,
    pub charging: bool,
}

impl ChargingStateChanged {
    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
            charging: codec::read_bool(frame, PAYLOAD_OFFSET)?,
        })
    }
}

/// Top button pressed. Code 0x05.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ButtonPressDetected {
    pub ts: Timestamp,
    /// `None` when the device reports no duration
    pub press_duration: Option<PressDuration>,
}

impl ButtonPressDetected {
    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
            press_duration: PressDuration::from_index(codec::read_uint8(frame, PAYLOAD_OFFSET)?),
        })
    }
}

/// Snap command executed (code 0x06) or detected (code 0x09).
///
/// Payload: `[counter c1 c2 c3 c4]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SnapCommand {
    pub ts: Timestamp,
    /// Repeat counter
    pub counter: u8,
    /// Color sequence as read by the front sensor
    pub colors: [Option<Color>; 4],
}

impl SnapCommand {
    const COLORS_OFFSET: usize = PAYLOAD_OFFSET + 1;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        let ts = Timestamp::decode(frame)?;
        let counter = codec::read_uint8(frame, PAYLOAD_OFFSET)?;
        let mut colors = [None; 4];
        for (i, slot) in colors.iter_mut().enumerate() {
            *slot = Color::from_index(codec::read_uint8(frame, Self::COLORS_OFFSET + i)?);
        }
        Ok(Self { ts, counter, colors })
    }
}

/// Color under a sensor changed. Code 0x07 (front) or 0x08 (rear).
///
/// Payload: `[dist(4B BE) color]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColorChanged {
    pub ts: Timestamp,
    pub sensor: SensorSide,
    pub color: Option<Color>,
    /// Odometer at detection (cm)
    pub dist: u32,
}

impl ColorChanged {
    const COLOR_OFFSET: usize = PAYLOAD_OFFSET + 4;

    pub fn decode(frame: &[u8], sensor: SensorSide) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
            sensor,
            color: Color::from_index(codec::read_uint8(frame, Self::COLOR_OFFSET)?),
            dist: codec::read_uint32(frame, PAYLOAD_OFFSET)?,
        })
    }
}

/// Train passed a split. Code 0x0A.
///
/// Payload: `[decision dist(4B BE)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SplitDecision {
    pub ts: Timestamp,
    pub decision: Option<Decision>,
    /// Odometer at the split (cm)
    pub dist: u32,
}

impl SplitDecision {
    const DIST_OFFSET: usize = PAYLOAD_OFFSET + 1;

    pub fn decode(frame: &[u8]) -> Result<Self> {
        Ok(Self {
            ts: Timestamp::decode(frame)?,
            decision: Decision::from_index(codec::read_uint8(frame, PAYLOAD_OFFSET)?),
            dist: codec::read_uint32(frame, Self::DIST_OFFSET)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_units() {
        let ts = Timestamp(12_345);
        assert_eq!(ts.as_millis(), 12_345);
        assert_eq!(ts.as_secs(), 12);
        assert!((ts.as_secs_f64() - 12.345).abs() < 1e-9);
    }

    #[test]
    fn direction_changed() {
        let frame = [0xE0, 0x00, 0x01, 0x00, 0x00, 0x03, 0xE8, 0x02];
        let ev = DirectionChanged::decode(&frame).unwrap();
        assert_eq!(ev.ts, Timestamp(1000));
        assert_eq!(ev.direction, Some(Direction::Backward));
    }

    #[test]
    fn snap_command_colors() {
        let frame = [0xE0, 0x00, 0x06, 0x00, 0x00, 0x00, 0x10, 0x02, 0x05, 0x01, 0x0C, 0x08];
        let ev = SnapCommand::decode(&frame).unwrap();
        assert_eq!(ev.ts, Timestamp(16));
        assert_eq!(ev.counter, 2);
        assert_eq!(
            ev.colors,
            [Some(Color::Magenta), Some(Color::Red), None, Some(Color::Unknown)]
        );
    }

    #[test]
    fn color_changed_rear() {
        let frame = [0xE0, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x04];
        let ev = ColorChanged::decode(&frame, SensorSide::Rear).unwrap();
        assert_eq!(ev.sensor, SensorSide::Rear);
        assert_eq!(ev.color, Some(Color::Blue));
        assert_eq!(ev.dist, 256);
    }

    #[test]
    fn split_decision() {
        let frame = [0xE0, 0x00, 0x0A, 0x00, 0x00, 0x07, 0xD0, 0x01, 0x00, 0x00, 0x00, 0x64];
        let ev = SplitDecision::decode(&frame).unwrap();
        assert_eq!(ev.ts.as_secs(), 2);
        assert_eq!(ev.decision, Some(Decision::Left));
        assert_eq!(ev.dist, 100);
    }

    #[test]
    fn missing_payload() {
        let frame = [0xE0, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00];
        assert!(ChargingStateChanged::decode(&frame).is_err());
        assert!(BatteryAlert::decode(&frame).is_ok());
        assert!(BatteryAlert::decode(&frame[..6]).is_err());
    }
}
