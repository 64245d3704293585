//! Live movement telemetry. Tag 0xB7.

use crate::codec;
use crate::error::Result;
use crate::protocol::types::{Decision, Direction};

const DIRECTION_OFFSET: usize = 2;
const SPEED_OFFSET: usize = 3;
const PWM_OFFSET: usize = 5;
const SPEED_CONTROL_OFFSET: usize = 6;
const DESIRED_SPEED_OFFSET: usize = 7;
const PAUSE_TIME_OFFSET: usize = 9;
const NEXT_DECISION_OFFSET: usize = 10;
const ODOMETER_OFFSET: usize = 14;

/// Movement snapshot streamed while the train runs (18 bytes).
///
/// Layout: `[B7 len dir spd_hi spd_lo pwm ctl des_hi des_lo pause decision
/// .. .. .. odo(4B BE)]`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Movement {
    pub dir: Option<Direction>,
    pub speed: u16,
    /// Motor PWM duty
    pub pwm: u8,
    /// Closed-loop speed control active
    pub speed_control: bool,
    pub desired_speed: u16,
    /// Remaining pause (s)
    pub pause_time: u8,
    /// Decision queued for the next split
    pub next_decision: Option<Decision>,
    /// Cumulative odometer (cm)
    pub odo: u32,
}

impl Movement {
    pub fn decode(frame: &[u8]) -> Result<Self> {
        // Check the furthest field first so a truncated frame reads nothing.
        let odo = codec::read_uint32(frame, ODOMETER_OFFSET)?;
        Ok(Self {
            dir: Direction::from_index(codec::read_uint8(frame, DIRECTION_OFFSET)?),
            speed: codec::read_uint16(frame, SPEED_OFFSET)?,
            pwm: codec::read_uint8(frame, PWM_OFFSET)?,
            speed_control: codec::read_bool(frame, SPEED_CONTROL_OFFSET)?,
            desired_speed: codec::read_uint16(frame, DESIRED_SPEED_OFFSET)?,
            pause_time: codec::read_uint8(frame, PAUSE_TIME_OFFSET)?,
            next_decision: Decision::from_index(codec::read_uint8(frame, NEXT_DECISION_OFFSET)?),
            odo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        vec![
            0xB7, 0x10, // tag, length
            0x01, // forward
            0x00, 0x2A, // speed 42
            0x80, // pwm
            0x01, // speed control on
            0x00, 0x30, // desired 48
            0x05, // pause 5s
            0x07, // all
            0x00, 0x00, 0x00, // unused
            0x00, 0x01, 0x86, 0xA0, // odo 100000
        ]
    }

    #[test]
    fn decode_sample() {
        let m = Movement::decode(&sample()).unwrap();
        assert_eq!(m.dir, Some(Direction::Forward));
        assert_eq!(m.speed, 42);
        assert_eq!(m.pwm, 0x80);
        assert!(m.speed_control);
        assert_eq!(m.desired_speed, 48);
        assert_eq!(m.pause_time, 5);
        assert_eq!(m.next_decision, Some(Decision::All));
        assert_eq!(m.odo, 100_000);
    }

    #[test]
    fn out_of_range_enums_keep_other_fields() {
        let mut frame = sample();
        frame[DIRECTION_OFFSET] = 0x09;
        frame[NEXT_DECISION_OFFSET] = 0x05;
        let m = Movement::decode(&frame).unwrap();
        assert_eq!(m.dir, None);
        assert_eq!(m.next_decision, None);
        assert_eq!(m.speed, 42);
        assert_eq!(m.odo, 100_000);
    }

    #[test]
    fn truncated() {
        let frame = sample();
        assert!(Movement::decode(&frame[..17]).is_err());
    }
}
