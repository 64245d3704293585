//! Enumerations shared by notifications and commands.
//!
//! The wire encodes these by table index, so every table is append-only:
//! reordering or inserting before an existing entry breaks the protocol.
//! Decoding goes through `from_index`, which returns `None` for indices the
//! table does not define rather than failing.

/// Movement direction. Wire index 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum Direction {
    Current = 0,
    Forward = 1,
    Backward = 2,
    Stop = 3,
    Invert = 4,
}

impl Direction {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Current),
            1 => Some(Self::Forward),
            2 => Some(Self::Backward),
            3 => Some(Self::Stop),
            4 => Some(Self::Invert),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Track and snap-command color. Wire index 0..=8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    Unknown = 8,
}

impl Color {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Black),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Yellow),
            4 => Some(Self::Blue),
            5 => Some(Self::Magenta),
            6 => Some(Self::Cyan),
            7 => Some(Self::White),
            8 => Some(Self::Unknown),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Split-track decision reported by the train.
///
/// Indices 5 and 6 are reserved: the device never emits them, and they decode
/// to `None`. `All` sits at index 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum Decision {
    None = 0,
    Left = 1,
    Right = 2,
    Steer = 3,
    Straight = 4,
    All = 7,
}

impl Decision {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Steer),
            4 => Some(Self::Straight),
            5 | 6 => None,
            7 => Some(Self::All),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Feedback played when stopping. Wire index 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum FeedbackType {
    #[default]
    None = 0,
    MovementStop = 1,
    EndRoute = 2,
}

impl FeedbackType {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::None),
            1 => Some(Self::MovementStop),
            2 => Some(Self::EndRoute),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Button press length. Index 0 means unset and decodes to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[repr(u8)]
pub enum PressDuration {
    Short = 1,
    Long = 2,
}

impl PressDuration {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Short),
            2 => Some(Self::Long),
            _ => None,
        }
    }
}

/// Which color sensor reported a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SensorSide {
    Front,
    Rear,
}

/// Built-in sounds. Each maps to a fixed two-byte sub-code, not an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Sound {
    Horn1,
    Bell,
    Horn2,
    PoliceHorn,
    Alarm,
}

impl Sound {
    pub const ALL: [Sound; 5] = [
        Sound::Horn1,
        Sound::Bell,
        Sound::Horn2,
        Sound::PoliceHorn,
        Sound::Alarm,
    ];

    /// Sub-code pair sent in the play-sound command.
    pub fn code(self) -> [u8; 2] {
        match self {
            Sound::Horn1 => [0x16, 0x80],
            Sound::Bell => [0x17, 0x00],
            Sound::Horn2 => [0x17, 0x80],
            Sound::PoliceHorn => [0x18, 0x00],
            Sound::Alarm => [0x18, 0x80],
        }
    }
}

/// Steering choice for the next split. Sent as a 2-bit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SteeringDecision {
    Left,
    Right,
    Straight,
}

impl SteeringDecision {
    pub fn code(self) -> u8 {
        match self {
            SteeringDecision::Left => 0b01,
            SteeringDecision::Right => 0b10,
            SteeringDecision::Straight => 0b11,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_table_positions() {
        let table = [
            Direction::Current,
            Direction::Forward,
            Direction::Backward,
            Direction::Stop,
            Direction::Invert,
        ];
        for (i, dir) in table.into_iter().enumerate() {
            assert_eq!(dir.index() as usize, i);
            assert_eq!(Direction::from_index(i as u8), Some(dir));
        }
    }

    #[test]
    fn color_table_positions() {
        for i in 0..=8u8 {
            let color = Color::from_index(i).unwrap();
            assert_eq!(color.index(), i);
        }
        assert_eq!(Color::from_index(1), Some(Color::Red));
        assert_eq!(Color::from_index(8), Some(Color::Unknown));
    }

    #[test]
    fn decision_reserved_slots() {
        assert_eq!(Decision::from_index(4), Some(Decision::Straight));
        assert_eq!(Decision::from_index(5), None);
        assert_eq!(Decision::from_index(6), None);
        assert_eq!(Decision::from_index(7), Some(Decision::All));
        assert_eq!(Decision::All.index(), 7);
    }

    #[test]
    fn out_of_range_is_absent() {
        for i in [9u8, 42, 0xFF] {
            assert_eq!(Direction::from_index(i), None);
            assert_eq!(Color::from_index(i), None);
            assert_eq!(Decision::from_index(i), None);
            assert_eq!(FeedbackType::from_index(i), None);
            assert_eq!(PressDuration::from_index(i), None);
        }
        assert_eq!(Direction::from_index(5), None);
        assert_eq!(Decision::from_index(8), None);
        assert_eq!(FeedbackType::from_index(3), None);
    }

    #[test]
    fn press_duration_unset() {
        assert_eq!(PressDuration::from_index(0), None);
        assert_eq!(PressDuration::from_index(1), Some(PressDuration::Short));
        assert_eq!(PressDuration::from_index(2), Some(PressDuration::Long));
    }

    #[test]
    fn sound_codes() {
        let codes: Vec<[u8; 2]> = Sound::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(
            codes,
            vec![[0x16, 0x80], [0x17, 0x00], [0x17, 0x80], [0x18, 0x00], [0x18, 0x80]]
        );
    }

    #[test]
    fn steering_codes() {
        assert_eq!(SteeringDecision::Left.code(), 1);
        assert_eq!(SteeringDecision::Right.code(), 2);
        assert_eq!(SteeringDecision::Straight.code(), 3);
    }
}
