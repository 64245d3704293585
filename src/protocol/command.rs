//! Commands we send to the train.
//!
//! Every command goes out as `[opcode, argCount, args...]` on the command
//! characteristic.

use crate::codec;
use crate::protocol::types::{Color, Direction, FeedbackType, Sound, SteeringDecision};
use crate::protocol::{
    TYPE_CLEAR_SNAP_COMMAND, TYPE_DECOUPLE_WAGON, TYPE_DRIVE_CONSTANT_PWM, TYPE_DRIVE_SPEED_LEVEL,
    TYPE_HEADLIGHT_COLOR, TYPE_LIFETIME_ODOMETER, TYPE_MAC_ADDRESS, TYPE_MOVEMENT,
    TYPE_PAUSE_DRIVING, TYPE_PLAY_SOUND, TYPE_SNAP_COMMAND_EXECUTION, TYPE_SNAP_COMMAND_FEEDBACK,
    TYPE_SPLIT_DECISION, TYPE_STOP_DRIVING, TYPE_TOP_LED_COLOR, TYPE_TRAIN_UUID,
    TYPE_VERSION_DETAIL,
};

/// Headlight enable bits in the 0xB4 mask byte.
const HEADLIGHT_FRONT: u8 = 0b010;
const HEADLIGHT_BACK: u8 = 0b100;

/// Movement streaming parameters for 0xB7.
const STREAMING_ARGS: [u8; 2] = [0x07, 0x0A];

/// Top LED selector for 0xB1.
const TOP_LED: u8 = 0x01;

/// 0x24 frame is `[SOUND_LEAD, code_hi, code_lo, SOUND_TAIL..]`.
const SOUND_LEAD: u8 = 0x00;
const SOUND_TAIL: [u8; 2] = [0x00, 0x00];

/// Second 0x64 argument: the slot is left with no command.
const SNAP_SLOT_EMPTY: u8 = 0x00;

/// Pulse length used by the official app when decoupling.
pub const DEFAULT_DECOUPLE_MS: u16 = 512;

/// Colors whose custom snap commands are cleared by
/// [`Dispatcher::clear_custom_snap_commands`](crate::Dispatcher::clear_custom_snap_commands).
pub const CUSTOM_SNAP_PALETTE: [Color; 5] =
    [Color::Black, Color::Red, Color::Green, Color::Yellow, Color::Blue];

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// A command we send to the train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // -- Queries (answered by a notification with the same leading byte) --
    VersionQuery,
    MacAddressQuery,
    UuidQuery,
    LifetimeOdometerQuery,

    // -- Telemetry --
    StartStreaming,

    // -- Movement --
    DriveAtSpeedLevel {
        /// Speed level (0 = slowest, 3 = fastest)
        level: u8,
        direction: Direction,
        feedback: bool,
    },
    DriveWithConstantPwm {
        /// PWM duty; sent inverted (`0xFF - pwm`)
        pwm: u8,
        direction: Direction,
        feedback: bool,
    },
    StopDriving {
        feedback: FeedbackType,
    },
    PauseDriving {
        /// Pause length (s)
        duration: u8,
        feedback: bool,
    },

    // -- Appearance --
    SetTopLedColor(Rgb),
    /// `None` leaves that side's headlight unchanged.
    SetHeadlightColor {
        front: Option<Rgb>,
        back: Option<Rgb>,
    },

    // -- Behavior --
    SetSnapCommandExecution(bool),
    ClearCustomSnapCommand(Color),
    SetSnapCommandFeedback {
        sound: bool,
        lights: bool,
    },
    DecoupleWagon {
        /// Coupler pulse length (ms)
        duration_ms: u16,
        feedback: bool,
    },

    // -- Navigation --
    SetNextSplitSteeringDecision(SteeringDecision),

    // -- Sound --
    PlaySound(Sound),
}

impl Command {
    /// Leading byte on the wire.
    pub fn opcode(&self) -> u8 {
        match self {
            Command::VersionQuery => TYPE_VERSION_DETAIL,
            Command::MacAddressQuery => TYPE_MAC_ADDRESS,
            Command::UuidQuery => TYPE_TRAIN_UUID,
            Command::LifetimeOdometerQuery => TYPE_LIFETIME_ODOMETER,
            Command::StartStreaming => TYPE_MOVEMENT,
            Command::DriveAtSpeedLevel { .. } => TYPE_DRIVE_SPEED_LEVEL,
            Command::DriveWithConstantPwm { .. } => TYPE_DRIVE_CONSTANT_PWM,
            Command::StopDriving { .. } => TYPE_STOP_DRIVING,
            Command::PauseDriving { .. } => TYPE_PAUSE_DRIVING,
            Command::SetTopLedColor(_) => TYPE_TOP_LED_COLOR,
            Command::SetHeadlightColor { .. } => TYPE_HEADLIGHT_COLOR,
            Command::SetSnapCommandExecution(_) => TYPE_SNAP_COMMAND_EXECUTION,
            Command::ClearCustomSnapCommand(_) => TYPE_CLEAR_SNAP_COMMAND,
            Command::SetSnapCommandFeedback { .. } => TYPE_SNAP_COMMAND_FEEDBACK,
            Command::DecoupleWagon { .. } => TYPE_DECOUPLE_WAGON,
            Command::SetNextSplitSteeringDecision(_) => TYPE_SPLIT_DECISION,
            Command::PlaySound(_) => TYPE_PLAY_SOUND,
        }
    }

    /// Whether the train answers this command with a notification.
    pub fn expects_reply(&self) -> bool {
        matches!(
            self,
            Command::VersionQuery
                | Command::MacAddressQuery
                | Command::UuidQuery
                | Command::LifetimeOdometerQuery
        )
    }

    /// Argument bytes (without opcode and count).
    pub fn args(&self) -> Vec<u8> {
        match *self {
            Command::VersionQuery
            | Command::MacAddressQuery
            | Command::UuidQuery
            | Command::LifetimeOdometerQuery => vec![],
            Command::StartStreaming => STREAMING_ARGS.to_vec(),
            Command::DriveAtSpeedLevel { level, direction, feedback } => {
                vec![direction.index(), level, u8::from(feedback)]
            }
            Command::DriveWithConstantPwm { pwm, direction, feedback } => {
                vec![direction.index(), 0xFF - pwm, u8::from(feedback)]
            }
            Command::StopDriving { feedback } => vec![feedback.index()],
            Command::PauseDriving { duration, feedback } => vec![duration, u8::from(feedback)],
            Command::SetTopLedColor(rgb) => {
                let mut args = vec![TOP_LED];
                args.extend_from_slice(&rgb.bytes());
                args
            }
            Command::SetHeadlightColor { front, back } => {
                let mut mask = 0;
                if front.is_some() {
                    mask |= HEADLIGHT_FRONT;
                }
                if back.is_some() {
                    mask |= HEADLIGHT_BACK;
                }
                let mut args = vec![mask];
                args.extend_from_slice(&front.unwrap_or_default().bytes());
                args.extend_from_slice(&back.unwrap_or_default().bytes());
                args
            }
            Command::SetSnapCommandExecution(on) => vec![u8::from(on)],
            Command::ClearCustomSnapCommand(color) => vec![color.index(), SNAP_SLOT_EMPTY],
            Command::SetSnapCommandFeedback { sound, lights } => {
                vec![u8::from(sound) | (u8::from(lights) << 1)]
            }
            Command::DecoupleWagon { duration_ms, feedback } => {
                let mut args = Vec::with_capacity(3);
                codec::write_uint16(&mut args, duration_ms);
                args.push(u8::from(feedback));
                args
            }
            Command::SetNextSplitSteeringDecision(decision) => vec![decision.code()],
            Command::PlaySound(sound) => {
                let [hi, lo] = sound.code();
                let mut args = vec![SOUND_LEAD, hi, lo];
                args.extend_from_slice(&SOUND_TAIL);
                args
            }
        }
    }

    /// Encode into wire bytes: `[opcode, argCount, args...]`.
    ///
    /// Same framing as [`codec::encode_command`]; `None` only if the
    /// arguments outgrow the one-byte count.
    pub fn encode(&self) -> Option<Vec<u8>> {
        codec::encode_command(self.opcode(), &self.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_have_no_args() {
        for (cmd, op) in [
            (Command::VersionQuery, 0x07),
            (Command::MacAddressQuery, 0x42),
            (Command::UuidQuery, 0x43),
            (Command::LifetimeOdometerQuery, 0x3E),
        ] {
            assert!(cmd.expects_reply());
            assert_eq!(cmd.encode().unwrap(), vec![op, 0x00]);
        }
    }

    #[test]
    fn drive_at_speed_level() {
        let cmd = Command::DriveAtSpeedLevel {
            level: 2,
            direction: Direction::Forward,
            feedback: true,
        };
        assert!(!cmd.expects_reply());
        assert_eq!(cmd.encode().unwrap(), vec![0xB8, 0x03, 0x01, 0x02, 0x01]);
    }

    #[test]
    fn constant_pwm_is_inverted() {
        let cmd = Command::DriveWithConstantPwm {
            pwm: 0x40,
            direction: Direction::Backward,
            feedback: false,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0xBC, 0x03, 0x02, 0xBF, 0x00]);
    }

    #[test]
    fn stop_and_pause() {
        let stop = Command::StopDriving { feedback: FeedbackType::EndRoute };
        assert_eq!(stop.encode().unwrap(), vec![0xB9, 0x01, 0x02]);
        let pause = Command::PauseDriving { duration: 30, feedback: true };
        assert_eq!(pause.encode().unwrap(), vec![0xBE, 0x02, 30, 0x01]);
    }

    #[test]
    fn top_led() {
        let cmd = Command::SetTopLedColor(Rgb::new(0xFF, 0x10, 0x00));
        assert_eq!(cmd.encode().unwrap(), vec![0xB1, 0x04, 0x01, 0xFF, 0x10, 0x00]);
    }

    #[test]
    fn headlight_mask() {
        let front_only = Command::SetHeadlightColor {
            front: Some(Rgb::new(1, 2, 3)),
            back: None,
        };
        assert_eq!(front_only.encode().unwrap(), vec![0xB4, 0x07, 0b010, 1, 2, 3, 0, 0, 0]);

        let both = Command::SetHeadlightColor {
            front: Some(Rgb::new(1, 2, 3)),
            back: Some(Rgb::new(4, 5, 6)),
        };
        assert_eq!(both.args(), vec![0b110, 1, 2, 3, 4, 5, 6]);

        let none = Command::SetHeadlightColor { front: None, back: None };
        assert_eq!(none.args(), vec![0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn snap_behavior() {
        assert_eq!(Command::SetSnapCommandExecution(false).encode().unwrap(), vec![0x41, 0x01, 0x00]);
        assert_eq!(
            Command::ClearCustomSnapCommand(Color::Yellow).encode().unwrap(),
            vec![0x64, 0x02, 0x03, 0x00]
        );
        let fb = Command::SetSnapCommandFeedback { sound: false, lights: true };
        assert_eq!(fb.encode().unwrap(), vec![0x65, 0x01, 0b10]);
        let fb = Command::SetSnapCommandFeedback { sound: true, lights: true };
        assert_eq!(fb.args(), vec![0b11]);
    }

    #[test]
    fn decouple_duration() {
        let cmd = Command::DecoupleWagon {
            duration_ms: DEFAULT_DECOUPLE_MS,
            feedback: true,
        };
        assert_eq!(cmd.encode().unwrap(), vec![0x80, 0x03, 0x02, 0x00, 0x01]);
        let cmd = Command::DecoupleWagon { duration_ms: 0x01F4, feedback: false };
        assert_eq!(cmd.args(), vec![0x01, 0xF4, 0x00]);
    }

    #[test]
    fn steering() {
        let cmd = Command::SetNextSplitSteeringDecision(SteeringDecision::Straight);
        assert_eq!(cmd.encode().unwrap(), vec![0xBF, 0x01, 0b11]);
    }

    #[test]
    fn play_sound() {
        assert_eq!(
            Command::PlaySound(Sound::PoliceHorn).encode().unwrap(),
            vec![0x24, 0x05, 0x00, 0x18, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn every_sound_has_the_same_frame_layout() {
        for sound in Sound::ALL {
            let [hi, lo] = sound.code();
            let args = Command::PlaySound(sound).args();
            assert_eq!(args, vec![0x00, hi, lo, 0x00, 0x00], "{sound:?}");
        }
    }

    #[test]
    fn encode_uses_codec_framing() {
        let commands = [
            Command::VersionQuery,
            Command::StartStreaming,
            Command::SetTopLedColor(Rgb::new(7, 8, 9)),
            Command::SetHeadlightColor { front: None, back: Some(Rgb::new(1, 1, 1)) },
            Command::DecoupleWagon { duration_ms: 40, feedback: false },
            Command::PlaySound(Sound::Bell),
        ];
        for cmd in commands {
            let framed = codec::encode_command(cmd.opcode(), &cmd.args());
            assert_eq!(cmd.encode(), framed);
            let bytes = cmd.encode().unwrap();
            assert_eq!(usize::from(bytes[1]), bytes.len() - 2);
        }
    }

    #[test]
    fn start_streaming() {
        assert_eq!(Command::StartStreaming.encode().unwrap(), vec![0xB7, 0x02, 0x07, 0x0A]);
    }
}
