//! Typed train operations.
//!
//! Thin wrappers over [`Dispatcher::send`] and [`Dispatcher::request`]: the
//! four queries wait for their reply and unwrap it to the matching record,
//! everything else is fire-and-forget.

use crate::dispatch::{DispatchError, Dispatcher, Result};
use crate::protocol::command::{CUSTOM_SNAP_PALETTE, DEFAULT_DECOUPLE_MS, Rgb};
use crate::protocol::info::{MacAddress, StatsLifetimeOdometer, TrainUuid, VersionDetail};
use crate::protocol::{
    Command, Direction, FeedbackType, Message, MessageType, Sound, SteeringDecision,
};
use crate::transport::Transport;

/// Destructure a reply into a specific [`Message`] variant, or return
/// `DispatchError::UnexpectedReply`.
macro_rules! expect {
    ($msg:expr, $variant:ident) => {
        match $msg {
            Message::$variant(inner) => Ok(inner),
            other => Err(DispatchError::UnexpectedReply {
                expected: MessageType::$variant,
                got: other.message_type(),
            }),
        }
    };
}

impl<T: Transport> Dispatcher<T> {
    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// API and firmware version. Opcode 0x07.
    pub async fn version_info(&self) -> Result<VersionDetail> {
        let reply = self.request(&Command::VersionQuery).await?;
        expect!(reply, VersionDetail)
    }

    /// Opcode 0x42.
    pub async fn mac_address(&self) -> Result<MacAddress> {
        let reply = self.request(&Command::MacAddressQuery).await?;
        expect!(reply, MacAddress)
    }

    /// Opcode 0x43.
    pub async fn uuid(&self) -> Result<TrainUuid> {
        let reply = self.request(&Command::UuidQuery).await?;
        expect!(reply, TrainUuid)
    }

    /// Lifetime distance travelled. Opcode 0x3E.
    pub async fn lifetime_odometer(&self) -> Result<StatsLifetimeOdometer> {
        let reply = self.request(&Command::LifetimeOdometerQuery).await?;
        expect!(reply, StatsLifetimeOdometer)
    }

    // -----------------------------------------------------------------------
    // Telemetry
    // -----------------------------------------------------------------------

    /// Ask the train to push [`Message::Movement`] notifications.
    pub async fn start_streaming(&self) -> Result<()> {
        self.send(&Command::StartStreaming).await
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    pub async fn drive_at_speed_level(
        &self,
        level: u8,
        direction: Direction,
        feedback: bool,
    ) -> Result<()> {
        self.send(&Command::DriveAtSpeedLevel { level, direction, feedback }).await
    }

    pub async fn drive_with_constant_pwm(
        &self,
        pwm: u8,
        direction: Direction,
        feedback: bool,
    ) -> Result<()> {
        self.send(&Command::DriveWithConstantPwm { pwm, direction, feedback }).await
    }

    pub async fn stop_driving(&self, feedback: FeedbackType) -> Result<()> {
        self.send(&Command::StopDriving { feedback }).await
    }

    /// Pause for `duration` seconds, then continue.
    pub async fn pause_driving(&self, duration: u8, feedback: bool) -> Result<()> {
        self.send(&Command::PauseDriving { duration, feedback }).await
    }

    // -----------------------------------------------------------------------
    // Appearance
    // -----------------------------------------------------------------------

    pub async fn set_top_led_color(&self, r: u8, g: u8, b: u8) -> Result<()> {
        self.send(&Command::SetTopLedColor(Rgb::new(r, g, b))).await
    }

    /// Set either or both headlights. A `None` side is left unchanged.
    pub async fn set_headlight_color(&self, front: Option<Rgb>, back: Option<Rgb>) -> Result<()> {
        self.send(&Command::SetHeadlightColor { front, back }).await
    }

    // -----------------------------------------------------------------------
    // Behavior
    // -----------------------------------------------------------------------

    pub async fn set_snap_command_execution(&self, on: bool) -> Result<()> {
        self.send(&Command::SetSnapCommandExecution(on)).await
    }

    /// Clear the custom snap commands stored for each color in
    /// [`CUSTOM_SNAP_PALETTE`], in order. Stops at the first failed write.
    pub async fn clear_custom_snap_commands(&self) -> Result<()> {
        for color in CUSTOM_SNAP_PALETTE {
            self.send(&Command::ClearCustomSnapCommand(color)).await?;
        }
        Ok(())
    }

    /// Choose how the train acknowledges a snap command.
    pub async fn set_snap_command_feedback(&self, sound: bool, lights: bool) -> Result<()> {
        self.send(&Command::SetSnapCommandFeedback { sound, lights }).await
    }

    /// Pulse the coupler for `duration_ms` (the app uses
    /// [`DEFAULT_DECOUPLE_MS`]; see [`decouple_wagon_default`](Self::decouple_wagon_default)).
    pub async fn decouple_wagon(&self, duration_ms: u16, feedback: bool) -> Result<()> {
        self.send(&Command::DecoupleWagon { duration_ms, feedback }).await
    }

    pub async fn decouple_wagon_default(&self, feedback: bool) -> Result<()> {
        self.decouple_wagon(DEFAULT_DECOUPLE_MS, feedback).await
    }

    // -----------------------------------------------------------------------
    // Navigation and sound
    // -----------------------------------------------------------------------

    pub async fn set_next_split_steering_decision(&self, decision: SteeringDecision) -> Result<()> {
        self.send(&Command::SetNextSplitSteeringDecision(decision)).await
    }

    pub async fn play_sound(&self, sound: Sound) -> Result<()> {
        self.send(&Command::PlaySound(sound)).await
    }
}
