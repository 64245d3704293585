//! The Bluetooth LE collaborator the dispatcher talks through.
//!
//! Discovery and connection management live outside this crate. An
//! implementation only has to write bytes to a GATT characteristic and hand
//! back a stream of notification frames.

use std::fmt;
use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;

/// A GATT service/characteristic pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GattTarget {
    pub service: &'static str,
    pub characteristic: &'static str,
}

impl fmt::Display for GattTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.characteristic)
    }
}

/// Where commands are written.
pub const COMMAND_CHARACTERISTIC: GattTarget = GattTarget {
    service: "43dfd9e9-17e5-4860-803d-9df8999b0d7a",
    characteristic: "40c540d0-344c-4d0d-a1da-9cc260b82d43",
};

/// Where the train pushes notifications.
pub const NOTIFICATION_CHARACTERISTIC: GattTarget = GattTarget {
    service: "4dad4922-5c86-4ba7-a2e1-0f240537bd08",
    characteristic: "a4b80869-a84c-4160-a3e0-72fa58ff480e",
};

/// Errors reported by a [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("write to {target} failed: {reason}")]
    Write { target: GattTarget, reason: String },

    #[error("subscribe to {target} failed: {reason}")]
    Subscribe { target: GattTarget, reason: String },
}

/// Bluetooth LE primitives consumed by [`Dispatcher`](crate::Dispatcher).
///
/// Each notification must arrive as exactly one frame; this layer does no
/// reassembly.
pub trait Transport: Send + Sync + 'static {
    /// Write `bytes` to a characteristic. Resolves once the write is
    /// acknowledged (or, without `with_response`, once it is queued).
    fn write(
        &self,
        target: GattTarget,
        bytes: Vec<u8>,
        with_response: bool,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Enable notifications on a characteristic. The returned channel closes
    /// when the device disconnects.
    fn subscribe(
        &self,
        target: GattTarget,
    ) -> impl Future<Output = Result<mpsc::Receiver<Vec<u8>>, TransportError>> + Send;
}
