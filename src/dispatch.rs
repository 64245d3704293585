//! Command dispatch and reply correlation.
//!
//! A [`Dispatcher`] writes commands through a [`Transport`], pairs
//! reply-expecting commands with the notification that answers them (by
//! leading byte), and hands every decoded notification to its listeners.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::codec;
use crate::listener::{Event, ListenerId, Listeners};
use crate::protocol::{Command, Message, MessageType};
use crate::transport::{COMMAND_CHARACTERISTIC, NOTIFICATION_CHARACTERISTIC, Transport, TransportError};

/// How long a reply-expecting command waits for its answer.
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_millis(3000);

/// Dispatcher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Deadline for a reply, counted from the write acknowledgement.
    pub reply_timeout: Duration,
    /// Use acknowledged GATT writes.
    pub write_with_response: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
            write_with_response: true,
        }
    }
}

impl DispatcherConfig {
    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    pub fn with_write_response(mut self, with_response: bool) -> Self {
        self.write_with_response = with_response;
        self
    }
}

/// Errors from dispatcher operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no reply to opcode 0x{opcode:02x} within {timeout:?}")]
    Timeout { opcode: u8, timeout: Duration },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("call for opcode 0x{opcode:02x} was superseded by a newer call")]
    Superseded { opcode: u8 },

    #[error("train disconnected")]
    Disconnected,

    #[error("opcode 0x{opcode:02x} has {len} argument bytes, maximum is 255")]
    TooManyArgs { opcode: u8, len: usize },

    #[error("expected {expected} reply, got {got}")]
    UnexpectedReply {
        expected: MessageType,
        got: MessageType,
    },
}

pub type Result<T> = std::result::Result<T, DispatchError>;

/// How a pending call ended, other than by timing out.
#[derive(Debug)]
enum Resolution {
    Reply(Message),
    Superseded,
    Disconnected,
}

/// One outstanding reply-expecting call. At most one per opcode.
struct PendingCall {
    /// Distinguishes this call from a later one for the same opcode.
    id: u64,
    reply: oneshot::Sender<Resolution>,
}

/// Sends commands to a train and routes its notifications.
///
/// # Example
///
/// ```no_run
/// # async fn run<T: intelino::Transport>(transport: T) -> intelino::dispatch::Result<()> {
/// use intelino::{Dispatcher, DispatcherConfig, Event};
///
/// let train = Dispatcher::start(transport, DispatcherConfig::default()).await?;
/// train.subscribe(|event| {
///     if let Event::Message(msg) = event {
///         println!("{msg:?}");
///     }
/// });
/// let version = train.version_info().await?;
/// println!("firmware {:?}", version.firmware);
/// # Ok(())
/// # }
/// ```
pub struct Dispatcher<T> {
    transport: T,
    config: DispatcherConfig,
    pending: Mutex<HashMap<u8, PendingCall>>,
    listeners: Listeners,
    next_call_id: AtomicU64,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher without subscribing to notifications. The owner
    /// feeds frames through [`handle_notification`](Self::handle_notification).
    pub fn new(transport: T, config: DispatcherConfig) -> Self {
        Self {
            transport,
            config,
            pending: Mutex::new(HashMap::new()),
            listeners: Listeners::new(),
            next_call_id: AtomicU64::new(0),
        }
    }

    /// Subscribe to the notification characteristic and spawn a task that
    /// feeds every frame into the dispatcher. When the notification stream
    /// ends the task reports a disconnect.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(transport: T, config: DispatcherConfig) -> Result<Arc<Self>> {
        let frames = transport.subscribe(NOTIFICATION_CHARACTERISTIC).await?;
        let dispatcher = Arc::new(Self::new(transport, config));
        tokio::spawn(dispatcher.clone().pump(frames));
        Ok(dispatcher)
    }

    async fn pump(self: Arc<Self>, mut frames: mpsc::Receiver<Vec<u8>>) {
        while let Some(frame) = frames.recv().await {
            self.handle_notification(&frame);
        }
        tracing::debug!("notification stream closed");
        self.handle_disconnect();
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Register a listener for every decoded notification and for
    /// disconnects. Listeners run on the notification path and must not block.
    pub fn subscribe(&self, f: impl Fn(&Event) + Send + Sync + 'static) -> ListenerId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // -----------------------------------------------------------------------
    // Outgoing
    // -----------------------------------------------------------------------

    /// Send a command without waiting for a reply.
    pub async fn send(&self, command: &Command) -> Result<()> {
        self.send_raw(command.opcode(), &command.args()).await
    }

    /// Send `[opcode, args.len(), args...]` without waiting for a reply.
    pub async fn send_raw(&self, opcode: u8, args: &[u8]) -> Result<()> {
        let bytes = encode_raw(opcode, args)?;
        self.write(bytes).await
    }

    /// Send a command and wait for the notification whose leading byte equals
    /// its opcode.
    pub async fn request(&self, command: &Command) -> Result<Message> {
        self.request_raw(command.opcode(), &command.args()).await
    }

    /// Raw form of [`request`](Self::request).
    pub async fn request_raw(&self, opcode: u8, args: &[u8]) -> Result<Message> {
        let bytes = encode_raw(opcode, args)?;
        self.request_bytes(opcode, bytes).await
    }

    async fn request_bytes(&self, opcode: u8, bytes: Vec<u8>) -> Result<Message> {
        let (id, mut rx) = self.register(opcode);
        // Clears the entry on every exit, including the caller dropping us.
        let guard = PendingGuard {
            pending: &self.pending,
            opcode,
            id,
        };

        self.write(bytes).await?;

        let timeout = self.config.reply_timeout;
        let resolution = match tokio::time::timeout(timeout, &mut rx).await {
            Ok(Ok(resolution)) => resolution,
            // Sender dropped without resolving: the dispatcher is going away.
            Ok(Err(_)) => Resolution::Disconnected,
            Err(_) => {
                drop(guard);
                // A reply may have landed between the deadline and the removal.
                match rx.try_recv() {
                    Ok(resolution) => resolution,
                    Err(_) => {
                        tracing::warn!(
                            opcode = format_args!("{opcode:#04x}"),
                            ?timeout,
                            "reply timed out"
                        );
                        return Err(DispatchError::Timeout { opcode, timeout });
                    }
                }
            }
        };

        match resolution {
            Resolution::Reply(message) => Ok(message),
            Resolution::Superseded => Err(DispatchError::Superseded { opcode }),
            Resolution::Disconnected => Err(DispatchError::Disconnected),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> Result<()> {
        tracing::trace!(bytes = %codec::hex_string(&bytes, 0, " "), "write");
        self.transport
            .write(COMMAND_CHARACTERISTIC, bytes, self.config.write_with_response)
            .await?;
        Ok(())
    }

    /// Install a pending call for `opcode`, replacing any earlier one.
    fn register(&self, opcode: u8) -> (u64, oneshot::Receiver<Resolution>) {
        let id = self.next_call_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        let previous = self.pending.lock().insert(opcode, PendingCall { id, reply: tx });
        if let Some(previous) = previous {
            tracing::warn!(
                opcode = format_args!("{opcode:#04x}"),
                "pending call superseded by a newer call"
            );
            let _ = previous.reply.send(Resolution::Superseded);
        }
        tracing::debug!(opcode = format_args!("{opcode:#04x}"), id, "registered pending call");
        (id, rx)
    }

    /// Opcodes with an outstanding reply-expecting call.
    pub fn pending_opcodes(&self) -> Vec<u8> {
        let mut opcodes: Vec<u8> = self.pending.lock().keys().copied().collect();
        opcodes.sort_unstable();
        opcodes
    }

    // -----------------------------------------------------------------------
    // Incoming
    // -----------------------------------------------------------------------

    /// Decode one notification frame, resolve the matching pending call (if
    /// any), then deliver the message to every listener.
    ///
    /// Synchronous and I/O free; safe to call from the transport's delivery
    /// thread.
    pub fn handle_notification(&self, frame: &[u8]) {
        let message = Message::decode(frame);
        tracing::trace!(
            frame = %codec::hex_string(frame, 0, " "),
            kind = %message.message_type(),
            "notification"
        );

        if let Some(&opcode) = frame.first() {
            let call = self.pending.lock().remove(&opcode);
            if let Some(call) = call {
                tracing::debug!(opcode = format_args!("{opcode:#04x}"), id = call.id, "reply matched");
                // The caller may have given up already; the listeners still see it.
                let _ = call.reply.send(Resolution::Reply(message.clone()));
            }
        } else {
            tracing::warn!("empty notification frame");
        }

        self.listeners.emit(&Event::Message(message));
    }

    /// Fail every pending call with [`DispatchError::Disconnected`] and tell
    /// listeners.
    pub fn handle_disconnect(&self) {
        let drained: Vec<PendingCall> = self.pending.lock().drain().map(|(_, call)| call).collect();
        tracing::warn!(pending = drained.len(), "train disconnected");
        for call in drained {
            let _ = call.reply.send(Resolution::Disconnected);
        }
        self.listeners.emit(&Event::Disconnected);
    }
}

/// Owns one pending entry for the lifetime of a request.
struct PendingGuard<'a> {
    pending: &'a Mutex<HashMap<u8, PendingCall>>,
    opcode: u8,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    /// Remove the entry for `opcode` if it is still call `id`. A newer call
    /// for the same opcode is left alone.
    fn drop(&mut self) {
        let mut pending = self.pending.lock();
        if pending.get(&self.opcode).is_some_and(|call| call.id == self.id) {
            pending.remove(&self.opcode);
            tracing::trace!(opcode = format_args!("{:#04x}", self.opcode), id = self.id, "pending call cleared");
        }
    }
}

fn encode_raw(opcode: u8, args: &[u8]) -> Result<Vec<u8>> {
    codec::encode_command(opcode, args).ok_or(DispatchError::TooManyArgs {
        opcode,
        len: args.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
