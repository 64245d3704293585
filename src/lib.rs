pub mod codec;
pub mod dispatch;
pub mod error;
pub mod listener;
pub mod protocol;
pub mod session;
pub mod transport;

pub use dispatch::{DispatchError, Dispatcher, DispatcherConfig};
pub use error::WireError;
pub use listener::{Event, ListenerId};
pub use protocol::{Command, Message, MessageType};
pub use transport::{GattTarget, Transport, TransportError};
