//! Push channel abstraction for receiving measurements.
//!
//! A [`PushChannel`] delivers typed connectivity and measurement events and
//! accepts the one outbound request the dashboard makes. Implementations
//! cover an in-memory channel (tests and embedding), TCP and WebSocket
//! transports carrying JSON event frames, and a polled JSON file.

mod file;
mod memory;
mod reconnect;
mod stream;
pub mod wire;
mod websocket;

pub use file::FileChannel;
pub use memory::{MemoryChannel, MemoryHandle};
pub use reconnect::ReconnectPolicy;
pub use stream::StreamChannel;
pub use websocket::WebSocketChannel;
pub use wire::Outbound;

use std::fmt::Debug;

use thiserror::Error;

/// Number of inbound events buffered between a transport task and the UI.
pub(crate) const EVENT_BUFFER: usize = 64;

/// An inbound event from the push channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// The transport established a connection.
    Connected,
    /// The transport lost its connection and is trying to restore it.
    Disconnected,
    /// A `new_measurement` payload, not yet validated.
    Measurement(serde_json::Value),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for push channels delivering measurements.
///
/// # Example
///
/// ```
/// use levelwatch::{ChannelEvent, MemoryChannel, PushChannel};
///
/// let (handle, mut channel) = MemoryChannel::create("demo");
/// handle.connect();
/// assert_eq!(channel.poll_event(), Some(ChannelEvent::Connected));
/// assert_eq!(channel.poll_event(), None);
/// ```
pub trait PushChannel: Send + Debug {
    /// Take the next pending event, in arrival order.
    ///
    /// Returns `None` when nothing is pending. This method must not block.
    fn poll_event(&mut self) -> Option<ChannelEvent>;

    /// Ask the remote side to resend its most recent measurement.
    fn request_latest(&mut self) -> Result<(), ChannelError>;

    /// Returns a human-readable description of the channel.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the last error encountered by the channel, if any.
    fn error(&self) -> Option<&str> {
        None
    }
}
