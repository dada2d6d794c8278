//! In-memory push channel.
//!
//! Events are pushed through a [`MemoryHandle`] and drained by the
//! dashboard. Useful for embedding the dashboard behind a transport of your
//! own, and as the fake channel in tests.

use serde_json::Value;
use tokio::sync::mpsc;

use super::{ChannelError, ChannelEvent, Outbound, PushChannel};

/// A push channel fed from the same process.
///
/// # Example
///
/// ```
/// use levelwatch::{MemoryChannel, Outbound, PushChannel};
///
/// let (mut handle, mut channel) = MemoryChannel::create("test");
/// channel.request_latest().unwrap();
/// assert_eq!(handle.try_recv_request(), Some(Outbound::RequestLatest));
/// ```
#[derive(Debug)]
pub struct MemoryChannel {
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    requests: mpsc::UnboundedSender<Outbound>,
    description: String,
}

/// The producing side of a [`MemoryChannel`].
#[derive(Debug)]
pub struct MemoryHandle {
    events: mpsc::UnboundedSender<ChannelEvent>,
    requests: mpsc::UnboundedReceiver<Outbound>,
}

impl MemoryChannel {
    /// Create a channel pair.
    ///
    /// Returns (handle, channel) where the handle pushes events and observes
    /// outbound requests.
    pub fn create(source_description: &str) -> (MemoryHandle, Self) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let channel = Self {
            events: event_rx,
            requests: request_tx,
            description: format!("memory: {}", source_description),
        };
        let handle = MemoryHandle {
            events: event_tx,
            requests: request_rx,
        };
        (handle, channel)
    }
}

impl PushChannel for MemoryChannel {
    fn poll_event(&mut self) -> Option<ChannelEvent> {
        self.events.try_recv().ok()
    }

    fn request_latest(&mut self) -> Result<(), ChannelError> {
        self.requests
            .send(Outbound::RequestLatest)
            .map_err(|_| ChannelError::Closed)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl MemoryHandle {
    /// Push an arbitrary event. Returns false if the channel was dropped.
    pub fn send(&self, event: ChannelEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn connect(&self) -> bool {
        self.send(ChannelEvent::Connected)
    }

    pub fn disconnect(&self) -> bool {
        self.send(ChannelEvent::Disconnected)
    }

    /// Push a `new_measurement` payload.
    pub fn push(&self, payload: Value) -> bool {
        self.send(ChannelEvent::Measurement(payload))
    }

    /// Take the next outbound request, if any.
    pub fn try_recv_request(&mut self) -> Option<Outbound> {
        self.requests.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_events_arrive_in_order() {
        let (handle, mut channel) = MemoryChannel::create("test");

        assert!(channel.poll_event().is_none());

        handle.connect();
        handle.push(json!({ "data": { "water_level": 1 } }));
        handle.push(json!({ "data": { "water_level": 2 } }));
        handle.disconnect();

        assert_eq!(channel.poll_event(), Some(ChannelEvent::Connected));
        assert_eq!(
            channel.poll_event(),
            Some(ChannelEvent::Measurement(json!({ "data": { "water_level": 1 } })))
        );
        assert_eq!(
            channel.poll_event(),
            Some(ChannelEvent::Measurement(json!({ "data": { "water_level": 2 } })))
        );
        assert_eq!(channel.poll_event(), Some(ChannelEvent::Disconnected));
        assert!(channel.poll_event().is_none());
    }

    #[test]
    fn test_request_latest_reaches_handle() {
        let (mut handle, mut channel) = MemoryChannel::create("test");
        assert!(handle.try_recv_request().is_none());

        channel.request_latest().unwrap();
        assert_eq!(handle.try_recv_request(), Some(Outbound::RequestLatest));
        assert!(handle.try_recv_request().is_none());
    }

    #[test]
    fn test_request_after_handle_dropped_fails() {
        let (handle, mut channel) = MemoryChannel::create("test");
        drop(handle);
        assert!(matches!(channel.request_latest(), Err(ChannelError::Closed)));
        assert!(channel.poll_event().is_none());
    }

    #[test]
    fn test_description() {
        let (_handle, channel) = MemoryChannel::create("unit");
        assert_eq!(channel.description(), "memory: unit");
    }
}
