//! JSON event framing used by the network transports.
//!
//! Each frame (a line on TCP, a text message on WebSocket) is one object:
//!
//! ```text
//! inbound:  {"event": "new_measurement", "data": {"timestamp": ..., "data": {...}}}
//! outbound: {"event": "request_latest"}
//! ```
//!
//! Connect and disconnect are not framed; they come from the transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ChannelEvent;

pub const NEW_MEASUREMENT: &str = "new_measurement";

/// Requests sent to the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Outbound {
    /// Resend the most recent measurement.
    RequestLatest,
}

impl Outbound {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Deserialize)]
struct Frame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Decode one inbound frame.
///
/// Returns `Ok(None)` for well-formed frames carrying events this client
/// does not consume. A `new_measurement` frame without `data` decodes to a
/// null payload, which validation then skips.
pub fn decode(text: &str) -> serde_json::Result<Option<ChannelEvent>> {
    let frame: Frame = serde_json::from_str(text)?;
    if frame.event == NEW_MEASUREMENT {
        Ok(Some(ChannelEvent::Measurement(frame.data)))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_request_latest() {
        assert_eq!(
            Outbound::RequestLatest.encode().unwrap(),
            r#"{"event":"request_latest"}"#
        );
    }

    #[test]
    fn test_decode_measurement() {
        let event =
            decode(r#"{"event":"new_measurement","data":{"timestamp":1,"data":{"water_level":3}}}"#)
                .unwrap();
        assert_eq!(
            event,
            Some(ChannelEvent::Measurement(
                json!({ "timestamp": 1, "data": { "water_level": 3 } })
            ))
        );
    }

    #[test]
    fn test_decode_measurement_without_data() {
        let event = decode(r#"{"event":"new_measurement"}"#).unwrap();
        assert_eq!(event, Some(ChannelEvent::Measurement(Value::Null)));
    }

    #[test]
    fn test_decode_unknown_event() {
        assert_eq!(decode(r#"{"event":"ping"}"#).unwrap(), None);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"data":{}}"#).is_err());
    }
}
