//! Transport seam.
//!
//! The security and delivery machinery lives behind two small traits so the
//! emission loop never touches sockets directly: a [`Connector`] opens one
//! authenticated connection per device, a [`Transport`] sends JSON payloads
//! over it and closes it. The production implementation is
//! [`tcp::TcpConnector`]; tests substitute the mock in
//! [`crate::test_utils`].

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{ConnectionError, SendError};
use crate::registry::DeviceDescriptor;

pub mod tcp;

/// Content type tag attached to every outbound message.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Text encoding tag attached to every outbound message.
pub const CONTENT_ENCODING_UTF8: &str = "utf-8";

/// One serialized telemetry message, tagged the way the ingestion side
/// expects it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub content_type: &'static str,
    pub content_encoding: &'static str,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    /// Serializes a value to a UTF-8 JSON payload tagged as such.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, SendError> {
        Ok(Self {
            content_type: CONTENT_TYPE_JSON,
            content_encoding: CONTENT_ENCODING_UTF8,
            payload: serde_json::to_vec(value)?,
        })
    }

    /// The payload rendered as text, for logging.
    pub fn payload_text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// A live, authenticated connection for one device.
#[async_trait]
pub trait Transport: Send {
    /// Delivers one message. Failures are reported, never retried here.
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), SendError>;

    /// Releases the connection. Called once at shutdown.
    async fn close(&mut self) -> Result<(), ConnectionError>;
}

/// Opens [`Transport`]s from device descriptors.
#[async_trait]
pub trait Connector: Send + Sync {
    type Transport: Transport;

    async fn connect(
        &self,
        descriptor: &DeviceDescriptor,
    ) -> Result<Self::Transport, ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_message_tags() {
        let message = OutboundMessage::json(&json!({"hello": "world"})).unwrap();

        assert_eq!(message.content_type, "application/json");
        assert_eq!(message.content_encoding, "utf-8");
        assert_eq!(message.payload_text(), r#"{"hello":"world"}"#);
    }
}
