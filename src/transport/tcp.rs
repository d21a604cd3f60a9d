//! TCP transport adapter.
//!
//! Speaks a small newline-delimited JSON protocol to the ingestion
//! endpoint. Connecting parses the device's connection string, opens a TCP
//! stream and performs a one-line auth handshake; every send afterwards is
//! one envelope line carrying the tagged payload.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::debug;

use async_trait::async_trait;

use crate::error::{ConnectionError, SendError};
use crate::registry::DeviceDescriptor;
use crate::transport::{Connector, OutboundMessage, Transport};

/// Port assumed when the connection string's `HostName` has none.
pub const DEFAULT_PORT: u16 = 7683;

/// Parsed form of a device connection string.
///
/// The raw credential is a semicolon-separated list of `Key=Value` pairs,
/// order-insensitive:
///
/// ```text
/// HostName=ingest.example.net:7683;DeviceId=dows-lake;SharedAccessKey=bXkta2V5
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionString {
    pub host: String,
    pub device_id: String,
    pub shared_access_key: String,
}

impl ConnectionString {
    /// Parses a raw credential, rejecting unknown fields and missing or
    /// empty required fields.
    pub fn parse(raw: &str) -> Result<Self, ConnectionError> {
        let mut host = None;
        let mut device_id = None;
        let mut shared_access_key = None;

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            // Keys never contain '='; values (base64) may, so split once.
            let (key, value) = part.split_once('=').ok_or_else(|| {
                ConnectionError::BadCredential(format!("expected Key=Value, got {:?}", part))
            })?;

            match key {
                "HostName" => host = Some(value.to_string()),
                "DeviceId" => device_id = Some(value.to_string()),
                "SharedAccessKey" => shared_access_key = Some(value.to_string()),
                other => {
                    return Err(ConnectionError::BadCredential(format!(
                        "unknown field {:?}",
                        other
                    )))
                }
            }
        }

        let host = require("HostName", host)?;
        let device_id = require("DeviceId", device_id)?;
        let shared_access_key = require("SharedAccessKey", shared_access_key)?;

        Ok(Self {
            host,
            device_id,
            shared_access_key,
        })
    }

    /// `host:port` address to dial, defaulting the port when absent.
    pub fn endpoint(&self) -> String {
        if self.host.contains(':') {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, DEFAULT_PORT)
        }
    }
}

fn require(field: &str, value: Option<String>) -> Result<String, ConnectionError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConnectionError::BadCredential(format!(
            "missing field {:?}",
            field
        ))),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    device_id: &'a str,
    shared_access_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    content_type: &'a str,
    content_encoding: &'a str,
    body: Value,
}

/// Opens one authenticated [`TcpTransport`] per device.
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Transport = TcpTransport;

    async fn connect(
        &self,
        descriptor: &DeviceDescriptor,
    ) -> Result<TcpTransport, ConnectionError> {
        let conn = ConnectionString::parse(&descriptor.credential)?;

        debug!("Dialing {} for {}", conn.endpoint(), descriptor.name);
        let stream = TcpStream::connect(conn.endpoint()).await?;
        let (read_half, write_half) = stream.into_split();

        let mut transport = TcpTransport {
            reader: BufReader::new(read_half),
            writer: write_half,
        };
        transport.authenticate(&conn).await?;

        Ok(transport)
    }
}

/// A live line-delimited JSON connection.
pub struct TcpTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TcpTransport {
    /// One-line handshake: send the device identity and key, expect `ok`.
    async fn authenticate(&mut self, conn: &ConnectionString) -> Result<(), ConnectionError> {
        let auth = AuthRequest {
            device_id: &conn.device_id,
            shared_access_key: &conn.shared_access_key,
        };
        let mut line = serde_json::to_vec(&auth)
            .map_err(|err| ConnectionError::AuthRejected(err.to_string()))?;
        line.push(b'\n');

        self.writer.write_all(&line).await?;
        self.writer.flush().await?;

        let mut response = String::new();
        self.reader.read_line(&mut response).await?;

        if response.trim() == "ok" {
            Ok(())
        } else {
            Err(ConnectionError::AuthRejected(response.trim().to_string()))
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), SendError> {
        let envelope = Envelope {
            content_type: message.content_type,
            content_encoding: message.content_encoding,
            body: serde_json::from_slice(&message.payload)?,
        };

        let mut line = serde_json::to_vec(&envelope)?;
        line.push(b'\n');

        self.writer.write_all(&line).await?;
        self.writer.flush().await?;

        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_connection_string() {
        let conn = ConnectionString::parse(
            "HostName=ingest.example.net:9000;DeviceId=dows-lake;SharedAccessKey=bXkta2V5PT0=",
        )
        .unwrap();

        assert_eq!(conn.host, "ingest.example.net:9000");
        assert_eq!(conn.device_id, "dows-lake");
        // Base64 padding survives the Key=Value split.
        assert_eq!(conn.shared_access_key, "bXkta2V5PT0=");
        assert_eq!(conn.endpoint(), "ingest.example.net:9000");
    }

    #[test]
    fn test_parse_defaults_port() {
        let conn =
            ConnectionString::parse("HostName=ingest.example.net;DeviceId=nac;SharedAccessKey=k")
                .unwrap();
        assert_eq!(conn.endpoint(), format!("ingest.example.net:{}", DEFAULT_PORT));
    }

    #[test]
    fn test_parse_is_order_insensitive() {
        let conn =
            ConnectionString::parse("SharedAccessKey=k;HostName=h;DeviceId=nac").unwrap();
        assert_eq!(conn.device_id, "nac");
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let result = ConnectionString::parse("HostName=h;DeviceId=nac");
        assert!(matches!(result, Err(ConnectionError::BadCredential(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        let result =
            ConnectionString::parse("HostName=h;DeviceId=nac;SharedAccessKey=k;Extra=1");
        assert!(matches!(result, Err(ConnectionError::BadCredential(_))));
    }

    #[test]
    fn test_parse_rejects_bare_token() {
        let result = ConnectionString::parse("not-a-connection-string");
        assert!(matches!(result, Err(ConnectionError::BadCredential(_))));
    }
}
