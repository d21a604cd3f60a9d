//! Error types for the simulator.
//!
//! Three kinds cover everything the simulator can get wrong: bad startup
//! configuration, a connection that cannot be opened or closed, and a send
//! that fails mid-tick. Connection and send failures are always logged and
//! skipped at their call site; only a configuration error stops startup.

use thiserror::Error;

/// Startup configuration errors. The only failure class that is fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The send interval was present in the environment but not a positive
    /// integer number of seconds.
    #[error("invalid send interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },
}

/// Errors raised while opening or closing a device connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The device's connection string could not be parsed.
    #[error("malformed connection string: {0}")]
    BadCredential(String),

    /// The endpoint answered the auth handshake with something other
    /// than an acknowledgement.
    #[error("authentication rejected by endpoint: {0}")]
    AuthRejected(String),

    /// Underlying socket failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while sending one telemetry message.
#[derive(Error, Debug)]
pub enum SendError {
    /// Underlying socket failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload or its envelope could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidInterval {
            value: "ten".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid send interval \"ten\": invalid digit found in string"
        );
    }

    #[test]
    fn test_connection_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ConnectionError = io.into();
        assert!(matches!(err, ConnectionError::Io(_)));
    }
}
