//! Startup configuration.
//!
//! Everything is read from the process environment exactly once, then held
//! immutably and passed by reference into the registry and the emission
//! loop. There is no ambient global state and no re-reading at runtime.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;
use crate::registry;

/// Seconds between ticks when `SEND_INTERVAL_SECONDS` is unset.
pub const DEFAULT_SEND_INTERVAL_SECS: u64 = 10;

/// Environment variable holding the tick interval in seconds.
pub const SEND_INTERVAL_VAR: &str = "SEND_INTERVAL_SECONDS";

/// Prefix of the per-device connection string variables. The full name is
/// the prefix plus the device name upper-cased with `-` replaced by `_`,
/// e.g. `DEVICE_CONN_DOWS_LAKE`.
pub const CREDENTIAL_VAR_PREFIX: &str = "DEVICE_CONN_";

/// Immutable simulator configuration.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    send_interval: Duration,
    credentials: HashMap<String, String>,
}

impl SimulatorConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    ///
    /// A missing interval falls back to [`DEFAULT_SEND_INTERVAL_SECS`]; a
    /// present but unparseable or zero interval is a [`ConfigError`].
    /// Missing or blank credentials are not an error here; the registry
    /// warns about them when the device list is materialized.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let send_interval = match lookup(SEND_INTERVAL_VAR) {
            None => Duration::from_secs(DEFAULT_SEND_INTERVAL_SECS),
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|err: std::num::ParseIntError| {
                    ConfigError::InvalidInterval {
                        value: raw.clone(),
                        reason: err.to_string(),
                    }
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidInterval {
                        value: raw,
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
        };

        let mut credentials = HashMap::new();
        for station in registry::DEVICE_TABLE {
            if let Some(credential) = lookup(&credential_var(station.name)) {
                if !credential.trim().is_empty() {
                    credentials.insert(station.name.to_string(), credential);
                }
            }
        }

        Ok(Self {
            send_interval,
            credentials,
        })
    }

    /// Time to wait between ticks.
    pub fn send_interval(&self) -> Duration {
        self.send_interval
    }

    /// Connection string for a device, if one was configured.
    pub fn credential(&self, device_name: &str) -> Option<&str> {
        self.credentials.get(device_name).map(String::as_str)
    }
}

/// Environment variable name carrying the connection string for a device.
pub fn credential_var(device_name: &str) -> String {
    format!(
        "{}{}",
        CREDENTIAL_VAR_PREFIX,
        device_name.to_uppercase().replace('-', "_")
    )
}
