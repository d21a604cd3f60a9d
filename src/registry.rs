//! Device registry and connection setup.
//!
//! The set of monitoring stations is fixed at compile time; the environment
//! only supplies their credentials. A station without a credential is
//! excluded with a warning, a station that fails to connect is excluded
//! with an error log, and whatever remains is handed to the emission loop.

use tracing::{error, info, warn};

use crate::config::{credential_var, SimulatorConfig};
use crate::transport::Connector;

/// Compile-time identity of one monitoring station.
pub struct StationSpec {
    pub name: &'static str,
    pub location: &'static str,
}

/// The reference deployment: three stations along the canal.
pub const DEVICE_TABLE: &[StationSpec] = &[
    StationSpec {
        name: "dows-lake",
        location: "Dow's Lake",
    },
    StationSpec {
        name: "fifth-avenue",
        location: "Fifth Avenue",
    },
    StationSpec {
        name: "nac",
        location: "NAC",
    },
];

/// One simulated sensor unit: identity plus its opaque credential.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub name: String,
    pub location: String,
    pub credential: String,
}

/// A descriptor paired with a live connection handle. Exclusively owned by
/// the emission loop; the handle is closed at shutdown.
pub struct ConnectedDevice<T> {
    pub descriptor: DeviceDescriptor,
    pub transport: T,
}

/// Materializes descriptors for every station with a configured credential.
///
/// Stations are walked in table order; a missing credential logs a warning
/// and skips the station without counting as a failure.
pub fn load_devices(config: &SimulatorConfig) -> Vec<DeviceDescriptor> {
    let mut devices = Vec::new();

    for station in DEVICE_TABLE {
        match config.credential(station.name) {
            Some(credential) => devices.push(DeviceDescriptor {
                name: station.name.to_string(),
                location: station.location.to_string(),
                credential: credential.to_string(),
            }),
            None => warn!(
                "Missing connection string for {} (set {})",
                station.name,
                credential_var(station.name)
            ),
        }
    }

    devices
}

/// Opens a connection for every descriptor, in order.
///
/// A connection failure logs the device's location and skips it; partial
/// success is fine. The caller decides what an empty result means.
pub async fn connect_all<C>(
    connector: &C,
    descriptors: Vec<DeviceDescriptor>,
) -> Vec<ConnectedDevice<C::Transport>>
where
    C: Connector,
{
    let mut connected = Vec::new();

    for descriptor in descriptors {
        match connector.connect(&descriptor).await {
            Ok(transport) => {
                info!("Connected: {}", descriptor.location);
                connected.push(ConnectedDevice {
                    descriptor,
                    transport,
                });
            }
            Err(err) => error!("Failed to connect {}: {}", descriptor.location, err),
        }
    }

    connected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(devices: &[&str]) -> SimulatorConfig {
        let names: Vec<String> = devices.iter().map(|d| credential_var(d)).collect();
        SimulatorConfig::from_lookup(move |var| {
            names
                .iter()
                .any(|n| n == var)
                .then(|| "HostName=hub:7683;DeviceId=x;SharedAccessKey=k".to_string())
        })
        .unwrap()
    }

    #[test]
    fn test_load_devices_keeps_table_order() {
        let config = config_with(&["dows-lake", "fifth-avenue", "nac"]);
        let devices = load_devices(&config);

        let locations: Vec<&str> = devices.iter().map(|d| d.location.as_str()).collect();
        assert_eq!(locations, vec!["Dow's Lake", "Fifth Avenue", "NAC"]);
    }

    #[test]
    fn test_load_devices_skips_missing_credentials() {
        let config = config_with(&["dows-lake", "nac"]);
        let devices = load_devices(&config);

        let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["dows-lake", "nac"]);
    }

    #[test]
    fn test_load_devices_empty_when_nothing_configured() {
        let config = config_with(&[]);
        assert!(load_devices(&config).is_empty());
    }
}
