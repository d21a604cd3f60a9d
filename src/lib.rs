//! # skateway-sim
//!
//! Synthetic ice telemetry for the Rideau Canal Skateway monitoring
//! pipeline. The simulator fabricates plausible readings (ice thickness,
//! surface temperature, snow accumulation, air temperature) for a fixed set
//! of monitoring stations and emits them as timestamped JSON messages over
//! per-device authenticated connections, so the downstream pipeline can be
//! exercised without real hardware.
//!
//! The crate is a library plus the `simulator` binary. The moving parts:
//!
//! - [`config`] reads the environment once into a [`SimulatorConfig`].
//! - [`registry`] turns the fixed station table plus credentials into
//!   connected devices.
//! - [`reading`] draws random [`SensorReading`]s.
//! - [`transport`] is the seam to the ingestion endpoint; [`runner`] drives
//!   the tick loop until interrupted.

pub mod config;
pub mod error;
pub mod reading;
pub mod registry;
pub mod runner;
pub mod test_utils;
pub mod transport;

// Re-export commonly used types.
pub use config::SimulatorConfig;
pub use error::{ConfigError, ConnectionError, SendError};
pub use reading::SensorReading;
pub use registry::{connect_all, load_devices, ConnectedDevice, DeviceDescriptor};
pub use runner::{run, shutdown_channel, ShutdownHandle, ShutdownSignal};
pub use transport::{Connector, OutboundMessage, Transport};
