//! The emission loop.
//!
//! One tick sends one fresh reading per connected device, strictly in
//! registration order; a failed send is logged and the tick moves on. Between
//! ticks the loop waits for the configured interval, but the wait is
//! interruptible so a stop request never sits out a full interval.

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::SimulatorConfig;
use crate::error::SendError;
use crate::reading::SensorReading;
use crate::registry::ConnectedDevice;
use crate::transport::{OutboundMessage, Transport};

/// Creates a linked shutdown handle/signal pair.
///
/// Triggering the handle (or dropping it) wakes every signal, including
/// signals currently parked in the inter-tick wait.
pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx })
}

/// Requests shutdown of the emission loop.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes shutdown requests.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested. A dropped handle counts
    /// as a request.
    pub async fn triggered(&mut self) {
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}

/// Runs ticks until the signal fires, then closes every connection.
///
/// The tick that is in flight when the signal fires always completes; the
/// signal is observed before each tick and during the inter-tick wait, never
/// mid-tick.
pub async fn run<T: Transport>(
    mut devices: Vec<ConnectedDevice<T>>,
    config: &SimulatorConfig,
    mut signal: ShutdownSignal,
) {
    let interval = config.send_interval();

    loop {
        if signal.is_triggered() {
            break;
        }

        for device in devices.iter_mut() {
            match send_reading(device).await {
                Ok(payload) => info!("Sent from {}: {}", device.descriptor.location, payload),
                Err(err) => error!("Failed to send from {}: {}", device.descriptor.location, err),
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = signal.triggered() => break,
        }
    }

    close_all(&mut devices).await;
}

/// One send attempt: generate, serialize, deliver. The explicit `Result`
/// makes the continue-on-failure policy a visible branch in [`run`].
async fn send_reading<T: Transport>(device: &mut ConnectedDevice<T>) -> Result<String, SendError> {
    let reading = SensorReading::generate(&device.descriptor.location);
    let message = OutboundMessage::json(&reading)?;
    let payload = message.payload_text();

    device.transport.send(&message).await?;

    Ok(payload)
}

/// Closes every handle, in order, regardless of individual failures.
async fn close_all<T: Transport>(devices: &mut [ConnectedDevice<T>]) {
    info!("Closing connections...");

    for device in devices.iter_mut() {
        if let Err(err) = device.transport.close().await {
            warn!("Failed to close {}: {}", device.descriptor.location, err);
        }
    }

    info!("Done.");
}
