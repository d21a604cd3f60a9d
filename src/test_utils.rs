//! Test doubles for the transport seam.
//!
//! `MockHub` plays the remote endpoint: it hands out in-memory transports,
//! records every connect/send/close in arrival order and can be scripted to
//! refuse connections or fail individual sends. Shared by the unit tests and
//! the integration tests under `tests/`.

use std::collections::{HashMap, HashSet, VecDeque};
use std::io::ErrorKind;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::{ConnectionError, SendError};
use crate::registry::DeviceDescriptor;
use crate::transport::{Connector, OutboundMessage, Transport};

/// One recorded send attempt, successful or not.
#[derive(Clone, Debug)]
pub struct SendAttempt {
    pub device: String,
    pub location: String,
    pub message: OutboundMessage,
    pub ok: bool,
    pub at: Instant,
}

#[derive(Default)]
struct MockHubInner {
    connect_attempts: Vec<String>,
    refuse_connect: HashSet<String>,
    scripted_send_failures: HashMap<String, VecDeque<()>>,
    refuse_close: HashSet<String>,
    attempts: Vec<SendAttempt>,
    close_attempts: Vec<String>,
    closed: Vec<String>,
}

/// Scriptable in-memory stand-in for the ingestion endpoint.
#[derive(Clone, Default)]
pub struct MockHub {
    inner: Arc<Mutex<MockHubInner>>,
}

impl MockHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every future connect attempt for `device` fail.
    pub fn refuse_connect(&self, device: &str) {
        self.inner
            .lock()
            .unwrap()
            .refuse_connect
            .insert(device.to_string());
    }

    /// Queues one send failure for `device`; consumed in order, after which
    /// sends succeed again.
    pub fn fail_next_send(&self, device: &str) {
        self.inner
            .lock()
            .unwrap()
            .scripted_send_failures
            .entry(device.to_string())
            .or_default()
            .push_back(());
    }

    /// Device names for which a connect was attempted, in order.
    pub fn connect_attempts(&self) -> Vec<String> {
        self.inner.lock().unwrap().connect_attempts.clone()
    }

    /// Makes every future close attempt for `device` fail.
    pub fn fail_close(&self, device: &str) {
        self.inner
            .lock()
            .unwrap()
            .refuse_close
            .insert(device.to_string());
    }

    /// Every send attempt so far, in order.
    pub fn attempts(&self) -> Vec<SendAttempt> {
        self.inner.lock().unwrap().attempts.clone()
    }

    /// Device names for which a close was attempted, in order, whether or
    /// not it succeeded.
    pub fn close_attempts(&self) -> Vec<String> {
        self.inner.lock().unwrap().close_attempts.clone()
    }

    /// Device names whose transport was closed successfully, in order.
    pub fn closed(&self) -> Vec<String> {
        self.inner.lock().unwrap().closed.clone()
    }
}

#[async_trait]
impl Connector for MockHub {
    type Transport = MockTransport;

    async fn connect(
        &self,
        descriptor: &DeviceDescriptor,
    ) -> Result<MockTransport, ConnectionError> {
        let mut inner = self.inner.lock().unwrap();
        inner.connect_attempts.push(descriptor.name.clone());

        if inner.refuse_connect.contains(&descriptor.name) {
            return Err(ConnectionError::Io(std::io::Error::new(
                ErrorKind::ConnectionRefused,
                "simulated refusal",
            )));
        }

        Ok(MockTransport {
            hub: self.clone(),
            descriptor: descriptor.clone(),
        })
    }
}

/// In-memory transport handed out by [`MockHub`].
pub struct MockTransport {
    hub: MockHub,
    descriptor: DeviceDescriptor,
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, message: &OutboundMessage) -> Result<(), SendError> {
        let mut inner = self.hub.inner.lock().unwrap();

        let ok = match inner.scripted_send_failures.get_mut(&self.descriptor.name) {
            Some(queue) => queue.pop_front().is_none(),
            None => true,
        };

        inner.attempts.push(SendAttempt {
            device: self.descriptor.name.clone(),
            location: self.descriptor.location.clone(),
            message: message.clone(),
            ok,
            at: Instant::now(),
        });

        if ok {
            Ok(())
        } else {
            Err(SendError::Io(std::io::Error::new(
                ErrorKind::BrokenPipe,
                "simulated send failure",
            )))
        }
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let mut inner = self.hub.inner.lock().unwrap();
        inner.close_attempts.push(self.descriptor.name.clone());

        if inner.refuse_close.contains(&self.descriptor.name) {
            return Err(ConnectionError::Io(std::io::Error::new(
                ErrorKind::NotConnected,
                "simulated close failure",
            )));
        }

        inner.closed.push(self.descriptor.name.clone());
        Ok(())
    }
}
