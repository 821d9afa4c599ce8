//! In-memory `BluetoothControl` for unit tests.

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::process::ExitStatus;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::control::BluetoothControl;
use crate::directory::{Device, DeviceDirectory};
use crate::error::{CtlError, Result};

#[derive(Default)]
pub(crate) struct FakeControl {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
    powered: bool,
    connected: bool,
    snapshots: Mutex<VecDeque<Result<DeviceDirectory>>>,
    last_snapshot: Mutex<DeviceDirectory>,
    cancel_when_drained: Option<CancellationToken>,
}

pub(crate) fn directory(devices: &[(&str, &str)]) -> DeviceDirectory {
    devices
        .iter()
        .map(|(name, address)| Device::new(*name, *address))
        .collect()
}

pub(crate) fn process_failure(command: &str) -> CtlError {
    CtlError::ProcessFailed {
        command: command.to_string(),
        status: exit_status(1),
        output: "org.bluez.Error.Failed".to_string(),
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

impl FakeControl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn powered(mut self, powered: bool) -> Self {
        self.powered = powered;
        self
    }

    pub(crate) fn connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Makes the call recorded as `call` fail.
    pub(crate) fn failing(mut self, call: &str) -> Self {
        self.failing.insert(call.to_string());
        self
    }

    pub(crate) fn snapshot(self, snapshot: Result<DeviceDirectory>) -> Self {
        self.snapshots.lock().unwrap().push_back(snapshot);
        self
    }

    /// Once queued snapshots run out, cancel `token` and fail further queries.
    pub(crate) fn cancel_when_drained(mut self, token: CancellationToken) -> Self {
        self.cancel_when_drained = Some(token);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let failed = self.failing.contains(&call);
        let error = failed.then(|| process_failure(&call));
        self.calls.lock().unwrap().push(call);
        error.map_or(Ok(()), Err)
    }
}

#[async_trait]
impl BluetoothControl for FakeControl {
    async fn power_on(&self) -> Result<()> {
        self.record("power on".to_string())
    }

    async fn power_off(&self) -> Result<()> {
        self.record("power off".to_string())
    }

    async fn connect(&self, address: &str) -> Result<()> {
        self.record(format!("connect {address}"))
    }

    async fn disconnect(&self) -> Result<()> {
        self.record("disconnect".to_string())
    }

    async fn is_powered(&self) -> Result<bool> {
        self.record("show".to_string())?;
        Ok(self.powered)
    }

    async fn is_connected(&self, address: Option<&str>) -> Result<bool> {
        match address {
            Some(address) => self.record(format!("info {address}"))?,
            None => self.record("info".to_string())?,
        }
        Ok(self.connected)
    }

    async fn devices(&self) -> Result<DeviceDirectory> {
        self.record("devices".to_string())?;

        let next = self.snapshots.lock().unwrap().pop_front();
        match next {
            Some(Ok(snapshot)) => {
                *self.last_snapshot.lock().unwrap() = snapshot.clone();
                Ok(snapshot)
            }
            Some(Err(e)) => Err(e),
            None => match &self.cancel_when_drained {
                Some(token) => {
                    token.cancel();
                    Err(CtlError::Cancelled)
                }
                None => Ok(self.last_snapshot.lock().unwrap().clone()),
            },
        }
    }

    async fn start_discovery(&self) -> Result<()> {
        self.record("scan on".to_string())?;
        std::future::pending::<()>().await;
        Ok(())
    }
}
