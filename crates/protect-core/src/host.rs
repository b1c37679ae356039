// ── Host platform boundary ──
//
// The host drives the accessory through callbacks and receives pushed
// characteristic updates. `CallbackAdapter` turns the async core into that
// callback convention; `HostBridge` is the push direction.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::accessory::Accessory;
use crate::error::CoreError;
use crate::mapping::target_from_characteristic;
use crate::model::SecurityState;

/// Push channel from the accessory to the host platform.
pub trait HostBridge: Send + Sync {
    /// Publish a new current-state characteristic value.
    fn update_current_state(&self, state: SecurityState);
}

/// Static accessory information shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub serial_number: &'static str,
}

impl AccessoryInformation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: "Somfy",
            model: "Protect Alarm",
            serial_number: "SP-001",
        }
    }
}

/// Error reported to a host callback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (status {status})")]
pub struct HostError {
    pub status: i32,
    pub message: String,
}

impl HostError {
    /// Host status code for "service communication failure".
    pub const SERVICE_COMMUNICATION_FAILURE: i32 = -70402;
}

impl From<CoreError> for HostError {
    fn from(err: CoreError) -> Self {
        Self {
            status: Self::SERVICE_COMMUNICATION_FAILURE,
            message: err.to_string(),
        }
    }
}

/// Adapts [`Accessory`] to the host's `FnOnce(Result<_, HostError>)`
/// callback convention. Each request runs as a task on `runtime`.
#[derive(Clone)]
pub struct CallbackAdapter {
    accessory: Arc<Accessory>,
    runtime: Handle,
}

impl CallbackAdapter {
    pub fn new(accessory: Arc<Accessory>, runtime: Handle) -> Self {
        Self { accessory, runtime }
    }

    pub fn accessory(&self) -> &Arc<Accessory> {
        &self.accessory
    }

    /// Current-state GET. The callback receives the characteristic value.
    pub fn get_current_state<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<u8, HostError>) + Send + 'static,
    {
        let accessory = Arc::clone(&self.accessory);
        self.runtime.spawn(async move {
            let result = accessory
                .current_state()
                .await
                .map(SecurityState::characteristic_value)
                .map_err(HostError::from);
            callback(result);
        })
    }

    /// Target-state GET.
    pub fn get_target_state<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<u8, HostError>) + Send + 'static,
    {
        let accessory = Arc::clone(&self.accessory);
        self.runtime.spawn(async move {
            let result = accessory
                .target_state()
                .await
                .map(SecurityState::characteristic_value)
                .map_err(HostError::from);
            callback(result);
        })
    }

    /// Target-state SET with a raw characteristic value.
    pub fn set_target_state<F>(&self, value: u8, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<(), HostError>) + Send + 'static,
    {
        let accessory = Arc::clone(&self.accessory);
        self.runtime.spawn(async move {
            let target = target_from_characteristic(value);
            let result = accessory
                .set_target_state(target)
                .await
                .map_err(HostError::from);
            callback(result);
        })
    }
}
