//! Entities bound to a device data point.
//!
//! Each entity pairs one device with one description. It reads the device's
//! current status on demand and turns user actions into DP commands; it
//! never caches values or mutates device state itself.

pub mod alarm;
pub mod number;

pub use alarm::{AlarmAction, AlarmEntity, AlarmFeatures, AlarmMode, AlarmState};
pub use number::NumberEntity;

use crate::device::SharedDevice;
use crate::dp::{DpCommand, DpValue};
use crate::error::Result;
use crate::manager::SharedDeviceManager;

/// State shared by every entity kind.
#[derive(Clone)]
pub struct TuyaEntity {
    device: SharedDevice,
    manager: SharedDeviceManager,
    device_id: String,
    unique_id: String,
}

impl TuyaEntity {
    pub fn new(device: SharedDevice, manager: SharedDeviceManager, key: &str) -> Self {
        let device_id = device.read().id.clone();
        let unique_id = format!("{}_{}", device_id, key);
        Self {
            device,
            manager,
            device_id,
            unique_id,
        }
    }

    pub fn device(&self) -> &SharedDevice {
        &self.device
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// `<device_id>_<dp code>`; stable across restarts.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn available(&self) -> bool {
        self.device.read().online
    }

    /// Current raw value of `code`.
    pub fn status(&self, code: &str) -> Option<DpValue> {
        self.device.read().status.get(code).cloned()
    }

    /// Hand `commands` to the device manager.
    pub fn send_command(&self, commands: Vec<DpCommand>) -> Result<()> {
        tracing::debug!(device_id = %self.device_id, ?commands, "sending command");
        self.manager
            .send_command(&self.device_id, commands)
            .inspect_err(|e| {
                tracing::warn!(device_id = %self.device_id, error = %e, "command rejected");
            })
    }
}

impl std::fmt::Debug for TuyaEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TuyaEntity")
            .field("device_id", &self.device_id)
            .field("unique_id", &self.unique_id)
            .finish_non_exhaustive()
    }
}

/// Common surface of a bound entity.
pub trait Entity: Send + Sync {
    fn unique_id(&self) -> &str;

    /// DP code the entity is bound to.
    fn key(&self) -> &str;

    fn available(&self) -> bool;
}

/// An entity with a continuous, scaled numeric value.
pub trait NumericEntity: Entity {
    /// Current scaled value, `None` when unknown.
    fn current_value(&self) -> Option<f64>;

    /// Write a scaled value. Emits exactly one command on success.
    fn apply_value(&self, value: f64) -> Result<()>;
}

/// An entity whose value is one of a closed set of modes.
pub trait ModeEntity: Entity {
    type State;
    type Action;

    /// Current abstract state, `None` when the raw value has no mapping.
    fn current_state(&self) -> Option<Self::State>;

    /// Request a transition. Emits exactly one command on success.
    fn apply_action(&self, action: Self::Action) -> Result<()>;
}
