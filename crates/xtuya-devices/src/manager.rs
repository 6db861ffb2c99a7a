//! Device manager interface.
//!
//! The device manager owns the device registry, the live status cache and
//! the command transport. Entities only read device snapshots from it and
//! hand it outbound commands; they never wait for a command's outcome.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use xtuya_core::{EventBus, XtEvent};

use crate::device::{Device, SharedDevice};
use crate::dp::{DpCommand, DpValue};
use crate::error::{DeviceError, Result};
use crate::platform::Platform;

/// Operations the binding layer needs from the device manager.
pub trait DeviceManager: Send + Sync {
    /// Ids of every device currently known.
    fn device_ids(&self) -> Vec<String>;

    fn device(&self, device_id: &str) -> Option<SharedDevice>;

    /// Queue `commands` for `device_id`.
    ///
    /// Returning `Ok` only means the command was accepted; the result shows
    /// up later as a status push.
    fn send_command(&self, device_id: &str, commands: Vec<DpCommand>) -> Result<()>;

    /// Record the merged descriptor table of `platform` for introspection.
    fn register_device_descriptors(&self, platform: &str, descriptors: serde_json::Value);

    /// Extra descriptor tables contributed for `platform`, in merge order.
    fn platform_descriptors_to_merge(&self, _platform: Platform) -> Vec<serde_json::Value> {
        Vec::new()
    }
}

/// Shared device manager handle.
pub type SharedDeviceManager = Arc<dyn DeviceManager>;

/// A command accepted by [`MemoryDeviceManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentCommand {
    pub device_id: String,
    pub commands: Vec<DpCommand>,
}

/// In-process device manager.
///
/// Keeps devices in memory and publishes discovery, status and removal
/// events on the event bus. Sent commands are recorded; with `echo`
/// enabled they are also applied back as a status push, the way a device
/// acknowledges a write.
pub struct MemoryDeviceManager {
    devices: DashMap<String, SharedDevice>,
    event_bus: EventBus,
    sent: Mutex<Vec<SentCommand>>,
    registered: DashMap<String, serde_json::Value>,
    extensions: DashMap<Platform, Vec<serde_json::Value>>,
    echo: bool,
}

impl MemoryDeviceManager {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            devices: DashMap::new(),
            event_bus,
            sent: Mutex::new(Vec::new()),
            registered: DashMap::new(),
            extensions: DashMap::new(),
            echo: false,
        }
    }

    /// Apply accepted commands to the device status.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Insert or replace a device without announcing it.
    pub fn add_device(&self, device: Device) -> SharedDevice {
        let id = device.id.clone();
        let shared = device.into_shared();
        self.devices.insert(id, shared.clone());
        shared
    }

    /// Publish a discovery notification for `device_ids`.
    pub fn announce<I, S>(&self, device_ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.event_bus
            .publish_with_source(XtEvent::discovery_new(device_ids), "device_manager")
    }

    /// Insert a device and announce it.
    pub fn add_and_announce(&self, device: Device) -> SharedDevice {
        let id = device.id.clone();
        let shared = self.add_device(device);
        self.announce([id]);
        shared
    }

    pub fn remove_device(&self, device_id: &str) -> Option<SharedDevice> {
        let removed = self.devices.remove(device_id).map(|(_, device)| device);
        if removed.is_some() {
            self.event_bus.publish_with_source(
                XtEvent::DeviceRemoved {
                    device_id: device_id.to_string(),
                },
                "device_manager",
            );
        }
        removed
    }

    /// Apply a status push.
    pub fn update_status<I>(&self, device_id: &str, updates: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, DpValue)>,
    {
        let device = self
            .device(device_id)
            .ok_or_else(|| DeviceError::DeviceNotFound(device_id.to_string()))?;

        let mut codes = Vec::new();
        {
            let mut device = device.write();
            for (code, value) in updates {
                device.status.insert(code.clone(), value);
                codes.push(code);
            }
        }

        tracing::trace!(device_id, ?codes, "status updated");
        self.event_bus.publish_with_source(
            XtEvent::StatusUpdated {
                device_id: device_id.to_string(),
                codes,
            },
            "device_manager",
        );
        Ok(())
    }

    /// Contribute an extra descriptor table for `platform`.
    pub fn add_platform_descriptors(&self, platform: Platform, table: serde_json::Value) {
        self.extensions.entry(platform).or_default().push(table);
    }

    pub fn sent_commands(&self) -> Vec<SentCommand> {
        self.sent.lock().clone()
    }

    pub fn take_sent_commands(&self) -> Vec<SentCommand> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn registered_descriptors(&self, platform: &str) -> Option<serde_json::Value> {
        self.registered.get(platform).map(|entry| entry.value().clone())
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl DeviceManager for MemoryDeviceManager {
    fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    fn device(&self, device_id: &str) -> Option<SharedDevice> {
        self.devices.get(device_id).map(|entry| entry.value().clone())
    }

    fn send_command(&self, device_id: &str, commands: Vec<DpCommand>) -> Result<()> {
        if !self.devices.contains_key(device_id) {
            return Err(DeviceError::DeviceNotFound(device_id.to_string()));
        }

        self.sent.lock().push(SentCommand {
            device_id: device_id.to_string(),
            commands: commands.clone(),
        });

        if self.echo {
            self.update_status(
                device_id,
                commands.into_iter().map(|cmd| (cmd.code, cmd.value)),
            )?;
        }
        Ok(())
    }

    fn register_device_descriptors(&self, platform: &str, descriptors: serde_json::Value) {
        self.registered.insert(platform.to_string(), descriptors);
    }

    fn platform_descriptors_to_merge(&self, platform: Platform) -> Vec<serde_json::Value> {
        self.extensions
            .get(&platform)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
