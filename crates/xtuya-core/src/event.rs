//! Events exchanged between the device manager and the entity platforms.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event published on the [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum XtEvent {
    /// New devices became visible in the device manager.
    ///
    /// Platforms react by running discovery over `device_ids`. The same id
    /// may be announced more than once.
    DiscoveryNew { device_ids: Vec<String> },

    /// A device was removed; entities bound to it should be dropped.
    DeviceRemoved { device_id: String },

    /// The device manager applied a status push to a device.
    StatusUpdated {
        device_id: String,
        codes: Vec<String>,
    },
}

impl XtEvent {
    pub fn discovery_new<I, S>(device_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::DiscoveryNew {
            device_ids: device_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_discovery_event(&self) -> bool {
        matches!(self, Self::DiscoveryNew { .. })
    }

    pub fn is_device_event(&self) -> bool {
        matches!(
            self,
            Self::DeviceRemoved { .. } | Self::StatusUpdated { .. }
        )
    }

    /// Device id the event refers to, if it targets a single device.
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::DiscoveryNew { .. } => None,
            Self::DeviceRemoved { device_id } | Self::StatusUpdated { device_id, .. } => {
                Some(device_id)
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::DiscoveryNew { .. } => "DiscoveryNew",
            Self::DeviceRemoved { .. } => "DeviceRemoved",
            Self::StatusUpdated { .. } => "StatusUpdated",
        }
    }
}

/// Metadata attached to every published event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub event_id: Uuid,
    /// Unix timestamp in milliseconds.
    pub timestamp: i64,
    /// Component that published the event.
    pub source: String,
}

impl EventMetadata {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            source: source.into(),
        }
    }
}
