//! Integration configuration.
//!
//! Defaults and well-known names live in the constant modules below; the
//! runtime settings are loaded into [`IntegrationConfig`] from a JSON file
//! and the environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Integration domain, used as prefix for integration-specific identifiers.
pub const DOMAIN: &str = "xtend_tuya";

/// Default values.
pub mod defaults {
    /// Event bus buffer size.
    pub const EVENT_CHANNEL_CAPACITY: usize = crate::eventbus::DEFAULT_CHANNEL_CAPACITY;
    /// Log filter used when `RUST_LOG` is not set.
    pub const LOG_FILTER: &str = "xtuya=info";
}

/// Environment variable names.
pub mod env_vars {
    /// Path to a JSON [`IntegrationConfig`](super::IntegrationConfig) file.
    pub const CONFIG: &str = "XTUYA_CONFIG";
    /// `true` switches log output to JSON.
    pub const LOG_JSON: &str = "XTUYA_LOG_JSON";
}

/// Platform keys used in `descriptor_overrides`.
pub mod platforms {
    pub const ALARM_CONTROL_PANEL: &str = "alarm_control_panel";
    pub const NUMBER: &str = "number";

    pub const ALL: &[&str] = &[ALARM_CONTROL_PANEL, NUMBER];
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive applied when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of the compact human format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: defaults::LOG_FILTER.to_string(),
            json: false,
        }
    }
}

/// Runtime configuration of the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub event_channel_capacity: usize,
    pub logging: LoggingConfig,
    /// Extra descriptor tables per platform key, as JSON files.
    ///
    /// Files are merged in listed order on top of the built-in table.
    pub descriptor_overrides: HashMap<String, Vec<PathBuf>>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: defaults::EVENT_CHANNEL_CAPACITY,
            logging: LoggingConfig::default(),
            descriptor_overrides: HashMap::new(),
        }
    }
}

impl IntegrationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load from the file named by [`env_vars::CONFIG`], falling back to
    /// defaults, then apply [`env_vars::LOG_JSON`].
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(env_vars::CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_file(path)?,
            _ => Self::default(),
        };

        if let Some(json) = std::env::var(env_vars::LOG_JSON)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
        {
            config.logging.json = json;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::config("event_channel_capacity must be greater than 0"));
        }
        if let Some(unknown) = self
            .descriptor_overrides
            .keys()
            .find(|key| !platforms::ALL.contains(&key.as_str()))
        {
            return Err(Error::config(format!(
                "descriptor_overrides: unknown platform '{}'",
                unknown
            )));
        }
        Ok(())
    }

    /// Override files configured for `platform`, in merge order.
    pub fn overrides_for(&self, platform: &str) -> &[PathBuf] {
        self.descriptor_overrides
            .get(platform)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
