//! Entity descriptions and per-category descriptor tables.
//!
//! A description names a DP code and how it is exposed as an entity. Tables
//! group descriptions by device category. The built-in tables can be
//! extended by further sources (the device manager, programmatic tables,
//! JSON override files); [`DescriptorTable::merge`] combines them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use xtuya_core::IntegrationConfig;

use crate::error::{DeviceError, Result};
use crate::units::NumberDeviceClass;

/// A static entity template keyed by DP code.
pub trait EntityDescription:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// DP code this description binds to.
    fn key(&self) -> &str;
}

/// Classification of a non-primary entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    /// Changes device configuration.
    Config,
    /// Exposes diagnostics; read-only.
    Diagnostic,
}

/// How a number entity is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberMode {
    #[default]
    Auto,
    Box,
    Slider,
}

/// Template for a number entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberDescription {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<NumberDeviceClass>,
    /// Explicit unit; overrides the unit declared by the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<EntityCategory>,
    #[serde(default)]
    pub mode: NumberMode,
}

impl NumberDescription {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            translation_key: None,
            device_class: None,
            native_unit: None,
            entity_category: None,
            mode: NumberMode::Auto,
        }
    }

    pub fn with_translation_key(mut self, translation_key: impl Into<String>) -> Self {
        self.translation_key = Some(translation_key.into());
        self
    }

    pub fn with_device_class(mut self, device_class: NumberDeviceClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    pub fn with_native_unit(mut self, unit: impl Into<String>) -> Self {
        self.native_unit = Some(unit.into());
        self
    }

    pub fn with_entity_category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    pub fn with_mode(mut self, mode: NumberMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for the common configuration number: translation key plus
    /// [`EntityCategory::Config`].
    pub fn config(key: impl Into<String>, translation_key: impl Into<String>) -> Self {
        Self::new(key)
            .with_translation_key(translation_key)
            .with_entity_category(EntityCategory::Config)
    }
}

impl EntityDescription for NumberDescription {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Template for an alarm control panel entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmDescription {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
}

impl AlarmDescription {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            translation_key: None,
        }
    }

    pub fn with_translation_key(mut self, translation_key: impl Into<String>) -> Self {
        self.translation_key = Some(translation_key.into());
        self
    }
}

impl EntityDescription for AlarmDescription {
    fn key(&self) -> &str {
        &self.key
    }
}

/// Descriptions grouped by device category.
///
/// Order within a category is display order. Serialized as a plain JSON
/// object `{category: [description, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorTable<D> {
    categories: BTreeMap<String, Vec<D>>,
}

impl<D> Default for DescriptorTable<D> {
    fn default() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }
}

impl<D: EntityDescription> DescriptorTable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add descriptions for `category`, replacing same-key entries.
    pub fn with_category<I>(mut self, category: impl Into<String>, descriptions: I) -> Self
    where
        I: IntoIterator<Item = D>,
    {
        self.absorb_category(category.into(), descriptions);
        self
    }

    pub fn get(&self, category: &str) -> Option<&[D]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[D])> {
        self.categories
            .iter()
            .map(|(category, descriptions)| (category.as_str(), descriptions.as_slice()))
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of descriptions across all categories.
    pub fn description_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Merge `other` on top of `self`.
    ///
    /// New categories and keys are added. A key already present in a
    /// category is replaced in place by the later source, so each key
    /// appears once and keeps its first display position. Base entries are
    /// never dropped.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = Self::new();
        merged.absorb(self);
        merged.absorb(other);
        merged
    }

    /// Merge `sources` onto `base` in iteration order.
    pub fn merge_all<'a, I>(base: &Self, sources: I) -> Self
    where
        I: IntoIterator<Item = &'a Self>,
    {
        sources
            .into_iter()
            .fold(base.merge(&Self::new()), |acc, source| acc.merge(source))
    }

    fn absorb(&mut self, other: &Self) {
        for (category, descriptions) in &other.categories {
            self.absorb_category(category.clone(), descriptions.iter().cloned());
        }
    }

    fn absorb_category<I>(&mut self, category: String, descriptions: I)
    where
        I: IntoIterator<Item = D>,
    {
        let entries = self.categories.entry(category).or_default();
        for description in descriptions {
            match entries.iter().position(|e| e.key() == description.key()) {
                Some(pos) => {
                    tracing::trace!(key = description.key(), "descriptor replaced by later source");
                    entries[pos] = description;
                }
                None => entries.push(description),
            }
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)
            .map_err(|e| DeviceError::Descriptor(format!("invalid descriptor table: {}", e)))?;
        // Normalize duplicates inside the source itself.
        Ok(Self::new().merge(&table))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(xtuya_core::Error::from)?;
        Self::from_json(&content).map_err(|e| match e {
            DeviceError::Descriptor(msg) => {
                DeviceError::Descriptor(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// JSON rendering handed to the device manager for introspection.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Load the override tables configured for `platform`, in configured order.
pub fn load_overrides<D: EntityDescription>(
    config: &IntegrationConfig,
    platform: &str,
) -> Result<Vec<DescriptorTable<D>>> {
    config
        .overrides_for(platform)
        .iter()
        .map(|path| {
            tracing::debug!(platform, path = %path.display(), "loading descriptor overrides");
            DescriptorTable::from_file(path)
        })
        .collect()
}
