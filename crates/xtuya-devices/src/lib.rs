//! Tuya data-point mapping and entity binding.
//!
//! This crate turns vendor devices, described by raw data points (DPs), into
//! typed platform entities and keeps them in step with live device state.
//!
//! ## Architecture
//!
//! - **Type data**: scaled-integer and enum views over a DP's declared range
//! - **Descriptor tables**: per-category entity templates, merged from
//!   several sources
//! - **Discovery**: matches devices against the merged tables
//! - **Entities**: number and alarm control panel bindings
//! - **DeviceManager**: the collaborator owning devices and the command
//!   transport; [`MemoryDeviceManager`] is the in-process implementation
//!
//! Platforms are set up with [`setup_number_platform`] and
//! [`setup_alarm_platform`]; they listen for discovery notifications on the
//! [`xtuya_core::EventBus`].

pub mod descriptors;
pub mod device;
pub mod discovery;
pub mod dp;
pub mod entity;
pub mod error;
pub mod manager;
pub mod platform;
pub mod tables;
pub mod type_data;
pub mod units;

pub use descriptors::{
    AlarmDescription, DescriptorTable, EntityCategory, EntityDescription, NumberDescription,
    NumberMode,
};
pub use device::{Device, SharedDevice};
pub use discovery::{discover, discover_ids};
pub use dp::{DpCommand, DpSpec, DpType, DpValue};
pub use entity::alarm::{supported_features, to_device_command, to_platform_state};
pub use entity::{
    AlarmAction, AlarmEntity, AlarmFeatures, AlarmMode, AlarmState, Entity, ModeEntity,
    NumberEntity, NumericEntity, TuyaEntity,
};
pub use error::{DeviceError, Result};
pub use manager::{DeviceManager, MemoryDeviceManager, SentCommand, SharedDeviceManager};
pub use platform::{
    merge_descriptor_sources, setup_alarm_platform, setup_number_platform, AddEntitiesCallback,
    Platform, PlatformContext, PlatformHandle,
};
pub use type_data::{EnumTypeData, IntegerTypeData, TypeData};
pub use units::{canonical_unit, unit_of_measurement, NumberDeviceClass, UnitOfMeasurement};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
