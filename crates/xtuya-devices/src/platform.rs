//! Entity platform setup.
//!
//! Setting up a platform merges its descriptor sources, registers the
//! merged table with the device manager, binds entities for every device
//! already known and then keeps listening for discovery notifications until
//! the returned [`PlatformHandle`] is unloaded or dropped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use xtuya_core::config::platforms;
use xtuya_core::{Delivery, EventBus, IntegrationConfig, XtEvent};

use crate::descriptors::{
    load_overrides, AlarmDescription, DescriptorTable, EntityDescription, NumberDescription,
};
use crate::device::SharedDevice;
use crate::discovery::discover_ids;
use crate::entity::{AlarmEntity, NumberEntity};
use crate::error::{DeviceError, Result};
use crate::manager::SharedDeviceManager;
use crate::tables;

/// Entity platforms provided by the integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    AlarmControlPanel,
    Number,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Self::AlarmControlPanel, Self::Number];

    /// Key used in configuration (descriptor override paths).
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::AlarmControlPanel => platforms::ALARM_CONTROL_PANEL,
            Self::Number => platforms::NUMBER,
        }
    }

    /// Name the merged descriptor table is registered under.
    pub fn registration_name(&self) -> &'static str {
        match self {
            Self::AlarmControlPanel => "alarm_control",
            Self::Number => "numbers",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Host callback receiving newly bound entities.
pub type AddEntitiesCallback<E> = Arc<dyn Fn(Vec<E>) + Send + Sync>;

/// Entity constructor used by a platform.
pub type EntityFactory<D, E> = fn(SharedDevice, SharedDeviceManager, D) -> E;

/// What every platform needs from the running integration.
#[derive(Clone)]
pub struct PlatformContext {
    pub manager: SharedDeviceManager,
    pub event_bus: EventBus,
    pub config: Arc<IntegrationConfig>,
}

impl PlatformContext {
    pub fn new(manager: SharedDeviceManager, event_bus: EventBus, config: IntegrationConfig) -> Self {
        Self {
            manager,
            event_bus,
            config: Arc::new(config),
        }
    }
}

/// A running platform. Dropping it stops discovery handling.
#[derive(Debug)]
pub struct PlatformHandle {
    platform: Platform,
    task: Option<JoinHandle<()>>,
}

impl PlatformHandle {
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether the discovery listener is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Unsubscribe from discovery notifications.
    pub fn unload(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!(platform = %self.platform, "platform unloaded");
        }
    }
}

impl Drop for PlatformHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Merge the descriptor sources of `platform` onto `base`.
///
/// Sources apply in a fixed order: extension tables from the device
/// manager, then `extra`, then the override files configured for the
/// platform. Later sources win per key.
pub fn merge_descriptor_sources<D: EntityDescription>(
    ctx: &PlatformContext,
    platform: Platform,
    base: &DescriptorTable<D>,
    extra: Vec<DescriptorTable<D>>,
) -> Result<DescriptorTable<D>> {
    let mut sources = Vec::new();

    for value in ctx.manager.platform_descriptors_to_merge(platform) {
        let table: DescriptorTable<D> = serde_json::from_value(value).map_err(|e| {
            DeviceError::Descriptor(format!("invalid {} extension table: {}", platform, e))
        })?;
        sources.push(DescriptorTable::new().merge(&table));
    }
    sources.extend(extra);
    sources.extend(load_overrides::<D>(&ctx.config, platform.config_key())?);

    let merged = DescriptorTable::merge_all(base, &sources);
    tracing::debug!(
        %platform,
        sources = sources.len(),
        categories = merged.len(),
        descriptions = merged.description_count(),
        "descriptor tables merged"
    );
    Ok(merged)
}

fn setup_platform<D, E>(
    ctx: &PlatformContext,
    platform: Platform,
    base: DescriptorTable<D>,
    extra: Vec<DescriptorTable<D>>,
    factory: EntityFactory<D, E>,
    add_entities: AddEntitiesCallback<E>,
) -> Result<PlatformHandle>
where
    D: EntityDescription,
    E: 'static,
{
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
        xtuya_core::Error::EventBus(format!("{} setup requires a tokio runtime", platform))
    })?;

    let table = Arc::new(merge_descriptor_sources(ctx, platform, &base, extra)?);
    ctx.manager
        .register_device_descriptors(platform.registration_name(), table.to_json());

    // Subscribe before the initial pass so no announcement is missed.
    let mut rx = ctx.event_bus.filter().discovery_events();

    let categories = table.len();
    let manager = ctx.manager.clone();
    let bind = move |device_ids: &[String]| -> Vec<E> {
        discover_ids(manager.as_ref(), device_ids, &table)
            .into_iter()
            .map(|(device, description)| factory(device, manager.clone(), description))
            .collect()
    };

    let initial = bind(&ctx.manager.device_ids());
    tracing::info!(%platform, categories, entities = initial.len(), "platform set up");
    add_entities(initial);

    let manager = ctx.manager.clone();
    let task = runtime.spawn(async move {
        while let Some(delivery) = rx.next().await {
            match delivery {
                Delivery::Event(XtEvent::DiscoveryNew { device_ids }, _) => {
                    let entities = bind(&device_ids);
                    tracing::debug!(
                        %platform,
                        devices = device_ids.len(),
                        entities = entities.len(),
                        "discovered new devices"
                    );
                    add_entities(entities);
                }
                Delivery::Event(..) => {}
                // Announcements may be among the dropped events, so rebind
                // every known device. The host dedups by unique id.
                Delivery::Lagged(skipped) => {
                    let entities = bind(&manager.device_ids());
                    tracing::warn!(
                        %platform,
                        skipped,
                        entities = entities.len(),
                        "discovery listener lagged, rebinding all devices"
                    );
                    add_entities(entities);
                }
            }
        }
        tracing::info!(%platform, "discovery listener stopped");
    });

    Ok(PlatformHandle {
        platform,
        task: Some(task),
    })
}

/// Set up the number platform.
///
/// Must be called from within a tokio runtime.
pub fn setup_number_platform(
    ctx: &PlatformContext,
    extra: Vec<DescriptorTable<NumberDescription>>,
    add_entities: AddEntitiesCallback<NumberEntity>,
) -> Result<PlatformHandle> {
    setup_platform(
        ctx,
        Platform::Number,
        tables::number_descriptors(),
        extra,
        NumberEntity::new,
        add_entities,
    )
}

/// Set up the alarm control panel platform.
///
/// Must be called from within a tokio runtime.
pub fn setup_alarm_platform(
    ctx: &PlatformContext,
    extra: Vec<DescriptorTable<AlarmDescription>>,
    add_entities: AddEntitiesCallback<AlarmEntity>,
) -> Result<PlatformHandle> {
    setup_platform(
        ctx,
        Platform::AlarmControlPanel,
        tables::alarm_descriptors(),
        extra,
        AlarmEntity::new,
        add_entities,
    )
}
