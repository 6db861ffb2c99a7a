//! Discovery and descriptor merge tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use xtuya_core::EventBus;
use xtuya_devices::tables::number_descriptors;
use xtuya_devices::{
    discover, DescriptorTable, Device, DpType, Entity, MemoryDeviceManager, NumberDescription,
    NumberEntity, NumberMode, SharedDevice,
};

fn source(category: &str, keys: &[(&str, NumberMode)]) -> DescriptorTable<NumberDescription> {
    DescriptorTable::new().with_category(
        category,
        keys.iter()
            .map(|(key, mode)| NumberDescription::config(*key, *key).with_mode(*mode)),
    )
}

fn fleet() -> Vec<SharedDevice> {
    vec![
        Device::new("radar", "kg")
            .with_status("presence_delay", 30)
            .with_status("movesensitivity", 5)
            .into_shared(),
        Device::new("oven", "mzj")
            .with_status("tempset", 1800)
            .with_status("settime", 20)
            .into_shared(),
        Device::new("plug", "cz").with_status("switch_1", true).into_shared(),
        Device::new("bare_radar", "kg").into_shared(),
    ]
}

fn pairs(found: Vec<(SharedDevice, NumberDescription)>) -> BTreeSet<(String, String)> {
    found
        .into_iter()
        .map(|(device, description)| (device.read().id.clone(), description.key))
        .collect()
}

#[test]
fn test_discovery_predicate() {
    let devices = fleet();
    let table = number_descriptors();
    let found = pairs(discover(devices.clone(), &table));

    for device in &devices {
        let device = device.read();
        let descriptions = table.get(&device.category).unwrap_or_default();
        for description in descriptions {
            let expected = device.status.contains_key(&description.key);
            let present = found.contains(&(device.id.clone(), description.key.clone()));
            assert_eq!(present, expected, "{}/{}", device.id, description.key);
        }
    }
    // Every pair comes from a category with descriptors.
    assert!(found.iter().all(|(id, _)| id != "plug"));
}

#[test]
fn test_missing_key_means_no_entity() {
    let found = pairs(discover(fleet(), &number_descriptors()));
    assert!(!found.iter().any(|(id, _)| id == "bare_radar"));
    assert!(found.contains(&("radar".to_string(), "presence_delay".to_string())));
    assert!(!found.contains(&("radar".to_string(), "countdown_1".to_string())));
}

#[test]
fn test_merge_grouping_does_not_change_discovery() {
    let a = number_descriptors();
    let b = source("cz", &[("switch_1", NumberMode::Box)]);
    let c = source("kg", &[("presence_delay", NumberMode::Slider), ("settime", NumberMode::Auto)]);

    let flat = DescriptorTable::merge_all(&a, [&b, &c]);
    let grouped = a.merge(&b).merge(&c);

    let left = discover(fleet(), &flat);
    let right = discover(fleet(), &grouped);
    assert_eq!(pairs(left.clone()), pairs(right.clone()));
    let modes = |found: Vec<(SharedDevice, NumberDescription)>| -> Vec<NumberMode> {
        found.into_iter().map(|(_, d)| d.mode).collect()
    };
    assert_eq!(modes(left), modes(right));
}

#[test]
fn test_later_source_redefines_display_hints() {
    let base = number_descriptors();
    let override_source = source("kg", &[("presence_delay", NumberMode::Slider)]);
    let merged = base.merge(&override_source);

    let kg = merged.get("kg").unwrap();
    assert_eq!(kg.iter().filter(|d| d.key == "presence_delay").count(), 1);
    assert_eq!(kg[0].key, "presence_delay");

    let manager = Arc::new(MemoryDeviceManager::new(EventBus::new()));
    let device = manager.add_device(
        Device::new("radar", "kg")
            .with_status("presence_delay", 30)
            .with_function("presence_delay", DpType::Integer, r#"{"min":0,"max":600,"scale":0,"step":1}"#),
    );

    let entities: Vec<NumberEntity> = discover([device], &merged)
        .into_iter()
        .map(|(device, description)| NumberEntity::new(device, manager.clone(), description))
        .collect();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].unique_id(), "radar_presence_delay");
    assert_eq!(entities[0].mode(), NumberMode::Slider);
}
