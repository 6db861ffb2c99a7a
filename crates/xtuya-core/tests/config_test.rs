//! Configuration loading tests.

use std::io::Write;

use xtuya_core::config::{defaults, platforms};
use xtuya_core::{Error, EventBus, IntegrationConfig};

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "event_channel_capacity": 32,
            "logging": {{ "filter": "xtuya=debug" }},
            "descriptor_overrides": {{
                "number": ["a.json", "b.json"]
            }}
        }}"#
    )
    .unwrap();

    let config = IntegrationConfig::from_file(file.path()).unwrap();
    assert_eq!(config.event_channel_capacity, 32);
    assert_eq!(config.logging.filter, "xtuya=debug");
    assert!(!config.logging.json);

    let overrides = config.overrides_for(platforms::NUMBER);
    assert_eq!(overrides.len(), 2);
    assert!(overrides[0].ends_with("a.json"));
    assert!(overrides[1].ends_with("b.json"));
    assert!(config.overrides_for(platforms::ALARM_CONTROL_PANEL).is_empty());
}

#[test]
fn test_event_bus_sized_from_config() {
    let config = IntegrationConfig::from_json_str(r#"{"event_channel_capacity": 4096}"#).unwrap();
    let bus = EventBus::from_config(&config);
    assert_eq!(bus.capacity(), 4096);

    let mut rx = bus.subscribe();
    for i in 0..4096 {
        bus.publish(xtuya_core::XtEvent::DeviceRemoved {
            device_id: format!("dev{}", i),
        });
    }
    // Nothing was dropped: the first event is still buffered.
    let (first, _) = rx.try_recv().unwrap();
    assert_eq!(first.device_id(), Some("dev0"));
}

#[test]
fn test_config_missing_file() {
    let err = IntegrationConfig::from_file("/nonexistent/xtuya.json").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_config_malformed_json() {
    let err = IntegrationConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
}

#[test]
fn test_config_round_trips_through_serde() {
    let config = IntegrationConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back = IntegrationConfig::from_json_str(&json).unwrap();
    assert_eq!(back, config);
    assert_eq!(back.logging.filter, defaults::LOG_FILTER);
}
