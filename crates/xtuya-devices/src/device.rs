//! Device snapshot as held by the device manager.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::dp::{DpSpec, DpType, DpValue};
use crate::type_data::{EnumTypeData, IntegerTypeData, TypeData};

/// A device shared between the manager and every entity bound to it.
///
/// Status pushes are applied in place by the manager; entities read the
/// current snapshot on demand.
pub type SharedDevice = Arc<RwLock<Device>>;

/// Vendor device with its live status and capability declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Stable device identifier.
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Product category code (e.g. `kg`, `mzj`) selecting descriptor tables.
    pub category: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub online: bool,
    /// Current raw value per DP code.
    #[serde(default)]
    pub status: HashMap<String, DpValue>,
    /// Authoritative DP specification (writable functions).
    #[serde(default)]
    pub function: HashMap<String, DpSpec>,
    /// DP schema derived from the live status report.
    #[serde(default)]
    pub status_range: HashMap<String, DpSpec>,
}

impl Device {
    pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            online: true,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, code: impl Into<String>, value: impl Into<DpValue>) -> Self {
        self.status.insert(code.into(), value.into());
        self
    }

    /// Declare a DP in the specification (`function`) map.
    pub fn with_function(
        mut self,
        code: impl Into<String>,
        dp_type: DpType,
        values: impl Into<String>,
    ) -> Self {
        let spec = DpSpec::new(code, dp_type, values);
        self.function.insert(spec.code.clone(), spec);
        self
    }

    /// Declare a DP in the live status schema (`status_range`) map.
    pub fn with_status_range(
        mut self,
        code: impl Into<String>,
        dp_type: DpType,
        values: impl Into<String>,
    ) -> Self {
        let spec = DpSpec::new(code, dp_type, values);
        self.status_range.insert(spec.code.clone(), spec);
        self
    }

    pub fn into_shared(self) -> SharedDevice {
        Arc::new(RwLock::new(self))
    }

    pub fn has_status(&self, code: &str) -> bool {
        self.status.contains_key(code)
    }

    /// Resolve the type data of `code` as `dp_type`.
    ///
    /// With `prefer_function` the specification map is consulted before the
    /// live status schema, otherwise the other way round. An entry of a
    /// different type, or whose values do not parse, falls through to the
    /// next map.
    pub fn find_dpcode(&self, code: &str, dp_type: DpType, prefer_function: bool) -> Option<TypeData> {
        let order = if prefer_function {
            [&self.function, &self.status_range]
        } else {
            [&self.status_range, &self.function]
        };

        for specs in order {
            let Some(spec) = specs.get(code) else {
                continue;
            };
            if spec.dp_type != dp_type {
                continue;
            }
            if let Some(data) = TypeData::parse(code, dp_type, &spec.values) {
                return Some(data);
            }
        }

        tracing::debug!(
            device_id = %self.id,
            code,
            expected = %dp_type,
            "no matching type data"
        );
        None
    }

    pub fn find_integer(&self, code: &str, prefer_function: bool) -> Option<IntegerTypeData> {
        self.find_dpcode(code, DpType::Integer, prefer_function)
            .and_then(TypeData::into_integer)
    }

    pub fn find_enum(&self, code: &str, prefer_function: bool) -> Option<EnumTypeData> {
        self.find_dpcode(code, DpType::Enum, prefer_function)
            .and_then(TypeData::into_enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INT_A: &str = r#"{"min":0,"max":100,"scale":0,"step":1}"#;
    const INT_B: &str = r#"{"min":0,"max":500,"scale":1,"step":5}"#;

    #[test]
    fn test_prefer_function_order() {
        let device = Device::new("dev1", "kg")
            .with_function("presence_delay", DpType::Integer, INT_A)
            .with_status_range("presence_delay", DpType::Integer, INT_B);

        let from_function = device.find_integer("presence_delay", true).unwrap();
        assert_eq!(from_function.max, 100);

        let from_status = device.find_integer("presence_delay", false).unwrap();
        assert_eq!(from_status.max, 500);
    }

    #[test]
    fn test_falls_back_to_status_range() {
        let device =
            Device::new("dev1", "kg").with_status_range("presence_delay", DpType::Integer, INT_B);
        assert_eq!(device.find_integer("presence_delay", true).unwrap().scale, 1);
    }

    #[test]
    fn test_type_mismatch_falls_through() {
        let device = Device::new("dev1", "kg")
            .with_function("presence_delay", DpType::Enum, r#"{"range":["a"]}"#)
            .with_status_range("presence_delay", DpType::Integer, INT_A);

        assert!(device.find_integer("presence_delay", true).is_some());
        assert!(device.find_enum("presence_delay", true).is_some());
    }

    #[test]
    fn test_unparsable_entry_falls_through() {
        let device = Device::new("dev1", "kg")
            .with_function("presence_delay", DpType::Integer, "{broken")
            .with_status_range("presence_delay", DpType::Integer, INT_B);
        assert_eq!(device.find_integer("presence_delay", true).unwrap().max, 500);
    }

    #[test]
    fn test_non_numeric_type_not_found() {
        let device = Device::new("dev1", "kg").with_function("switch_1", DpType::Boolean, "{}");
        assert!(device.find_dpcode("switch_1", DpType::Boolean, true).is_none());
        assert!(device.find_integer("switch_1", true).is_none());
        assert!(device.find_integer("missing", true).is_none());
    }

    #[test]
    fn test_deserialize_snapshot() {
        let device: Device = serde_json::from_str(
            r#"{
                "id": "dev1",
                "category": "mal",
                "status": {"alarm_mode": "home", "alarm_volume": 3, "switch": true},
                "function": {
                    "alarm_mode": {"code": "alarm_mode", "type": "Enum", "values": "{\"range\":[\"home\"]}"}
                }
            }"#,
        )
        .unwrap();
        assert!(device.has_status("alarm_mode"));
        assert_eq!(device.status["alarm_volume"], DpValue::Integer(3));
        assert!(device.find_enum("alarm_mode", true).unwrap().contains("home"));
        assert!(!device.online);
    }
}
