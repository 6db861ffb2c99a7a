//! Device classes and the units each of them accepts.
//!
//! Vendors report units in free form (`"℃"`, `"c"`, `"Celsius"`). The table
//! below maps every accepted spelling to the canonical unit, per device
//! class. A number entity keeps its device class only when its unit is found
//! here. Classes defined by the integration itself are not validated.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use xtuya_core::config::DOMAIN;

/// Semantic classification of a number entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberDeviceClass {
    Battery,
    Carbon,
    Co2,
    Current,
    Distance,
    Duration,
    Energy,
    Humidity,
    Illuminance,
    Moisture,
    Pm10,
    Pm25,
    Power,
    PowerFactor,
    SignalStrength,
    SoundPressure,
    Temperature,
    Voltage,
    Volume,
    /// Any other class name, e.g. one defined by the integration.
    #[serde(untagged)]
    Custom(String),
}

impl NumberDeviceClass {
    /// Whether the class is defined by this integration (`xtend_tuya_*`).
    pub fn is_integration_specific(&self) -> bool {
        matches!(self, Self::Custom(name) if name.starts_with(DOMAIN))
    }
}

/// One canonical unit with its accepted spellings.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOfMeasurement {
    pub unit: &'static str,
    pub aliases: &'static [&'static str],
    pub device_classes: &'static [NumberDeviceClass],
    /// Unit values are reported in instead of `unit`.
    pub conversion_unit: Option<&'static str>,
    /// Multiplier from `unit` to `conversion_unit`.
    pub conversion_factor: f64,
}

impl UnitOfMeasurement {
    /// Unit exposed to the host.
    pub fn target_unit(&self) -> &'static str {
        self.conversion_unit.unwrap_or(self.unit)
    }
}

use NumberDeviceClass as Dc;

const UNCONVERTED: UnitOfMeasurement = UnitOfMeasurement {
    unit: "",
    aliases: &[],
    device_classes: &[],
    conversion_unit: None,
    conversion_factor: 1.0,
};

/// Units known to the integration.
pub static UNITS: &[UnitOfMeasurement] = &[
    UnitOfMeasurement {
        unit: "%",
        aliases: &["pct", "percent"],
        device_classes: &[Dc::Battery, Dc::Humidity, Dc::Moisture, Dc::PowerFactor],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "°C",
        aliases: &["°c", "c", "celsius", "℃"],
        device_classes: &[Dc::Temperature],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "°F",
        aliases: &["°f", "f", "fahrenheit", "℉"],
        device_classes: &[Dc::Temperature],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "V",
        aliases: &["volt", "volts"],
        device_classes: &[Dc::Voltage],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "mV",
        aliases: &["mv", "millivolt"],
        device_classes: &[Dc::Voltage],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "A",
        aliases: &["a", "ampere"],
        device_classes: &[Dc::Current],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "mA",
        aliases: &["ma", "milliampere"],
        device_classes: &[Dc::Current],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "W",
        aliases: &["w", "watt"],
        device_classes: &[Dc::Power],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "kW",
        aliases: &["kw", "kilowatt"],
        device_classes: &[Dc::Power],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "Wh",
        aliases: &["wh", "watthour"],
        device_classes: &[Dc::Energy],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "kWh",
        aliases: &["kwh", "kilowatt-hour", "kw·h"],
        device_classes: &[Dc::Energy],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "s",
        aliases: &["second", "seconds", "sec"],
        device_classes: &[Dc::Duration],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "min",
        aliases: &["minute", "minutes", "mins"],
        device_classes: &[Dc::Duration],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "h",
        aliases: &["hour", "hours"],
        device_classes: &[Dc::Duration],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "ms",
        aliases: &["millisecond", "milliseconds"],
        device_classes: &[Dc::Duration],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "mm",
        aliases: &["millimeter"],
        device_classes: &[Dc::Distance],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "cm",
        aliases: &["centimeter"],
        device_classes: &[Dc::Distance],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "m",
        aliases: &["meter", "meters"],
        device_classes: &[Dc::Distance],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "lx",
        aliases: &["lux"],
        device_classes: &[Dc::Illuminance],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "ppm",
        aliases: &[],
        device_classes: &[Dc::Co2, Dc::Carbon],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "dBm",
        aliases: &["dbm"],
        device_classes: &[Dc::SignalStrength],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "dB",
        aliases: &["db"],
        device_classes: &[Dc::SoundPressure],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "µg/m³",
        aliases: &["ug/m3", "µg/m3", "ug/m³"],
        device_classes: &[Dc::Pm25, Dc::Pm10],
        ..UNCONVERTED
    },
    UnitOfMeasurement {
        unit: "mg/m³",
        aliases: &["mg/m3"],
        device_classes: &[Dc::Pm25, Dc::Pm10],
        conversion_unit: Some("µg/m³"),
        conversion_factor: 1000.0,
    },
    UnitOfMeasurement {
        unit: "L",
        aliases: &["l", "liter", "liters"],
        device_classes: &[Dc::Volume],
        ..UNCONVERTED
    },
];

type ClassUnits = HashMap<NumberDeviceClass, HashMap<&'static str, &'static UnitOfMeasurement>>;

static DEVICE_CLASS_UNITS: Lazy<ClassUnits> = Lazy::new(|| {
    let mut table: ClassUnits = HashMap::new();
    for uom in UNITS {
        for device_class in uom.device_classes {
            let units = table.entry(device_class.clone()).or_default();
            units.insert(uom.unit, uom);
            for alias in uom.aliases {
                units.insert(*alias, uom);
            }
        }
    }
    table
});

/// Device class → accepted spelling → unit.
pub fn device_class_units() -> &'static ClassUnits {
    &DEVICE_CLASS_UNITS
}

/// Unit of measurement matching `unit` under `device_class`.
///
/// Tries the spelling verbatim, then lower-cased. `None` means the unit is
/// not valid for the class.
pub fn unit_of_measurement(
    device_class: &NumberDeviceClass,
    unit: &str,
) -> Option<&'static UnitOfMeasurement> {
    let units = DEVICE_CLASS_UNITS.get(device_class)?;
    units
        .get(unit)
        .or_else(|| units.get(unit.to_lowercase().as_str()))
        .copied()
}

/// Unit exposed for `unit` under `device_class`: the conversion unit when
/// one is set, the canonical spelling otherwise.
pub fn canonical_unit(device_class: &NumberDeviceClass, unit: &str) -> Option<&'static str> {
    unit_of_measurement(device_class, unit).map(UnitOfMeasurement::target_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_alias_lookup() {
        assert_eq!(canonical_unit(&Dc::Temperature, "°C"), Some("°C"));
        assert_eq!(canonical_unit(&Dc::Temperature, "℃"), Some("°C"));
        assert_eq!(canonical_unit(&Dc::Temperature, "Celsius"), Some("°C"));
        assert_eq!(canonical_unit(&Dc::Duration, "Seconds"), Some("s"));
        assert_eq!(canonical_unit(&Dc::Voltage, "mV"), Some("mV"));
        assert_eq!(canonical_unit(&Dc::Voltage, "MV"), Some("mV"));
    }

    #[test]
    fn test_unit_not_valid_for_class() {
        assert_eq!(canonical_unit(&Dc::Temperature, "%"), None);
        assert_eq!(canonical_unit(&Dc::Humidity, "°C"), None);
        assert_eq!(canonical_unit(&Dc::Distance, "furlong"), None);
    }

    #[test]
    fn test_every_unit_is_registered_under_its_classes() {
        let table = device_class_units();
        for uom in UNITS {
            for class in uom.device_classes {
                assert_eq!(table[class][uom.unit].unit, uom.unit);
            }
        }
    }

    #[test]
    fn test_conversion_unit_is_exposed() {
        assert_eq!(canonical_unit(&Dc::Pm25, "mg/m3"), Some("µg/m³"));
        assert_eq!(canonical_unit(&Dc::Pm10, "UG/M3"), Some("µg/m³"));
        let uom = unit_of_measurement(&Dc::Pm25, "mg/m³").unwrap();
        assert_eq!(uom.unit, "mg/m³");
        assert_eq!(uom.conversion_factor, 1000.0);
        assert_eq!(unit_of_measurement(&Dc::Pm25, "ug/m3").unwrap().conversion_factor, 1.0);
    }

    #[test]
    fn test_custom_classes_have_no_units() {
        let custom = Dc::Custom("xtend_tuya_countdown".to_string());
        assert!(custom.is_integration_specific());
        assert!(!Dc::Custom("frequency".to_string()).is_integration_specific());
        assert!(!Dc::Temperature.is_integration_specific());
        assert_eq!(canonical_unit(&custom, "s"), None);
    }

    #[test]
    fn test_device_class_serde_names() {
        let json = serde_json::to_string(&Dc::SignalStrength).unwrap();
        assert_eq!(json, "\"signal_strength\"");
        assert_eq!(serde_json::to_string(&Dc::Pm25).unwrap(), "\"pm25\"");

        let custom: Dc = serde_json::from_str("\"xtend_tuya_countdown\"").unwrap();
        assert_eq!(custom, Dc::Custom("xtend_tuya_countdown".to_string()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"xtend_tuya_countdown\"");
        let known: Dc = serde_json::from_str("\"humidity\"").unwrap();
        assert_eq!(known, Dc::Humidity);
    }
}
