//! Typed views over a data point's declared value range.
//!
//! [`IntegerTypeData`] converts between the raw on-wire integer and the
//! user-facing scaled value. [`EnumTypeData`] lists the accepted tokens.

use serde::{Deserialize, Serialize};

use crate::dp::DpType;
use crate::error::DeviceError;

/// Distance to an integer below which a scaled write is treated as exact.
const ROUND_EPSILON: f64 = 1e-9;

/// Largest accepted power-of-ten divisor.
const MAX_SCALE: u32 = 18;

/// Scaled-integer data point: `value = raw / 10^scale`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegerTypeData {
    pub code: String,
    pub min: i64,
    pub max: i64,
    pub scale: u32,
    pub step: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Deserialize)]
struct IntegerValues {
    min: i64,
    max: i64,
    #[serde(default)]
    scale: i64,
    #[serde(default = "default_step")]
    step: i64,
    #[serde(default)]
    unit: Option<String>,
}

fn default_step() -> i64 {
    1
}

impl IntegerTypeData {
    /// Build type data, checking `min <= max`, `step > 0` and the scale range.
    pub fn new(
        code: impl Into<String>,
        min: i64,
        max: i64,
        scale: u32,
        step: i64,
        unit: Option<String>,
    ) -> Result<Self, DeviceError> {
        let code = code.into();
        if min > max {
            return Err(DeviceError::InvalidTypeData(format!(
                "{}: min {} exceeds max {}",
                code, min, max
            )));
        }
        if step <= 0 {
            return Err(DeviceError::InvalidTypeData(format!(
                "{}: step must be positive, got {}",
                code, step
            )));
        }
        if scale > MAX_SCALE {
            return Err(DeviceError::InvalidTypeData(format!(
                "{}: scale {} out of range",
                code, scale
            )));
        }
        Ok(Self {
            code,
            min,
            max,
            scale,
            step,
            unit: unit.filter(|u| !u.is_empty()),
        })
    }

    /// Parse the vendor's JSON value descriptor.
    ///
    /// Returns `None` when the payload is malformed or violates the range
    /// invariants.
    pub fn from_json(code: &str, values: &str) -> Option<Self> {
        let parsed: IntegerValues = match serde_json::from_str(values) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(code, error = %e, "unparsable integer type data");
                return None;
            }
        };
        let scale = u32::try_from(parsed.scale).ok()?;
        match Self::new(code, parsed.min, parsed.max, scale, parsed.step, parsed.unit) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::debug!(code, error = %e, "rejecting integer type data");
                None
            }
        }
    }

    fn factor(&self) -> f64 {
        10f64.powi(self.scale as i32)
    }

    pub fn min_scaled(&self) -> f64 {
        self.scale_value(self.min)
    }

    pub fn max_scaled(&self) -> f64 {
        self.scale_value(self.max)
    }

    pub fn step_scaled(&self) -> f64 {
        self.scale_value(self.step)
    }

    /// Raw device integer to scaled value.
    pub fn scale_value(&self, raw: i64) -> f64 {
        raw as f64 / self.factor()
    }

    /// Scaled value back to a raw device integer.
    ///
    /// The result always lies in `[min, max]` on a `min + k * step`
    /// boundary. Products within 1e-9 of an integer are taken as exact,
    /// anything else rounds half-up, both for the scale and for the step
    /// snap. Out-of-range requests are clamped, NaN maps to `min`.
    pub fn scale_value_back(&self, value: f64) -> i64 {
        if value.is_nan() {
            return self.min;
        }

        let scaled = value * self.factor();
        let nearest = scaled.round();
        let rounded = if (scaled - nearest).abs() <= ROUND_EPSILON {
            nearest
        } else {
            (scaled + 0.5).floor()
        };
        // Saturating cast; infinities land on i64 bounds and clamp below.
        let raw = rounded as i64;

        let clamped = raw.clamp(self.min, self.max);
        if clamped != raw {
            tracing::debug!(
                code = %self.code,
                requested = value,
                raw,
                clamped,
                "clamping out-of-range write"
            );
        }
        self.snap_to_step(clamped)
    }

    fn snap_to_step(&self, raw: i64) -> i64 {
        let min = i128::from(self.min);
        let step = i128::from(self.step);
        let offset = i128::from(raw) - min;

        let mut snapped = min + (offset + step / 2) / step * step;
        if snapped > i128::from(self.max) {
            snapped -= step;
        }
        // min <= snapped <= max, both i64
        snapped as i64
    }

    /// Whether `raw` is a value the device accepts.
    pub fn is_valid_raw(&self, raw: i64) -> bool {
        (self.min..=self.max).contains(&raw) && (raw - self.min) % self.step == 0
    }
}

/// Enumerated data point: one of a fixed set of string tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeData {
    pub code: String,
    pub range: Vec<String>,
}

#[derive(Deserialize)]
struct EnumValues {
    range: Vec<String>,
}

impl EnumTypeData {
    pub fn new<I, S>(code: impl Into<String>, range: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code: code.into(),
            range: range.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_json(code: &str, values: &str) -> Option<Self> {
        match serde_json::from_str::<EnumValues>(values) {
            Ok(parsed) => Some(Self {
                code: code.to_string(),
                range: parsed.range,
            }),
            Err(e) => {
                tracing::debug!(code, error = %e, "unparsable enum type data");
                None
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.range.iter().any(|t| t == token)
    }
}

/// Type data resolved for one data point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeData {
    Integer(IntegerTypeData),
    Enum(EnumTypeData),
}

impl TypeData {
    /// Parse `values` as type data of `dp_type`.
    ///
    /// Only integer and enum data points carry type data.
    pub fn parse(code: &str, dp_type: DpType, values: &str) -> Option<Self> {
        match dp_type {
            DpType::Integer => IntegerTypeData::from_json(code, values).map(Self::Integer),
            DpType::Enum => EnumTypeData::from_json(code, values).map(Self::Enum),
            _ => None,
        }
    }

    pub fn dp_type(&self) -> DpType {
        match self {
            Self::Integer(_) => DpType::Integer,
            Self::Enum(_) => DpType::Enum,
        }
    }

    pub fn as_integer(&self) -> Option<&IntegerTypeData> {
        match self {
            Self::Integer(data) => Some(data),
            Self::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumTypeData> {
        match self {
            Self::Enum(data) => Some(data),
            Self::Integer(_) => None,
        }
    }

    pub fn into_integer(self) -> Option<IntegerTypeData> {
        match self {
            Self::Integer(data) => Some(data),
            Self::Enum(_) => None,
        }
    }

    pub fn into_enum(self) -> Option<EnumTypeData> {
        match self {
            Self::Enum(data) => Some(data),
            Self::Integer(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenths() -> IntegerTypeData {
        IntegerTypeData::new("temp_set", 0, 1000, 1, 10, Some("°C".to_string())).unwrap()
    }

    #[test]
    fn test_scale_value() {
        let data = tenths();
        assert_eq!(data.scale_value(250), 25.0);
        assert_eq!(data.min_scaled(), 0.0);
        assert_eq!(data.max_scaled(), 100.0);
        assert_eq!(data.step_scaled(), 1.0);
    }

    #[test]
    fn test_scale_back_rounds_to_step() {
        let data = tenths();
        // 25.3 -> 253 -> nearest step from min is 250
        assert_eq!(data.scale_value_back(25.3), 250);
        // exact half of a step rounds up
        assert_eq!(data.scale_value_back(25.5), 260);
        assert_eq!(data.scale_value_back(25.6), 260);
        assert_eq!(data.scale_value_back(25.0), 250);
    }

    #[test]
    fn test_round_trip_on_every_step() {
        let data = IntegerTypeData::new("bright_value", -500, 500, 2, 5, None).unwrap();
        let mut raw = data.min;
        while raw <= data.max {
            assert_eq!(data.scale_value_back(data.scale_value(raw)), raw);
            raw += data.step;
        }
    }

    #[test]
    fn test_round_trip_large_scale() {
        let data = IntegerTypeData::new("liquid_depth_max", 0, 2_000_000, 3, 1, None).unwrap();
        for raw in [0, 1, 7, 999, 1001, 123_457, 1_999_999, 2_000_000] {
            assert_eq!(data.scale_value_back(data.scale_value(raw)), raw);
        }
    }

    #[test]
    fn test_clamping() {
        let data = tenths();
        assert_eq!(data.scale_value_back(-5.0), 0);
        assert_eq!(data.scale_value_back(-0.01), 0);
        assert_eq!(data.scale_value_back(100.01), 1000);
        assert_eq!(data.scale_value_back(1e300), 1000);
        assert_eq!(data.scale_value_back(f64::INFINITY), 1000);
        assert_eq!(data.scale_value_back(f64::NEG_INFINITY), 0);
        assert_eq!(data.scale_value_back(f64::NAN), 0);
    }

    #[test]
    fn test_max_off_step_grid() {
        // 0, 3, 6, 9 are valid; 10 is max but not on the grid
        let data = IntegerTypeData::new("movedistance_max", 0, 10, 0, 3, None).unwrap();
        assert_eq!(data.scale_value_back(10.0), 9);
        assert_eq!(data.scale_value_back(11.0), 9);
        assert_eq!(data.scale_value_back(8.0), 9);
        assert_eq!(data.scale_value_back(7.0), 6);
        assert!(data.is_valid_raw(9));
        assert!(!data.is_valid_raw(10));
    }

    #[test]
    fn test_negative_range_half_up() {
        let data = IntegerTypeData::new("temp_calibration", -10, 10, 0, 1, None).unwrap();
        assert_eq!(data.scale_value_back(-2.5), -2);
        assert_eq!(data.scale_value_back(-2.6), -3);
        assert_eq!(data.scale_value_back(2.5), 3);
    }

    #[test]
    fn test_invariants_rejected() {
        assert!(IntegerTypeData::new("x", 10, 0, 0, 1, None).is_err());
        assert!(IntegerTypeData::new("x", 0, 10, 0, 0, None).is_err());
        assert!(IntegerTypeData::new("x", 0, 10, 0, -1, None).is_err());
        assert!(IntegerTypeData::new("x", 0, 10, 19, 1, None).is_err());
    }

    #[test]
    fn test_from_json() {
        let data = IntegerTypeData::from_json(
            "temp_set",
            r#"{"min":0,"max":1000,"scale":1,"step":10,"unit":"°C"}"#,
        )
        .unwrap();
        assert_eq!(data, tenths());

        let defaults = IntegerTypeData::from_json("countdown", r#"{"min":0,"max":86400}"#).unwrap();
        assert_eq!(defaults.step, 1);
        assert_eq!(defaults.scale, 0);
        assert_eq!(defaults.unit, None);

        let empty_unit =
            IntegerTypeData::from_json("countdown", r#"{"min":0,"max":1,"unit":""}"#).unwrap();
        assert_eq!(empty_unit.unit, None);
    }

    #[test]
    fn test_from_json_rejects_bad_payloads() {
        assert!(IntegerTypeData::from_json("x", "not json").is_none());
        assert!(IntegerTypeData::from_json("x", r#"{"range":["a"]}"#).is_none());
        assert!(IntegerTypeData::from_json("x", r#"{"min":5,"max":1}"#).is_none());
        assert!(IntegerTypeData::from_json("x", r#"{"min":0,"max":1,"scale":-1}"#).is_none());
        assert!(IntegerTypeData::from_json("x", r#"{"min":0,"max":1,"step":0}"#).is_none());
    }

    #[test]
    fn test_enum_from_json() {
        let data =
            EnumTypeData::from_json("alarm_mode", r#"{"range":["arm","disarmed","home"]}"#).unwrap();
        assert!(data.contains("home"));
        assert!(!data.contains("sos"));
        assert!(EnumTypeData::from_json("alarm_mode", r#"{"min":0}"#).is_none());
    }

    #[test]
    fn test_type_data_parse_by_type() {
        let int = TypeData::parse("x", DpType::Integer, r#"{"min":0,"max":1}"#).unwrap();
        assert_eq!(int.dp_type(), DpType::Integer);
        assert!(int.as_integer().is_some());
        assert!(int.as_enum().is_none());

        let en = TypeData::parse("x", DpType::Enum, r#"{"range":[]}"#).unwrap();
        assert!(en.into_enum().is_some());

        assert!(TypeData::parse("x", DpType::Boolean, "{}").is_none());
        assert!(TypeData::parse("x", DpType::Integer, r#"{"range":[]}"#).is_none());
    }
}
