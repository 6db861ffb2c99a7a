//! Data-point (DP) model.
//!
//! A data point is one readable or controllable attribute of a device,
//! identified by its DP code (e.g. `temp_set`, `alarm_mode`).

use serde::{Deserialize, Serialize};

/// Declared type of a data point.
///
/// Serialized with the names the vendor uses in specification payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DpType {
    Boolean,
    Integer,
    Enum,
    String,
    Json,
    Raw,
    Bitmap,
}

impl std::fmt::Display for DpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Enum => "Enum",
            Self::String => "String",
            Self::Json => "Json",
            Self::Raw => "Raw",
            Self::Bitmap => "Bitmap",
        };
        f.write_str(name)
    }
}

/// Current raw value of a data point, as reported in a status push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DpValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl DpValue {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
        }
    }
}

impl From<i64> for DpValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for DpValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<bool> for DpValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for DpValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for DpValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

/// Capability declaration of one data point.
///
/// `values` is the vendor's JSON-encoded value descriptor, e.g.
/// `{"min":0,"max":1000,"scale":1,"step":10,"unit":"°C"}` for integers or
/// `{"range":["arm","disarmed","home"]}` for enums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpSpec {
    pub code: String,
    #[serde(rename = "type")]
    pub dp_type: DpType,
    #[serde(default)]
    pub values: String,
}

impl DpSpec {
    pub fn new(code: impl Into<String>, dp_type: DpType, values: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            dp_type,
            values: values.into(),
        }
    }
}

/// One outbound write: set `code` to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpCommand {
    pub code: String,
    pub value: DpValue,
}

impl DpCommand {
    pub fn new(code: impl Into<String>, value: impl Into<DpValue>) -> Self {
        Self {
            code: code.into(),
            value: value.into(),
        }
    }
}
