//! Device layer errors.

use crate::dp::DpType;

/// Result alias for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Errors raised by the mapping and binding layer.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The data point does not declare the type the entity needs.
    #[error("Type resolution failed for {code}: expected {expected}")]
    TypeResolution { code: String, expected: DpType },

    /// Write attempted on a numeric entity without integer type data.
    #[error("Cannot set value of {0}, device doesn't provide type data")]
    NoTypeData(String),

    /// Declared integer range violates its invariants.
    #[error("Invalid type data: {0}")]
    InvalidTypeData(String),

    /// Requested value cannot be converted (e.g. not a finite number).
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// A descriptor table could not be loaded.
    #[error("Descriptor error: {0}")]
    Descriptor(String),

    #[error(transparent)]
    Core(#[from] xtuya_core::Error),
}
