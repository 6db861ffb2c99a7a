//! Core types for xtuya.
//!
//! This crate holds the ambient foundation shared by the device layer:
//! the error type, the event model and broadcast event bus used for
//! discovery notifications, integration configuration and logging setup.

pub mod config;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod logging;

pub use config::{IntegrationConfig, LoggingConfig};
pub use error::{Error, Result};
pub use event::{EventMetadata, XtEvent};
pub use eventbus::{
    DEFAULT_CHANNEL_CAPACITY, Delivery, EventBus, EventBusReceiver, FilterBuilder,
    FilteredReceiver,
};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{IntegrationConfig, LoggingConfig, defaults, env_vars, platforms};
    pub use crate::error::{Error, Result};
    pub use crate::event::{EventMetadata, XtEvent};
    pub use crate::eventbus::{Delivery, EventBus};
}
