//! Error type shared by the xtuya crates.

/// Result alias using the core [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Core error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a configuration or descriptor file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The event bus could not deliver or was closed.
    #[error("Event bus error: {0}")]
    EventBus(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
