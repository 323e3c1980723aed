//! Error types for the Moctale relay.

use thiserror::Error;

use crate::types::ErrorKind;

/// Result type alias using the relay's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the relay.
///
/// These errors flow between internal components only. At the request
/// boundary every error is converted into a failure [`crate::types::Envelope`]
/// via [`Error::kind`]; nothing here is ever fatal to the coordinator.
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Locator errors
    // =========================================================================
    #[error("no open tab matches the target site")]
    NoTargetTab,

    #[error("agent injection failed: {0}")]
    Injection(String),

    // =========================================================================
    // Transport errors
    // =========================================================================
    #[error("message channel error: {0}")]
    Communication(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out: {0}")]
    Timeout(String),

    // =========================================================================
    // Upstream errors
    // =========================================================================
    #[error("not authorized: {0}")]
    Unauthorized(String),

    // =========================================================================
    // Generic errors
    // =========================================================================
    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an injection error.
    pub fn injection(msg: impl Into<String>) -> Self {
        Self::Injection(msg.into())
    }

    /// Create a communication error.
    pub fn communication(msg: impl Into<String>) -> Self {
        Self::Communication(msg.into())
    }

    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create an unauthorized error.
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The envelope error kind this error surfaces as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoTargetTab => ErrorKind::NoMoctaleTab,
            Self::Injection(_) => ErrorKind::InjectionFailed,
            Self::Communication(_) => ErrorKind::CommunicationError,
            Self::Network(_) | Self::Timeout(_) => ErrorKind::NetworkError,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Storage(_)
            | Self::Config(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::Other(_) => ErrorKind::InternalError,
        }
    }
}
