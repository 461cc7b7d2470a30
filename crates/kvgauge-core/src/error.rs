//! Core error types.

use thiserror::Error;

/// Store and driver errors.
///
/// These circulate between the driver and its backend only; at the driver
/// boundary every variant except [`Error::Config`] collapses into
/// [`crate::Outcome::Error`].
#[derive(Debug, Error)]
pub enum Error {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Backend-reported fault (connectivity, protocol, malformed response).
    #[error("backend fault: {0}")]
    Backend(String),

    /// The backend does not provide a required capability.
    #[error("unsupported backend capability: {0}")]
    Unsupported(&'static str),

    /// Invalid configuration value. Fatal to `init`, never a per-operation
    /// outcome.
    #[error("invalid configuration: {0}")]
    Config(String),
}
