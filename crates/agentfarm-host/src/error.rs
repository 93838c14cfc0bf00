//! Error types for the host adapter binary.
//!
//! [`HostError`] wraps every failure mode of startup and the event loop so
//! that `main` can propagate with `?`. Rejected farm operations are not
//! errors here; they are reported back on the protocol channel.

use crate::persist::PersistError;

/// Top-level error for the host adapter.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: agentfarm_core::ConfigError,
    },

    /// Saving the farm state failed.
    #[error("persistence error: {source}")]
    Persist {
        /// The underlying persistence error.
        #[from]
        source: PersistError,
    },

    /// Reading stdin or writing stdout failed.
    #[error("protocol I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An outbound message could not be encoded.
    #[error("encode error: {source}")]
    Encode {
        /// The underlying serde error.
        #[from]
        source: serde_json::Error,
    },
}
