//! Error types for the track-transport crate.

/// Errors from the transport layer and connection manager.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the transport channel for an identifier
    #[error("Failed to open channel {channel}: {reason}")]
    ConnectFailed {
        /// The channel (tracked identifier) being opened
        channel: String,
        /// Why the open failed
        reason: String,
    },

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using TransportError.
pub type TransportResult<T> = std::result::Result<T, TransportError>;
