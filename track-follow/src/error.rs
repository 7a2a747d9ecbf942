//! Error types for the track-follow crate.

/// Errors from the camera-follow consumer.
#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using FollowError.
pub type FollowResult<T> = std::result::Result<T, FollowError>;
