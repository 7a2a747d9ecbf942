//! Error types for the mototrack facade.

/// Errors from assembling or configuring a tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Invalid connection configuration
    #[error(transparent)]
    Transport(#[from] track_transport::TransportError),

    /// Invalid follow configuration
    #[error(transparent)]
    Follow(#[from] track_follow::FollowError),
}

/// Result type for tracker operations
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
