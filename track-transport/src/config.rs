//! Configuration for the connection manager.

use std::time::Duration;

use crate::error::{TransportError, TransportResult};

/// Configuration for the `ConnectionManager`.
///
/// Controls the reconnection policy applied when the transport drops
/// unexpectedly or an open attempt fails.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Maximum number of consecutive failed open attempts (the initial open
    /// included) before the manager gives up and transitions to `Failed`.
    /// Default: 5
    pub max_reconnect_attempts: u32,

    /// Fixed delay between reconnection attempts. There is deliberately no
    /// backoff growth; the delay is constant per attempt.
    /// Default: 1 second
    pub reconnect_delay: Duration,

    /// Whether a server-initiated clean close is retried once immediately
    /// instead of being counted against the reconnect budget.
    /// Default: true
    pub retry_clean_close: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_millis(1000),
            retry_clean_close: true,
        }
    }
}

impl ConnectionConfig {
    /// Create a new ConnectionConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ConnectionConfig that retries quickly and persistently,
    /// suited to flaky mobile networks.
    pub fn aggressive() -> Self {
        Self {
            max_reconnect_attempts: 10,
            reconnect_delay: Duration::from_millis(250),
            ..Default::default()
        }
    }

    /// Create a ConnectionConfig that never retries; every drop is final.
    pub fn single_shot() -> Self {
        Self {
            max_reconnect_attempts: 1,
            retry_clean_close: false,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> TransportResult<()> {
        if self.max_reconnect_attempts == 0 {
            return Err(TransportError::Configuration(
                "Max reconnect attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    pub fn with_retry_clean_close(mut self, retry: bool) -> Self {
        self.retry_clean_close = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConnectionConfig::default();
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_delay, Duration::from_millis(1000));
        assert!(config.retry_clean_close);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let invalid = ConnectionConfig {
            max_reconnect_attempts: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_config_presets() {
        let aggressive = ConnectionConfig::aggressive();
        assert_eq!(aggressive.max_reconnect_attempts, 10);
        assert!(aggressive.validate().is_ok());

        let single = ConnectionConfig::single_shot();
        assert_eq!(single.max_reconnect_attempts, 1);
        assert!(!single.retry_clean_close);
        assert!(single.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ConnectionConfig::new()
            .with_max_reconnect_attempts(3)
            .with_reconnect_delay(Duration::from_millis(100))
            .with_retry_clean_close(false);

        assert_eq!(config.max_reconnect_attempts, 3);
        assert_eq!(config.reconnect_delay, Duration::from_millis(100));
        assert!(!config.retry_clean_close);
        assert!(config.validate().is_ok());
    }
}
