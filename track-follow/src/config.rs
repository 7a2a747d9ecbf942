//! Configuration for the camera-follow consumer.

use std::time::Duration;

use crate::camera::CameraMotion;
use crate::error::{FollowError, FollowResult};

/// Configuration for the `PositionFollower`.
///
/// The dual gate bounds both the rate and the significance of accepted
/// updates independently of upstream push frequency; `min_interval` is tuned
/// to be comparable to the camera flight duration so a new flight rarely
/// preempts one still easing.
#[derive(Debug, Clone)]
pub struct FollowConfig {
    /// Minimum time between accepted samples.
    /// Default: 1 second
    pub min_interval: Duration,

    /// Minimum great-circle movement, in meters, between accepted samples.
    /// Default: 10 m
    pub min_distance_m: f64,

    /// Motion parameters passed to the camera on each accepted sample.
    pub flight: CameraMotion,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            min_distance_m: 10.0,
            flight: CameraMotion::default(),
        }
    }
}

impl FollowConfig {
    /// Create a new FollowConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> FollowResult<()> {
        if !self.min_distance_m.is_finite() || self.min_distance_m < 0.0 {
            return Err(FollowError::Configuration(
                "Min distance must be finite and non-negative".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.flight.ease_linearity) || self.flight.ease_linearity == 0.0 {
            return Err(FollowError::Configuration(
                "Ease linearity must be in (0, 1]".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_min_distance_m(mut self, meters: f64) -> Self {
        self.min_distance_m = meters;
        self
    }

    pub fn with_flight(mut self, flight: CameraMotion) -> Self {
        self.flight = flight;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FollowConfig::default();
        assert_eq!(config.min_interval, Duration::from_millis(1000));
        assert_eq!(config.min_distance_m, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let invalid = FollowConfig::default().with_min_distance_m(f64::NAN);
        assert!(invalid.validate().is_err());

        let invalid = FollowConfig::default().with_min_distance_m(-1.0);
        assert!(invalid.validate().is_err());

        let invalid = FollowConfig::default().with_flight(CameraMotion {
            ease_linearity: 0.0,
            ..Default::default()
        });
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = FollowConfig::new()
            .with_min_interval(Duration::from_millis(500))
            .with_min_distance_m(25.0);

        assert_eq!(config.min_interval, Duration::from_millis(500));
        assert_eq!(config.min_distance_m, 25.0);
        assert!(config.validate().is_ok());
    }
}
