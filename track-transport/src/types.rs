//! Core types for the track-transport crate.

use serde::{Deserialize, Serialize};

/// Opaque identifier for the entity whose feed is tracked.
///
/// In the fleet console this is a vehicle's license plate, but the transport
/// layer treats it as an arbitrary channel key.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct TrackedId(pub String);

impl TrackedId {
    /// Create a new tracked identifier from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TrackedId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TrackedId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for TrackedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single position fix delivered by the transport.
///
/// Immutable once received; no history is retained beyond the most recent
/// sample anywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl PositionSample {
    /// Create a new position sample.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate and decode a raw transport payload.
    ///
    /// Accepts any JSON object carrying numeric `lat`/`lng` fields; extra
    /// fields are ignored. Missing or non-numeric coordinates are an error,
    /// which the connection manager logs and drops.
    pub fn from_payload(payload: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload.clone())
    }
}

impl std::fmt::Display for PositionSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
