//! Dual time+distance acceptance gate.
//!
//! Decides whether an incoming position is worth an expensive visual
//! transition. Both thresholds are measured against the last *accepted*
//! sample, never the last seen one, and rejected samples are discarded
//! outright so the next accepted sample always reflects the latest truth.

use std::time::{Duration, Instant};

use track_transport::PositionSample;

use crate::geo::haversine_distance_m;

/// Outcome of offering a candidate sample to the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    /// First sample after a reset, or both thresholds cleared.
    Accepted,
    /// Not enough time has passed since the last accepted sample.
    RejectedTooSoon {
        /// Time since the last accepted sample
        elapsed: Duration,
    },
    /// Not enough movement since the last accepted sample.
    RejectedTooClose {
        /// Great-circle distance from the last accepted sample
        distance_m: f64,
    },
}

impl GateDecision {
    /// Whether the candidate was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, GateDecision::Accepted)
    }
}

/// Time+distance gate over a stream of candidate samples.
pub struct FollowGate {
    min_interval: Duration,
    min_distance_m: f64,
    last_accepted: Option<(PositionSample, Instant)>,
}

impl FollowGate {
    /// Create a gate with the given thresholds.
    pub fn new(min_interval: Duration, min_distance_m: f64) -> Self {
        Self {
            min_interval,
            min_distance_m,
            last_accepted: None,
        }
    }

    /// Offer a candidate sample observed at `now`.
    ///
    /// The very first candidate after a reset is always accepted and seeds
    /// the gate. Afterwards a candidate is accepted only if *both*
    /// `elapsed >= min_interval` and `distance >= min_distance_m` hold
    /// relative to the last accepted sample; on acceptance both gate fields
    /// update together.
    pub fn evaluate(&mut self, candidate: PositionSample, now: Instant) -> GateDecision {
        if let Some((last_position, last_at)) = self.last_accepted {
            let elapsed = now.saturating_duration_since(last_at);
            if elapsed < self.min_interval {
                return GateDecision::RejectedTooSoon { elapsed };
            }

            let distance_m = haversine_distance_m(last_position, candidate);
            if distance_m < self.min_distance_m {
                return GateDecision::RejectedTooClose { distance_m };
            }
        }

        self.last_accepted = Some((candidate, now));
        GateDecision::Accepted
    }

    /// Forget the gate state; the next candidate is accepted unconditionally.
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }

    /// The last accepted sample, if any.
    pub fn last_accepted(&self) -> Option<PositionSample> {
        self.last_accepted.map(|(position, _)| position)
    }
}

impl std::fmt::Debug for FollowGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FollowGate")
            .field("min_interval", &self.min_interval)
            .field("min_distance_m", &self.min_distance_m)
            .field("seeded", &self.last_accepted.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ~50 m north of the given sample.
    fn nudge_50m(p: PositionSample) -> PositionSample {
        PositionSample::new(p.lat + 0.00045, p.lng)
    }

    #[test]
    fn test_first_sample_always_accepted() {
        let mut gate = FollowGate::new(Duration::from_millis(1000), 10.0);
        let now = Instant::now();

        let decision = gate.evaluate(PositionSample::new(5.0689, -75.5174), now);
        assert!(decision.is_accepted());
        assert_eq!(
            gate.last_accepted(),
            Some(PositionSample::new(5.0689, -75.5174))
        );
    }

    #[test]
    fn test_acceptance_measured_from_last_accepted_not_last_seen() {
        let mut gate = FollowGate::new(Duration::from_millis(1000), 10.0);
        let t0 = Instant::now();
        let origin = PositionSample::new(5.0689, -75.5174);

        // t=0: seed
        assert!(gate.evaluate(origin, t0).is_accepted());

        // t=500ms, +50m: rejected, too soon
        let moved = nudge_50m(origin);
        assert!(matches!(
            gate.evaluate(moved, t0 + Duration::from_millis(500)),
            GateDecision::RejectedTooSoon { .. }
        ));

        // t=1200ms, back at the origin: rejected, no movement
        assert!(matches!(
            gate.evaluate(origin, t0 + Duration::from_millis(1200)),
            GateDecision::RejectedTooClose { .. }
        ));

        // t=1600ms, +50m from the origin: accepted, both thresholds are
        // satisfied measuring from t=0 (the last accepted), not from the
        // rejected samples in between.
        assert!(gate
            .evaluate(moved, t0 + Duration::from_millis(1600))
            .is_accepted());
        assert_eq!(gate.last_accepted(), Some(moved));
    }

    #[test]
    fn test_both_thresholds_must_hold() {
        let mut gate = FollowGate::new(Duration::from_millis(1000), 10.0);
        let t0 = Instant::now();
        let origin = PositionSample::new(0.0, 0.0);
        gate.evaluate(origin, t0);

        // A large jump that arrives too soon is deferred.
        let far = PositionSample::new(1.0, 1.0);
        assert!(!gate
            .evaluate(far, t0 + Duration::from_millis(10))
            .is_accepted());

        // A temporally spaced sample that barely moved does not retrigger.
        let close = PositionSample::new(0.00001, 0.0);
        assert!(!gate
            .evaluate(close, t0 + Duration::from_secs(10))
            .is_accepted());
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        // Distance gate disabled: exactly min_interval elapsed is accepted.
        let mut gate = FollowGate::new(Duration::from_millis(1000), 0.0);
        let t0 = Instant::now();
        gate.evaluate(PositionSample::new(0.0, 0.0), t0);
        assert!(gate
            .evaluate(
                PositionSample::new(0.0, 0.0),
                t0 + Duration::from_millis(1000)
            )
            .is_accepted());

        // Interval gate disabled: movement comfortably past the threshold.
        let mut gate = FollowGate::new(Duration::ZERO, 10.0);
        gate.evaluate(PositionSample::new(0.0, 0.0), t0);
        assert!(gate
            .evaluate(PositionSample::new(0.00045, 0.0), t0)
            .is_accepted());
        assert!(!gate
            .evaluate(PositionSample::new(0.00046, 0.0), t0)
            .is_accepted());
    }

    #[test]
    fn test_rejection_does_not_mutate_gate() {
        let mut gate = FollowGate::new(Duration::from_millis(1000), 10.0);
        let t0 = Instant::now();
        let origin = PositionSample::new(0.0, 0.0);
        gate.evaluate(origin, t0);

        gate.evaluate(nudge_50m(origin), t0 + Duration::from_millis(100));
        assert_eq!(gate.last_accepted(), Some(origin));
    }

    #[test]
    fn test_reset_forgets_state() {
        let mut gate = FollowGate::new(Duration::from_millis(1000), 10.0);
        let t0 = Instant::now();
        gate.evaluate(PositionSample::new(0.0, 0.0), t0);

        gate.reset();
        assert_eq!(gate.last_accepted(), None);

        // Immediately re-accepts, as a fresh first sample.
        assert!(gate
            .evaluate(PositionSample::new(0.0, 0.0), t0 + Duration::from_millis(1))
            .is_accepted());
    }
}
