//! Camera-follow state machine over session snapshots.

use std::time::Instant;

use tokio::sync::watch;

use track_session::SessionSnapshot;
use track_transport::PositionSample;

use crate::camera::CameraSurface;
use crate::config::FollowConfig;
use crate::error::FollowResult;
use crate::gate::FollowGate;

/// Where the follower is in the life of one tracking session.
///
/// Transport failures are the connection manager's concern; there is no
/// failed phase here, the follower simply stops receiving updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowPhase {
    /// No tracking session is active.
    Idle,
    /// Tracking started, no position has arrived yet.
    AwaitingFirstSample,
    /// A gate is established and each new sample is being evaluated.
    Following,
}

/// Throttled consumer that turns significant position updates into camera
/// flights.
pub struct PositionFollower<C: CameraSurface> {
    camera: C,
    config: FollowConfig,
    gate: FollowGate,
    phase: FollowPhase,
}

impl<C: CameraSurface> PositionFollower<C> {
    /// Create a follower with default thresholds.
    pub fn new(camera: C) -> Self {
        // Default config always validates
        Self::with_config(camera, FollowConfig::default())
            .unwrap_or_else(|_| unreachable!("default config is valid"))
    }

    /// Create a follower with custom thresholds.
    pub fn with_config(camera: C, config: FollowConfig) -> FollowResult<Self> {
        config.validate()?;
        let gate = FollowGate::new(config.min_interval, config.min_distance_m);
        Ok(Self {
            camera,
            config,
            gate,
            phase: FollowPhase::Idle,
        })
    }

    /// Current phase of the follower.
    pub fn phase(&self) -> FollowPhase {
        self.phase
    }

    /// Apply a session snapshot observed now.
    pub fn apply(&mut self, snapshot: SessionSnapshot) {
        self.apply_at(snapshot, Instant::now())
    }

    /// Apply a session snapshot observed at `now`.
    pub fn apply_at(&mut self, snapshot: SessionSnapshot, now: Instant) {
        if !snapshot.is_tracking {
            if self.phase != FollowPhase::Idle {
                tracing::debug!("tracking stopped, follower going idle");
            }
            // Any in-flight camera animation is left to finish; the
            // follower just stops issuing new ones.
            self.phase = FollowPhase::Idle;
            self.gate.reset();
            return;
        }

        match snapshot.position {
            None => {
                if self.phase == FollowPhase::Idle {
                    tracing::debug!("tracking started, awaiting first sample");
                }
                self.gate.reset();
                self.phase = FollowPhase::AwaitingFirstSample;
            }
            Some(sample) => {
                if self.phase == FollowPhase::Idle {
                    // The start snapshot was coalesced away; treat this as
                    // the first sample of a fresh session.
                    self.gate.reset();
                    self.phase = FollowPhase::AwaitingFirstSample;
                }
                self.observe_at(sample, now);
            }
        }
    }

    /// Evaluate one candidate sample observed at `now`.
    pub fn observe_at(&mut self, sample: PositionSample, now: Instant) {
        if self.phase == FollowPhase::Idle {
            return;
        }

        let decision = self.gate.evaluate(sample, now);
        if decision.is_accepted() {
            tracing::debug!(%sample, "camera following accepted position");
            self.camera.fly_to(sample, &self.config.flight);
            self.phase = FollowPhase::Following;
        } else {
            tracing::trace!(%sample, ?decision, "position below follow thresholds");
        }
    }

    /// Drive the follower from a session snapshot channel until the session
    /// side goes away.
    pub async fn run(mut self, mut snapshots: watch::Receiver<SessionSnapshot>) {
        let current = *snapshots.borrow_and_update();
        self.apply(current);

        while snapshots.changed().await.is_ok() {
            let snapshot = *snapshots.borrow_and_update();
            self.apply(snapshot);
        }
        tracing::debug!("session channel closed, follower exiting");
    }
}

impl<C: CameraSurface> std::fmt::Debug for PositionFollower<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionFollower")
            .field("phase", &self.phase)
            .field("gate", &self.gate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::RecordingCamera;
    use std::time::Duration;

    fn tracking(position: Option<PositionSample>) -> SessionSnapshot {
        SessionSnapshot {
            is_tracking: true,
            position,
        }
    }

    #[test]
    fn test_phase_transitions_over_a_session() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());
        let t0 = Instant::now();

        assert_eq!(follower.phase(), FollowPhase::Idle);

        follower.apply_at(tracking(None), t0);
        assert_eq!(follower.phase(), FollowPhase::AwaitingFirstSample);

        follower.apply_at(tracking(Some(PositionSample::new(5.0, -75.0))), t0);
        assert_eq!(follower.phase(), FollowPhase::Following);
        assert_eq!(camera.flight_count(), 1);

        follower.apply_at(SessionSnapshot::default(), t0);
        assert_eq!(follower.phase(), FollowPhase::Idle);
    }

    #[test]
    fn test_first_sample_always_flies() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());
        let t0 = Instant::now();

        follower.apply_at(tracking(None), t0);
        follower.apply_at(tracking(Some(PositionSample::new(1.0, 2.0))), t0);

        assert_eq!(camera.targets(), vec![PositionSample::new(1.0, 2.0)]);
    }

    #[test]
    fn test_gated_samples_do_not_fly() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());
        let t0 = Instant::now();
        let origin = PositionSample::new(0.0, 0.0);

        follower.apply_at(tracking(None), t0);
        follower.apply_at(tracking(Some(origin)), t0);

        // Too soon, and then too close
        let moved = PositionSample::new(0.00045, 0.0);
        follower.apply_at(
            tracking(Some(moved)),
            t0 + Duration::from_millis(100),
        );
        follower.apply_at(tracking(Some(origin)), t0 + Duration::from_secs(5));
        assert_eq!(camera.flight_count(), 1);

        // Far enough and late enough
        follower.apply_at(tracking(Some(moved)), t0 + Duration::from_secs(10));
        assert_eq!(camera.flight_count(), 2);
        assert_eq!(follower.phase(), FollowPhase::Following);
    }

    #[test]
    fn test_stop_resets_gate_for_next_session() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());
        let t0 = Instant::now();
        let origin = PositionSample::new(0.0, 0.0);

        follower.apply_at(tracking(None), t0);
        follower.apply_at(tracking(Some(origin)), t0);
        follower.apply_at(SessionSnapshot::default(), t0);

        // Same coordinate immediately after restart still flies: the gate
        // was reset with the session.
        follower.apply_at(tracking(None), t0 + Duration::from_millis(1));
        follower.apply_at(tracking(Some(origin)), t0 + Duration::from_millis(2));
        assert_eq!(camera.flight_count(), 2);
    }

    #[test]
    fn test_samples_while_idle_are_ignored() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());

        follower.observe_at(PositionSample::new(1.0, 1.0), Instant::now());
        assert_eq!(camera.flight_count(), 0);
        assert_eq!(follower.phase(), FollowPhase::Idle);
    }

    #[test]
    fn test_coalesced_start_is_treated_as_fresh_session() {
        let camera = RecordingCamera::new();
        let mut follower = PositionFollower::new(camera.clone());
        let t0 = Instant::now();

        // The watch channel skipped straight from idle to a positioned
        // snapshot; the follower must still seed a fresh gate.
        follower.apply_at(tracking(Some(PositionSample::new(1.0, 1.0))), t0);
        assert_eq!(follower.phase(), FollowPhase::Following);
        assert_eq!(camera.flight_count(), 1);
    }
}
