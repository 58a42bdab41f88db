//! Live study-session state machine.
//!
//! ```text
//! IDLE ──start──▶ active (FOCUSED ⇄ DISTRACTED) ──pause──▶ IDLE   (state discarded)
//!                                                ──end────▶ IDLE   (emits CompletedSession)
//! ```
//!
//! # Tick Rules
//!
//! Each tick receives "was a face seen in this frame" plus the wall-clock time:
//!
//! 1. A detected face refreshes `last_face_seen_time`.
//! 2. If the face has been gone longer than `threshold`, the status becomes
//!    DISTRACTED. A distraction event is counted only if no alert has fired yet
//!    or the previous one is older than `cooldown`, so one long absence counts
//!    once per cooldown window rather than once per poll.
//! 3. Otherwise a detected face means FOCUSED.
//! 4. Otherwise (short gap, no face) the status is left alone.
//!
//! `tick` while IDLE fails with [`FocusError::NotActive`].

mod types;

use chrono::{DateTime, Duration, Utc};

use crate::error::{FocusError, Result};
use crate::score::{focus_score, DEFAULT_DISTRACTION_PENALTY};

pub use types::{CompletedSession, FocusStatus, SessionState, StatusSnapshot};

/// Owns the live session, if any. Held by the caller; there is no global instance.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    session: Option<SessionState>,
    penalty: u32,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_DISTRACTION_PENALTY)
    }
}

impl SessionTracker {
    pub fn new(penalty: u32) -> Self {
        Self {
            session: None,
            penalty,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn status(&self) -> FocusStatus {
        self.session
            .as_ref()
            .map_or(FocusStatus::Idle, |session| session.status)
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.session.is_some() {
            return Err(FocusError::AlreadyActive);
        }
        self.session = Some(SessionState::new(now));
        tracing::debug!(start_time = %now, "Session state initialized");
        Ok(())
    }

    pub fn tick(
        &mut self,
        face_detected: bool,
        now: DateTime<Utc>,
        threshold: Duration,
        cooldown: Duration,
    ) -> Result<StatusSnapshot> {
        let penalty = self.penalty;
        let session = self.session.as_mut().ok_or(FocusError::NotActive)?;

        // Out-of-order clocks must not move last_face_seen_time past "now".
        let now = now.max(session.last_face_seen_time);

        if face_detected {
            session.last_face_seen_time = now;
        }

        let elapsed_since_face = now.signed_duration_since(session.last_face_seen_time);
        let mut alert_raised = false;

        if elapsed_since_face > threshold {
            session.status = FocusStatus::Distracted;
            let cooled_down = session
                .last_alert_time
                .map_or(true, |last| now.signed_duration_since(last) > cooldown);
            if cooled_down {
                session.distraction_count += 1;
                session.last_alert_time = Some(now);
                alert_raised = true;
            }
        } else if face_detected {
            session.status = FocusStatus::Focused;
        }

        Ok(StatusSnapshot {
            status: session.status,
            elapsed_secs: session.elapsed_secs(now),
            distraction_count: session.distraction_count,
            focus_score: focus_score(session.distraction_count, penalty),
            face_detected,
            alert_raised,
        })
    }

    /// Read-only view for redraws between ticks.
    pub fn snapshot(&self, now: DateTime<Utc>) -> StatusSnapshot {
        match &self.session {
            Some(session) => StatusSnapshot {
                status: session.status,
                elapsed_secs: session.elapsed_secs(now),
                distraction_count: session.distraction_count,
                focus_score: focus_score(session.distraction_count, self.penalty),
                face_detected: false,
                alert_raised: false,
            },
            None => StatusSnapshot::idle(),
        }
    }

    /// Discards the live session without producing a record.
    pub fn pause(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(FocusError::NotActive)?;
        tracing::debug!(
            distractions = session.distraction_count,
            "Session state discarded"
        );
        Ok(())
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<CompletedSession> {
        let session = self.session.take().ok_or(FocusError::NotActive)?;
        // end_time never precedes start_time, even if the clock stepped back.
        let now = now.max(session.start_time);
        Ok(CompletedSession {
            start_time: session.start_time,
            end_time: now,
            duration: session.elapsed_secs(now),
            distractions: session.distraction_count,
            focus_score: focus_score(session.distraction_count, self.penalty),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(secs)
    }

    fn threshold() -> Duration {
        Duration::seconds(10)
    }

    fn cooldown() -> Duration {
        Duration::seconds(5)
    }

    fn started() -> SessionTracker {
        let mut tracker = SessionTracker::default();
        tracker.start(t0()).unwrap();
        tracker
    }

    #[test]
    fn test_start_sets_focused() {
        let tracker = started();
        assert!(tracker.is_active());
        assert_eq!(tracker.status(), FocusStatus::Focused);
    }

    #[test]
    fn test_start_twice_fails() {
        let mut tracker = started();
        assert!(matches!(
            tracker.start(at(1)),
            Err(FocusError::AlreadyActive)
        ));
        assert_eq!(tracker.session().unwrap().start_time, t0());
    }

    #[test]
    fn test_tick_while_idle_fails() {
        let mut tracker = SessionTracker::default();
        let result = tracker.tick(true, t0(), threshold(), cooldown());
        assert!(matches!(result, Err(FocusError::NotActive)));
    }

    #[test]
    fn test_constant_face_stays_focused() {
        let mut tracker = started();
        for secs in 0..120 {
            let snapshot = tracker.tick(true, at(secs), threshold(), cooldown()).unwrap();
            assert_eq!(snapshot.status, FocusStatus::Focused);
            assert_eq!(snapshot.distraction_count, 0);
            assert_eq!(snapshot.focus_score, 100);
            assert!(!snapshot.alert_raised);
        }
    }

    #[test]
    fn test_short_gap_leaves_status_unchanged() {
        let mut tracker = started();
        tracker.tick(true, at(0), threshold(), cooldown()).unwrap();
        let snapshot = tracker.tick(false, at(10), threshold(), cooldown()).unwrap();
        assert_eq!(snapshot.status, FocusStatus::Focused);
        assert_eq!(snapshot.distraction_count, 0);
    }

    #[test]
    fn test_continuous_absence_counts_once_per_cooldown() {
        let mut tracker = started();
        let mut counts = Vec::new();
        for secs in 0..=25 {
            let snapshot = tracker.tick(false, at(secs), threshold(), cooldown()).unwrap();
            counts.push((secs, snapshot.distraction_count, snapshot.alert_raised));
        }

        // First flagged once the absence exceeds the threshold.
        assert_eq!(counts[10], (10, 0, false));
        assert_eq!(counts[11], (11, 1, true));
        // Cooldown comparison is strict: exactly 5s later is still blocked.
        assert_eq!(counts[16], (16, 1, false));
        assert_eq!(counts[17], (17, 2, true));
        assert_eq!(counts[22], (22, 2, false));
        assert_eq!(counts[23], (23, 3, true));
        assert_eq!(counts[25], (25, 3, false));
        assert_eq!(tracker.status(), FocusStatus::Distracted);
    }

    #[test]
    fn test_gap_over_threshold_counts_exactly_once() {
        let mut tracker = started();
        tracker.tick(true, at(0), threshold(), cooldown()).unwrap();
        let snapshot = tracker.tick(false, at(12), threshold(), cooldown()).unwrap();
        assert_eq!(snapshot.status, FocusStatus::Distracted);
        assert_eq!(snapshot.distraction_count, 1);

        let snapshot = tracker.tick(false, at(14), threshold(), cooldown()).unwrap();
        assert_eq!(snapshot.distraction_count, 1);
    }

    #[test]
    fn test_face_returns_to_focused() {
        let mut tracker = started();
        tracker.tick(false, at(11), threshold(), cooldown()).unwrap();
        assert_eq!(tracker.status(), FocusStatus::Distracted);

        let snapshot = tracker.tick(true, at(12), threshold(), cooldown()).unwrap();
        assert_eq!(snapshot.status, FocusStatus::Focused);
        assert_eq!(snapshot.distraction_count, 1);
        assert_eq!(snapshot.focus_score, 95);
    }

    #[test]
    fn test_new_absence_within_cooldown_is_not_counted() {
        let mut tracker = started();
        tracker.tick(false, at(11), threshold(), cooldown()).unwrap();
        tracker.tick(true, at(12), threshold(), cooldown()).unwrap();
        // A second absence that crosses the threshold right after the first alert
        // is gated by the same cooldown.
        let snapshot = tracker.tick(false, at(13), Duration::zero(), cooldown()).unwrap();
        assert_eq!(snapshot.status, FocusStatus::Distracted);
        assert_eq!(snapshot.distraction_count, 1);
    }

    #[test]
    fn test_score_never_increases_within_session() {
        let mut tracker = started();
        let mut previous = 100;
        for secs in 0..200 {
            let face = secs % 40 > 30;
            let snapshot = tracker.tick(face, at(secs), threshold(), cooldown()).unwrap();
            assert!(snapshot.focus_score <= previous);
            previous = snapshot.focus_score;
        }
    }

    #[test]
    fn test_backwards_clock_does_not_move_last_seen_forward() {
        let mut tracker = started();
        tracker.tick(true, at(20), threshold(), cooldown()).unwrap();
        let snapshot = tracker.tick(true, at(5), threshold(), cooldown()).unwrap();
        assert_eq!(snapshot.status, FocusStatus::Focused);
        assert_eq!(tracker.session().unwrap().last_face_seen_time, at(20));
    }

    #[test]
    fn test_pause_discards_session() {
        let mut tracker = started();
        tracker.tick(false, at(11), threshold(), cooldown()).unwrap();
        tracker.pause().unwrap();
        assert!(!tracker.is_active());
        assert_eq!(tracker.status(), FocusStatus::Idle);

        // A fresh start begins from zero.
        tracker.start(at(30)).unwrap();
        assert_eq!(tracker.session().unwrap().distraction_count, 0);
    }

    #[test]
    fn test_pause_while_idle_fails() {
        let mut tracker = SessionTracker::default();
        assert!(matches!(tracker.pause(), Err(FocusError::NotActive)));
    }

    #[test]
    fn test_end_produces_completed_session() {
        let mut tracker = started();
        for secs in 0..=25 {
            tracker.tick(false, at(secs), threshold(), cooldown()).unwrap();
        }
        let completed = tracker.end(at(1500)).unwrap();
        assert_eq!(completed.start_time, t0());
        assert_eq!(completed.end_time, at(1500));
        assert_eq!(completed.duration, 1500);
        assert_eq!(completed.distractions, 3);
        assert_eq!(completed.focus_score, 85);
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_end_before_start_clamps_to_start() {
        let mut tracker = started();
        let completed = tracker.end(t0() - chrono::Duration::seconds(3)).unwrap();
        assert_eq!(completed.start_time, t0());
        assert_eq!(completed.end_time, t0());
        assert!(completed.end_time >= completed.start_time);
        assert_eq!(completed.duration, 0);
    }

    #[test]
    fn test_end_while_idle_fails() {
        let mut tracker = SessionTracker::default();
        assert!(matches!(tracker.end(t0()), Err(FocusError::NotActive)));
    }

    #[test]
    fn test_custom_penalty_applies() {
        let mut tracker = SessionTracker::new(30);
        tracker.start(t0()).unwrap();
        for secs in 0..=25 {
            tracker.tick(false, at(secs), threshold(), cooldown()).unwrap();
        }
        assert_eq!(tracker.end(at(30)).unwrap().focus_score, 10);
    }

    #[test]
    fn test_snapshot_reflects_idle_and_active() {
        let mut tracker = SessionTracker::default();
        assert_eq!(tracker.snapshot(t0()), StatusSnapshot::idle());

        tracker.start(t0()).unwrap();
        let snapshot = tracker.snapshot(at(65));
        assert_eq!(snapshot.status, FocusStatus::Focused);
        assert_eq!(snapshot.elapsed_secs, 65);
        assert_eq!(snapshot.focus_score, 100);
    }
}
