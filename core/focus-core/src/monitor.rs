//! Capture/detection glue around the tracker.
//!
//! The camera and the face model are external. They are reached through two
//! small traits so the polling loop can be driven by a real webcam, a piped
//! detector process, or a scripted source in tests.
//!
//! A source that fails to produce a frame is "no signal this tick": the tick is
//! skipped and the tracker is left untouched.

use chrono::{DateTime, Utc};

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::tracker::{CompletedSession, SessionTracker, StatusSnapshot};

/// Produces one frame per call.
pub trait FrameSource {
    type Frame;

    /// Returns None when no frame is available this tick. Should NOT panic.
    fn capture_frame(&mut self) -> Option<Self::Frame>;

    /// False once the source has permanently closed (device gone, stream ended).
    fn is_open(&self) -> bool {
        true
    }
}

/// Decides whether a frame contains a face.
pub trait FaceDetector<F> {
    fn detect_face(&mut self, frame: &F) -> bool;
}

/// One monitoring session's worth of collaborators plus the tracker they feed.
pub struct Monitor<S, D> {
    source: S,
    detector: D,
    tracker: SessionTracker,
    config: MonitorConfig,
}

impl<S, D> Monitor<S, D>
where
    S: FrameSource,
    D: FaceDetector<S::Frame>,
{
    pub fn new(source: S, detector: D, config: MonitorConfig) -> Self {
        Self {
            source,
            detector,
            tracker: SessionTracker::new(config.distraction_penalty),
            config,
        }
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn source_open(&self) -> bool {
        self.source.is_open()
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.tracker.start(now)?;
        tracing::info!(
            threshold_secs = self.config.distraction_threshold_secs,
            cooldown_secs = self.config.alert_cooldown_secs,
            "Study session started"
        );
        Ok(())
    }

    /// Runs one tick. Returns `Ok(None)` when the source produced no frame.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Result<Option<StatusSnapshot>> {
        let Some(frame) = self.source.capture_frame() else {
            tracing::debug!("No frame captured; skipping tick");
            return Ok(None);
        };

        let face_detected = self.detector.detect_face(&frame);
        let snapshot = self.tracker.tick(
            face_detected,
            now,
            self.config.threshold(),
            self.config.cooldown(),
        )?;

        if snapshot.alert_raised {
            tracing::warn!(
                distractions = snapshot.distraction_count,
                focus_score = snapshot.focus_score,
                "Distraction detected"
            );
        }

        Ok(Some(snapshot))
    }

    /// True once the session has run for the configured maximum duration.
    pub fn max_duration_reached(&self, now: DateTime<Utc>) -> bool {
        match (self.tracker.session(), self.config.max_session_duration()) {
            (Some(session), Some(limit)) => now.signed_duration_since(session.start_time) >= limit,
            _ => false,
        }
    }

    pub fn pause(&mut self) -> Result<()> {
        self.tracker.pause()?;
        tracing::info!("Study session paused; progress discarded");
        Ok(())
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<CompletedSession> {
        let completed = self.tracker.end(now)?;
        tracing::info!(
            duration = completed.duration,
            distractions = completed.distractions,
            focus_score = completed.focus_score,
            "Study session ended"
        );
        Ok(completed)
    }
}
