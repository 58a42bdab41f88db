//! Live-session types produced and consumed by the tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the monitor currently believes about the student.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FocusStatus {
    #[default]
    Idle,
    Focused,
    Distracted,
}

impl FocusStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Focused => "FOCUSED",
            Self::Distracted => "DISTRACTED",
        }
    }
}

/// State of the one active session. Dropped on pause, converted to a
/// [`CompletedSession`] on end.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub start_time: DateTime<Utc>,
    pub last_face_seen_time: DateTime<Utc>,
    pub distraction_count: u32,
    /// None until the first distraction alert of the session.
    pub last_alert_time: Option<DateTime<Utc>>,
    pub status: FocusStatus,
}

impl SessionState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now,
            last_face_seen_time: now,
            distraction_count: 0,
            last_alert_time: None,
            status: FocusStatus::Focused,
        }
    }

    /// Whole seconds since the session started, never negative.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        now.signed_duration_since(self.start_time)
            .num_seconds()
            .max(0) as u64
    }
}

/// Per-tick view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub status: FocusStatus,
    pub elapsed_secs: u64,
    pub distraction_count: u32,
    pub focus_score: u32,
    pub face_detected: bool,
    /// True only on the tick that counted a new distraction event.
    pub alert_raised: bool,
}

impl StatusSnapshot {
    pub fn idle() -> Self {
        Self {
            status: FocusStatus::Idle,
            elapsed_secs: 0,
            distraction_count: 0,
            focus_score: 0,
            face_detected: false,
            alert_raised: false,
        }
    }
}

/// A finished session, awaiting `id`/`date`/`time` from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: u64,
    pub distractions: u32,
    pub focus_score: u32,
}
