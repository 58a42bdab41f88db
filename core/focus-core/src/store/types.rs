//! Serialized session-log types.
//!
//! On-disk format (pretty-printed JSON):
//!
//! ```json
//! {
//!   "sessions": [
//!     { "id": 1, "start_time": "...", "end_time": "...", "duration": 1500,
//!       "distractions": 3, "focus_score": 85, "date": "2024-03-01", "time": "09:25:00" }
//!   ],
//!   "total_study_time": 1500,
//!   "total_distractions": 3,
//!   "created_at": "..."
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::compat;
use crate::tracker::CompletedSession;

/// A completed session as written to the log. Never mutated after append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: u64,
    #[serde(deserialize_with = "compat::timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "compat::timestamp")]
    pub end_time: DateTime<Utc>,
    pub duration: u64,
    pub distractions: u32,
    /// Older logs may hold a float here; it is rounded on read.
    #[serde(deserialize_with = "compat::focus_score")]
    pub focus_score: u32,
    /// Local date the record was written (`%Y-%m-%d`).
    pub date: String,
    /// Local time of day the record was written (`%H:%M:%S`).
    pub time: String,
}

impl SessionRecord {
    /// The fields the tracker produced, without the store-assigned ones.
    pub fn completed(&self) -> CompletedSession {
        CompletedSession {
            start_time: self.start_time,
            end_time: self.end_time,
            duration: self.duration,
            distractions: self.distractions,
            focus_score: self.focus_score,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreAggregate {
    pub sessions: Vec<SessionRecord>,
    pub total_study_time: u64,
    pub total_distractions: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::optional_timestamp"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "compat::optional_timestamp"
    )]
    pub reset_at: Option<DateTime<Utc>>,
}

impl StoreAggregate {
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: Some(now),
            ..Self::empty()
        }
    }

    pub fn reset(now: DateTime<Utc>) -> Self {
        Self {
            reset_at: Some(now),
            ..Self::empty()
        }
    }

    fn empty() -> Self {
        Self {
            sessions: Vec::new(),
            total_study_time: 0,
            total_distractions: 0,
            created_at: None,
            reset_at: None,
        }
    }

    /// Describes how the running sums disagree with the session list, if they do.
    pub fn totals_mismatch(&self) -> Option<String> {
        let study_time: u64 = self.sessions.iter().map(|s| s.duration).sum();
        let distractions: u64 = self.sessions.iter().map(|s| u64::from(s.distractions)).sum();

        if study_time != self.total_study_time {
            return Some(format!(
                "total_study_time is {} but sessions sum to {}",
                self.total_study_time, study_time
            ));
        }
        if distractions != self.total_distractions {
            return Some(format!(
                "total_distractions is {} but sessions sum to {}",
                self.total_distractions, distractions
            ));
        }
        None
    }

    pub fn statistics(&self) -> Statistics {
        let total_sessions = self.sessions.len() as u64;
        if total_sessions == 0 {
            return Statistics::default();
        }

        let score_sum: u64 = self.sessions.iter().map(|s| u64::from(s.focus_score)).sum();
        Statistics {
            total_sessions,
            total_study_time: self.total_study_time,
            total_distractions: self.total_distractions,
            avg_session_duration: self.total_study_time as f64 / total_sessions as f64,
            avg_focus_score: score_sum as f64 / total_sessions as f64,
        }
    }
}

/// Aggregate view over the whole log. All zero when the log is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_sessions: u64,
    pub total_study_time: u64,
    pub total_distractions: u64,
    pub avg_session_duration: f64,
    pub avg_focus_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u64, duration: u64, distractions: u32, focus_score: u32) -> SessionRecord {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        SessionRecord {
            id,
            start_time: start,
            end_time: start + chrono::Duration::seconds(duration as i64),
            duration,
            distractions,
            focus_score,
            date: "2024-03-01".to_string(),
            time: "09:00:00".to_string(),
        }
    }

    #[test]
    fn test_empty_statistics_are_zero() {
        let aggregate = StoreAggregate::created(Utc::now());
        assert_eq!(aggregate.statistics(), Statistics::default());
        assert!(aggregate.totals_mismatch().is_none());
    }

    #[test]
    fn test_statistics_averages() {
        let aggregate = StoreAggregate {
            sessions: vec![record(1, 600, 2, 90), record(2, 1200, 0, 100)],
            total_study_time: 1800,
            total_distractions: 2,
            created_at: None,
            reset_at: None,
        };
        let stats = aggregate.statistics();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_study_time, 1800);
        assert_eq!(stats.total_distractions, 2);
        assert_eq!(stats.avg_session_duration, 900.0);
        assert_eq!(stats.avg_focus_score, 95.0);
    }

    #[test]
    fn test_totals_mismatch_detected() {
        let aggregate = StoreAggregate {
            sessions: vec![record(1, 600, 2, 90)],
            total_study_time: 601,
            total_distractions: 2,
            created_at: None,
            reset_at: None,
        };
        assert!(aggregate
            .totals_mismatch()
            .unwrap()
            .contains("total_study_time"));
    }

    #[test]
    fn test_optional_timestamps_omitted_when_absent() {
        let json = serde_json::to_string(&StoreAggregate::reset(Utc::now())).unwrap();
        assert!(json.contains("reset_at"));
        assert!(!json.contains("created_at"));
    }
}
