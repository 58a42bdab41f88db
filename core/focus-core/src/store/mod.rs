//! File-backed session log.
//!
//! One JSON document holds every completed session plus running totals. Every
//! operation re-reads the file, so the store keeps no in-memory copy that could
//! drift from disk.
//!
//! # Failure Policy
//!
//! - A file that exists but doesn't parse, or whose totals disagree with its
//!   sessions, is reported as [`FocusError::StorageCorrupt`]. Nothing is reset
//!   automatically; the caller decides whether to [`SessionStore::clear`].
//! - Writes go to a temp file in the same directory and are renamed over the
//!   log, so a reader never sees a half-written document. A failed write leaves
//!   the previous log intact and returns [`FocusError::StorageWriteFailed`].
//!
//! Single writer only: one session can be active at a time, and there is no
//! file locking.

mod compat;
mod types;

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use fs_err as fs;
use tempfile::NamedTempFile;

use crate::error::{FocusError, Result};
use crate::tracker::CompletedSession;

pub use types::{SessionRecord, Statistics, StoreAggregate};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// Handle to the session log at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Opens the log at `path`, creating it (and its parent directories) if absent.
    /// Safe to call on every startup.
    pub fn initialize(path: &Path) -> Result<Self> {
        let store = SessionStore {
            path: path.to_path_buf(),
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| FocusError::StorageWriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        if !path.exists() {
            store.save(&StoreAggregate::created(Utc::now()))?;
            tracing::info!(path = %path.display(), "Created session log");
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<StoreAggregate> {
        let content = fs::read_to_string(&self.path).map_err(|source| FocusError::Io {
            context: format!("Failed to read session log {}", self.path.display()),
            source,
        })?;

        let aggregate = serde_json::from_str::<StoreAggregate>(&content).map_err(|err| {
            FocusError::StorageCorrupt {
                path: self.path.clone(),
                details: err.to_string(),
            }
        })?;

        if let Some(details) = aggregate.totals_mismatch() {
            return Err(FocusError::StorageCorrupt {
                path: self.path.clone(),
                details,
            });
        }

        Ok(aggregate)
    }

    /// Appends a finished session, stamping it with the current local date and time.
    pub fn append(&self, completed: CompletedSession) -> Result<SessionRecord> {
        self.append_at(completed, Local::now())
    }

    /// Appends a finished session, stamping it with `written_at`.
    pub fn append_at(
        &self,
        completed: CompletedSession,
        written_at: DateTime<Local>,
    ) -> Result<SessionRecord> {
        let mut aggregate = self.load()?;

        let record = SessionRecord {
            id: aggregate.sessions.len() as u64 + 1,
            start_time: completed.start_time,
            end_time: completed.end_time,
            duration: completed.duration,
            distractions: completed.distractions,
            focus_score: completed.focus_score,
            date: written_at.format(DATE_FORMAT).to_string(),
            time: written_at.format(TIME_FORMAT).to_string(),
        };

        aggregate.sessions.push(record.clone());
        aggregate.total_study_time += record.duration;
        aggregate.total_distractions += u64::from(record.distractions);

        self.save(&aggregate)?;

        tracing::info!(
            id = record.id,
            duration = record.duration,
            distractions = record.distractions,
            focus_score = record.focus_score,
            "Session saved"
        );
        Ok(record)
    }

    pub fn all_sessions(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.load()?.sessions)
    }

    /// Sessions written today (local calendar date).
    pub fn today_sessions(&self) -> Result<Vec<SessionRecord>> {
        self.sessions_on(&Local::now().format(DATE_FORMAT).to_string())
    }

    /// Sessions written on `date` (`%Y-%m-%d`).
    pub fn sessions_on(&self, date: &str) -> Result<Vec<SessionRecord>> {
        Ok(self
            .all_sessions()?
            .into_iter()
            .filter(|s| s.date == date)
            .collect())
    }

    pub fn statistics(&self) -> Result<Statistics> {
        Ok(self.load()?.statistics())
    }

    /// Replaces the log with an empty one. Irreversible.
    pub fn clear(&self) -> Result<()> {
        self.save(&StoreAggregate::reset(Utc::now()))?;
        tracing::warn!(path = %self.path.display(), "Session log cleared");
        Ok(())
    }

    fn save(&self, aggregate: &StoreAggregate) -> Result<()> {
        let write_failed = |source: std::io::Error| FocusError::StorageWriteFailed {
            path: self.path.clone(),
            source,
        };

        let content = serde_json::to_string_pretty(aggregate)
            .map_err(|err| write_failed(std::io::Error::other(err)))?;

        let parent_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(write_failed)?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(write_failed)?;
        temp_file.flush().map_err(write_failed)?;
        temp_file
            .persist(&self.path)
            .map_err(|err| write_failed(err.error))?;

        Ok(())
    }
}
