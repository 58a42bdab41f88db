//! Monitor configuration loading.
//!
//! Settings live in an optional TOML file. A missing file yields defaults; a
//! file that exists but doesn't parse is an error rather than a silent reset.
//!
//! ```toml
//! distraction_threshold_secs = 10
//! alert_cooldown_secs = 5
//! distraction_penalty = 5
//! poll_interval_ms = 100
//! max_session_duration_secs = 7200
//! data_file = "/home/me/study/sessions.json"
//! ```

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::Deserialize;

use crate::error::{FocusError, Result};
use crate::score::DEFAULT_DISTRACTION_PENALTY;

pub const DEFAULT_DISTRACTION_THRESHOLD_SECS: u64 = 10;
pub const MIN_DISTRACTION_THRESHOLD_SECS: u64 = 5;
pub const MAX_DISTRACTION_THRESHOLD_SECS: u64 = 30;
pub const DEFAULT_ALERT_COOLDOWN_SECS: u64 = 5;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_SESSION_DURATION_SECS: u64 = 7200;

// Upper bound for any seconds value handed to chrono (one year).
const MAX_CONFIG_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds without a face before the session counts as distracted.
    pub distraction_threshold_secs: u64,
    /// Minimum seconds between two counted distraction events.
    pub alert_cooldown_secs: u64,
    /// Points deducted from the focus score per distraction event.
    pub distraction_penalty: u32,
    /// Delay between polling ticks.
    pub poll_interval_ms: u64,
    /// Sessions are ended automatically after this long. 0 disables the limit.
    pub max_session_duration_secs: u64,
    /// Overrides the default session log location.
    pub data_file: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            distraction_threshold_secs: DEFAULT_DISTRACTION_THRESHOLD_SECS,
            alert_cooldown_secs: DEFAULT_ALERT_COOLDOWN_SECS,
            distraction_penalty: DEFAULT_DISTRACTION_PENALTY,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_session_duration_secs: DEFAULT_MAX_SESSION_DURATION_SECS,
            data_file: None,
        }
    }
}

impl MonitorConfig {
    /// Clamps the distraction threshold into its supported range.
    pub fn normalized(mut self) -> Self {
        let clamped = self
            .distraction_threshold_secs
            .clamp(MIN_DISTRACTION_THRESHOLD_SECS, MAX_DISTRACTION_THRESHOLD_SECS);
        if clamped != self.distraction_threshold_secs {
            tracing::warn!(
                configured = self.distraction_threshold_secs,
                clamped,
                "Distraction threshold out of range; clamping"
            );
            self.distraction_threshold_secs = clamped;
        }
        self
    }

    pub fn threshold(&self) -> Duration {
        secs_to_duration(self.distraction_threshold_secs)
    }

    pub fn cooldown(&self) -> Duration {
        secs_to_duration(self.alert_cooldown_secs)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_session_duration(&self) -> Option<Duration> {
        match self.max_session_duration_secs {
            0 => None,
            secs => Some(secs_to_duration(secs)),
        }
    }
}

fn secs_to_duration(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_CONFIG_SECS) as i64)
}

/// Loads the monitor configuration from `path`, returning defaults if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<MonitorConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file; using defaults");
        return Ok(MonitorConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(|source| FocusError::Io {
        context: format!("Failed to read config {}", path.display()),
        source,
    })?;

    let config = toml::from_str::<MonitorConfig>(&content).map_err(|err| {
        FocusError::ConfigMalformed {
            path: path.to_path_buf(),
            details: err.to_string(),
        }
    })?;

    Ok(config.normalized())
}
