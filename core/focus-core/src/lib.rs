//! # focus-core
//!
//! Core library for Focus Sentinel, a single-user study-focus monitor.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. The caller drives the polling loop.
//! - **Owned state**: The live session is a [`SessionTracker`] held by the caller, not a global.
//! - **Honest storage**: Read and write failures are surfaced as errors, never papered over
//!   with fabricated data.
//! - **Opaque detection**: Face detection is an external collaborator reached through the
//!   [`FrameSource`] and [`FaceDetector`] traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use focus_core::{MonitorConfig, SessionStore, SessionTracker};
//!
//! let config = MonitorConfig::default();
//! let store = SessionStore::initialize(&path)?;
//! let mut tracker = SessionTracker::new(config.distraction_penalty);
//!
//! tracker.start(Utc::now())?;
//! let snapshot = tracker.tick(true, Utc::now(), config.threshold(), config.cooldown())?;
//! let record = store.append(tracker.end(Utc::now())?)?;
//! ```

pub mod config;
pub mod error;
pub mod monitor;
pub mod score;
pub mod storage;
pub mod store;
pub mod tracker;

// Re-export commonly used items at crate root
pub use config::{load_config, MonitorConfig};
pub use error::{FocusError, Result};
pub use monitor::{FaceDetector, FrameSource, Monitor};
pub use score::{focus_score, rating, DEFAULT_DISTRACTION_PENALTY, PERFECT_SCORE};
pub use storage::StorageConfig;
pub use store::{SessionRecord, SessionStore, Statistics, StoreAggregate};
pub use tracker::{CompletedSession, FocusStatus, SessionState, SessionTracker, StatusSnapshot};
