//! Error types for focus-core operations.

use std::path::PathBuf;

/// All errors that can occur in focus-core operations.
///
/// State-machine errors (`AlreadyActive`, `NotActive`) are caller bugs and are
/// never retried. Storage errors carry the path so the caller can decide
/// whether to reset the log or abort.
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    // ─────────────────────────────────────────────────────────────────────
    // Session State Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("A study session is already active")]
    AlreadyActive,

    #[error("No study session is active")]
    NotActive,

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session log is corrupt: {path}: {details}")]
    StorageCorrupt { path: PathBuf, details: String },

    #[error("Session log write failed: {path}: {source}")]
    StorageWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Home directory not found")]
    HomeDirNotFound,
}

/// Convenience type alias for Results using FocusError.
pub type Result<T> = std::result::Result<T, FocusError>;

// Conversion for string error compatibility
impl From<FocusError> for String {
    fn from(err: FocusError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_error_mentions_path() {
        let err = FocusError::StorageCorrupt {
            path: PathBuf::from("/tmp/sessions.json"),
            details: "expected value".to_string(),
        };
        let message = String::from(err);
        assert!(message.contains("/tmp/sessions.json"));
        assert!(message.contains("expected value"));
    }
}
