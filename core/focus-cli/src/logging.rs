//! Logging setup for focus-cli.
//!
//! Full logs go to a daily-rolling file under the data root's `logs/`
//! directory; warnings and errors are echoed to stderr. `RUST_LOG` overrides the
//! filter, and `FOCUS_SENTINEL_DEBUG_LOG=1` forces debug level.

use std::env;
use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "focus-cli.log";

fn debug_enabled() -> bool {
    env::var("FOCUS_SENTINEL_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}

fn file_filter() -> EnvFilter {
    if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

fn stderr_layer<S>() -> impl Layer<S> + Send + Sync + 'static
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN)
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process so buffered file logs are flushed.
pub fn init(logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let Some(logs_dir) = logs_dir else {
        tracing_subscriber::registry().with(stderr_layer()).init();
        return None;
    };

    if let Err(err) = fs_err::create_dir_all(logs_dir) {
        tracing_subscriber::registry().with(stderr_layer()).init();
        tracing::warn!(error = %err, "Log directory unavailable; logging to stderr only");
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(file_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer())
        .init();

    Some(guard)
}
