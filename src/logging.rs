//! Tracing subscriber setup

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging
///
/// With a log file, JSON lines are appended to it through a non-blocking
/// writer and the returned guard must be held until exit. Without one, or
/// when the file cannot be opened, human-readable logs go to stderr.
pub fn init(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let file = log_file.map(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map(|file| (path, file))
    });

    match file {
        Some(Ok((path, file))) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_target(true)
                        .with_file(false)
                        .with_line_number(false),
                )
                .with(env_filter())
                .init();
            tracing::info!(path = %path.display(), "logging initialized");
            Some(guard)
        }
        Some(Err(e)) => {
            init_stderr();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
            None
        }
        None => {
            init_stderr();
            None
        }
    }
}

fn init_stderr() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(env_filter())
        .init();
}
