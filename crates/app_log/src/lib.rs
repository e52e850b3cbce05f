//! Browsera Logging & Observability Module
//!
//! Provides structured logging, log rotation cleanup and crash reports.

mod panic_hook;
mod logging;

pub use panic_hook::{init_panic_hook, crash_report};
pub use logging::{init_logging, cleanup_old_logs, cleanup_logs_in};

use std::path::PathBuf;
use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "Browsera", "Browsera")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize all observability features
///
/// The returned guard flushes the log file when dropped; keep it alive for
/// the whole session.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let guard = init_logging()?;
    init_panic_hook();
    Ok(guard)
}
