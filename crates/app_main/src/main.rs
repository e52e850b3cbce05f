//! Browsera - remote media tree browser
//!
//! Main entry point for the terminal client.

mod app;
mod view;

use anyhow::Result;

fn main() -> Result<()> {
    // Initialize logging and panic hook first
    let _log_guard = app_log::init()?;

    tracing::info!("Browsera starting...");

    // Load configuration
    let config = match app_core::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load configuration: {}. Using defaults.", e);
            eprintln!("warning: {} (using defaults)", e);
            app_core::AppConfig::default()
        }
    };

    // First run: leave an editable copy of the defaults behind
    if let Err(e) = app_core::AppConfig::write_defaults_if_missing(&app_core::AppConfig::config_path()) {
        tracing::warn!("Failed to write default configuration: {}", e);
    }

    if let Err(e) = app_log::cleanup_old_logs(config.general.log_retention_days) {
        tracing::warn!("Failed to cleanup old logs: {}", e);
    }

    // One thread: user input and fetch completions interleave cooperatively
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(app::run(config))
}
