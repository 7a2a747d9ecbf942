//! Logging setup for tracker applications.
//!
//! Console dashboards that redraw the terminal need logging fully silenced,
//! while development and debugging want structured stderr output. This module
//! centralizes that choice so binaries only pick a mode.

use tracing_subscriber::EnvFilter;

/// Logging mode for different use cases
#[derive(Debug, Clone, Copy)]
pub enum LoggingMode {
    /// No output - for dashboards that own the terminal
    Silent,
    /// Compact stderr output for development
    Development,
    /// Verbose diagnostics with source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),
}

/// Initialize logging with the specified mode
///
/// Call this early, before the tracker starts producing log output.
///
/// # Environment Variables
///
/// - `MOTOTRACK_LOG_LEVEL`: Override log level (error, warn, info, debug, trace)
/// - `RUST_LOG`: Standard tracing filter, used when the above is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let default_level = match mode {
        // No subscriber installed, all events are dropped
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => "info",
        LoggingMode::Debug => "debug",
    };

    let filter = std::env::var("MOTOTRACK_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match mode {
        LoggingMode::Debug => builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .try_init(),
        _ => builder.with_target(false).compact().try_init(),
    };

    installed.map_err(|e| LoggingError::TracingInit(e.to_string()))
}

/// Initialize logging from environment variables
///
/// Reads `MOTOTRACK_LOG_MODE` to pick the mode:
/// - "development" -> [`LoggingMode::Development`]
/// - "debug" -> [`LoggingMode::Debug`]
/// - anything else -> [`LoggingMode::Silent`]
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("MOTOTRACK_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };

    init_logging(mode)
}
