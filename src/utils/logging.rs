//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ClubPortal application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::{CmsError, Result, ValidationErrors};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = match config.rotation.as_str() {
        "hourly" => rolling::hourly(&config.directory, &config.file_prefix),
        "never" => rolling::never(&config.directory, &config.file_prefix),
        _ => rolling::daily(&config.directory, &config.file_prefix),
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| CmsError::Config(format!("Invalid log filter {}: {}", config.level, e)))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .try_init()
        .map_err(|e| CmsError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log record store writes with structured data
pub fn log_record_action(entity: &str, key: &str, action: &str, details: Option<&str>) {
    info!(
        entity = entity,
        key = key,
        action = action,
        details = details,
        "Record action performed"
    );
}

/// Log the outcome of a profile form flow
pub fn log_form_flow(username: &str, flow: &str, outcome: &str) {
    info!(
        username = username,
        flow = flow,
        outcome = outcome,
        "Form flow completed"
    );
}

/// Log a rejected write
pub fn log_validation_failure(entity: &str, errors: &ValidationErrors) {
    let fields = errors.fields().collect::<Vec<_>>().join(",");
    warn!(entity = entity, fields = %fields, "Validation failed, write aborted");
}

/// Log media storage operations
pub fn log_media_operation(operation: &str, path: &str, success: bool) {
    if success {
        debug!(operation = operation, path = path, "Media operation completed");
    } else {
        error!(operation = operation, path = path, "Media operation failed");
    }
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
