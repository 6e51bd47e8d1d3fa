//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::storage::uploads::LARGEST_UPLOAD_BYTES;
use crate::utils::errors::{CmsError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_media_config(&settings.media)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(CmsError::Config("Server port must be greater than 0".to_string()));
    }

    if (config.max_body_bytes as u64) < LARGEST_UPLOAD_BYTES {
        return Err(CmsError::Config(format!(
            "Max body size must be at least {} bytes to accept the largest upload",
            LARGEST_UPLOAD_BYTES
        )));
    }

    if !config.admin_index.starts_with('/') || !config.create_profile_path.starts_with('/') {
        return Err(CmsError::Config(
            "Redirect targets must be absolute paths".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CmsError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(CmsError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CmsError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate media storage configuration
fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    if config.root.is_empty() {
        return Err(CmsError::Config("Media root is required".to_string()));
    }

    if !config.base_url.ends_with('/') {
        return Err(CmsError::Config(
            "Media base URL must end with '/'".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if axum::http::HeaderName::from_bytes(config.user_header.as_bytes()).is_err() {
        return Err(CmsError::Config(format!(
            "Invalid auth user header: {}",
            config.user_header
        )));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CmsError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CmsError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    let valid_rotations = ["daily", "hourly", "never"];
    if !valid_rotations.contains(&config.rotation.as_str()) {
        return Err(CmsError::Config(format!(
            "Invalid log rotation: {}. Valid rotations: {:?}",
            config.rotation, valid_rotations
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_small_body_limit() {
        let mut settings = Settings::default();
        settings.server.max_body_bytes = 2 * 1024 * 1024;
        assert!(matches!(validate_settings(&settings), Err(CmsError::Config(_))));
    }

    #[test]
    fn test_rejects_bad_pool_sizes() {
        let mut settings = Settings::default();
        settings.database.min_connections = 20;
        assert!(validate_settings(&settings).is_err());

        settings.database.min_connections = 0;
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_logging() {
        let mut settings = Settings::default();
        settings.logging.level = "loud".to_string();
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.logging.rotation = "weekly".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_rejects_bad_media_and_auth() {
        let mut settings = Settings::default();
        settings.media.base_url = "/media".to_string();
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.auth.user_header = "bad header".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
