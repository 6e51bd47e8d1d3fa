//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub media: MediaConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for request bodies, must fit the largest upload cap
    pub max_body_bytes: usize,
    /// Where the profile flows redirect after success
    pub admin_index: String,
    /// Where the edit flow sends actors without a profile
    pub create_profile_path: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Media storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    pub root: String,
    pub base_url: String,
}

/// Authentication handoff from the fronting platform
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Request header carrying the authenticated username
    pub user_header: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_prefix: String,
    /// One of `daily`, `hourly`, `never`
    pub rotation: String,
}

impl Settings {
    /// Load settings from defaults, configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("CLUBPORTAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CmsError> {
        super::validation::validate_settings(self)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                max_body_bytes: 110 * 1024 * 1024,
                admin_index: "/admin/".to_string(),
                create_profile_path: "/profile/create/".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/clubportal".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            media: MediaConfig {
                root: "./media".to_string(),
                base_url: "/media/".to_string(),
            },
            auth: AuthConfig {
                user_header: "x-remote-user".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "./logs".to_string(),
                file_prefix: "clubportal.log".to_string(),
                rotation: "daily".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    #[serial]
    fn test_environment_overrides_defaults() {
        std::env::set_var("CLUBPORTAL_SERVER__PORT", "9100");
        std::env::set_var("CLUBPORTAL_MEDIA__BASE_URL", "https://cdn.example.org/media/");

        let settings = Settings::new().expect("settings load");

        std::env::remove_var("CLUBPORTAL_SERVER__PORT");
        std::env::remove_var("CLUBPORTAL_MEDIA__BASE_URL");

        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.media.base_url, "https://cdn.example.org/media/");
        assert_eq!(settings.database.max_connections, 10);
    }
}
