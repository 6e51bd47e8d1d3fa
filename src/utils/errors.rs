//! Error handling for ClubPortal
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Main error type for ClubPortal application
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Media storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for ClubPortal operations
pub type Result<T> = std::result::Result<T, CmsError>;

impl CmsError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        CmsError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            CmsError::Database(_) => false,
            CmsError::Migration(_) => false,
            CmsError::Config(_) => false,
            CmsError::Validation(_) => true,
            CmsError::NotFound { .. } => false,
            CmsError::PermissionDenied(_) => false,
            CmsError::Authentication(_) => false,
            CmsError::Storage(_) => true,
            CmsError::Serialization(_) => false,
            CmsError::Io(_) => true,
            CmsError::UrlParse(_) => false,
            CmsError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CmsError::Database(_) => ErrorSeverity::Critical,
            CmsError::Migration(_) => ErrorSeverity::Critical,
            CmsError::Config(_) => ErrorSeverity::Critical,
            CmsError::PermissionDenied(_) => ErrorSeverity::Warning,
            CmsError::Authentication(_) => ErrorSeverity::Warning,
            CmsError::Validation(_) => ErrorSeverity::Info,
            CmsError::NotFound { .. } => ErrorSeverity::Info,
            CmsError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl From<ValidationErrors> for CmsError {
    fn from(errors: ValidationErrors) -> Self {
        CmsError::Validation(errors)
    }
}

/// Per-field validation messages, rendered inline to the submitting actor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set holding a single message for `field`
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Record the outcome of a single-field check
    pub fn check(&mut self, field: &str, outcome: std::result::Result<(), String>) {
        if let Err(message) = outcome {
            self.add(field, message);
        }
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.fields {
            self.fields.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Turn the collected messages into a `Result`
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CmsError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("email", "Enter a valid email address.");
        errors.check("first_name", Err("This field is required.".to_string()));
        errors.check("last_name", Ok(()));

        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "first_name"]);
        assert_eq!(
            errors.get("first_name"),
            Some(&["This field is required.".to_string()][..])
        );
        assert!(errors.get("last_name").is_none());
    }

    #[test]
    fn test_validation_errors_display_and_json() {
        let mut errors = ValidationErrors::single("image", "too big");
        errors.add("image", "wrong type");

        assert_eq!(errors.to_string(), "image: too big; image: wrong type");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"image": ["too big", "wrong type"]}));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let err = ValidationErrors::single("name", "missing").into_result().unwrap_err();
        assert!(matches!(err, CmsError::Validation(_)));
        assert_eq!(err.severity(), ErrorSeverity::Info);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(CmsError::Config("x".into()).severity(), ErrorSeverity::Critical);
        assert_eq!(
            CmsError::Authentication("x".into()).severity(),
            ErrorSeverity::Warning
        );
        assert_eq!(CmsError::Storage("x".into()).severity(), ErrorSeverity::Error);
        assert_eq!(CmsError::not_found("Event", "x").to_string(), "Event not found: x");
    }
}
