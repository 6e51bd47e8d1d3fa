//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Datelike, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

/// Length of generated special token values
pub const TOKEN_LENGTH: usize = 16;

/// Longest stored file name, so stored paths fit their columns
pub const MAX_FILE_NAME_LENGTH: usize = 100;

/// Generate a random alphanumeric string of the given length
pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a new special token value
pub fn generate_token_value() -> String {
    generate_random_string(TOKEN_LENGTH)
}

/// Short random prefix used to keep stored file names unique
pub fn unique_prefix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Truncate text to at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Reduce an uploaded file name to a safe single path segment
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        // ASCII only at this point; keep the tail so the extension survives
        let start = cleaned.len().saturating_sub(MAX_FILE_NAME_LENGTH);
        cleaned[start..].to_string()
    }
}

/// Years a current member may pick as their passout year
pub fn passout_year_choices(now: DateTime<Utc>) -> std::ops::RangeInclusive<i32> {
    let year = now.year();
    year..=year + 4
}

/// Convert an empty or whitespace-only string to `None`
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_token_value() {
        let token = generate_token_value();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token_value());
    }

    #[test]
    fn test_unique_prefix() {
        let prefix = unique_prefix();
        assert_eq!(prefix.len(), 8);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("привет", 2), "пр");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\My Photo.jpg"), "My_Photo.jpg");
        assert_eq!(sanitize_file_name(".."), "upload");
        assert_eq!(sanitize_file_name(""), "upload");

        let long = format!("{}.png", "a".repeat(300));
        let cleaned = sanitize_file_name(&long);
        assert_eq!(cleaned.len(), MAX_FILE_NAME_LENGTH);
        assert!(cleaned.ends_with(".png"));
    }

    #[test]
    fn test_passout_year_choices() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let years = passout_year_choices(now);
        assert!(years.contains(&2024));
        assert!(years.contains(&2028));
        assert!(!years.contains(&2029));
        assert!(!years.contains(&2023));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" a ".to_string())), Some("a".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
