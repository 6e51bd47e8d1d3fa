//! Field-level validators shared by all records
//!
//! Each validator returns `Err(message)` with the text shown inline next to
//! the offending field; callers collect them into [`ValidationErrors`].
//!
//! [`ValidationErrors`]: crate::utils::errors::ValidationErrors

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// Default maximum length of URL fields
pub const URL_MAX_LENGTH: usize = 200;

pub const REQUIRED: &str = "This field is required.";

pub type FieldResult = std::result::Result<(), String>;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^\+?[0-9 \-]+$").expect("phone pattern is valid"))
}

pub fn required(value: &str) -> FieldResult {
    if value.trim().is_empty() {
        Err(REQUIRED.to_string())
    } else {
        Ok(())
    }
}

pub fn max_length(value: &str, max: usize) -> FieldResult {
    let len = value.chars().count();
    if len > max {
        Err(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max, len
        ))
    } else {
        Ok(())
    }
}

/// Required text field with a length cap
pub fn required_text(value: &str, max: usize) -> FieldResult {
    required(value)?;
    max_length(value, max)
}

/// Optional text field with a length cap
pub fn optional_text(value: Option<&str>, max: usize) -> FieldResult {
    match value {
        Some(value) => max_length(value, max),
        None => Ok(()),
    }
}

pub fn url(value: &str, max: usize) -> FieldResult {
    max_length(value, max)?;
    match Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => {
            Ok(())
        }
        _ => Err("Enter a valid URL.".to_string()),
    }
}

pub fn optional_url(value: Option<&str>, max: usize) -> FieldResult {
    match value {
        Some(value) => url(value, max),
        None => Ok(()),
    }
}

pub fn email(value: &str) -> FieldResult {
    max_length(value, 254)?;
    if email_regex().is_match(value) {
        Ok(())
    } else {
        Err("Enter a valid email address.".to_string())
    }
}

pub fn optional_email(value: Option<&str>) -> FieldResult {
    match value {
        Some(value) => email(value),
        None => Ok(()),
    }
}

pub fn optional_phone(value: Option<&str>) -> FieldResult {
    match value {
        Some(value) => {
            max_length(value, 14)?;
            if phone_regex().is_match(value) {
                Ok(())
            } else {
                Err("Enter a valid phone number.".to_string())
            }
        }
        None => Ok(()),
    }
}
