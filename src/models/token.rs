//! Special token model
//!
//! Tokens gate "members only" features: each one may be used a limited
//! number of times before a deadline.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;
use crate::utils::validation;

/// How long a token stays valid when no deadline is given
pub const DEFAULT_VALIDITY_HOURS: i64 = 6;

/// Largest usage count the `used` counter can reach
pub const MAX_USAGE_LIMIT: i32 = i16::MAX as i32;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SpecialToken {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub used: i16,
    pub max_usage: i32,
    pub valid_till: DateTime<Utc>,
}

impl SpecialToken {
    /// A token is valid while it has uses left and its deadline has not passed
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        i32::from(self.used) < self.max_usage && now < self.valid_till
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSpecialToken {
    pub name: String,
    /// Generated when absent
    pub value: Option<String>,
    pub max_usage: i32,
    pub valid_till: DateTime<Utc>,
}

impl NewSpecialToken {
    /// Single-use token valid for the default window
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            value: None,
            max_usage: 1,
            valid_till: default_valid_till(now),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("name", validation::required_text(&self.name, 255));
        if let Some(value) = &self.value {
            errors.check("value", validation::max_length(value, 16));
        }
        if self.max_usage < 0 {
            errors.add("max_usage", "Ensure this value is greater than or equal to 0.");
        } else if self.max_usage > MAX_USAGE_LIMIT {
            errors.add(
                "max_usage",
                format!("Ensure this value is less than or equal to {}.", MAX_USAGE_LIMIT),
            );
        }
        errors
    }
}

pub fn default_valid_till(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(DEFAULT_VALIDITY_HOURS)
}
