//! Timeline model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length of a timeline entry name
pub const EVENT_NAME_MAX_LENGTH: usize = 120;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Timeline {
    pub id: i64,
    pub event_name: String,
    pub detail: Option<String>,
    pub event_time: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimelineEntry {
    pub event_name: String,
    pub detail: Option<String>,
    pub event_time: NaiveDate,
}
