//! Event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;
use crate::utils::validation::{self, URL_MAX_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Draft,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Online,
    Workshop,
    Talk,
    Offline,
}

impl EventType {
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Online => "Online",
            EventType::Workshop => "Workshop",
            EventType::Talk => "Talk Show",
            EventType::Offline => "Other Offline",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub identifier: String,
    pub title: String,
    pub event_image: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub venue: Option<String>,
    pub url: Option<String>,
    pub event_timing: Option<DateTime<Utc>>,
    pub facebook_link: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub pub_by: Option<String>,
    pub edited_by: Option<String>,
    pub status: EventStatus,
    pub show: bool,
    pub add_to_timeline: bool,
    pub featured: bool,
    pub upcoming: bool,
    pub bts_description: Option<String>,
    pub bts_image: Option<String>,
    pub bts_video: Option<String>,
    pub bts_uploaded_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Start an update of this event from its stored values
    pub fn to_request(&self) -> SaveEventRequest {
        SaveEventRequest {
            id: Some(self.id),
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            event_image: self.event_image.clone(),
            description: self.description.clone(),
            event_type: self.event_type,
            venue: self.venue.clone(),
            url: self.url.clone(),
            event_timing: self.event_timing,
            facebook_link: self.facebook_link.clone(),
            pub_by: self.pub_by.clone(),
            edited_by: self.edited_by.clone(),
            status: self.status,
            show: self.show,
            add_to_timeline: self.add_to_timeline,
            featured: self.featured,
            upcoming: self.upcoming,
            bts_description: self.bts_description.clone(),
            bts_image: self.bts_image.clone(),
            bts_video: self.bts_video.clone(),
            bts_uploaded_at: self.bts_uploaded_at,
        }
    }
}

/// Insert (`id == None`) or full update of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEventRequest {
    pub id: Option<i64>,
    pub identifier: String,
    pub title: String,
    pub event_image: Option<String>,
    pub description: Option<String>,
    pub event_type: EventType,
    pub venue: Option<String>,
    pub url: Option<String>,
    pub event_timing: Option<DateTime<Utc>>,
    pub facebook_link: Option<String>,
    pub pub_by: Option<String>,
    pub edited_by: Option<String>,
    pub status: EventStatus,
    pub show: bool,
    pub add_to_timeline: bool,
    pub featured: bool,
    pub upcoming: bool,
    pub bts_description: Option<String>,
    pub bts_image: Option<String>,
    pub bts_video: Option<String>,
    pub bts_uploaded_at: Option<DateTime<Utc>>,
}

impl SaveEventRequest {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        event_type: EventType,
        status: EventStatus,
    ) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            title: title.into(),
            event_image: None,
            description: None,
            event_type,
            venue: None,
            url: None,
            event_timing: None,
            facebook_link: None,
            pub_by: None,
            edited_by: None,
            status,
            show: true,
            add_to_timeline: false,
            featured: false,
            upcoming: true,
            bts_description: None,
            bts_image: None,
            bts_video: None,
            bts_uploaded_at: None,
        }
    }

    /// Whether any behind-the-scenes content is attached
    pub fn has_behind_the_scenes(&self) -> bool {
        [&self.bts_description, &self.bts_image, &self.bts_video]
            .iter()
            .any(|field| field.as_deref().is_some_and(|v| !v.is_empty()))
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("identifier", validation::required_text(&self.identifier, 64));
        errors.check("title", validation::required_text(&self.title, 255));
        errors.check("venue", validation::optional_text(self.venue.as_deref(), 255));
        errors.check("url", validation::optional_url(self.url.as_deref(), 255));
        errors.check(
            "facebook_link",
            validation::optional_url(self.facebook_link.as_deref(), URL_MAX_LENGTH),
        );
        errors.check("pub_by", validation::optional_text(self.pub_by.as_deref(), 255));
        errors.check(
            "edited_by",
            validation::optional_text(self.edited_by.as_deref(), 255),
        );
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_enums_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&EventStatus::Draft).unwrap(), "\"DRAFT\"");
        assert_eq!(serde_json::to_string(&EventType::Talk).unwrap(), "\"TALK\"");
        let parsed: EventType = serde_json::from_str("\"ONLINE\"").unwrap();
        assert_eq!(parsed, EventType::Online);
        assert_eq!(EventType::Offline.label(), "Other Offline");
    }

    #[test]
    fn test_has_behind_the_scenes() {
        let mut request =
            SaveEventRequest::new("hacktober", "Hacktoberfest", EventType::Workshop, EventStatus::Final);
        assert!(!request.has_behind_the_scenes());

        request.bts_description = Some(String::new());
        assert!(!request.has_behind_the_scenes());

        request.bts_video = Some("event_bts_videos/a.mp4".to_string());
        assert!(request.has_behind_the_scenes());
    }

    #[test]
    fn test_validate_event_request() {
        let mut request = SaveEventRequest::new("", "Talk", EventType::Talk, EventStatus::Final);
        request.url = Some("zoom meeting".to_string());
        request.identifier = "x".repeat(65);

        let errors = request.validate();
        assert!(errors.get("identifier").is_some());
        assert!(errors.get("url").is_some());
        assert!(errors.get("title").is_none());
    }
}
