//! Plain content records
//!
//! These carry no derived behavior; the site reads them as they were entered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;
use crate::utils::validation;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarouselImage {
    pub id: i64,
    pub identifier: String,
    pub image: String,
    pub mobile_image: Option<String>,
    pub heading: Option<String>,
    pub sub_heading: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct About {
    pub id: i64,
    pub identifier: String,
    pub heading: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// One magazine edition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Linit {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub year_edition: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinitImage {
    pub id: i64,
    pub linit_id: i64,
    pub image: Option<String>,
}

/// A magazine edition together with its page images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinitEdition {
    pub linit: Linit,
    pub images: Vec<LinitImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TechBytes {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub body: Option<String>,
    pub link: Option<String>,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DevPost {
    pub id: i64,
    pub title: String,
    pub image: Option<String>,
    pub dev_link: String,
    pub body: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// Key/value switch read by the site frontend
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SiteConfig {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub enable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub id: i64,
    pub name: String,
    pub logo: String,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ctf {
    pub id: i64,
    pub name: String,
    pub photo: String,
    pub link: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Faculty advisor
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Facad {
    pub id: i64,
    pub post: String,
    pub first_name: String,
    pub last_name: String,
    pub linkedin_link: Option<String>,
    pub email: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

/// A "Contact Us" submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewContact {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("name", validation::required_text(&self.name, 255));
        errors.check(
            "email",
            validation::required(&self.email).and_then(|_| validation::email(&self.email)),
        );
        errors.check(
            "phone_number",
            validation::optional_phone(self.phone_number.as_deref()),
        );
        errors.check("message", validation::optional_text(self.message.as_deref(), 1024));
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_validation() {
        let ok = NewContact {
            name: "Grace".to_string(),
            email: "grace@example.org".to_string(),
            phone_number: None,
            message: Some("Can we host a talk?".to_string()),
        };
        assert!(ok.validate().is_empty());

        let bad = NewContact {
            name: String::new(),
            email: String::new(),
            phone_number: Some("x".to_string()),
            message: Some("m".repeat(1025)),
        };
        let errors = bad.validate();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["email", "message", "name", "phone_number"]
        );
        assert_eq!(errors.get("email").unwrap()[0], "This field is required.");
    }
}
