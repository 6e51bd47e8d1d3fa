//! Project model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;
use crate::utils::validation::{self, URL_MAX_LENGTH};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub gitlink: Option<String>,
    pub image: Option<String>,
}

/// Insert (`id == None`) or full update of a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProjectRequest {
    pub id: Option<i64>,
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub gitlink: Option<String>,
    pub image: Option<String>,
}

impl SaveProjectRequest {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            identifier: identifier.into(),
            title: title.into(),
            description: None,
            gitlink: None,
            image: None,
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("identifier", validation::required_text(&self.identifier, 64));
        errors.check("title", validation::required_text(&self.title, 512));
        errors.check(
            "gitlink",
            validation::optional_url(self.gitlink.as_deref(), URL_MAX_LENGTH),
        );
        errors
    }
}
