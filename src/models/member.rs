//! Profile and Alumni models
//!
//! Current members own exactly one [`Profile`]; former members are kept as
//! [`Alumni`]. Both share the [`MemberDetails`] shape, and a profile moves to
//! alumni by copying its details and deleting the profile row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::ValidationErrors;
use crate::utils::helpers::passout_year_choices;
use crate::utils::validation::{self, URL_MAX_LENGTH};

/// Passout year given to records that never set one
pub const DEFAULT_PASSOUT_YEAR: i32 = 2018;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "degree_name", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Degree {
    Btech,
    Mca,
    Mtech,
}

impl Degree {
    pub fn label(&self) -> &'static str {
        match self {
            Degree::Btech => "B.Tech",
            Degree::Mca => "MCA",
            Degree::Mtech => "M.Tech",
        }
    }

    /// Value submitted for this choice
    pub fn choice(&self) -> &'static str {
        match self {
            Degree::Btech => "BTECH",
            Degree::Mca => "MCA",
            Degree::Mtech => "MTECH",
        }
    }

    /// Parse a submitted choice value
    pub fn from_choice(value: &str) -> Option<Self> {
        match value {
            "BTECH" => Some(Degree::Btech),
            "MCA" => Some(Degree::Mca),
            "MTECH" => Some(Degree::Mtech),
            _ => None,
        }
    }
}

/// Fields shared by profiles and alumni
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDetails {
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub degree_name: Degree,
    pub passout_year: i32,
    pub position: Option<String>,
    pub git_link: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub reddit_link: Option<String>,
    pub linkedin_link: Option<String>,
}

impl MemberDetails {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, degree_name: Degree) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            alias: None,
            bio: None,
            image: None,
            email: None,
            phone_number: None,
            degree_name,
            passout_year: DEFAULT_PASSOUT_YEAR,
            position: None,
            git_link: None,
            facebook_link: None,
            twitter_link: None,
            reddit_link: None,
            linkedin_link: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Rules every member record follows; used as-is for alumni
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        errors.check("first_name", validation::required_text(&self.first_name, 255));
        errors.check("last_name", validation::required_text(&self.last_name, 255));
        errors.check("alias", validation::optional_text(self.alias.as_deref(), 64));
        errors.check("bio", validation::optional_text(self.bio.as_deref(), 512));
        errors.check("email", validation::optional_email(self.email.as_deref()));
        errors.check(
            "phone_number",
            validation::optional_phone(self.phone_number.as_deref()),
        );
        errors.check("position", validation::optional_text(self.position.as_deref(), 255));

        for (field, value) in [
            ("git_link", &self.git_link),
            ("facebook_link", &self.facebook_link),
            ("twitter_link", &self.twitter_link),
            ("reddit_link", &self.reddit_link),
            ("linkedin_link", &self.linkedin_link),
        ] {
            errors.check(field, validation::optional_url(value.as_deref(), URL_MAX_LENGTH));
        }

        errors
    }

    /// Profile rules: the shared ones plus a passout year within the
    /// selectable window
    pub fn validate_for_profile(&self, now: DateTime<Utc>) -> ValidationErrors {
        let mut errors = self.validate();
        let years = passout_year_choices(now);
        if !years.contains(&self.passout_year) {
            errors.add(
                "passout_year",
                format!(
                    "Select a valid choice. {} is not one of the available choices.",
                    self.passout_year
                ),
            );
        }
        errors
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub degree_name: Degree,
    pub passout_year: i32,
    pub position: Option<String>,
    pub convert_to_alumni: bool,
    pub git_link: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub reddit_link: Option<String>,
    pub linkedin_link: Option<String>,
}

impl Profile {
    pub fn from_details(id: i64, user_id: i64, details: MemberDetails, convert_to_alumni: bool) -> Self {
        Self {
            id,
            user_id,
            first_name: details.first_name,
            last_name: details.last_name,
            alias: details.alias,
            bio: details.bio,
            image: details.image,
            email: details.email,
            phone_number: details.phone_number,
            degree_name: details.degree_name,
            passout_year: details.passout_year,
            position: details.position,
            convert_to_alumni,
            git_link: details.git_link,
            facebook_link: details.facebook_link,
            twitter_link: details.twitter_link,
            reddit_link: details.reddit_link,
            linkedin_link: details.linkedin_link,
        }
    }

    pub fn details(&self) -> MemberDetails {
        MemberDetails {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            alias: self.alias.clone(),
            bio: self.bio.clone(),
            image: self.image.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            degree_name: self.degree_name,
            passout_year: self.passout_year,
            position: self.position.clone(),
            git_link: self.git_link.clone(),
            facebook_link: self.facebook_link.clone(),
            twitter_link: self.twitter_link.clone(),
            reddit_link: self.reddit_link.clone(),
            linkedin_link: self.linkedin_link.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alumni {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub alias: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub degree_name: Degree,
    pub passout_year: i32,
    pub position: Option<String>,
    pub git_link: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub reddit_link: Option<String>,
    pub linkedin_link: Option<String>,
}

impl Alumni {
    pub fn from_details(id: i64, details: MemberDetails) -> Self {
        Self {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            alias: details.alias,
            bio: details.bio,
            image: details.image,
            email: details.email,
            phone_number: details.phone_number,
            degree_name: details.degree_name,
            passout_year: details.passout_year,
            position: details.position,
            git_link: details.git_link,
            facebook_link: details.facebook_link,
            twitter_link: details.twitter_link,
            reddit_link: details.reddit_link,
            linkedin_link: details.linkedin_link,
        }
    }
}

/// Insert (`id == None`) or full update of a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProfileRequest {
    pub id: Option<i64>,
    pub user_id: i64,
    pub details: MemberDetails,
    pub convert_to_alumni: bool,
}
