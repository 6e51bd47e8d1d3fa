//! Profile form flows
//!
//! The create and edit flows for a signed-in member's own profile. Each
//! step ends in a redirect carrying a notice, a form to render, or the
//! field errors of a rejected submission.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::profile::{ProfileOutcome, ProfileService};
use crate::models::member::{Degree, MemberDetails, Profile, SaveProfileRequest};
use crate::models::user::User;
use crate::storage::Upload;
use crate::utils::errors::{CmsError, Result, ValidationErrors};
use crate::utils::helpers::{non_empty, passout_year_choices};
use crate::utils::logging::log_form_flow;
use crate::utils::validation::REQUIRED;

const TEXT_FIELDS: &[&str] = &[
    "alias",
    "bio",
    "email",
    "phone_number",
    "position",
    "git_link",
    "facebook_link",
    "twitter_link",
    "reddit_link",
    "linkedin_link",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message shown to the member after a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Values and choices of a profile form, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct ProfileFormView {
    pub values: Option<Profile>,
    pub degree_choices: Vec<(&'static str, &'static str)>,
    pub passout_year_choices: Vec<i32>,
}

impl ProfileFormView {
    fn new(values: Option<Profile>, now: DateTime<Utc>) -> Self {
        Self {
            values,
            degree_choices: [Degree::Btech, Degree::Mca, Degree::Mtech]
                .iter()
                .map(|d| (d.choice(), d.label()))
                .collect(),
            passout_year_choices: passout_year_choices(now).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FlowOutcome {
    Redirect { to: String, notice: Notice },
    Form(ProfileFormView),
    Invalid(ValidationErrors),
}

/// A submitted profile form, fields as received
#[derive(Debug, Clone, Default)]
pub struct ProfileSubmission {
    pub fields: HashMap<String, String>,
    pub image: Option<Upload>,
}

impl ProfileSubmission {
    fn text(&self, name: &str) -> Option<String> {
        non_empty(self.fields.get(name).cloned())
    }

    /// Parse the submitted fields into member details and the alumni flag.
    ///
    /// `current` supplies the stored image when no new one was sent.
    pub fn parse(&self, current: Option<&Profile>) -> std::result::Result<(MemberDetails, bool), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let first_name = self.text("first_name").unwrap_or_default();
        let last_name = self.text("last_name").unwrap_or_default();

        let degree = match self.text("degree_name") {
            None => {
                errors.add("degree_name", REQUIRED);
                None
            }
            Some(choice) => {
                let degree = Degree::from_choice(&choice);
                if degree.is_none() {
                    errors.add("degree_name", invalid_choice(&choice));
                }
                degree
            }
        };

        let passout_year = match self.text("passout_year") {
            None => {
                errors.add("passout_year", REQUIRED);
                None
            }
            Some(raw) => match raw.parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.add("passout_year", invalid_choice(&raw));
                    None
                }
            },
        };

        let (Some(degree), Some(passout_year)) = (degree, passout_year) else {
            return Err(errors);
        };

        let mut details = MemberDetails::new(first_name, last_name, degree);
        details.passout_year = passout_year;
        details.image = current.and_then(|p| p.image.clone());

        let mut optional: HashMap<&str, Option<String>> = TEXT_FIELDS
            .iter()
            .map(|name| (*name, self.text(name)))
            .collect();
        let mut take = |name: &str| optional.remove(name).flatten();
        details.alias = take("alias");
        details.bio = take("bio");
        details.email = take("email");
        details.phone_number = take("phone_number");
        details.position = take("position");
        details.git_link = take("git_link");
        details.facebook_link = take("facebook_link");
        details.twitter_link = take("twitter_link");
        details.reddit_link = take("reddit_link");
        details.linkedin_link = take("linkedin_link");

        let convert = self
            .text("convert_to_alumni")
            .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "on" | "true" | "1" | "yes"));

        if errors.is_empty() {
            Ok((details, convert))
        } else {
            Err(errors)
        }
    }
}

fn invalid_choice(value: &str) -> String {
    format!("Select a valid choice. {} is not one of the available choices.", value)
}

/// Where the flows send the member afterwards
#[derive(Debug, Clone)]
pub struct FlowPaths {
    pub admin_index: String,
    pub create_profile: String,
}

#[derive(Clone)]
pub struct ProfileFlows {
    profiles: ProfileService,
    paths: FlowPaths,
}

impl ProfileFlows {
    pub fn new(profiles: ProfileService, paths: FlowPaths) -> Self {
        Self { profiles, paths }
    }

    fn to_admin(&self, notice: Notice) -> FlowOutcome {
        FlowOutcome::Redirect {
            to: self.paths.admin_index.clone(),
            notice,
        }
    }

    pub async fn create_form(&self, user: &User, now: DateTime<Utc>) -> Result<FlowOutcome> {
        if self.profiles.find_by_user(user.id).await?.is_some() {
            log_form_flow(&user.username, "create", "already_exists");
            return Ok(self.to_admin(already_exists(user)));
        }
        Ok(FlowOutcome::Form(ProfileFormView::new(None, now)))
    }

    pub async fn create_submit(
        &self,
        user: &User,
        submission: ProfileSubmission,
        now: DateTime<Utc>,
    ) -> Result<FlowOutcome> {
        if self.profiles.find_by_user(user.id).await?.is_some() {
            log_form_flow(&user.username, "create", "already_exists");
            return Ok(self.to_admin(already_exists(user)));
        }

        let (details, convert_to_alumni) = match submission.parse(None) {
            Ok(parsed) => parsed,
            Err(errors) => return Ok(self.invalid(user, "create", errors)),
        };
        let request = SaveProfileRequest {
            id: None,
            user_id: user.id,
            details,
            convert_to_alumni,
        };

        match self.profiles.save(request, submission.image, now).await {
            Ok(outcome) => {
                log_form_flow(&user.username, "create", "saved");
                Ok(self.to_admin(saved_notice(user, &outcome, "created")))
            }
            Err(CmsError::Validation(errors)) => Ok(self.invalid(user, "create", errors)),
            Err(e) => Err(e),
        }
    }

    pub async fn edit_form(&self, user: &User, now: DateTime<Utc>) -> Result<FlowOutcome> {
        match self.profiles.find_by_user(user.id).await? {
            None => Ok(self.to_create(user)),
            Some(profile) => Ok(FlowOutcome::Form(ProfileFormView::new(Some(profile), now))),
        }
    }

    pub async fn edit_submit(
        &self,
        user: &User,
        submission: ProfileSubmission,
        now: DateTime<Utc>,
    ) -> Result<FlowOutcome> {
        let Some(profile) = self.profiles.find_by_user(user.id).await? else {
            return Ok(self.to_create(user));
        };

        let (details, convert_to_alumni) = match submission.parse(Some(&profile)) {
            Ok(parsed) => parsed,
            Err(errors) => return Ok(self.invalid(user, "edit", errors)),
        };
        let request = SaveProfileRequest {
            id: Some(profile.id),
            user_id: user.id,
            details,
            convert_to_alumni,
        };

        match self.profiles.save(request, submission.image, now).await {
            Ok(outcome) => {
                log_form_flow(&user.username, "edit", "saved");
                Ok(self.to_admin(saved_notice(user, &outcome, "updated")))
            }
            Err(CmsError::Validation(errors)) => Ok(self.invalid(user, "edit", errors)),
            Err(e) => Err(e),
        }
    }

    fn to_create(&self, user: &User) -> FlowOutcome {
        log_form_flow(&user.username, "edit", "missing_profile");
        FlowOutcome::Redirect {
            to: self.paths.create_profile.clone(),
            notice: Notice::error(format!(
                "No Profile Exists for {}, create one first.",
                user.username
            )),
        }
    }

    fn invalid(&self, user: &User, flow: &str, errors: ValidationErrors) -> FlowOutcome {
        log_form_flow(&user.username, flow, "invalid");
        FlowOutcome::Invalid(errors)
    }
}

fn already_exists(user: &User) -> Notice {
    Notice::info(format!("A Profile already exists for user {}", user.username))
}

fn saved_notice(user: &User, outcome: &ProfileOutcome, verb: &str) -> Notice {
    match outcome {
        ProfileOutcome::Persisted(_) => Notice::info(format!(
            "{}, your Profile has been successfully {}.",
            user.username, verb
        )),
        ProfileOutcome::Migrated(_) => Notice::info(format!(
            "{}, your Profile has been moved to Alumni.",
            user.username
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::storage::LocalMediaStore;
    use assert_matches::assert_matches;
    use chrono::Datelike;
    use std::sync::Arc;

    struct Fixture {
        store: Arc<MemoryStore>,
        flows: ProfileFlows,
        user: User,
        _media: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let media = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryStore::new());
        let service = ProfileService::new(
            store.clone(),
            store.clone(),
            Arc::new(LocalMediaStore::new(media.path(), "/media/")),
        );
        let flows = ProfileFlows::new(
            service,
            FlowPaths {
                admin_index: "/admin/".to_string(),
                create_profile: "/profile/create/".to_string(),
            },
        );
        let user = store.add_user("grace", true).await;
        Fixture {
            store,
            flows,
            user,
            _media: media,
        }
    }

    fn submission(pairs: &[(&str, &str)]) -> ProfileSubmission {
        ProfileSubmission {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    fn valid_submission() -> ProfileSubmission {
        let year = (Utc::now().year() + 1).to_string();
        let mut s = submission(&[
            ("first_name", "Grace"),
            ("last_name", "Hopper"),
            ("degree_name", "MCA"),
            ("email", "grace@example.org"),
            ("alias", ""),
        ]);
        s.fields.insert("passout_year".to_string(), year);
        s
    }

    #[test]
    fn test_parse_reports_bad_choices() {
        let errors = submission(&[
            ("first_name", "Grace"),
            ("degree_name", "PHD"),
            ("passout_year", "soon"),
        ])
        .parse(None)
        .unwrap_err();

        assert_eq!(
            errors.get("degree_name").unwrap()[0],
            "Select a valid choice. PHD is not one of the available choices."
        );
        assert!(errors.get("passout_year").is_some());
    }

    #[test]
    fn test_parse_blank_optionals_are_none() {
        let (details, convert) = valid_submission().parse(None).unwrap();
        assert_eq!(details.alias, None);
        assert_eq!(details.email.as_deref(), Some("grace@example.org"));
        assert!(!convert);
    }

    #[tokio::test]
    async fn test_create_then_create_again() {
        let f = fixture().await;
        let now = Utc::now();

        let outcome = f.flows.create_form(&f.user, now).await.unwrap();
        assert_matches!(outcome, FlowOutcome::Form(ref view) if view.values.is_none());

        let outcome = f
            .flows
            .create_submit(&f.user, valid_submission(), now)
            .await
            .unwrap();
        assert_matches!(outcome, FlowOutcome::Redirect { ref to, ref notice }
            if to == "/admin/"
                && notice.message == "grace, your Profile has been successfully created.");

        let outcome = f.flows.create_form(&f.user, now).await.unwrap();
        assert_matches!(outcome, FlowOutcome::Redirect { ref notice, .. }
            if notice.level == NoticeLevel::Info
                && notice.message == "A Profile already exists for user grace");
    }

    #[tokio::test]
    async fn test_edit_without_profile_redirects_to_create() {
        let f = fixture().await;
        let outcome = f
            .flows
            .edit_submit(&f.user, valid_submission(), Utc::now())
            .await
            .unwrap();

        assert_matches!(outcome, FlowOutcome::Redirect { ref to, ref notice }
            if to == "/profile/create/"
                && notice.level == NoticeLevel::Error
                && notice.message == "No Profile Exists for grace, create one first.");
    }

    #[tokio::test]
    async fn test_invalid_submission_persists_nothing() {
        let f = fixture().await;
        let mut bad = valid_submission();
        bad.fields.insert("git_link".to_string(), "github".to_string());

        let outcome = f.flows.create_submit(&f.user, bad, Utc::now()).await.unwrap();
        assert_matches!(outcome, FlowOutcome::Invalid(ref errors) if errors.get("git_link").is_some());
        assert!(f.store.tables().await.profiles.is_empty());
    }

    #[tokio::test]
    async fn test_edit_updates_in_place_and_can_convert() {
        let f = fixture().await;
        let now = Utc::now();
        f.flows
            .create_submit(&f.user, valid_submission(), now)
            .await
            .unwrap();

        let mut edit = valid_submission();
        edit.fields.insert("position".to_string(), "Lead".to_string());
        let outcome = f.flows.edit_submit(&f.user, edit, now).await.unwrap();
        assert_matches!(outcome, FlowOutcome::Redirect { ref notice, .. }
            if notice.message == "grace, your Profile has been successfully updated.");
        assert_eq!(
            f.store.tables().await.profiles[0].position.as_deref(),
            Some("Lead")
        );

        let mut convert = valid_submission();
        convert.fields.insert("convert_to_alumni".to_string(), "on".to_string());
        let outcome = f.flows.edit_submit(&f.user, convert, now).await.unwrap();
        assert_matches!(outcome, FlowOutcome::Redirect { ref notice, .. }
            if notice.message.contains("moved to Alumni"));

        let tables = f.store.tables().await;
        assert!(tables.profiles.is_empty());
        assert_eq!(tables.alumni.len(), 1);
        assert_eq!(tables.alumni[0].first_name, "Grace");
    }
}
