//! Profile service
//!
//! Saves member profiles and moves them to alumni. A profile flagged with
//! `convert_to_alumni` never stays a profile: the save copies it into a new
//! alumni row and deletes it in one transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::database::repositories::{AlumniRepository, ProfileRepository};
use crate::models::member::{Alumni, MemberDetails, Profile, SaveProfileRequest};
use crate::storage::uploads::{ALUMNI_IMAGE, MEMBER_IMAGE};
use crate::storage::{store_upload, MediaStore, Upload, UploadRule};
use crate::utils::errors::{CmsError, Result};
use crate::utils::logging::{log_record_action, log_validation_failure};

/// What a profile save ended up doing
#[derive(Debug, Clone)]
pub enum ProfileOutcome {
    Persisted(Profile),
    Migrated(Alumni),
}

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    alumni: Arc<dyn AlumniRepository>,
    media: Arc<dyn MediaStore>,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        alumni: Arc<dyn AlumniRepository>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            profiles,
            alumni,
            media,
        }
    }

    pub async fn find_by_user(&self, user_id: i64) -> Result<Option<Profile>> {
        self.profiles.find_by_user(user_id).await
    }

    /// Validate and persist a profile, migrating it when asked to.
    ///
    /// `image` replaces the stored image; the previous file is removed once
    /// the new one is saved.
    pub async fn save(
        &self,
        request: SaveProfileRequest,
        image: Option<Upload>,
        now: DateTime<Utc>,
    ) -> Result<ProfileOutcome> {
        let SaveProfileRequest {
            id,
            user_id,
            mut details,
            convert_to_alumni,
        } = request;

        let mut errors = details.validate_for_profile(now);
        if let Some(upload) = &image {
            if let Err(upload_errors) = MEMBER_IMAGE.check(upload) {
                errors.merge(upload_errors);
            }
        }
        if !errors.is_empty() {
            log_validation_failure("Profile", &errors);
            return Err(CmsError::Validation(errors));
        }

        let previous_image = details.image.clone();
        let stored = self.store_image(&MEMBER_IMAGE, image.as_ref()).await?;
        if let Some(path) = &stored {
            details.image = Some(path.clone());
        }

        let outcome = if convert_to_alumni {
            self.migrate(id, details).await.map(ProfileOutcome::Migrated)
        } else {
            let persisted = match id {
                None => self.profiles.create(user_id, details).await,
                Some(id) => self.profiles.update(id, details, false).await,
            };
            persisted.map(ProfileOutcome::Persisted)
        };

        match &outcome {
            Ok(ProfileOutcome::Persisted(profile)) => {
                log_record_action("Profile", &profile.id.to_string(), action(id), None);
            }
            Ok(ProfileOutcome::Migrated(alumni)) => {
                log_record_action("Alumni", &alumni.id.to_string(), "migrate", None);
            }
            Err(_) => {}
        }

        match outcome {
            Ok(outcome) => {
                if stored.is_some() {
                    self.discard(previous_image.as_deref()).await;
                }
                Ok(outcome)
            }
            Err(e) => {
                self.discard(stored.as_deref()).await;
                Err(e)
            }
        }
    }

    /// Move a stored profile to alumni
    pub async fn migrate_to_alumni(&self, profile_id: i64) -> Result<Alumni> {
        let profile = self
            .profiles
            .find_by_id(profile_id)
            .await?
            .ok_or_else(|| CmsError::not_found("Profile", profile_id.to_string()))?;

        let alumni = self.migrate(Some(profile.id), profile.details()).await?;
        log_record_action("Alumni", &alumni.id.to_string(), "migrate", None);
        Ok(alumni)
    }

    /// Enter an alumni record directly
    pub async fn create_alumni(&self, mut details: MemberDetails, image: Option<Upload>) -> Result<Alumni> {
        let mut errors = details.validate();
        if let Some(upload) = &image {
            if let Err(upload_errors) = ALUMNI_IMAGE.check(upload) {
                errors.merge(upload_errors);
            }
        }
        if !errors.is_empty() {
            log_validation_failure("Alumni", &errors);
            return Err(CmsError::Validation(errors));
        }

        let stored = self.store_image(&ALUMNI_IMAGE, image.as_ref()).await?;
        if let Some(path) = &stored {
            details.image = Some(path.clone());
        }

        match self.alumni.create(details).await {
            Ok(alumni) => {
                log_record_action("Alumni", &alumni.id.to_string(), "create", None);
                Ok(alumni)
            }
            Err(e) => {
                self.discard(stored.as_deref()).await;
                Err(e)
            }
        }
    }

    pub async fn list_alumni(&self) -> Result<Vec<Alumni>> {
        self.alumni.list().await
    }

    /// Check the details against the alumni rules, then copy and delete.
    /// A profile that was never stored only gains its alumni row.
    async fn migrate(&self, profile_id: Option<i64>, details: MemberDetails) -> Result<Alumni> {
        let errors = details.validate();
        if !errors.is_empty() {
            log_validation_failure("Alumni", &errors);
            return Err(CmsError::Validation(errors));
        }

        let name = details.full_name();
        let alumni = match profile_id {
            Some(id) => self.profiles.migrate_to_alumni(id, details).await?,
            None => self.alumni.create(details).await?,
        };
        info!(
            profile_id = ?profile_id,
            alumni_id = alumni.id,
            name = %name,
            "Profile moved to alumni"
        );
        Ok(alumni)
    }

    async fn store_image(&self, rule: &UploadRule, image: Option<&Upload>) -> Result<Option<String>> {
        match image {
            Some(upload) => Ok(Some(store_upload(self.media.as_ref(), rule, upload).await?)),
            None => Ok(None),
        }
    }

    async fn discard(&self, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = self.media.delete(path).await {
                warn!(path = %path, error = %e, "Failed to remove media file");
            }
        }
    }
}

fn action(id: Option<i64>) -> &'static str {
    if id.is_some() {
        "update"
    } else {
        "create"
    }
}
