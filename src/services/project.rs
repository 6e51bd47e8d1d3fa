//! Project service
//!
//! Keeps project images in step with their records: a replaced image is
//! removed after the save, and deleting a project removes its image first.

use std::sync::Arc;

use tracing::warn;

use crate::database::repositories::ProjectRepository;
use crate::models::project::{Project, SaveProjectRequest};
use crate::storage::uploads::PROJECT_IMAGE;
use crate::storage::{store_upload, MediaStore, Upload};
use crate::utils::errors::{CmsError, Result};
use crate::utils::logging::{log_record_action, log_validation_failure};

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    media: Arc<dyn MediaStore>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { projects, media }
    }

    pub async fn save(&self, mut request: SaveProjectRequest, image: Option<Upload>) -> Result<Project> {
        let mut errors = request.validate();
        if let Some(upload) = &image {
            if let Err(upload_errors) = PROJECT_IMAGE.check(upload) {
                errors.merge(upload_errors);
            }
        }
        if !errors.is_empty() {
            log_validation_failure("Project", &errors);
            return Err(CmsError::Validation(errors));
        }

        let previous = match request.id {
            Some(id) => self
                .projects
                .find_by_id(id)
                .await?
                .ok_or_else(|| CmsError::not_found("Project", id.to_string()))?
                .image,
            None => None,
        };

        let stored = match &image {
            Some(upload) => Some(store_upload(self.media.as_ref(), &PROJECT_IMAGE, upload).await?),
            None => None,
        };
        if let Some(path) = &stored {
            request.image = Some(path.clone());
        }
        let action = if request.id.is_some() { "update" } else { "create" };

        match self.projects.save(request).await {
            Ok(project) => {
                if let Some(old) = previous.filter(|old| project.image.as_ref() != Some(old)) {
                    self.remove_file(&old).await;
                }
                log_record_action("Project", &project.identifier, action, None);
                Ok(project)
            }
            Err(e) => {
                if let Some(path) = stored {
                    self.remove_file(&path).await;
                }
                Err(e)
            }
        }
    }

    /// Delete the project's image, then the project
    pub async fn delete(&self, id: i64) -> Result<()> {
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| CmsError::not_found("Project", id.to_string()))?;

        if let Some(image) = &project.image {
            self.media.delete(image).await?;
        }
        self.projects.delete(id).await?;

        log_record_action("Project", &project.identifier, "delete", None);
        Ok(())
    }

    pub async fn get(&self, identifier: &str) -> Result<Project> {
        self.projects
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| CmsError::not_found("Project", identifier))
    }

    pub async fn list(&self) -> Result<Vec<Project>> {
        self.projects.list().await
    }

    async fn remove_file(&self, path: &str) {
        if let Err(e) = self.media.delete(path).await {
            warn!(path = %path, error = %e, "Failed to remove project image");
        }
    }
}
