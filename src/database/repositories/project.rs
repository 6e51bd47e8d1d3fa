//! Project repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use super::map_unique_violation;
use crate::models::project::{Project, SaveProjectRequest};
use crate::utils::errors::{CmsError, Result};

const PROJECT_COLUMNS: &str = "id, identifier, title, description, gitlink, image";

pub(crate) const DUPLICATE_IDENTIFIER: &str = "Project with this Identifier already exists.";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn save(&self, request: SaveProjectRequest) -> Result<Project>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>>;

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Project>>;

    async fn list(&self) -> Result<Vec<Project>>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;
}

#[derive(Clone, Debug)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn save(&self, request: SaveProjectRequest) -> Result<Project> {
        match request.id {
            None => {
                let project = sqlx::query_as::<_, Project>(&format!(
                    r#"
                    INSERT INTO projects (identifier, title, description, gitlink, image)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING {PROJECT_COLUMNS}
                    "#
                ))
                .bind(request.identifier)
                .bind(request.title)
                .bind(request.description)
                .bind(request.gitlink)
                .bind(request.image)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_unique_violation(e, "identifier", DUPLICATE_IDENTIFIER))?;

                Ok(project)
            }
            Some(id) => sqlx::query_as::<_, Project>(&format!(
                r#"
                UPDATE projects
                SET identifier = $1, title = $2, description = $3, gitlink = $4, image = $5
                WHERE id = $6
                RETURNING {PROJECT_COLUMNS}
                "#
            ))
            .bind(request.identifier)
            .bind(request.title)
            .bind(request.description)
            .bind(request.gitlink)
            .bind(request.image)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "identifier", DUPLICATE_IDENTIFIER))?
            .ok_or_else(|| CmsError::not_found("Project", id.to_string())),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE identifier = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list(&self) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
