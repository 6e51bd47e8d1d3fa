//! Timeline repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::timeline::{NewTimelineEntry, Timeline};
use crate::utils::errors::Result;

#[async_trait]
pub trait TimelineRepository: Send + Sync {
    /// Insert an entry; returns `None` when one with the same name exists
    async fn create(&self, entry: NewTimelineEntry) -> Result<Option<Timeline>>;

    /// All entries, most recently inserted first
    async fn list_recent_first(&self) -> Result<Vec<Timeline>>;
}

#[derive(Clone, Debug)]
pub struct PgTimelineRepository {
    pool: PgPool,
}

impl PgTimelineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimelineRepository for PgTimelineRepository {
    async fn create(&self, entry: NewTimelineEntry) -> Result<Option<Timeline>> {
        let timeline = sqlx::query_as::<_, Timeline>(
            r#"
            INSERT INTO timeline (event_name, detail, event_time)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_name) DO NOTHING
            RETURNING id, event_name, detail, event_time
            "#,
        )
        .bind(entry.event_name)
        .bind(entry.detail)
        .bind(entry.event_time)
        .fetch_optional(&self.pool)
        .await?;

        Ok(timeline)
    }

    async fn list_recent_first(&self) -> Result<Vec<Timeline>> {
        let entries = sqlx::query_as::<_, Timeline>(
            "SELECT id, event_name, detail, event_time FROM timeline ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
