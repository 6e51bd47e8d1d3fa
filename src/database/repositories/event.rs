//! Event repository implementation

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use super::map_unique_violation;
use crate::models::event::{Event, SaveEventRequest};
use crate::models::timeline::NewTimelineEntry;
use crate::utils::errors::{CmsError, Result};
use crate::utils::logging::log_database_operation;

const EVENT_COLUMNS: &str = "id, identifier, title, event_image, description, event_type, venue, url, \
     event_timing, facebook_link, pub_date, pub_by, edited_by, status, show, add_to_timeline, \
     featured, upcoming, bts_description, bts_image, bts_video, bts_uploaded_at";

pub(crate) const DUPLICATE_IDENTIFIER: &str = "Event with this Identifier already exists.";

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist an event and, in the same transaction, its timeline entry
    /// unless one with the same name exists
    async fn save(
        &self,
        request: SaveEventRequest,
        timeline: Option<NewTimelineEntry>,
    ) -> Result<Event>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Event>>;

    async fn list(&self) -> Result<Vec<Event>>;

    async fn count(&self) -> Result<i64>;
}

#[derive(Clone, Debug)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Bind the writable fields as `$1..$20`
fn bind_fields(
    query: QueryAs<'_, Postgres, Event, PgArguments>,
    request: SaveEventRequest,
) -> QueryAs<'_, Postgres, Event, PgArguments> {
    query
        .bind(request.identifier)
        .bind(request.title)
        .bind(request.event_image)
        .bind(request.description)
        .bind(request.event_type)
        .bind(request.venue)
        .bind(request.url)
        .bind(request.event_timing)
        .bind(request.facebook_link)
        .bind(request.pub_by)
        .bind(request.edited_by)
        .bind(request.status)
        .bind(request.show)
        .bind(request.add_to_timeline)
        .bind(request.featured)
        .bind(request.upcoming)
        .bind(request.bts_description)
        .bind(request.bts_image)
        .bind(request.bts_video)
        .bind(request.bts_uploaded_at)
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn save(
        &self,
        request: SaveEventRequest,
        timeline: Option<NewTimelineEntry>,
    ) -> Result<Event> {
        let started = Instant::now();
        let mut tx = self.pool.begin().await?;

        let event = match request.id {
            None => {
                let sql = format!(
                    r#"
                    INSERT INTO events (identifier, title, event_image, description, event_type, venue, url,
                        event_timing, facebook_link, pub_by, edited_by, status, show, add_to_timeline,
                        featured, upcoming, bts_description, bts_image, bts_video, bts_uploaded_at, pub_date)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, NOW())
                    RETURNING {EVENT_COLUMNS}
                    "#
                );
                bind_fields(sqlx::query_as::<_, Event>(&sql), request)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| map_unique_violation(e, "identifier", DUPLICATE_IDENTIFIER))?
            }
            Some(id) => {
                let sql = format!(
                    r#"
                    UPDATE events
                    SET identifier = $1, title = $2, event_image = $3, description = $4, event_type = $5,
                        venue = $6, url = $7, event_timing = $8, facebook_link = $9, pub_by = $10,
                        edited_by = $11, status = $12, show = $13, add_to_timeline = $14, featured = $15,
                        upcoming = $16, bts_description = $17, bts_image = $18, bts_video = $19,
                        bts_uploaded_at = COALESCE(events.bts_uploaded_at, $20),
                        pub_date = NOW()
                    WHERE id = $21
                    RETURNING {EVENT_COLUMNS}
                    "#
                );
                bind_fields(sqlx::query_as::<_, Event>(&sql), request)
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| map_unique_violation(e, "identifier", DUPLICATE_IDENTIFIER))?
                    .ok_or_else(|| CmsError::not_found("Event", id.to_string()))?
            }
        };

        if let Some(entry) = timeline {
            sqlx::query(
                r#"
                INSERT INTO timeline (event_name, detail, event_time)
                VALUES ($1, $2, $3)
                ON CONFLICT (event_name) DO NOTHING
                "#,
            )
            .bind(entry.event_name)
            .bind(entry.detail)
            .bind(entry.event_time)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        log_database_operation("save", "events", started.elapsed().as_millis() as u64, true);

        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE identifier = $1"
        ))
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
