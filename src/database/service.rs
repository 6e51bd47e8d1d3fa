//! Database service layer
//!
//! Bundles one handle per repository so the rest of the application can
//! work against either store.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::database::memory::MemoryStore;
use crate::database::repositories::{
    AlumniRepository, ContentRepository, EventRepository, PgAlumniRepository,
    PgContentRepository, PgEventRepository, PgProfileRepository, PgProjectRepository,
    PgTimelineRepository, PgTokenRepository, PgUserRepository, ProfileRepository,
    ProjectRepository, TimelineRepository, TokenRepository, UserRepository,
};
use crate::database::{health_check, DatabasePool};
use crate::utils::errors::Result;

/// Liveness probe for the backing store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn check(&self) -> Result<()>;
}

struct PgHealth(DatabasePool);

#[async_trait]
impl StoreHealth for PgHealth {
    async fn check(&self) -> Result<()> {
        health_check(&self.0).await
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn check(&self) -> Result<()> {
        Ok(())
    }
}

/// Row tallies shown on the site's landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub members: i64,
    pub events: i64,
    pub projects: i64,
}

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub timeline: Arc<dyn TimelineRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub alumni: Arc<dyn AlumniRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub content: Arc<dyn ContentRepository>,
    health: Arc<dyn StoreHealth>,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            events: Arc::new(PgEventRepository::new(pool.clone())),
            timeline: Arc::new(PgTimelineRepository::new(pool.clone())),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            alumni: Arc::new(PgAlumniRepository::new(pool.clone())),
            tokens: Arc::new(PgTokenRepository::new(pool.clone())),
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            content: Arc::new(PgContentRepository::new(pool.clone())),
            health: Arc::new(PgHealth(pool)),
        }
    }

    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            events: store.clone(),
            timeline: store.clone(),
            profiles: store.clone(),
            alumni: store.clone(),
            tokens: store.clone(),
            projects: store.clone(),
            content: store.clone(),
            health: store,
        }
    }

    /// Tally profiles, events and projects
    pub async fn counts(&self) -> Result<Counts> {
        let (members, events, projects) = futures::try_join!(
            self.profiles.count(),
            self.events.count(),
            self.projects.count(),
        )?;

        Ok(Counts {
            members,
            events,
            projects,
        })
    }

    pub async fn health_check(&self) -> Result<()> {
        self.health.check().await
    }
}
