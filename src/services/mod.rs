//! Services module
//!
//! This module contains the write pipelines and form flows

pub mod derive;
pub mod event;
pub mod forms;
pub mod profile;
pub mod project;
pub mod token;

// Re-export commonly used services
pub use event::{EventService, EventUploads};
pub use forms::{FlowOutcome, FlowPaths, Notice, NoticeLevel, ProfileFlows, ProfileSubmission};
pub use profile::{ProfileOutcome, ProfileService};
pub use project::ProjectService;
pub use token::TokenService;

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::storage::MediaStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub event_service: EventService,
    pub profile_service: ProfileService,
    pub project_service: ProjectService,
    pub token_service: TokenService,
    pub profile_flows: ProfileFlows,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: &DatabaseService, media: Arc<dyn MediaStore>) -> Self {
        let event_service = EventService::new(db.events.clone(), media.clone());
        let profile_service =
            ProfileService::new(db.profiles.clone(), db.alumni.clone(), media.clone());
        let project_service = ProjectService::new(db.projects.clone(), media);
        let token_service = TokenService::new(db.tokens.clone());
        let profile_flows = ProfileFlows::new(
            profile_service.clone(),
            FlowPaths {
                admin_index: settings.server.admin_index.clone(),
                create_profile: settings.server.create_profile_path.clone(),
            },
        );

        Self {
            event_service,
            profile_service,
            project_service,
            token_service,
            profile_flows,
        }
    }
}
