//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod content;
pub mod event;
pub mod member;
pub mod project;
pub mod timeline;
pub mod token;
pub mod user;

// Re-export commonly used models
pub use content::{
    About, Activity, CarouselImage, Contact, Ctf, DevPost, Facad, Linit, LinitEdition, LinitImage,
    NewContact, SiteConfig, Sponsor, TechBytes,
};
pub use event::{Event, EventStatus, EventType, SaveEventRequest};
pub use member::{Alumni, Degree, MemberDetails, Profile, SaveProfileRequest};
pub use project::{Project, SaveProjectRequest};
pub use timeline::{NewTimelineEntry, Timeline};
pub use token::{NewSpecialToken, SpecialToken};
pub use user::User;
