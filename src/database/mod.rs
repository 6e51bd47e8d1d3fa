//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabaseConfig, DatabasePool};
pub use memory::MemoryStore;
pub use repositories::{
    AlumniRepository, ContentRepository, EventRepository, ProfileRepository, ProjectRepository,
    TimelineRepository, TokenRepository, UserRepository,
};
pub use service::{Counts, DatabaseService};
