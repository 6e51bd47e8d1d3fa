//! ClubPortal
//!
//! Content-management backend for a student organization's website.
//! This library provides the record store, the event and profile write
//! pipelines, the public read API and the member profile form flows.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CmsError, Result};

// Re-export main components for easy access
pub use database::{DatabaseService, MemoryStore};
pub use handlers::{build_router, AppState};
pub use services::ServiceFactory;
pub use storage::{LocalMediaStore, MediaStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
