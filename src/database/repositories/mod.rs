//! Database repositories module
//!
//! One repository trait per entity, each with a PostgreSQL implementation.
//! The in-memory implementations live in [`crate::database::memory`].

pub mod alumni;
pub mod content;
pub mod event;
pub mod profile;
pub mod project;
pub mod timeline;
pub mod token;
pub mod user;

// Re-export repositories
pub use alumni::{AlumniRepository, PgAlumniRepository};
pub use content::{ContentRepository, PgContentRepository};
pub use event::{EventRepository, PgEventRepository};
pub use profile::{PgProfileRepository, ProfileRepository};
pub use project::{PgProjectRepository, ProjectRepository};
pub use timeline::{PgTimelineRepository, TimelineRepository};
pub use token::{PgTokenRepository, TokenRepository};
pub use user::{PgUserRepository, UserRepository};

use crate::utils::errors::{CmsError, ValidationErrors};

const UNIQUE_VIOLATION: &str = "23505";

/// Report a unique constraint violation as a field error, pass anything else through
pub(crate) fn map_unique_violation(err: sqlx::Error, field: &str, message: &str) -> CmsError {
    let is_unique_violation = err
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if is_unique_violation {
        CmsError::Validation(ValidationErrors::single(field, message))
    } else {
        CmsError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_unique_violation(sqlx::Error::RowNotFound, "identifier", "taken");
        assert!(matches!(err, CmsError::Database(sqlx::Error::RowNotFound)));
    }
}
