//! Authentication middleware
//!
//! The fronting platform authenticates members and forwards the username in
//! a request header (`auth.user_header`). The [`AuthenticatedUser`]
//! extractor resolves that name to a stored account.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::{debug, warn};

use crate::handlers::AppState;
use crate::models::user::User;
use crate::utils::errors::CmsError;

/// The signed-in member making the request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Read the forwarded username from the request headers
pub fn forwarded_username<'a>(parts: &'a Parts, header: &str) -> Option<&'a str> {
    parts
        .headers
        .get(header)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = CmsError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = state.settings.auth.user_header.as_str();
        let username = forwarded_username(parts, header)
            .ok_or_else(|| CmsError::Authentication(format!("Missing {} header", header)))?;

        match state.db.users.find_by_username(username).await? {
            Some(user) => {
                debug!(username = %user.username, "Request authenticated");
                Ok(AuthenticatedUser(user))
            }
            None => {
                warn!(username = %username, "Unknown user in auth header");
                Err(CmsError::Authentication(format!("Unknown user {}", username)))
            }
        }
    }
}
