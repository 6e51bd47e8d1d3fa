//! Profile form handlers
//!
//! `GET` renders the form state as JSON, `POST` takes a multipart
//! submission. Redirects are `303 See Other` and carry their notice in a
//! `flash` cookie.

use std::collections::HashMap;

use axum::extract::{Multipart, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use super::AppState;
use crate::middleware::AuthenticatedUser;
use crate::services::{FlowOutcome, Notice, NoticeLevel, ProfileSubmission};
use crate::storage::Upload;
use crate::utils::errors::{CmsError, Result};

pub const FLASH_COOKIE: &str = "flash";

/// `flash` cookie value for a notice
pub fn flash_cookie(notice: &Notice) -> String {
    let level = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Error => "error",
    };
    let value = urlencoding::encode(&format!("{}:{}", level, notice.message)).into_owned();
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", FLASH_COOKIE, value)
}

fn render(outcome: FlowOutcome) -> Response {
    match outcome {
        FlowOutcome::Redirect { to, notice } => (
            StatusCode::SEE_OTHER,
            [(LOCATION, to), (SET_COOKIE, flash_cookie(&notice))],
        )
            .into_response(),
        FlowOutcome::Form(view) => (StatusCode::OK, Json(view)).into_response(),
        FlowOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "errors": errors })),
        )
            .into_response(),
    }
}

/// Collect text fields and the `image` file of a multipart form
async fn read_submission(mut multipart: Multipart) -> Result<ProfileSubmission> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| CmsError::InvalidInput(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        match file_name {
            Some(file_name) if name == "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| CmsError::InvalidInput(e.to_string()))?;
                // browsers send an empty part when no file was picked
                if !file_name.is_empty() && !data.is_empty() {
                    let mut upload = Upload::new(file_name, data.to_vec());
                    upload.content_type = content_type;
                    image = Some(upload);
                }
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| CmsError::InvalidInput(e.to_string()))?;
                fields.insert(name, text);
            }
        }
    }

    Ok(ProfileSubmission { fields, image })
}

pub async fn create_form(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response> {
    let outcome = state
        .services
        .profile_flows
        .create_form(&user, Utc::now())
        .await?;
    Ok(render(outcome))
}

pub async fn create_submit(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<Response> {
    let submission = read_submission(multipart).await?;
    let outcome = state
        .services
        .profile_flows
        .create_submit(&user, submission, Utc::now())
        .await?;
    Ok(render(outcome))
}

pub async fn edit_form(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Response> {
    let outcome = state
        .services
        .profile_flows
        .edit_form(&user, Utc::now())
        .await?;
    Ok(render(outcome))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    multipart: Multipart,
) -> Result<Response> {
    let submission = read_submission(multipart).await?;
    let outcome = state
        .services
        .profile_flows
        .edit_submit(&user, submission, Utc::now())
        .await?;
    Ok(render(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_cookie_is_url_encoded() {
        let cookie = flash_cookie(&Notice::error("No Profile Exists for ada, create one first."));
        assert!(cookie.starts_with("flash=error%3ANo%20Profile%20Exists%20for%20ada%2C"));
        assert!(cookie.ends_with("; Path=/; HttpOnly; SameSite=Lax"));
    }

    #[test]
    fn test_redirect_rendering() {
        let response = render(FlowOutcome::Redirect {
            to: "/admin/".to_string(),
            notice: Notice::info("done"),
        });
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/admin/");
        assert_eq!(
            response.headers()[SET_COOKIE],
            "flash=info%3Adone; Path=/; HttpOnly; SameSite=Lax"
        );
    }
}
