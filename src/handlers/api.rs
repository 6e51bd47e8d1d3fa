//! Read-only API handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::responses::{
    AboutResponse, ActivityResponse, CarouselResponse, ConfigResponse, CtfResponse,
    DevPostResponse, EventResponse, FacadResponse, LinitResponse, MemberResponse,
    ProjectResponse, SponsorResponse, TechBytesResponse, TimelineResponse, UserResponse,
};
use super::AppState;
use crate::database::Counts;
use crate::utils::errors::{CmsError, Result};

pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventResponse>>> {
    let events = state.services.event_service.list().await?;
    let media = state.media.as_ref();
    Ok(Json(
        events
            .into_iter()
            .map(|event| EventResponse::new(event, media))
            .collect(),
    ))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<EventResponse>> {
    let event = state.services.event_service.get(&identifier).await?;
    Ok(Json(EventResponse::new(event, state.media.as_ref())))
}

pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<MemberResponse>>> {
    let profiles = state.db.profiles.list().await?;
    let media = state.media.as_ref();
    Ok(Json(
        profiles
            .into_iter()
            .map(|profile| MemberResponse::from_profile(profile, media))
            .collect(),
    ))
}

pub async fn list_alumni(State(state): State<AppState>) -> Result<Json<Vec<MemberResponse>>> {
    let alumni = state.services.profile_service.list_alumni().await?;
    let media = state.media.as_ref();
    Ok(Json(
        alumni
            .into_iter()
            .map(|alumni| MemberResponse::from_alumni(alumni, media))
            .collect(),
    ))
}

pub async fn get_about(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<AboutResponse>> {
    let about = state
        .db
        .content
        .find_about(&identifier)
        .await?
        .ok_or_else(|| CmsError::not_found("About", identifier))?;
    Ok(Json(about.into()))
}

pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state.services.project_service.list().await?;
    let media = state.media.as_ref();
    Ok(Json(
        projects
            .into_iter()
            .map(|project| ProjectResponse::new(project, media))
            .collect(),
    ))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<ProjectResponse>> {
    let project = state.services.project_service.get(&identifier).await?;
    Ok(Json(ProjectResponse::new(project, state.media.as_ref())))
}

pub async fn list_activities(State(state): State<AppState>) -> Result<Json<Vec<ActivityResponse>>> {
    let activities = state.db.content.list_activities().await?;
    let media = state.media.as_ref();
    Ok(Json(
        activities
            .into_iter()
            .map(|activity| ActivityResponse::new(activity, media))
            .collect(),
    ))
}

pub async fn list_carousel(State(state): State<AppState>) -> Result<Json<Vec<CarouselResponse>>> {
    let images = state.db.content.list_carousel().await?;
    let media = state.media.as_ref();
    Ok(Json(
        images
            .into_iter()
            .map(|image| CarouselResponse::new(image, media))
            .collect(),
    ))
}

pub async fn list_linit(State(state): State<AppState>) -> Result<Json<Vec<LinitResponse>>> {
    let editions = state.db.content.list_linit_editions().await?;
    let media = state.media.as_ref();
    Ok(Json(
        editions
            .into_iter()
            .map(|edition| LinitResponse::new(edition, media))
            .collect(),
    ))
}

/// Most recent entries first
pub async fn list_timeline(State(state): State<AppState>) -> Result<Json<Vec<TimelineResponse>>> {
    let entries = state.db.timeline.list_recent_first().await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>> {
    let users = state.db.users.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state
        .db
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| CmsError::not_found("User", username))?;
    Ok(Json(user.into()))
}

pub async fn list_sponsors(State(state): State<AppState>) -> Result<Json<Vec<SponsorResponse>>> {
    let sponsors = state.db.content.list_sponsors().await?;
    let media = state.media.as_ref();
    Ok(Json(
        sponsors
            .into_iter()
            .map(|sponsor| SponsorResponse::new(sponsor, media))
            .collect(),
    ))
}

pub async fn list_techbytes(State(state): State<AppState>) -> Result<Json<Vec<TechBytesResponse>>> {
    let posts = state.db.content.list_techbytes().await?;
    let media = state.media.as_ref();
    Ok(Json(
        posts
            .into_iter()
            .map(|post| TechBytesResponse::new(post, media))
            .collect(),
    ))
}

pub async fn list_devposts(State(state): State<AppState>) -> Result<Json<Vec<DevPostResponse>>> {
    let posts = state.db.content.list_devposts().await?;
    let media = state.media.as_ref();
    Ok(Json(
        posts
            .into_iter()
            .map(|post| DevPostResponse::new(post, media))
            .collect(),
    ))
}

pub async fn list_ctfs(State(state): State<AppState>) -> Result<Json<Vec<CtfResponse>>> {
    let ctfs = state.db.content.list_ctfs().await?;
    let media = state.media.as_ref();
    Ok(Json(
        ctfs.into_iter()
            .map(|ctf| CtfResponse::new(ctf, media))
            .collect(),
    ))
}

pub async fn list_facads(State(state): State<AppState>) -> Result<Json<Vec<FacadResponse>>> {
    let facads = state.db.content.list_facads().await?;
    let media = state.media.as_ref();
    Ok(Json(
        facads
            .into_iter()
            .map(|facad| FacadResponse::new(facad, media))
            .collect(),
    ))
}

/// Enabled site switches only
pub async fn list_configs(State(state): State<AppState>) -> Result<Json<Vec<ConfigResponse>>> {
    let configs = state.db.content.list_enabled_configs().await?;
    Ok(Json(configs.into_iter().map(Into::into).collect()))
}

pub async fn get_count(State(state): State<AppState>) -> Result<Json<Counts>> {
    Ok(Json(state.db.counts().await?))
}

pub async fn healthz(State(state): State<AppState>) -> Response {
    match state.db.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response(),
        Err(e) => {
            error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
                .into_response()
        }
    }
}
