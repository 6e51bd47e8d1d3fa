//! HTTP handlers module
//!
//! This module contains the axum handlers and the router that wires them:
//! - Read-only API handlers for every public record type
//! - Profile form flows for authenticated members
//! - Contact submissions

pub mod api;
pub mod contact;
pub mod error;
pub mod profile;
pub mod responses;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::log_requests;
use crate::services::ServiceFactory;
use crate::storage::MediaStore;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService, media: Arc<dyn MediaStore>) -> Self {
        let services = ServiceFactory::new(&settings, &db, media.clone());
        Self {
            settings: Arc::new(settings),
            db,
            services,
            media,
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let create_profile_path = state.settings.server.create_profile_path.clone();
    let body_limit = state.settings.server.max_body_bytes;

    Router::new()
        .route("/events/", get(api::list_events))
        .route("/events/:identifier/", get(api::get_event))
        .route("/profiles/", get(api::list_profiles))
        .route("/alumni/", get(api::list_alumni))
        .route("/about/:identifier/", get(api::get_about))
        .route("/projects/", get(api::list_projects))
        .route("/projects/:identifier/", get(api::get_project))
        .route("/activities/", get(api::list_activities))
        .route("/carousel/", get(api::list_carousel))
        .route("/linit/", get(api::list_linit))
        .route("/timeline/", get(api::list_timeline))
        .route("/users/", get(api::list_users))
        .route("/users/:username/", get(api::get_user))
        .route("/sponsors/", get(api::list_sponsors))
        .route("/techbytes/", get(api::list_techbytes))
        .route("/devposts/", get(api::list_devposts))
        .route("/ctf/", get(api::list_ctfs))
        .route("/facads/", get(api::list_facads))
        .route("/config/", get(api::list_configs))
        .route("/count/", get(api::get_count))
        .route("/healthz", get(api::healthz))
        .route(
            &create_profile_path,
            get(profile::create_form).post(profile::create_submit),
        )
        .route(
            "/profile/edit/",
            get(profile::edit_form).post(profile::edit_submit),
        )
        .route("/contact/", post(contact::submit_contact))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}
