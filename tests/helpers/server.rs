//! Test server helper
//!
//! Spawns the application router on an ephemeral port.

use std::path::Path;
use std::sync::{Arc, Once};

use reqwest::multipart::Form;
use reqwest::{Client, Response};
use tempfile::TempDir;
use tokio::net::TcpListener;

use ClubPortal::{
    build_router, AppState, DatabaseService, LocalMediaStore, MemoryStore, Settings,
};

static INIT: Once = Once::new();

/// Header the fronting platform uses to name the signed-in member
pub const USER_HEADER: &str = "x-remote-user";

/// A running server backed by the in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    pub client: Client,
    media_dir: TempDir,
}

impl TestServer {
    pub async fn start() -> Self {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt::try_init();
        });

        let media_dir = tempfile::tempdir().expect("Failed to create media root");
        let store = Arc::new(MemoryStore::new());

        let mut settings = Settings::default();
        settings.media.root = media_dir.path().display().to_string();
        settings.auth.user_header = USER_HEADER.to_string();

        let media = Arc::new(LocalMediaStore::new(
            media_dir.path(),
            settings.media.base_url.clone(),
        ));
        let state = AppState::new(settings, DatabaseService::in_memory(store.clone()), media);
        let app = build_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let address = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            base_url: format!("http://{}", address),
            store,
            state,
            client,
            media_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn media_root(&self) -> &Path {
        self.media_dir.path()
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let response = self.get(path).await;
        assert_eq!(response.status(), 200, "GET {} failed", path);
        response.json().await.expect("Response was not JSON")
    }

    /// GET as the named member
    pub async fn get_as(&self, username: &str, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .header(USER_HEADER, username)
            .send()
            .await
            .expect("GET request failed")
    }

    /// POST a multipart form as the named member
    pub async fn post_form_as(&self, username: &str, path: &str, form: Form) -> Response {
        self.client
            .post(self.url(path))
            .header(USER_HEADER, username)
            .multipart(form)
            .send()
            .await
            .expect("POST request failed")
    }
}

/// Decode the `flash` cookie set by a redirect into `(level, message)`
pub fn flash_of(response: &Response) -> Option<(String, String)> {
    let cookie = response
        .headers()
        .get(reqwest::header::SET_COOKIE)?
        .to_str()
        .ok()?;
    let value = cookie.strip_prefix("flash=")?.split(';').next()?;
    let decoded = urlencoding::decode(value).ok()?.into_owned();
    let (level, message) = decoded.split_once(':')?;
    Some((level.to_string(), message.to_string()))
}

/// Location header of a redirect
pub fn location_of(response: &Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)?
        .to_str()
        .ok()
        .map(str::to_string)
}
