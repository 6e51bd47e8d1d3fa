//! ClubPortal
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::{error, info};

use ClubPortal::{
    build_router,
    config::Settings,
    database::{connection, DatabaseService},
    utils::logging,
    AppState, LocalMediaStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load settings")?;
    settings.validate()?;

    // Initialize logging
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", ClubPortal::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig::from(&settings.database);
    let db_pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    info!("Running database migrations...");
    connection::run_migrations(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    tokio::fs::create_dir_all(&settings.media.root)
        .await
        .with_context(|| format!("Failed to create media root {}", settings.media.root))?;
    let media = Arc::new(LocalMediaStore::new(
        &settings.media.root,
        settings.media.base_url.clone(),
    ));

    let address = settings.bind_address();
    let app = build_router(AppState::new(settings, database_service, media));

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("ClubPortal has been shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
