//! HTTP surface: the JSON listing and multipart intake endpoints, plus
//! static serving of stored images.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};

pub mod error;
pub mod routes;
pub mod state;

pub use state::AppState;

use crate::config::Config;
use crate::db;
use crate::error::{SchoolDirError, StorageError};
use crate::storage::images::IMAGE_URL_PREFIX;
use crate::storage::ImageStore;

pub const SCHOOLS_ROUTE: &str = "/api/schools";

/// Builds the application router. Images are served from `image_dir`.
pub fn build_router(state: Arc<AppState>, image_dir: &Path, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(
            SCHOOLS_ROUTE,
            get(routes::list_schools).post(routes::create_school),
        )
        .nest_service(IMAGE_URL_PREFIX, ServeDir::new(image_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Opens the database, binds the listener and serves until a shutdown signal.
pub async fn serve(config: Config) -> Result<(), SchoolDirError> {
    info!("Initializing state...");
    let db = db::init_database(&config.database).await?;

    let image_dir = config.server.image_dir.clone();
    tokio::fs::create_dir_all(&image_dir)
        .await
        .map_err(|source| StorageError::CreateDirectory {
            path: image_dir.clone(),
            source,
        })?;

    let state = AppState::new(db, ImageStore::new(&image_dir));
    let app = build_router(state, &image_dir, config.server.max_upload_bytes);

    let address = config.server.bind;
    info!("Binding to {address}");
    let listener = TcpListener::bind(address)
        .await
        .map_err(SchoolDirError::Server)?;

    run(listener, app).await
}

/// Serves `app` on an already bound listener with graceful shutdown.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), SchoolDirError> {
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(SchoolDirError::Server)?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
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
