//! Test harness for isolated router and server tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower::ServiceExt;

use schooldir::db::{connect, run_migrations};
use schooldir::{build_router, AppState, ImageStore};

use super::builders::MultipartBody;

pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

pub struct TestHarness {
    temp_dir: TempDir,
    pub image_dir: PathBuf,
    pub db: DatabaseConnection,
    pub router: Router,
}

impl TestHarness {
    /// Harness with the schema applied.
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Harness whose database has no `schools` table.
    pub async fn without_schema() -> Self {
        Self::build(false).await
    }

    async fn build(migrate: bool) -> Self {
        // In-memory SQLite lives in a single connection.
        let db = connect("sqlite::memory:", 1)
            .await
            .expect("Failed to open database");
        if migrate {
            run_migrations(&db).await.expect("Failed to run migrations");
        }

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let image_dir = temp_dir.path().join("schoolImages");
        std::fs::create_dir_all(&image_dir).expect("Failed to create image directory");

        let state = AppState::new(db.clone(), ImageStore::new(&image_dir));
        let router = build_router(state, &image_dir, MAX_UPLOAD_BYTES);

        Self {
            temp_dir,
            image_dir,
            db,
            router,
        }
    }

    pub fn stored_images(&self) -> usize {
        std::fs::read_dir(&self.image_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    pub async fn post_multipart(&self, body: MultipartBody) -> Response<Body> {
        let (content_type, bytes) = body.finish();
        let request = Request::builder()
            .method("POST")
            .uri("/api/schools")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(bytes))
            .expect("Failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed")
    }

    /// Binds the router to an ephemeral local port and serves it in the background.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });
        addr
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response<Body>) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    let value = serde_json::from_slice(&bytes).expect("Body is not JSON");
    (status, value)
}
