use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::service::SchoolService;
use crate::storage::ImageStore;

/// Shared request state. The database pool inside is opened once at startup.
pub struct AppState {
    pub schools: SchoolService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, images: ImageStore) -> Arc<Self> {
        Arc::new(Self {
            schools: SchoolService::new(db, images),
        })
    }
}
