pub mod client;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod image;
pub mod logging;
pub mod sanitize;
pub mod school;
pub mod server;
pub mod service;
pub mod storage;
pub mod validation;

pub use client::{ClientError, SchoolClient};
pub use config::{Config, DatabaseConfig, ServerConfig};
pub use db::{DatabaseError, Migrator};
pub use directory::{DirectoryFilter, DirectoryView, Selection, ViewMode};
pub use error::{ConfigError, IntakeError, Result, SchoolDirError, StorageError};
pub use image::ImageUpload;
pub use logging::init_logging;
pub use school::{SchoolForm, SchoolRecord};
pub use server::{build_router, serve, AppState};
pub use service::SchoolService;
pub use storage::{ImageStore, StoredImage};
pub use validation::{validate, Field, IntakeValidator, ValidationErrors};
