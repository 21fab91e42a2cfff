use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum SchoolDirError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] crate::db::DatabaseError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    #[error("Client error: {0}")]
    Client(#[from] crate::client::ClientError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{key}' is required")]
    Missing { key: &'static str },

    #[error("Invalid value for '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove file '{path}': {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File already exists: {0}")]
    FileExists(PathBuf),
}

/// Failures of a single school submission.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Invalid submission: {0}")]
    Invalid(ValidationErrors),

    #[error("Malformed multipart body: {0}")]
    Malformed(String),

    #[error("Failed to store image: {0}")]
    Image(#[from] StorageError),

    #[error("Failed to insert school: {0}")]
    Insert(#[from] crate::db::DatabaseError),
}

pub type Result<T> = std::result::Result<T, SchoolDirError>;
