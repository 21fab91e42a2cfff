//! Error responses of the HTTP API.
//!
//! Every failure is caught at the handler boundary and becomes a JSON body
//! with a status code. Internal error text only crosses the boundary as the
//! `details` of a listing failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::error::IntakeError;
use crate::validation::ValidationErrors;

/// `code` of a listing failure caused by the table not existing.
pub const TABLE_MISSING: &str = "TABLE_MISSING";
/// `code` of any other listing failure.
pub const DATABASE_ERROR: &str = "DATABASE_ERROR";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to fetch schools")]
    Listing(#[source] DatabaseError),

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Failed to add school")]
    Submission(#[source] IntakeError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<&'static str, &'static str>>,
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::Invalid(errors) => ApiError::Validation(errors),
            other => ApiError::Submission(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();

        let (status, body) = match self {
            ApiError::Listing(source) => {
                let code = if source.is_missing_table() {
                    TABLE_MISSING
                } else {
                    DATABASE_ERROR
                };
                tracing::error!(code, error = %source, "Listing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error,
                        details: Some(source.to_string()),
                        code: Some(code),
                        fields: None,
                    },
                )
            }
            ApiError::Validation(errors) => {
                tracing::info!(fields = %errors, "Submission rejected");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error,
                        details: None,
                        code: None,
                        fields: Some(errors.to_map()),
                    },
                )
            }
            ApiError::Submission(source) => {
                tracing::error!(error = %source, "Submission failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error,
                        details: None,
                        code: None,
                        fields: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
