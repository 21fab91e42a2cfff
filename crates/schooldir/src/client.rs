//! HTTP client for the school endpoints.
//!
//! Used by the directory view to fetch the collection once, and by the intake
//! front end to submit a validated form.

use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::image::ImageUpload;
use crate::school::{SchoolForm, SchoolRecord};
use crate::server::error::TABLE_MISSING;
use crate::validation::{self, ValidationErrors};

const SCHOOLS_PATH: &str = "api/schools";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The form failed validation and was not sent.
    #[error("Invalid submission: {0}")]
    Invalid(ValidationErrors),

    /// The schools table does not exist on the server.
    #[error("Database setup required: {details}")]
    SetupRequired { details: String },

    #[error("Server returned {status}: {message}")]
    Server { status: StatusCode, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    details: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    id: i32,
}

#[derive(Clone)]
pub struct SchoolClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl SchoolClient {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base.join(SCHOOLS_PATH).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetches every school, newest first.
    pub async fn list_schools(&self) -> Result<Vec<SchoolRecord>, ClientError> {
        let response = self.http.get(self.endpoint.clone()).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        if body.code.as_deref() == Some(TABLE_MISSING) {
            return Err(ClientError::SetupRequired {
                details: body.details.unwrap_or_default(),
            });
        }

        Err(ClientError::Server {
            status,
            message: body
                .error
                .unwrap_or_else(|| "Failed to fetch schools".to_string()),
        })
    }

    /// Validates the form and, if every field passes, submits it.
    ///
    /// Returns the id assigned by the server.
    pub async fn submit(
        &self,
        form: &SchoolForm,
        image: Option<&ImageUpload>,
    ) -> Result<i32, ClientError> {
        let image = image.filter(|i| !i.is_empty());
        validation::validate(form, image).map_err(ClientError::Invalid)?;

        let mut multipart = Form::new();
        for (name, value) in form.parts() {
            multipart = multipart.text(name, value.to_string());
        }
        if let Some(image) = image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type())?;
            multipart = multipart.part("image", part);
        }

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(multipart)
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::CREATED {
            let body: CreatedBody = response.json().await?;
            return Ok(body.id);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error)
            .unwrap_or_else(|| "Failed to add school".to_string());
        Err(ClientError::Server { status, message })
    }
}
