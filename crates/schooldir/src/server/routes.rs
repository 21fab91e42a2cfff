use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::error::IntakeError;
use crate::image::ImageUpload;
use crate::school::{SchoolForm, SchoolRecord};

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct Created {
    pub message: &'static str,
    pub id: i32,
}

pub async fn list_schools(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<SchoolRecord>>> {
    let schools = state.schools.list().await.map_err(ApiError::Listing)?;
    Ok(Json(schools))
}

pub async fn create_school(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let (form, image) = read_submission(multipart)
        .await
        .map_err(ApiError::Submission)?;

    let id = state.schools.submit(form, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "School added successfully",
            id,
        }),
    ))
}

/// Collects the text fields and the optional image part of a submission.
/// Unknown parts are skipped.
async fn read_submission(
    mut multipart: Multipart,
) -> Result<(SchoolForm, Option<ImageUpload>), IntakeError> {
    let mut form = SchoolForm::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            image = Some(read_image(field).await?);
            continue;
        }

        if SchoolForm::FIELDS.contains(&name.as_str()) {
            let value = field.text().await.map_err(malformed)?;
            form.set(&name, value);
        }
    }

    Ok((form, image))
}

async fn read_image(field: Field<'_>) -> Result<ImageUpload, IntakeError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(malformed)?;

    Ok(ImageUpload::new(file_name, content_type, bytes.to_vec()))
}

fn malformed(err: axum::extract::multipart::MultipartError) -> IntakeError {
    IntakeError::Malformed(err.body_text())
}
