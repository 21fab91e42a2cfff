//! Submission and listing services.
//!
//! A submission writes the image blob first and the row second. The two
//! writes are not transactional: if the row insert fails after the blob was
//! written, the blob is removed again so no orphan is left behind. A failed
//! removal is logged and otherwise ignored.

use sea_orm::DatabaseConnection;
use tracing::{info, info_span, warn, Instrument};

use crate::db::{school_repo, DatabaseError};
use crate::error::IntakeError;
use crate::image::ImageUpload;
use crate::sanitize::{redact_email, redact_path, redact_phone};
use crate::school::{SchoolForm, SchoolRecord};
use crate::storage::ImageStore;
use crate::validation;

#[derive(Clone)]
pub struct SchoolService {
    db: DatabaseConnection,
    images: ImageStore,
}

impl SchoolService {
    pub fn new(db: DatabaseConnection, images: ImageStore) -> Self {
        Self { db, images }
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    /// Validates and persists one school, returning its new id.
    pub async fn submit(
        &self,
        form: SchoolForm,
        image: Option<ImageUpload>,
    ) -> Result<i32, IntakeError> {
        let span = info_span!(
            "submit_school",
            email = %redact_email(&form.email),
            phone = %redact_phone(&form.phone),
            has_image = image.as_ref().is_some_and(|i| !i.is_empty()),
        );

        async move {
            let image = image.filter(|i| !i.is_empty());
            validation::validate(&form, image.as_ref()).map_err(IntakeError::Invalid)?;

            let stored = match &image {
                Some(upload) => Some(self.images.store(&upload.file_name, &upload.bytes).await?),
                None => None,
            };

            let image_path = stored.as_ref().map(|s| s.public_path.clone());
            match school_repo::insert(&self.db, &form, image_path).await {
                Ok(id) => {
                    info!(id, "School added");
                    Ok(id)
                }
                Err(e) => {
                    if let Some(stored) = &stored {
                        if let Err(remove_err) = self.images.remove(stored).await {
                            warn!(
                                file = %redact_path(&stored.path),
                                error = %remove_err,
                                "Failed to remove image after insert failure"
                            );
                        }
                    }
                    Err(IntakeError::Insert(e))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Every school, newest first.
    pub async fn list(&self) -> Result<Vec<SchoolRecord>, DatabaseError> {
        let schools = school_repo::list_all(&self.db).await?;
        tracing::debug!(count = schools.len(), "Listed schools");
        Ok(schools)
    }
}
