//! Image attachments for the intake form.
//!
//! An [`ImageUpload`] is the optional `image` part of a submission: the raw
//! bytes, the original filename and the declared content type. Selecting an
//! image also yields a local preview as a `data:` URI, computed without any
//! network access.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

use crate::error::StorageError;
use crate::sanitize::safe_file_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Reads an image from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        let bytes = std::fs::read(path).map_err(|e| StorageError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string());

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Zero-length uploads count as "no image".
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The effective MIME type: the declared one, else a guess from the filename.
    pub fn mime_type(&self) -> String {
        match self.content_type.as_deref().map(str::trim) {
            Some(declared) if !declared.is_empty() && declared != "application/octet-stream" => {
                declared.to_ascii_lowercase()
            }
            _ => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }

    /// Both the effective MIME type and the extension of the stored name must
    /// be image types, since stored files are served by extension.
    pub fn is_image(&self) -> bool {
        self.mime_type().starts_with("image/") && self.extension_is_image()
    }

    fn extension_is_image(&self) -> bool {
        mime_guess::from_path(safe_file_name(&self.file_name))
            .iter()
            .any(|m| m.type_() == mime_guess::mime::IMAGE)
    }

    /// Local preview of the image as a `data:` URI.
    pub fn preview_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}
