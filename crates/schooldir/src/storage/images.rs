use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::StorageError;
use crate::sanitize::{redact_path, safe_file_name};

/// Public URL prefix under which stored images are served.
pub const IMAGE_URL_PREFIX: &str = "/schoolImages";

/// A blob written by [`ImageStore::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Location on disk.
    pub path: PathBuf,
    /// Path usable as a public URL, e.g. `/schoolImages/1700000000000-gate.png`.
    pub public_path: String,
}

/// Flat directory of write-once image blobs named `<epoch-millis>-<filename>`.
#[derive(Debug, Clone)]
pub struct ImageStore {
    directory: PathBuf,
}

impl ImageStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `content` under a generated name and returns where it went.
    pub async fn store(
        &self,
        original_name: &str,
        content: &[u8],
    ) -> Result<StoredImage, StorageError> {
        self.ensure_directory().await?;

        let filename = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            safe_file_name(original_name)
        );
        let path = self.store_with_atomic_creation(&filename, content).await?;

        let stored_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&filename)
            .to_string();

        Ok(StoredImage {
            public_path: format!("{}/{}", IMAGE_URL_PREFIX, stored_name),
            path,
        })
    }

    /// Deletes a blob written by [`store`](Self::store).
    pub async fn remove(&self, image: &StoredImage) -> Result<(), StorageError> {
        tokio::fs::remove_file(&image.path)
            .await
            .map_err(|e| StorageError::RemoveFile {
                path: image.path.clone(),
                source: e,
            })
    }

    /// Creates the file with `create_new` so an existing blob is never
    /// overwritten. Two uploads of the same name within one millisecond get
    /// numbered variants.
    async fn store_with_atomic_creation(
        &self,
        filename: &str,
        content: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let (base, ext) = match filename.rfind('.') {
            Some(dot_pos) if dot_pos > 0 => (&filename[..dot_pos], Some(&filename[dot_pos..])),
            _ => (filename, None),
        };

        for counter in 1..=100 {
            let try_filename = if counter == 1 {
                filename.to_string()
            } else {
                match ext {
                    Some(ext) => format!("{}_{}{}", base, counter, ext),
                    None => format!("{}_{}", base, counter),
                }
            };
            let try_path = self.directory.join(&try_filename);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&try_path)
                .await
            {
                Ok(file) => {
                    write_or_discard(&try_path, file, content).await?;
                    return Ok(try_path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::WriteFile {
                        path: try_path,
                        source: e,
                    });
                }
            }
        }

        Err(StorageError::FileExists(self.directory.join(filename)))
    }

    async fn ensure_directory(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| StorageError::CreateDirectory {
                path: self.directory.clone(),
                source: e,
            })
    }
}

/// Writes `content` into a freshly created file. A partial file is removed
/// again if the write fails.
async fn write_or_discard<W>(path: &Path, mut file: W, content: &[u8]) -> Result<(), StorageError>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(content).await {
        Ok(()) => file.flush().await,
        Err(e) => Err(e),
    };
    drop(file);

    if let Err(source) = written {
        if let Err(remove_err) = tokio::fs::remove_file(path).await {
            tracing::warn!(
                file = %redact_path(path),
                error = %remove_err,
                "Failed to remove partially written image"
            );
        }
        return Err(StorageError::WriteFile {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
