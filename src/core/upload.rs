//! Photo upload checks and storage

use crate::config::UploadConfig;
use crate::core::error::UploadError;
use axum::body::Bytes;
use std::path::Path;
use uuid::Uuid;

/// A file received from a multipart request
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl PhotoUpload {
    /// Reject anything that is not an image or is over the configured size
    pub fn check(&self, config: &UploadConfig) -> Result<(), UploadError> {
        let content_type = self.content_type.as_deref().unwrap_or_default();
        if !content_type.starts_with("image") {
            return Err(UploadError::NotAnImage {
                content_type: if content_type.is_empty() {
                    "no content type".to_string()
                } else {
                    content_type.to_string()
                },
            });
        }

        if self.bytes.len() > config.max_file_upload {
            return Err(UploadError::TooLarge {
                max_bytes: config.max_file_upload,
            });
        }

        Ok(())
    }

    /// Name the photo is stored under: `photo_<id><ext>`
    pub fn stored_name(&self, food_id: &Uuid) -> String {
        let extension = Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default();
        format!("photo_{}{}", food_id, extension)
    }
}

/// Check the upload and write it to the upload directory
///
/// Returns the stored file name.
pub async fn save_photo(
    config: &UploadConfig,
    food_id: &Uuid,
    upload: &PhotoUpload,
) -> Result<String, UploadError> {
    upload.check(config)?;

    let name = upload.stored_name(food_id);
    tokio::fs::create_dir_all(&config.file_upload_path).await?;
    tokio::fs::write(config.file_upload_path.join(&name), &upload.bytes).await?;

    tracing::info!(food_id = %food_id, file = %name, bytes = upload.bytes.len(), "photo stored");
    Ok(name)
}
