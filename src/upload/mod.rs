use axum::body::Bytes;
use axum::extract::Multipart;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::error::ApiError;

/// Where uploaded images land on disk and how they are addressed publicly.
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub public_base: String,
    pub max_file_bytes: usize,
}

impl UploadSettings {
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            root: PathBuf::from(&config.dir),
            public_base: config.public_base.trim_end_matches('/').to_string(),
            max_file_bytes: config.max_file_bytes,
        }
    }
}

/// An image part read out of a multipart request, not yet on disk.
#[derive(Debug)]
pub struct IncomingImage {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Drain a multipart request into plain form fields and image parts.
///
/// File parts must carry an `image/*` content type and stay under the size
/// cap; validation runs before anything touches the filesystem so a rejected
/// request leaves no stray files behind.
pub async fn collect(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<(HashMap<String, String>, Vec<IncomingImage>), ApiError> {
    let mut fields = HashMap::new();
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            let name = field.name().unwrap_or_default().to_string();
            let value = field.text().await?;
            fields.insert(name, value);
            continue;
        };

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        // browsers submit an empty file part when no file was chosen
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }
        if !content_type.starts_with("image/") {
            return Err(ApiError::validation_error(
                "Not an image! Please upload an image.",
                Some(HashMap::from([(
                    "image".to_string(),
                    format!("Unsupported content type: {}", content_type),
                )])),
            ));
        }
        if bytes.is_empty() {
            return Err(ApiError::validation_error(
                "Uploaded image is empty",
                Some(HashMap::from([(
                    "image".to_string(),
                    format!("{} contains no data", file_name),
                )])),
            ));
        }
        if bytes.len() > max_file_bytes {
            return Err(ApiError::validation_error(
                "Image exceeds the maximum upload size",
                Some(HashMap::from([(
                    "image".to_string(),
                    format!("Limit is {} bytes", max_file_bytes),
                )])),
            ));
        }

        images.push(IncomingImage { file_name, bytes });
    }

    Ok((fields, images))
}

/// Write validated images under the upload root, returning their public
/// paths in order. A mid-sequence failure removes anything already written.
pub async fn store_images(
    settings: &UploadSettings,
    images: &[IncomingImage],
) -> Result<Vec<String>, ApiError> {
    if images.is_empty() {
        return Ok(vec![]);
    }

    tokio::fs::create_dir_all(&settings.root).await.map_err(|e| {
        tracing::error!("Failed to create upload directory: {}", e);
        ApiError::internal_server_error("Unable to store uploaded images")
    })?;

    let mut public_paths = Vec::with_capacity(images.len());
    for image in images {
        let file_name = unique_file_name(&image.file_name);
        let disk_path = settings.root.join(&file_name);

        if let Err(e) = tokio::fs::write(&disk_path, &image.bytes).await {
            tracing::error!("Failed to write {}: {}", disk_path.display(), e);
            discard(settings, &public_paths).await;
            return Err(ApiError::internal_server_error("Unable to store uploaded images"));
        }

        public_paths.push(format!("{}/{}", settings.public_base, file_name));
    }

    Ok(public_paths)
}

/// Best-effort removal of previously stored images, by public path.
pub async fn discard(settings: &UploadSettings, public_paths: &[String]) {
    for public_path in public_paths {
        let Some(file_name) = public_path.rsplit('/').next() else {
            continue;
        };
        let disk_path = settings.root.join(file_name);
        if let Err(e) = tokio::fs::remove_file(&disk_path).await {
            warn!("Failed to remove {}: {}", disk_path.display(), e);
        }
    }
}

/// Unique on-disk name: millisecond timestamp plus a random suffix, keeping
/// a sanitized copy of the original extension.
fn unique_file_name(original: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}{}",
        Utc::now().timestamp_millis(),
        &suffix[..8],
        sanitized_extension(original)
    )
}

fn sanitized_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}
