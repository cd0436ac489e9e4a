use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

/// Errors produced while decoding an uploaded base64 image.
#[derive(Debug)]
pub enum ImageError {
    /// Value is not a `data:image/...;base64,...` URL.
    NotADataUrl,
    /// The declared media type is not an accepted image format.
    UnsupportedFormat(String),
    /// The base64 payload failed to decode or is empty.
    InvalidPayload,
}

impl ImageError {
    pub fn message(&self) -> String {
        match self {
            Self::NotADataUrl => "Image must be a base64 data URL".into(),
            Self::UnsupportedFormat(mime) => {
                format!("Unsupported image format '{mime}' (allowed: png, jpeg, gif, webp)")
            }
            Self::InvalidPayload => "Image payload is not valid base64".into(),
        }
    }
}

/// A decoded upload ready to be written under the media root.
pub struct DecodedImage {
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

const ACCEPTED: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Parse a `data:image/<fmt>;base64,<payload>` string.
pub fn decode_data_url(value: &str) -> Result<DecodedImage, ImageError> {
    let rest = value.strip_prefix("data:").ok_or(ImageError::NotADataUrl)?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or(ImageError::NotADataUrl)?;

    let extension = ACCEPTED
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| ImageError::UnsupportedFormat(mime.to_string()))?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| ImageError::InvalidPayload)?;
    if bytes.is_empty() {
        return Err(ImageError::InvalidPayload);
    }

    Ok(DecodedImage { extension, bytes })
}

/// Write a decoded image under `<media_root>/<subdir>/` with a random
/// filename. Returns the path relative to the media root, which is what
/// gets persisted on the owning row.
pub async fn store(
    media_root: &Path,
    subdir: &str,
    image: &DecodedImage,
) -> std::io::Result<String> {
    let relative = format!("{subdir}/{}.{}", Uuid::new_v4(), image.extension);
    let absolute: PathBuf = media_root.join(&relative);
    if let Some(parent) = absolute.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&absolute, &image.bytes).await?;
    Ok(relative)
}

/// Best-effort removal of a previously stored image.
pub async fn remove(media_root: &Path, relative: &str) {
    let absolute = media_root.join(relative);
    if let Err(e) = tokio::fs::remove_file(&absolute).await {
        tracing::warn!("Failed to remove media file {}: {}", absolute.display(), e);
    }
}
