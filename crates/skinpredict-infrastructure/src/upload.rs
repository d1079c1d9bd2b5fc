//! Loading face images from disk for analysis.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use skinpredict_core::error::{Result, SkinError};
use skinpredict_core::image::ImagePayload;

/// Accepted file extensions, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Reads an image file and encodes it for the analyzer.
///
/// Rejects anything that is not PNG/JPEG by extension, empty files, and
/// files larger than `max_bytes`.
pub async fn load_image(path: &Path, max_bytes: u64) -> Result<ImagePayload> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SkinError::invalid_input(format!(
            "Please choose a PNG or JPEG image (got '{}')",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        SkinError::invalid_input(format!("Cannot read {}: {}", path.display(), e))
    })?;
    if metadata.len() > max_bytes {
        return Err(SkinError::invalid_input(format!(
            "Image is too large ({:.1} MB, limit {:.1} MB)",
            metadata.len() as f64 / (1024.0 * 1024.0),
            max_bytes as f64 / (1024.0 * 1024.0)
        )));
    }

    let bytes = tokio::fs::read(path).await?;
    if bytes.is_empty() {
        return Err(SkinError::invalid_input("Image file is empty"));
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    tracing::debug!(
        "[Upload] {} ({} bytes, {})",
        path.display(),
        bytes.len(),
        mime
    );
    Ok(ImagePayload::from_base64(BASE64_STANDARD.encode(&bytes))?.with_mime_type(mime.to_string()))
}
