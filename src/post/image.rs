//! Local image staging and preview derivation.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image path has no file name")]
    MissingFileName,
    #[error("failed to read image file: {0}")]
    Read(#[from] std::io::Error),
}

/// A locally selected file, staged for upload but not yet sent anywhere.
///
/// Only metadata lives here; the bytes are read once to derive the preview
/// and streamed from disk again at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
    pub len: u64,
}

/// A fully derived staging result: the staged file plus its rendered
/// preview, produced together so callers can swap both in atomically.
#[derive(Debug, Clone)]
pub struct Staging {
    pub image: StagedImage,
    pub preview_data_url: String,
}

/// Read a local file and derive its preview.
///
/// Nothing is mutated while this is in flight; on failure the caller's
/// previous staged state stays as it was.
pub async fn stage_image(path: impl AsRef<Path>) -> Result<Staging, ImageError> {
    let path = path.as_ref();

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(sanitize_filename::sanitize)
        .ok_or(ImageError::MissingFileName)?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    let bytes = tokio::fs::read(path).await?;
    let preview_data_url = format!("data:{};base64,{}", content_type, BASE64.encode(&bytes));

    log::debug!(
        "staged image '{}' ({} bytes, {})",
        file_name,
        bytes.len(),
        content_type
    );

    Ok(Staging {
        image: StagedImage {
            path: path.to_path_buf(),
            file_name,
            content_type,
            len: bytes.len() as u64,
        },
        preview_data_url,
    })
}
