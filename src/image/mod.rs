//! Screenshot loading and base64 encoding.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;

use crate::errors::{AnalysisError, IntentResult};

/// A screenshot encoded as standard base64 (RFC 4648 alphabet, padded, no
/// line breaks).
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Encodes raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(BASE64.encode(bytes))
    }

    /// Returns the base64 text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the base64 text.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for an empty image.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wraps the payload in a `data:` URL.
    ///
    /// The media type is always `image/png`, whatever the file's real format.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", mime::IMAGE_PNG, self.0)
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("base64_len", &self.0.len())
            .finish()
    }
}

/// Reads the file at `path` and base64-encodes its bytes.
///
/// The contents are not checked to be an image.
pub fn try_encode(path: impl AsRef<Path>) -> IntentResult<EncodedImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| AnalysisError::from_io(path, &e))?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Encoded image");
    Ok(EncodedImage::from_bytes(&bytes))
}

/// Reads and encodes the file at `path`, logging a diagnostic and returning
/// `None` on failure.
pub fn encode(path: impl AsRef<Path>) -> Option<EncodedImage> {
    let path = path.as_ref();
    match try_encode(path) {
        Ok(image) => Some(image),
        Err(AnalysisError::FileNotFound { .. }) => {
            tracing::error!(
                "오류: 이미지 파일을 찾을 수 없습니다. 경로: {}",
                path.display()
            );
            None
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode image");
            None
        }
    }
}
