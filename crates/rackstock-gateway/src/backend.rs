//! Backend interface for generative model calls.

use crate::error::GatewayError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Image payload sent inline with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, guessing its MIME type from the extension.
    pub async fn load(path: &Path) -> Result<Self, GatewayError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(bytes, mime_type_for_path(path)))
    }
}

/// MIME type for an image path; unknown extensions are sent as JPEG.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        _ => "image/jpeg",
    }
}

/// A single generate call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    /// User-turn text (the question, or the extraction prompt).
    pub text: String,
    /// Optional inline image placed before the text.
    pub image: Option<ImageInput>,
    /// Optional system instruction.
    pub system_instruction: Option<String>,
    /// When set, the response is constrained to JSON matching this schema.
    pub response_schema: Option<Value>,
}

/// A generative model reachable over some transport.
///
/// Implementations return the concatenated response text, which may be empty
/// when the model produced nothing.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;
    async fn generate(&self, request: GenerateRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::{ImageInput, mime_type_for_path};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/label.PNG")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("label.webp")), "image/webp");
        assert_eq!(mime_type_for_path(Path::new("label.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("label")), "image/jpeg");
    }

    #[tokio::test]
    async fn load_reads_bytes_and_type() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("shot.png");
        std::fs::write(&path, [1u8, 2, 3]).expect("write");
        let image = ImageInput::load(&path).await.expect("load");
        assert_eq!(image, ImageInput::new(vec![1, 2, 3], "image/png"));
    }
}
