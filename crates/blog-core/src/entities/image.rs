//! Image upload types exchanged with the image store

use crate::error::DomainError;

/// Raw image handed to an [`ImageStore`](crate::traits::ImageStore)
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: Option<String>, content_type: String, bytes: Vec<u8>) -> Self {
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Canonical content type and extension for the accepted raster formats.
    /// Parameters and case in the declared content type are ignored.
    pub fn image_format(&self) -> Option<(&'static str, &'static str)> {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        ACCEPTED_IMAGE_TYPES
            .iter()
            .find(|(names, _, _)| names.contains(&essence.as_str()))
            .map(|(_, mime, ext)| (*mime, *ext))
    }

    /// Reject unsupported content types, empty payloads and oversized files.
    /// Returns the canonical content type and extension to store the image
    /// under; the client filename never picks the extension.
    pub fn validate(&self, max_bytes: usize) -> Result<(&'static str, &'static str), DomainError> {
        let format = self
            .image_format()
            .ok_or_else(|| DomainError::UnsupportedImageType(self.content_type.clone()))?;
        if self.bytes.is_empty() {
            return Err(DomainError::ValidationError("Image is empty".to_string()));
        }
        if self.size() > max_bytes {
            return Err(DomainError::ImageTooLarge { max_bytes });
        }
        Ok(format)
    }
}

/// Declared content types, canonical content type, stored extension
const ACCEPTED_IMAGE_TYPES: &[(&[&str], &str, &str)] = &[
    (&["image/jpeg", "image/jpg", "image/pjpeg"], "image/jpeg", "jpg"),
    (&["image/png"], "image/png", "png"),
    (&["image/gif"], "image/gif", "gif"),
    (&["image/webp"], "image/webp", "webp"),
];

/// An image persisted by the image store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Provider-specific key used to delete the image later
    pub key: String,
    pub url: String,
    pub content_type: String,
    pub size: usize,
}
