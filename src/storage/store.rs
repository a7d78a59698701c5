//! Media store traits and metadata types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while writing media to storage.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The store refused to create the entry.
    #[error("failed to create media entry: {0}")]
    CreateFailed(String),
    /// Writing the media bytes failed.
    #[error("failed to write media: {0}")]
    WriteFailed(String),
}

/// Metadata describing a media entry to be created.
///
/// The analog of the content values handed to the platform media index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// User-visible file name.
    pub display_name: String,
    /// MIME type of the content.
    pub mime_type: String,
    /// Logical folder the entry lives under, e.g. `Pictures/CameraApp`.
    pub relative_path: String,
}

impl MediaMetadata {
    /// Creates metadata from its parts.
    pub fn new(
        display_name: impl Into<String>,
        mime_type: impl Into<String>,
        relative_path: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            mime_type: mime_type.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Convenience constructor for a JPEG image entry.
    pub fn image_jpeg(display_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self::new(display_name, "image/jpeg", relative_path)
    }
}

/// Location of a stored media entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUri(String);

impl MediaUri {
    /// Creates a URI from a string.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Returns the URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An in-progress media write.
///
/// Completing the target makes the entry visible and yields its URI.
pub trait MediaTarget {
    /// Appends bytes to the entry.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError>;

    /// Finalizes the entry and returns its location.
    fn complete(self) -> Result<MediaUri, StorageError>;
}

/// Storage backend for captured media.
pub trait MediaStore: Send + Sync {
    /// The write target type this store produces.
    type Target: MediaTarget;

    /// Creates a new entry described by `metadata` and returns a target to
    /// write its bytes into.
    fn create(&self, metadata: &MediaMetadata) -> Result<Self::Target, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jpeg_metadata() {
        let metadata = MediaMetadata::image_jpeg("shot.jpg", "Pictures/CameraApp");
        assert_eq!(metadata.mime_type, "image/jpeg");
        assert_eq!(metadata.relative_path, "Pictures/CameraApp");
    }

    #[test]
    fn test_uri_display() {
        let uri = MediaUri::new("mem://Pictures/x.jpg");
        assert_eq!(uri.to_string(), "mem://Pictures/x.jpg");
        assert_eq!(uri.as_str(), "mem://Pictures/x.jpg");
    }
}
