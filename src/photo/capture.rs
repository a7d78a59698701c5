//! Photo capture operation and its artifact type.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::storage::{MediaMetadata, MediaStore, MediaTarget, MediaUri, StorageError};

use super::{CaptureOutput, FilenameGenerator};

/// MIME type of captured photos.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// Logical folder captured photos are written under.
pub const PICTURES_RELATIVE_PATH: &str = "Pictures/CameraApp";

/// Errors that can occur during photo capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A lens rebind is in flight; the capture was rejected rather than
    /// allowed to race the unbind.
    #[error("capture rejected: lens rebind in progress")]
    BindingInProgress,
    /// No camera device is currently bound.
    #[error("no camera device is bound")]
    NoDeviceBound,
    /// The device failed to deliver a frame.
    #[error("failed to acquire frame: {0}")]
    Frame(String),
    /// Writing the image to storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A successfully captured photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedImage {
    /// Generated file name, e.g. `cameraApp1692800000000.jpg`.
    pub file_name: String,
    /// MIME type, always `image/jpeg`.
    pub mime_type: String,
    /// Logical folder the photo was written under.
    pub relative_path: String,
    /// Resolved storage location.
    pub uri: MediaUri,
}

/// One-shot photo capture against the currently bound device.
///
/// Each call independently generates its own filename, acquires a frame
/// through the [`CaptureOutput`] and writes it to the store. Failures are
/// returned to the caller; nothing is retried and no partial file is
/// reported as success.
pub struct PhotoCapture<S: MediaStore> {
    store: S,
    output: CaptureOutput,
    filenames: FilenameGenerator,
}

impl<S: MediaStore> PhotoCapture<S> {
    /// Creates a capture operation writing into `store` and shooting
    /// through `output`.
    pub fn new(store: S, output: CaptureOutput) -> Self {
        Self {
            store,
            output,
            filenames: FilenameGenerator::new(),
        }
    }

    /// Returns the capture capability handed to device binds.
    pub fn output(&self) -> &CaptureOutput {
        &self.output
    }

    /// Captures a single photo to shared storage.
    pub async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        let bytes = self.output.acquire_frame().await?;
        let metadata =
            MediaMetadata::image_jpeg(self.filenames.next(), PICTURES_RELATIVE_PATH);
        let mut target = self.store.create(&metadata)?;
        target.write_all(&bytes)?;
        let uri = target.complete()?;
        info!(uri = %uri, bytes = bytes.len(), "photo capture succeeded");
        Ok(CapturedImage {
            file_name: metadata.display_name,
            mime_type: metadata.mime_type,
            relative_path: metadata.relative_path,
            uri,
        })
    }
}
