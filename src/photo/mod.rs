//! Still photo capture.
//!
//! A one-shot asynchronous operation: acquire a full frame through the
//! currently bound device, generate a collision-free time-based filename,
//! and write the encoded image to shared storage as `image/jpeg`.

mod capture;
mod filename;
mod output;

pub use capture::{CaptureError, CapturedImage, PhotoCapture, JPEG_MIME_TYPE, PICTURES_RELATIVE_PATH};
pub use filename::FilenameGenerator;
pub use output::{CaptureConnection, CaptureOutput};
