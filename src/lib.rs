//! Camera Capture Session Library
//!
//! A lifecycle-aware camera capture session: permission-gated access to a
//! device provider, a live preview stream, front/back lens switching, a
//! torch toggle, and one-shot photo capture to shared storage.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! permission → session controller → device provider
//!                    │                    │
//!                    └── bind(lens) ──────┤
//!                                         ├→ preview surface (continuous)
//!                                         └→ photo capture (on demand)
//! ```
//!
//! # Design Principles
//!
//! - **Permission-gated**: no camera component exists until the gate
//!   reports granted
//! - **Last selection wins**: rebind cycles carry a generation tag, so a
//!   superseded bind completion is discarded, never installed
//! - **Scoped acquisition**: a device handle is released by dropping it,
//!   on rebind, lifecycle stop and teardown alike
//! - **Nothing is fatal**: every failure surfaces as a transient notice
//!   and the user re-triggers the action
//!
//! # Example
//!
//! ```no_run
//! use camera_session::{
//!     CameraScreen, MemoryMediaStore, MockPermissionGate, MockPlatform,
//! };
//!
//! # async fn demo() {
//! let mut screen = CameraScreen::new(
//!     MockPermissionGate::granting(),
//!     MockPlatform::new(),
//!     MemoryMediaStore::new(),
//! );
//!
//! // Request permission, resolve the provider, bind the back lens.
//! screen.start().await.unwrap();
//!
//! // Render the live feed.
//! let frame = screen.surface_mut().next_frame().await.unwrap();
//! println!("previewing {}x{}", frame.width(), frame.height());
//!
//! // Flip to the front lens, light the torch, take a photo.
//! screen.flip_lens().await.unwrap();
//! screen.toggle_flash().unwrap();
//! let image = screen.capture_photo().await.unwrap();
//! println!("saved to {}", image.uri);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod device;
pub mod permission;
pub mod photo;
pub mod preview;
pub mod screen;
pub mod session;
pub mod storage;

// Re-export commonly used types at crate root
pub use device::{
    BindRequest, CameraPlatform, DeviceError, DeviceHandle, DeviceProvider, LensSelection,
    MockDeviceProvider, MockPlatform,
};
pub use permission::{MockPermissionGate, PermissionGate, CAMERA_PERMISSION};
pub use photo::{CaptureError, CaptureOutput, CapturedImage, FilenameGenerator, PhotoCapture};
pub use preview::{Frame, PreviewOutput, PreviewSurface};
pub use screen::{CameraScreen, NoticeLog};
pub use session::{CaptureSessionController, SessionError, SessionPhase};
pub use storage::{
    FsMediaStore, MediaMetadata, MediaStore, MediaTarget, MediaUri, MemoryMediaStore, StorageError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
