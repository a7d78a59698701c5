//! Camera screen shell.
//!
//! Wires the permission gate, the platform provider, the session
//! controller and the preview surface into the user-facing flow: request
//! permission, show the preview, flip lenses, toggle the torch, capture a
//! photo. Every failure becomes a transient user-visible notice; none is
//! fatal.

mod camera_screen;
mod notice;

pub use camera_screen::CameraScreen;
pub use notice::NoticeLog;
