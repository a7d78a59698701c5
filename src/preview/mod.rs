//! Live preview surface and frame types.
//!
//! The preview surface is a passive rendering target: the session
//! controller hands its output to the device provider at bind time and the
//! bound device streams frames into it for as long as the binding lives.

mod frame;
mod surface;

pub use frame::Frame;
pub use surface::{PreviewOutput, PreviewSurface};
