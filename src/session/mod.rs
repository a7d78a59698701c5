//! Capture session lifecycle.
//!
//! The controller owns the mutable session state (lens selection, flash,
//! the single device handle slot) and coordinates the asynchronous
//! unbind-then-bind cycle every selection change triggers.

mod controller;

pub use controller::{CaptureSessionController, SessionError, SessionPhase};
