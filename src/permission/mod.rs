//! Camera permission gating.
//!
//! All camera activity sits behind a single granted/denied boolean. The
//! OS prompt itself is an external collaborator; this module provides the
//! gate contract and a mock for tests and demos.

mod gate;

pub use gate::{MockPermissionGate, PermissionGate, CAMERA_PERMISSION};
