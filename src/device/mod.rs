//! Camera device access.
//!
//! This module provides trait-based abstractions over the platform camera
//! subsystem: a provider that is resolved asynchronously once per screen
//! activation, and device handles whose ownership scopes the underlying
//! hardware binding (drop = release).

mod lens;
mod mock;
mod provider;

pub use lens::LensSelection;
pub use mock::{
    MockDeviceHandle, MockDeviceProvider, MockPlatform, MOCK_FRAME_HEIGHT, MOCK_FRAME_WIDTH,
};
pub use provider::{BindRequest, CameraPlatform, DeviceError, DeviceHandle, DeviceProvider};
