//! Device provider and handle traits.
//!
//! These abstractions model the platform camera subsystem: a platform from
//! which a provider is resolved asynchronously, a provider that binds a lens
//! together with its preview and capture outputs, and a handle representing
//! the live hardware binding. Implementations exist for simulated hardware
//! ([`super::MockDeviceProvider`]); a real backend would wrap the OS camera
//! API behind the same traits.

use crate::photo::CaptureOutput;
use crate::preview::PreviewOutput;
use thiserror::Error;

use super::LensSelection;

/// Errors that can occur while resolving or binding camera devices.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The platform camera subsystem could not be resolved.
    #[error("camera provider unavailable: {0}")]
    ResolutionFailed(String),
    /// The requested lens could not be bound.
    #[error("failed to bind {lens} lens: {reason}")]
    BindingFailed {
        /// The lens that was being bound.
        lens: LensSelection,
        /// Backend-reported reason.
        reason: String,
    },
    /// The bound device has no controllable torch.
    #[error("torch unavailable: {0}")]
    TorchUnavailable(String),
}

/// One bind attempt: a lens plus the outputs to attach to it.
///
/// The generation tag identifies the rebind cycle that issued this request;
/// completions carrying a superseded generation are discarded by the
/// session controller, and capture connections carrying one are rejected
/// by [`CaptureOutput::connect`].
pub struct BindRequest {
    /// The lens to bind.
    pub lens: LensSelection,
    /// Generation of the rebind cycle issuing this request.
    pub generation: u64,
    /// Sink that receives live preview frames while the binding is active.
    pub preview: PreviewOutput,
    /// Capability through which still captures are taken.
    pub capture: CaptureOutput,
}

impl BindRequest {
    /// Creates a bind request for the given lens and outputs.
    pub fn new(
        lens: LensSelection,
        generation: u64,
        preview: PreviewOutput,
        capture: CaptureOutput,
    ) -> Self {
        Self {
            lens,
            generation,
            preview,
            capture,
        }
    }
}

/// A live hardware binding for one lens.
///
/// Exactly one handle is installed in the session controller at a time.
/// Dropping the handle releases the hardware, stops the preview stream and
/// detaches the capture connection.
pub trait DeviceHandle: Send {
    /// The lens this handle is bound to.
    fn lens(&self) -> LensSelection;

    /// Applies the torch (continuous illumination) state to the device.
    fn set_torch(&self, enabled: bool) -> Result<(), DeviceError>;
}

/// Provider for camera device bindings.
///
/// The analog of the platform's lifecycle-aware camera provider. `bind` is
/// asynchronous; a request may be superseded by a newer one before its
/// completion lands, which is why requests carry a generation tag.
#[allow(async_fn_in_trait)]
pub trait DeviceProvider: Send + Sync {
    /// Handle type representing a live binding.
    type Handle: DeviceHandle;

    /// Binds the requested lens and attaches the preview and capture
    /// outputs to it. Long-running hardware work happens off the calling
    /// task; the completion is delivered back through the returned future.
    async fn bind(&self, request: BindRequest) -> Result<Self::Handle, DeviceError>;

    /// Releases every binding the provider still holds.
    fn unbind_all(&self);
}

/// Entry point to the platform camera subsystem.
///
/// Resolved exactly once per screen activation, before any binding.
#[allow(async_fn_in_trait)]
pub trait CameraPlatform {
    /// The provider type this platform resolves.
    type Provider: DeviceProvider;

    /// Resolves a handle to the camera subsystem.
    ///
    /// Fails with [`DeviceError::ResolutionFailed`] when the subsystem is
    /// unavailable (e.g. hardware absent); the caller surfaces this to the
    /// user and leaves no device bound.
    async fn acquire_provider(&self) -> Result<Self::Provider, DeviceError>;
}
