//! Capture session controller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::device::{BindRequest, DeviceError, DeviceHandle, DeviceProvider, LensSelection};
use crate::photo::{CaptureError, CapturedImage, PhotoCapture};
use crate::preview::PreviewOutput;
use crate::storage::MediaStore;

/// Errors that can occur in the capture session lifecycle.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The user declined the camera permission.
    #[error("camera permission denied")]
    PermissionDenied,
    /// The platform camera subsystem could not be resolved.
    #[error("camera provider resolution failed: {0}")]
    ResolutionFailed(DeviceError),
    /// Binding the requested lens failed; the session reverts to unbound.
    #[error("lens binding failed: {0}")]
    BindingFailed(DeviceError),
    /// The screen has not been started, or start did not succeed.
    #[error("camera session is not active")]
    NotActive,
}

/// Observable state of the session's binding machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No device handle held.
    Unbound,
    /// A bind is in flight.
    Binding,
    /// A device handle is installed and live.
    Bound,
}

struct SessionState<H> {
    phase: SessionPhase,
    lens: LensSelection,
    flash_enabled: bool,
    handle: Option<H>,
}

/// Owns the capture session: current lens selection, flash state and the
/// live device handle.
///
/// Every selection change runs an atomic unbind-then-bind cycle. Each
/// cycle is tagged with a generation taken from a monotonic counter; a
/// bind completion whose generation is no longer current is discarded
/// rather than installed, so the most recently requested selection always
/// wins regardless of completion order.
///
/// Methods take `&self`; the state lock is never held across an await
/// point, so overlapping calls from a single event loop are safe.
pub struct CaptureSessionController<P: DeviceProvider, S: MediaStore> {
    provider: P,
    preview: PreviewOutput,
    photo: PhotoCapture<S>,
    state: Mutex<SessionState<P::Handle>>,
    generation: AtomicU64,
}

impl<P: DeviceProvider, S: MediaStore> CaptureSessionController<P, S> {
    /// Creates an unbound controller around a resolved provider.
    pub fn new(provider: P, preview: PreviewOutput, photo: PhotoCapture<S>) -> Self {
        Self {
            provider,
            preview,
            photo,
            state: Mutex::new(SessionState {
                phase: SessionPhase::Unbound,
                lens: LensSelection::default(),
                flash_enabled: false,
                handle: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Current binding phase.
    pub fn phase(&self) -> SessionPhase {
        self.lock_state().phase
    }

    /// Whether a device handle is currently installed.
    pub fn is_bound(&self) -> bool {
        self.phase() == SessionPhase::Bound
    }

    /// The most recently requested lens selection.
    pub fn lens_selection(&self) -> LensSelection {
        self.lock_state().lens
    }

    /// The lens of the installed handle, if any.
    pub fn bound_lens(&self) -> Option<LensSelection> {
        self.lock_state().handle.as_ref().map(|h| h.lens())
    }

    /// The recorded flash state.
    pub fn flash_enabled(&self) -> bool {
        self.lock_state().flash_enabled
    }

    /// Records a new lens selection and runs the rebind cycle.
    ///
    /// The current handle is released before the provider binds the new
    /// selection. If a newer selection supersedes this one while its bind
    /// is in flight, the stale completion is discarded and `Ok(())` is
    /// returned; the newer cycle owns the final state. On bind failure
    /// the session reverts to [`SessionPhase::Unbound`] and the error is
    /// returned.
    pub async fn set_lens_selection(&self, lens: LensSelection) -> Result<(), SessionError> {
        let (generation, released) = {
            let mut state = self.lock_state();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.lens = lens;
            state.phase = SessionPhase::Binding;
            (generation, state.handle.take())
        };
        drop(released);
        self.provider.unbind_all();
        debug!(lens = %lens, generation, "rebinding capture session");

        let result = self
            .provider
            .bind(BindRequest::new(
                lens,
                generation,
                self.preview.clone(),
                self.photo.output().clone(),
            ))
            .await;

        let mut state = self.lock_state();
        if self.generation.load(Ordering::SeqCst) != generation {
            // A newer request supersedes this cycle; its completion owns
            // the session state, ours gets dropped on the floor.
            debug!(lens = %lens, generation, "discarding superseded bind completion");
            return Ok(());
        }
        match result {
            Ok(handle) => {
                if state.flash_enabled {
                    if let Err(e) = handle.set_torch(true) {
                        warn!("failed to re-apply torch after rebind: {e}");
                    }
                }
                state.handle = Some(handle);
                state.phase = SessionPhase::Bound;
                info!(lens = %lens, "capture session bound");
                Ok(())
            }
            Err(e) => {
                state.handle = None;
                state.phase = SessionPhase::Unbound;
                warn!(lens = %lens, "bind failed: {e}");
                Err(SessionError::BindingFailed(e))
            }
        }
    }

    /// Records the flash state and applies it to the bound device.
    ///
    /// While unbound this only records the flag; it is re-applied
    /// best-effort after the next successful bind. Torch failures are
    /// logged, never fatal.
    pub fn set_flash_enabled(&self, enabled: bool) {
        let mut state = self.lock_state();
        state.flash_enabled = enabled;
        match &state.handle {
            Some(handle) => {
                if let Err(e) = handle.set_torch(enabled) {
                    warn!("torch toggle failed: {e}");
                }
            }
            None => {
                debug!(enabled, "flash recorded while unbound; applied on next bind");
            }
        }
    }

    /// Captures a single photo through the bound device.
    ///
    /// Rejected while a rebind is in flight rather than allowed to race
    /// the unbind. A capture failure leaves the session bound and usable
    /// for a retry.
    pub async fn capture(&self) -> Result<CapturedImage, CaptureError> {
        match self.phase() {
            SessionPhase::Bound => {}
            SessionPhase::Binding => return Err(CaptureError::BindingInProgress),
            SessionPhase::Unbound => return Err(CaptureError::NoDeviceBound),
        }
        self.photo.capture().await
    }

    /// Releases the binding (host lifecycle stop).
    ///
    /// Bumps the generation so an in-flight bind completion cannot land
    /// afterwards.
    pub fn unbind(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let released = {
            let mut state = self.lock_state();
            state.phase = SessionPhase::Unbound;
            state.handle.take()
        };
        drop(released);
        self.provider.unbind_all();
        info!("capture session unbound");
    }

    /// Rebinds the current selection (host lifecycle resume).
    pub async fn resume(&self) -> Result<(), SessionError> {
        let lens = self.lens_selection();
        self.set_lens_selection(lens).await
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState<P::Handle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: DeviceProvider, S: MediaStore> Drop for CaptureSessionController<P, S> {
    fn drop(&mut self) {
        self.unbind();
    }
}
