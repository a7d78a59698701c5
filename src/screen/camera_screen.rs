//! The camera screen.

use tracing::{info, warn};

use crate::device::{CameraPlatform, LensSelection};
use crate::permission::{PermissionGate, CAMERA_PERMISSION};
use crate::photo::{CaptureError, CaptureOutput, CapturedImage, PhotoCapture};
use crate::preview::{PreviewOutput, PreviewSurface};
use crate::session::{CaptureSessionController, SessionError, SessionPhase};
use crate::storage::MediaStore;

use super::NoticeLog;

/// User-facing camera screen.
///
/// Until [`start`](CameraScreen::start) succeeds no camera component is
/// constructed: a denied permission or a failed provider resolution leaves
/// the screen inactive with only a notice to show for it. Once active, the
/// flip, torch and capture affordances delegate to the session controller,
/// and the lifecycle hooks release and restore the binding.
pub struct CameraScreen<G, Pl, S>
where
    G: PermissionGate,
    Pl: CameraPlatform,
    S: MediaStore + Clone,
{
    gate: G,
    platform: Pl,
    store: S,
    controller: Option<CaptureSessionController<Pl::Provider, S>>,
    surface: PreviewSurface,
    preview_output: PreviewOutput,
    notices: NoticeLog,
}

impl<G, Pl, S> CameraScreen<G, Pl, S>
where
    G: PermissionGate,
    Pl: CameraPlatform,
    S: MediaStore + Clone,
{
    /// Creates an inactive screen around its collaborators.
    pub fn new(gate: G, platform: Pl, store: S) -> Self {
        let (surface, preview_output) = PreviewSurface::new();
        Self {
            gate,
            platform,
            store,
            controller: None,
            surface,
            preview_output,
            notices: NoticeLog::new(),
        }
    }

    /// Whether the camera components have been constructed.
    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    /// The notice log; clone it to observe notices from elsewhere.
    pub fn notices(&self) -> &NoticeLog {
        &self.notices
    }

    /// The preview surface frames are rendered into.
    pub fn surface_mut(&mut self) -> &mut PreviewSurface {
        &mut self.surface
    }

    /// The session controller, once the screen is active.
    pub fn controller(&self) -> Option<&CaptureSessionController<Pl::Provider, S>> {
        self.controller.as_ref()
    }

    /// Requests the camera permission, resolves the device provider and
    /// binds the default back lens.
    ///
    /// Safe to call again after a failure; the user re-triggers it
    /// manually. On an active screen whose initial bind failed this retries
    /// the bind; once bound (or binding) it is a no-op.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if let Some(controller) = self.controller.as_ref() {
            if controller.phase() != SessionPhase::Unbound {
                return Ok(());
            }
            return match controller.resume().await {
                Ok(()) => Ok(()),
                Err(e) => {
                    self.notices.push(format!("failed to start camera: {e}"));
                    Err(e)
                }
            };
        }

        if !self.gate.request(&[CAMERA_PERMISSION]).await {
            self.notices
                .push("camera permission is required to take photos");
            return Err(SessionError::PermissionDenied);
        }

        let provider = match self.platform.acquire_provider().await {
            Ok(provider) => provider,
            Err(e) => {
                self.notices.push(format!("camera unavailable: {e}"));
                return Err(SessionError::ResolutionFailed(e));
            }
        };

        let photo = PhotoCapture::new(self.store.clone(), CaptureOutput::new());
        let controller =
            CaptureSessionController::new(provider, self.preview_output.clone(), photo);
        let bound = controller.set_lens_selection(LensSelection::default()).await;
        // Keep the controller either way: a failed initial bind leaves the
        // session unbound but retryable through the flip affordance.
        self.controller = Some(controller);
        match bound {
            Ok(()) => {
                info!("camera screen active");
                Ok(())
            }
            Err(e) => {
                self.notices.push(format!("failed to start camera: {e}"));
                Err(e)
            }
        }
    }

    /// Switches between the front and back lens.
    pub async fn flip_lens(&mut self) -> Result<LensSelection, SessionError> {
        let controller = self.controller.as_ref().ok_or(SessionError::NotActive)?;
        let next = controller.lens_selection().flipped();
        match controller.set_lens_selection(next).await {
            // Report the selection that actually settled; a concurrent
            // flip may have superseded ours.
            Ok(()) => Ok(controller.lens_selection()),
            Err(e) => {
                self.notices.push(format!("failed to switch camera: {e}"));
                Err(e)
            }
        }
    }

    /// Toggles the torch; returns the new state.
    pub fn toggle_flash(&mut self) -> Result<bool, SessionError> {
        let controller = self.controller.as_ref().ok_or(SessionError::NotActive)?;
        let enabled = !controller.flash_enabled();
        controller.set_flash_enabled(enabled);
        Ok(enabled)
    }

    /// Captures a photo to shared storage.
    pub async fn capture_photo(&mut self) -> Result<CapturedImage, CaptureError> {
        let Some(controller) = self.controller.as_ref() else {
            self.notices.push("camera is not ready");
            return Err(CaptureError::NoDeviceBound);
        };
        match controller.capture().await {
            Ok(image) => {
                self.notices
                    .push(format!("Photo capture succeeded: {}", image.uri));
                Ok(image)
            }
            Err(e) => {
                warn!("photo capture failed: {e}");
                self.notices.push(format!("Photo capture failed: {e}"));
                Err(e)
            }
        }
    }

    /// Host lifecycle stop: releases the binding, keeps the session.
    pub fn on_stop(&mut self) {
        if let Some(controller) = self.controller.as_ref() {
            controller.unbind();
        }
    }

    /// Host lifecycle resume: restores the binding for the current lens.
    pub async fn on_resume(&mut self) -> Result<(), SessionError> {
        let controller = self.controller.as_ref().ok_or(SessionError::NotActive)?;
        match controller.resume().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notices.push(format!("failed to resume camera: {e}"));
                Err(e)
            }
        }
    }

    /// Screen teardown: drops the controller, releasing the binding.
    pub fn close(&mut self) {
        if self.controller.take().is_some() {
            info!("camera screen closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockPlatform;
    use crate::permission::MockPermissionGate;
    use crate::storage::MemoryMediaStore;

    type MockScreen = CameraScreen<MockPermissionGate, MockPlatform, MemoryMediaStore>;

    fn screen(gate: MockPermissionGate, platform: MockPlatform) -> (MockScreen, MemoryMediaStore) {
        let store = MemoryMediaStore::new();
        (CameraScreen::new(gate, platform, store.clone()), store)
    }

    #[tokio::test]
    async fn test_denied_permission_constructs_nothing() {
        let platform = MockPlatform::new();
        let provider = platform.provider().clone();
        let (mut screen, _store) = screen(MockPermissionGate::denying(), platform);

        assert!(matches!(
            screen.start().await,
            Err(SessionError::PermissionDenied)
        ));
        assert!(!screen.is_active());
        assert!(!screen.notices().is_empty());
        assert_eq!(screen.platform.acquisition_count(), 0);
        assert_eq!(provider.bind_count(), 0);

        // Downstream operations are unreachable.
        assert!(matches!(
            screen.flip_lens().await,
            Err(SessionError::NotActive)
        ));
        assert!(matches!(
            screen.capture_photo().await,
            Err(CaptureError::NoDeviceBound)
        ));
    }

    #[tokio::test]
    async fn test_permission_request_retriggerable() {
        let (mut screen, _store) = screen(MockPermissionGate::denying(), MockPlatform::new());
        assert!(screen.start().await.is_err());

        screen.gate.set_granted(true);
        screen.start().await.unwrap();
        assert!(screen.is_active());
        assert_eq!(screen.gate.request_count(), 2);
    }

    #[tokio::test]
    async fn test_start_retries_after_failed_initial_bind() {
        let platform = MockPlatform::new();
        let provider = platform.provider().clone();
        provider.fail_next_bind();
        let (mut screen, _store) = screen(MockPermissionGate::granting(), platform);

        assert!(matches!(
            screen.start().await,
            Err(SessionError::BindingFailed(_))
        ));
        assert!(screen.is_active());
        assert_eq!(screen.controller().unwrap().phase(), SessionPhase::Unbound);

        screen.start().await.unwrap();
        assert_eq!(
            screen.controller().unwrap().bound_lens(),
            Some(LensSelection::Back)
        );
        // Permission and the provider were resolved once; only the bind
        // was repeated.
        assert_eq!(screen.gate.request_count(), 1);
        assert_eq!(screen.platform.acquisition_count(), 1);
    }

    #[tokio::test]
    async fn test_resolution_failure_surfaces_notice() {
        let platform = MockPlatform::new().failing_resolution();
        let (mut screen, _store) = screen(MockPermissionGate::granting(), platform);

        assert!(matches!(
            screen.start().await,
            Err(SessionError::ResolutionFailed(_))
        ));
        assert!(!screen.is_active());
        assert!(screen.notices().latest().unwrap().contains("camera unavailable"));
    }

    #[tokio::test]
    async fn test_grant_bind_capture_flow() {
        let (mut screen, store) = screen(MockPermissionGate::granting(), MockPlatform::new());

        screen.start().await.unwrap();
        let controller = screen.controller().unwrap();
        assert_eq!(controller.bound_lens(), Some(LensSelection::Back));

        let image = screen.capture_photo().await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert!(image
            .uri
            .as_str()
            .contains("Pictures/CameraApp/cameraApp"));
        assert!(store.find(&image.file_name).is_some());
        assert!(screen
            .notices()
            .latest()
            .unwrap()
            .starts_with("Photo capture succeeded: "));
    }

    #[tokio::test]
    async fn test_flip_and_flash_affordances() {
        let (mut screen, _store) = screen(MockPermissionGate::granting(), MockPlatform::new());
        screen.start().await.unwrap();

        assert_eq!(screen.flip_lens().await.unwrap(), LensSelection::Front);
        assert_eq!(screen.flip_lens().await.unwrap(), LensSelection::Back);

        assert!(screen.toggle_flash().unwrap());
        assert!(!screen.toggle_flash().unwrap());
    }

    #[tokio::test]
    async fn test_capture_failure_keeps_screen_usable() {
        let (mut screen, store) = screen(MockPermissionGate::granting(), MockPlatform::new());
        screen.start().await.unwrap();

        store.fail_next_create();
        assert!(screen.capture_photo().await.is_err());
        assert!(screen
            .notices()
            .latest()
            .unwrap()
            .starts_with("Photo capture failed: "));

        assert!(screen.capture_photo().await.is_ok());
    }

    #[tokio::test]
    async fn test_lifecycle_stop_and_resume() {
        let platform = MockPlatform::new();
        let provider = platform.provider().clone();
        let (mut screen, _store) = screen(MockPermissionGate::granting(), platform);
        screen.start().await.unwrap();

        screen.on_stop();
        assert_eq!(
            screen.controller().unwrap().phase(),
            SessionPhase::Unbound
        );
        assert_eq!(provider.live_handle_count(), 0);

        screen.on_resume().await.unwrap();
        assert_eq!(
            screen.controller().unwrap().bound_lens(),
            Some(LensSelection::Back)
        );
    }

    #[tokio::test]
    async fn test_close_releases_hardware() {
        let platform = MockPlatform::new();
        let provider = platform.provider().clone();
        let (mut screen, _store) = screen(MockPermissionGate::granting(), platform);
        screen.start().await.unwrap();
        assert_eq!(provider.live_handle_count(), 1);

        screen.close();
        assert!(!screen.is_active());
        assert_eq!(provider.live_handle_count(), 0);
    }
}
