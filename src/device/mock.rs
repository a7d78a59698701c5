//! Simulated camera hardware.
//!
//! Deterministic stand-ins for the platform camera subsystem, used by the
//! tests and the demo binary: configurable bind delays and injectable
//! failures make the rebind races and error paths reproducible.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info};

use crate::photo::{CaptureConnection, CaptureError, CaptureOutput};
use crate::preview::{Frame, PreviewOutput};

use super::{BindRequest, CameraPlatform, DeviceError, DeviceHandle, DeviceProvider, LensSelection};

/// Width of simulated preview frames.
pub const MOCK_FRAME_WIDTH: u32 = 320;
/// Height of simulated preview frames.
pub const MOCK_FRAME_HEIGHT: u32 = 240;

const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(33);

struct ProviderInner {
    bind_delays: Mutex<HashMap<LensSelection, Duration>>,
    frame_interval: Mutex<Duration>,
    shutter_delay: Mutex<Duration>,
    fail_next_bind: AtomicBool,
    sequence: AtomicU64,
    bind_count: AtomicU64,
    unbind_all_count: AtomicU64,
    live_handles: AtomicU64,
    torch: Mutex<HashMap<LensSelection, bool>>,
}

impl Default for ProviderInner {
    fn default() -> Self {
        Self {
            bind_delays: Mutex::new(HashMap::new()),
            frame_interval: Mutex::new(DEFAULT_FRAME_INTERVAL),
            shutter_delay: Mutex::new(Duration::ZERO),
            fail_next_bind: AtomicBool::new(false),
            sequence: AtomicU64::new(0),
            bind_count: AtomicU64::new(0),
            unbind_all_count: AtomicU64::new(0),
            live_handles: AtomicU64::new(0),
            torch: Mutex::new(HashMap::new()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated device provider.
///
/// Clones share state, so a test can keep one clone to configure and
/// observe while the session controller owns another. While a handle is
/// bound, a background task streams synthetic frames into the preview
/// output at the configured interval.
#[derive(Clone, Default)]
pub struct MockDeviceProvider {
    inner: Arc<ProviderInner>,
}

impl MockDeviceProvider {
    /// Creates a provider with instant binds and a 33ms frame interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the simulated bind latency for one lens.
    pub fn set_bind_delay(&self, lens: LensSelection, delay: Duration) {
        lock(&self.inner.bind_delays).insert(lens, delay);
    }

    /// Sets the interval between streamed preview frames.
    pub fn set_frame_interval(&self, interval: Duration) {
        *lock(&self.inner.frame_interval) = interval;
    }

    /// Sets the simulated shutter latency for still captures.
    pub fn set_shutter_delay(&self, delay: Duration) {
        *lock(&self.inner.shutter_delay) = delay;
    }

    /// Makes the next bind attempt fail.
    pub fn fail_next_bind(&self) {
        self.inner.fail_next_bind.store(true, Ordering::SeqCst);
    }

    /// Number of successful binds so far.
    pub fn bind_count(&self) -> u64 {
        self.inner.bind_count.load(Ordering::SeqCst)
    }

    /// Number of `unbind_all` calls so far.
    pub fn unbind_all_count(&self) -> u64 {
        self.inner.unbind_all_count.load(Ordering::SeqCst)
    }

    /// Number of handles currently alive.
    pub fn live_handle_count(&self) -> u64 {
        self.inner.live_handles.load(Ordering::SeqCst)
    }

    /// Last torch state applied to the given lens.
    pub fn torch_enabled(&self, lens: LensSelection) -> bool {
        lock(&self.inner.torch).get(&lens).copied().unwrap_or(false)
    }

    fn push_frame(inner: &Arc<ProviderInner>, preview: &PreviewOutput, lens: LensSelection) -> bool {
        let sequence = inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let frame = Frame::new(
            synthetic_pixels(MOCK_FRAME_WIDTH, MOCK_FRAME_HEIGHT, sequence),
            MOCK_FRAME_WIDTH,
            MOCK_FRAME_HEIGHT,
            sequence,
            lens,
        );
        preview.push(frame)
    }
}

impl DeviceProvider for MockDeviceProvider {
    type Handle = MockDeviceHandle;

    async fn bind(&self, request: BindRequest) -> Result<Self::Handle, DeviceError> {
        let delay = lock(&self.inner.bind_delays)
            .get(&request.lens)
            .copied()
            .unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_next_bind.swap(false, Ordering::SeqCst) {
            return Err(DeviceError::BindingFailed {
                lens: request.lens,
                reason: "simulated bind failure".into(),
            });
        }

        self.inner.bind_count.fetch_add(1, Ordering::SeqCst);
        self.inner.live_handles.fetch_add(1, Ordering::SeqCst);

        let connection = Arc::new(MockCaptureConnection {
            lens: request.lens,
            inner: Arc::clone(&self.inner),
        });
        request.capture.connect(request.generation, connection);

        // First frame lands synchronously with the bind, like the first
        // preview frame of a real device.
        Self::push_frame(&self.inner, &request.preview, request.lens);

        let stop = Arc::new(AtomicBool::new(false));
        let loop_inner = Arc::clone(&self.inner);
        let loop_stop = Arc::clone(&stop);
        let preview = request.preview.clone();
        let lens = request.lens;
        tokio::spawn(async move {
            loop {
                let interval = *lock(&loop_inner.frame_interval);
                tokio::time::sleep(interval).await;
                if loop_stop.load(Ordering::Relaxed) {
                    break;
                }
                if !MockDeviceProvider::push_frame(&loop_inner, &preview, lens) {
                    break;
                }
            }
        });

        info!(lens = %request.lens, generation = request.generation, "mock device bound");
        Ok(MockDeviceHandle {
            lens: request.lens,
            generation: request.generation,
            stop,
            capture: request.capture,
            inner: Arc::clone(&self.inner),
        })
    }

    fn unbind_all(&self) {
        self.inner.unbind_all_count.fetch_add(1, Ordering::SeqCst);
        debug!("mock provider unbind_all");
    }
}

/// Handle to a simulated bound device.
///
/// Dropping it stops the frame stream and detaches the capture connection
/// it installed.
pub struct MockDeviceHandle {
    lens: LensSelection,
    generation: u64,
    stop: Arc<AtomicBool>,
    capture: CaptureOutput,
    inner: Arc<ProviderInner>,
}

impl DeviceHandle for MockDeviceHandle {
    fn lens(&self) -> LensSelection {
        self.lens
    }

    fn set_torch(&self, enabled: bool) -> Result<(), DeviceError> {
        lock(&self.inner.torch).insert(self.lens, enabled);
        debug!(lens = %self.lens, enabled, "torch state applied");
        Ok(())
    }
}

impl Drop for MockDeviceHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.capture.disconnect(self.generation);
        self.inner.live_handles.fetch_sub(1, Ordering::SeqCst);
        debug!(lens = %self.lens, generation = self.generation, "mock device released");
    }
}

struct MockCaptureConnection {
    lens: LensSelection,
    inner: Arc<ProviderInner>,
}

impl CaptureConnection for MockCaptureConnection {
    fn acquire_frame(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CaptureError>> + Send + '_>> {
        Box::pin(async move {
            let shutter = *lock(&self.inner.shutter_delay);
            if !shutter.is_zero() {
                tokio::time::sleep(shutter).await;
            }
            let sequence = self.inner.sequence.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(synthetic_jpeg(self.lens, sequence))
        })
    }
}

/// Simulated camera platform, the entry point tests and the demo resolve
/// their provider from.
pub struct MockPlatform {
    provider: MockDeviceProvider,
    resolve_delay: Duration,
    fail_resolution: bool,
    acquisitions: Arc<AtomicU64>,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            provider: MockDeviceProvider::new(),
            resolve_delay: Duration::ZERO,
            fail_resolution: false,
            acquisitions: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl MockPlatform {
    /// Creates a platform that resolves instantly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every resolution attempt fail, simulating absent hardware.
    pub fn failing_resolution(mut self) -> Self {
        self.fail_resolution = true;
        self
    }

    /// Adds latency to provider resolution.
    pub fn with_resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = delay;
        self
    }

    /// The provider this platform hands out; configure and observe the
    /// simulated hardware through it.
    pub fn provider(&self) -> &MockDeviceProvider {
        &self.provider
    }

    /// Number of successful resolutions so far.
    pub fn acquisition_count(&self) -> u64 {
        self.acquisitions.load(Ordering::SeqCst)
    }
}

impl CameraPlatform for MockPlatform {
    type Provider = MockDeviceProvider;

    async fn acquire_provider(&self) -> Result<Self::Provider, DeviceError> {
        if !self.resolve_delay.is_zero() {
            tokio::time::sleep(self.resolve_delay).await;
        }
        if self.fail_resolution {
            return Err(DeviceError::ResolutionFailed(
                "camera hardware unavailable".into(),
            ));
        }
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        debug!("mock camera platform resolved");
        Ok(self.provider.clone())
    }
}

fn synthetic_pixels(width: u32, height: u32, sequence: u64) -> Vec<u8> {
    let count = (width as usize) * (height as usize);
    (0..count)
        .map(|i| ((i as u64 ^ sequence) % 256) as u8)
        .collect()
}

fn synthetic_jpeg(lens: LensSelection, sequence: u64) -> Vec<u8> {
    let marker = match lens {
        LensSelection::Front => 1u8,
        LensSelection::Back => 2u8,
    };
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0, marker];
    bytes.extend((0..64u64).map(|i| ((i ^ sequence) % 256) as u8));
    bytes.extend([0xFF, 0xD9]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewSurface;

    fn request(
        lens: LensSelection,
        generation: u64,
        preview: &PreviewOutput,
        capture: &CaptureOutput,
    ) -> BindRequest {
        BindRequest::new(lens, generation, preview.clone(), capture.clone())
    }

    #[tokio::test]
    async fn test_platform_resolution_counting() {
        let platform = MockPlatform::new();
        assert_eq!(platform.acquisition_count(), 0);
        platform.acquire_provider().await.unwrap();
        assert_eq!(platform.acquisition_count(), 1);
    }

    #[tokio::test]
    async fn test_platform_resolution_failure() {
        let platform = MockPlatform::new().failing_resolution();
        assert!(matches!(
            platform.acquire_provider().await,
            Err(DeviceError::ResolutionFailed(_))
        ));
        assert_eq!(platform.acquisition_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bind_streams_frames_until_release() {
        let provider = MockDeviceProvider::new();
        let (mut surface, output) = PreviewSurface::new();
        let capture = CaptureOutput::new();

        let handle = provider
            .bind(request(LensSelection::Back, 1, &output, &capture))
            .await
            .unwrap();
        assert_eq!(handle.lens(), LensSelection::Back);
        assert_eq!(provider.bind_count(), 1);
        assert_eq!(provider.live_handle_count(), 1);
        assert!(capture.is_connected());

        let first = surface.next_frame().await.unwrap();
        let second = surface.next_frame().await.unwrap();
        assert!(second.sequence() > first.sequence());
        assert_eq!(second.lens(), LensSelection::Back);

        drop(handle);
        assert_eq!(provider.live_handle_count(), 0);
        assert!(!capture.is_connected());

        // The stream stops once the stop flag is observed; drain anything
        // queued before the release and confirm nothing more arrives.
        tokio::time::advance(DEFAULT_FRAME_INTERVAL * 4).await;
        while surface.try_next_frame().is_some() {}
        tokio::time::advance(DEFAULT_FRAME_INTERVAL * 4).await;
        assert!(surface.try_next_frame().is_none());
    }

    #[tokio::test]
    async fn test_injected_bind_failure() {
        let provider = MockDeviceProvider::new();
        let (_surface, output) = PreviewSurface::new();
        let capture = CaptureOutput::new();

        provider.fail_next_bind();
        assert!(matches!(
            provider
                .bind(request(LensSelection::Front, 1, &output, &capture))
                .await,
            Err(DeviceError::BindingFailed { .. })
        ));
        assert!(!capture.is_connected());
        assert_eq!(provider.bind_count(), 0);

        // One-shot: the next bind succeeds.
        assert!(provider
            .bind(request(LensSelection::Front, 2, &output, &capture))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_torch_state_observable() {
        let provider = MockDeviceProvider::new();
        let (_surface, output) = PreviewSurface::new();
        let capture = CaptureOutput::new();

        let handle = provider
            .bind(request(LensSelection::Back, 1, &output, &capture))
            .await
            .unwrap();
        assert!(!provider.torch_enabled(LensSelection::Back));
        handle.set_torch(true).unwrap();
        assert!(provider.torch_enabled(LensSelection::Back));
        handle.set_torch(false).unwrap();
        assert!(!provider.torch_enabled(LensSelection::Back));
    }

    #[tokio::test]
    async fn test_still_capture_carries_jpeg_magic() {
        let provider = MockDeviceProvider::new();
        let (_surface, output) = PreviewSurface::new();
        let capture = CaptureOutput::new();

        let _handle = provider
            .bind(request(LensSelection::Back, 1, &output, &capture))
            .await
            .unwrap();
        let bytes = capture.acquire_frame().await.unwrap();
        assert_eq!(bytes[..2], [0xFF, 0xD8]);
        assert_eq!(bytes[bytes.len() - 2..], [0xFF, 0xD9]);
    }
}
