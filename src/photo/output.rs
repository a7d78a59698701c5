//! Capture output capability.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::capture::CaptureError;

/// Live connection from the capture capability to a bound device.
///
/// Installed by the device provider when a bind completes, detached when
/// the corresponding handle is released.
pub trait CaptureConnection: Send + Sync {
    /// Acquires one full-resolution encoded frame from the device.
    fn acquire_frame(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CaptureError>> + Send + '_>>;
}

#[derive(Default)]
struct ConnectionSlot {
    /// Generation of the bind that installed the current connection.
    generation: u64,
    connection: Option<Arc<dyn CaptureConnection>>,
}

/// One-shot-invocable capture capability.
///
/// Independent of lens selection and flash state: it shoots through
/// whichever device connection is currently installed. Connections carry
/// the generation of the bind that produced them, so a completion from a
/// superseded bind can never displace the current device.
#[derive(Clone, Default)]
pub struct CaptureOutput {
    slot: Arc<Mutex<ConnectionSlot>>,
}

impl CaptureOutput {
    /// Creates a disconnected capture output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a connection produced by the bind tagged `generation`.
    ///
    /// Returns `false` (and leaves the slot untouched) when a newer bind
    /// has already installed its connection.
    pub fn connect(&self, generation: u64, connection: Arc<dyn CaptureConnection>) -> bool {
        let mut slot = self.lock_slot();
        if generation < slot.generation {
            debug!(
                generation,
                current = slot.generation,
                "rejecting capture connection from superseded bind"
            );
            return false;
        }
        slot.generation = generation;
        slot.connection = Some(connection);
        true
    }

    /// Detaches the connection installed by the bind tagged `generation`.
    ///
    /// A release racing a newer bind is a no-op: only the generation that
    /// owns the slot may clear it.
    pub fn disconnect(&self, generation: u64) {
        let mut slot = self.lock_slot();
        if slot.generation == generation {
            slot.connection = None;
        }
    }

    /// Whether a device connection is currently installed.
    pub fn is_connected(&self) -> bool {
        self.lock_slot().connection.is_some()
    }

    /// Acquires one encoded frame through the current connection.
    pub(crate) async fn acquire_frame(&self) -> Result<Vec<u8>, CaptureError> {
        let connection = self
            .lock_slot()
            .connection
            .clone()
            .ok_or(CaptureError::NoDeviceBound)?;
        connection.acquire_frame().await
    }

    fn lock_slot(&self) -> std::sync::MutexGuard<'_, ConnectionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedConnection(Vec<u8>);

    impl CaptureConnection for FixedConnection {
        fn acquire_frame(
            &self,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, CaptureError>> + Send + '_>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }
    }

    #[tokio::test]
    async fn test_acquire_without_connection() {
        let output = CaptureOutput::new();
        assert!(!output.is_connected());
        assert!(matches!(
            output.acquire_frame().await,
            Err(CaptureError::NoDeviceBound)
        ));
    }

    #[tokio::test]
    async fn test_acquire_through_connection() {
        let output = CaptureOutput::new();
        assert!(output.connect(1, Arc::new(FixedConnection(vec![7, 8]))));
        assert_eq!(output.acquire_frame().await.unwrap(), vec![7, 8]);
    }

    #[test]
    fn test_superseded_connection_rejected() {
        let output = CaptureOutput::new();
        assert!(output.connect(2, Arc::new(FixedConnection(vec![2]))));
        // A slow bind from generation 1 lands late: it must not displace
        // the generation 2 connection.
        assert!(!output.connect(1, Arc::new(FixedConnection(vec![1]))));
        assert!(output.is_connected());
    }

    #[test]
    fn test_disconnect_requires_owning_generation() {
        let output = CaptureOutput::new();
        output.connect(2, Arc::new(FixedConnection(vec![2])));

        output.disconnect(1); // stale release, ignored
        assert!(output.is_connected());

        output.disconnect(2);
        assert!(!output.is_connected());
    }
}
