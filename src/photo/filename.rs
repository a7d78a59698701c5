//! Time-based capture filenames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generates `cameraApp<timestamp-ms>.jpg` filenames.
///
/// Each name embeds a millisecond timestamp; when two captures land within
/// the same millisecond the second one is bumped past the first, so names
/// are strictly increasing and never collide.
#[derive(Debug, Default)]
pub struct FilenameGenerator {
    last_ms: AtomicU64,
}

impl FilenameGenerator {
    /// Creates a new generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next filename.
    pub fn next(&self) -> String {
        format!("cameraApp{}.jpg", self.next_timestamp())
    }

    fn next_timestamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut last = self.last_ms.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self.last_ms.compare_exchange(
                last,
                candidate,
                Ordering::SeqCst,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }
}
