//! In-memory media store for tests and demos.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::{MediaMetadata, MediaStore, MediaTarget, MediaUri, StorageError};

/// A media entry held by a [`MemoryMediaStore`].
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// Metadata the entry was created with.
    pub metadata: MediaMetadata,
    /// The written bytes.
    pub bytes: Vec<u8>,
    /// Resolved location.
    pub uri: MediaUri,
}

#[derive(Default)]
struct StoreInner {
    entries: Mutex<Vec<StoredEntry>>,
    fail_next_create: AtomicBool,
}

/// In-memory [`MediaStore`].
///
/// Clones share the same backing storage, so a test can keep a handle and
/// inspect what the capture pipeline wrote. URIs are shaped
/// `mem://<relative_path>/<display_name>`.
#[derive(Clone, Default)]
pub struct MemoryMediaStore {
    inner: Arc<StoreInner>,
}

impl MemoryMediaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create` call fail, to exercise error paths.
    pub fn fail_next_create(&self) {
        self.inner.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Returns the number of completed entries.
    pub fn entry_count(&self) -> usize {
        self.lock_entries().len()
    }

    /// Returns a snapshot of all completed entries.
    pub fn entries(&self) -> Vec<StoredEntry> {
        self.lock_entries().clone()
    }

    /// Looks up a completed entry by display name.
    pub fn find(&self, display_name: &str) -> Option<StoredEntry> {
        self.lock_entries()
            .iter()
            .find(|e| e.metadata.display_name == display_name)
            .cloned()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<StoredEntry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl MediaStore for MemoryMediaStore {
    type Target = MemoryTarget;

    fn create(&self, metadata: &MediaMetadata) -> Result<Self::Target, StorageError> {
        if self.inner.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(StorageError::CreateFailed(
                "simulated media store failure".into(),
            ));
        }
        Ok(MemoryTarget {
            inner: Arc::clone(&self.inner),
            metadata: metadata.clone(),
            buffer: Vec::new(),
        })
    }
}

/// Write target produced by [`MemoryMediaStore`].
pub struct MemoryTarget {
    inner: Arc<StoreInner>,
    metadata: MediaMetadata,
    buffer: Vec<u8>,
}

impl MediaTarget for MemoryTarget {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    fn complete(self) -> Result<MediaUri, StorageError> {
        let uri = MediaUri::new(format!(
            "mem://{}/{}",
            self.metadata.relative_path, self.metadata.display_name
        ));
        debug!(uri = %uri, bytes = self.buffer.len(), "media entry completed");
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredEntry {
                metadata: self.metadata,
                bytes: self.buffer,
                uri: uri.clone(),
            });
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_write_complete() {
        let store = MemoryMediaStore::new();
        let metadata = MediaMetadata::image_jpeg("photo.jpg", "Pictures/CameraApp");

        let mut target = store.create(&metadata).unwrap();
        target.write_all(&[1, 2]).unwrap();
        target.write_all(&[3]).unwrap();
        let uri = target.complete().unwrap();

        assert_eq!(uri.as_str(), "mem://Pictures/CameraApp/photo.jpg");
        assert_eq!(store.entry_count(), 1);
        let entry = store.find("photo.jpg").unwrap();
        assert_eq!(entry.bytes, vec![1, 2, 3]);
        assert_eq!(entry.metadata.mime_type, "image/jpeg");
    }

    #[test]
    fn test_entry_visible_only_after_complete() {
        let store = MemoryMediaStore::new();
        let metadata = MediaMetadata::image_jpeg("photo.jpg", "Pictures");

        let mut target = store.create(&metadata).unwrap();
        target.write_all(&[9]).unwrap();
        assert_eq!(store.entry_count(), 0);

        target.complete().unwrap();
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let store = MemoryMediaStore::new();
        let metadata = MediaMetadata::image_jpeg("photo.jpg", "Pictures");

        store.fail_next_create();
        assert!(matches!(
            store.create(&metadata),
            Err(StorageError::CreateFailed(_))
        ));
        assert!(store.create(&metadata).is_ok());
    }
}
