//! Filesystem-backed media store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{MediaMetadata, MediaStore, MediaTarget, MediaUri, StorageError};

/// [`MediaStore`] writing entries under a root directory.
///
/// An entry described by `{ display_name, relative_path }` lands at
/// `<root>/<relative_path>/<display_name>`; directories are created as
/// needed. URIs are shaped `file://<absolute-ish path>`.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for FsMediaStore {
    type Target = FsTarget;

    fn create(&self, metadata: &MediaMetadata) -> Result<Self::Target, StorageError> {
        let dir = self.root.join(&metadata.relative_path);
        fs::create_dir_all(&dir).map_err(|e| StorageError::CreateFailed(e.to_string()))?;
        let path = dir.join(&metadata.display_name);
        let file = fs::File::create(&path).map_err(|e| StorageError::CreateFailed(e.to_string()))?;
        Ok(FsTarget {
            path,
            file,
            completed: false,
        })
    }
}

/// Write target produced by [`FsMediaStore`].
///
/// The entry only becomes visible through [`complete`](MediaTarget::complete);
/// a target dropped before then removes its partially written file.
pub struct FsTarget {
    path: PathBuf,
    file: fs::File,
    completed: bool,
}

impl MediaTarget for FsTarget {
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), StorageError> {
        self.file
            .write_all(bytes)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn complete(mut self) -> Result<MediaUri, StorageError> {
        self.file
            .flush()
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        self.completed = true;
        let uri = MediaUri::new(format!("file://{}", self.path.display()));
        debug!(uri = %uri, "media file completed");
        Ok(uri)
    }
}

impl Drop for FsTarget {
    fn drop(&mut self) {
        if !self.completed {
            debug!(path = %self.path.display(), "removing abandoned media file");
            let _ = fs::remove_file(&self.path);
        }
    }
}
