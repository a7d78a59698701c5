//! Shared-storage seam for captured media.
//!
//! Models the platform media index: a store accepts display name, MIME
//! type and relative path, hands back a writable target, and resolves to a
//! URI once the write completes. An in-memory store backs the tests and
//! the demo; a filesystem store writes real files under a root directory.

mod fs;
mod memory;
mod store;

pub use fs::FsMediaStore;
pub use memory::{MemoryMediaStore, StoredEntry};
pub use store::{MediaMetadata, MediaStore, MediaTarget, MediaUri, StorageError};
