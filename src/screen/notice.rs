//! Transient user-facing notices.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;

/// Collects transient notices shown to the user.
///
/// Stands in for the platform's toast mechanism: cloneable, so the screen
/// pushes into it while tests and callers inspect it.
#[derive(Clone, Default)]
pub struct NoticeLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl NoticeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a notice to the user.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        info!(notice = %message, "user notice");
        self.lock().push(message);
    }

    /// The most recent notice, if any.
    pub fn latest(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// All notices shown so far, oldest first.
    pub fn all(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Whether no notice has been shown.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
