//! Permission gate trait and mock.

use tracing::debug;

/// Identifier of the camera permission.
pub const CAMERA_PERMISSION: &str = "camera";

/// Asks the host OS for permissions.
///
/// The result is asynchronous and delivered once per request; there is no
/// retry logic here, the user re-triggers the request manually. An
/// OS-level denial is not distinguished from a dismissed prompt.
#[allow(async_fn_in_trait)]
pub trait PermissionGate {
    /// Presents the request affordance and resolves to the grant result.
    async fn request(&mut self, permissions: &[&str]) -> bool;
}

/// Mock gate with a fixed answer.
#[derive(Debug)]
pub struct MockPermissionGate {
    granted: bool,
    requests: u64,
}

impl MockPermissionGate {
    /// A gate that grants every request.
    pub fn granting() -> Self {
        Self {
            granted: true,
            requests: 0,
        }
    }

    /// A gate that denies every request.
    pub fn denying() -> Self {
        Self {
            granted: false,
            requests: 0,
        }
    }

    /// Changes the answer for subsequent requests, simulating the user
    /// granting from the OS settings between attempts.
    pub fn set_granted(&mut self, granted: bool) {
        self.granted = granted;
    }

    /// Number of requests presented so far.
    pub fn request_count(&self) -> u64 {
        self.requests
    }
}

impl PermissionGate for MockPermissionGate {
    async fn request(&mut self, permissions: &[&str]) -> bool {
        self.requests += 1;
        debug!(?permissions, granted = self.granted, "permission request resolved");
        self.granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_granting_gate() {
        let mut gate = MockPermissionGate::granting();
        assert!(gate.request(&[CAMERA_PERMISSION]).await);
        assert_eq!(gate.request_count(), 1);
    }

    #[tokio::test]
    async fn test_denied_then_granted() {
        let mut gate = MockPermissionGate::denying();
        assert!(!gate.request(&[CAMERA_PERMISSION]).await);

        gate.set_granted(true);
        assert!(gate.request(&[CAMERA_PERMISSION]).await);
        assert_eq!(gate.request_count(), 2);
    }
}
