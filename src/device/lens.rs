//! Lens selection type.

use serde::{Deserialize, Serialize};

/// Which physical camera sensor is active.
///
/// A single current value is owned by the capture session controller;
/// changing it invalidates the active device binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensSelection {
    /// The user-facing sensor.
    Front,
    /// The world-facing sensor.
    Back,
}

impl Default for LensSelection {
    /// The back lens is the platform default.
    fn default() -> Self {
        LensSelection::Back
    }
}

impl LensSelection {
    /// Returns the opposite lens, used by the flip affordance.
    pub fn flipped(self) -> Self {
        match self {
            LensSelection::Front => LensSelection::Back,
            LensSelection::Back => LensSelection::Front,
        }
    }
}

impl std::fmt::Display for LensSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LensSelection::Front => f.write_str("front"),
            LensSelection::Back => f.write_str("back"),
        }
    }
}
