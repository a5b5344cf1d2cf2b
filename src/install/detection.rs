//! Installation state detection
//!
//! The only component that matters is the delegate binary at its expected
//! path; its presence makes a reinstall a no-op.

use std::path::Path;

/// Installation state enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    /// No binary at the expected path
    NotInstalled,
    /// Binary present at the expected path
    Installed,
}

/// Check whether `binary_path` already holds the delegate binary
pub fn check_installation_state(binary_path: &Path) -> InstallationState {
    if binary_path.is_file() {
        InstallationState::Installed
    } else {
        InstallationState::NotInstalled
    }
}
