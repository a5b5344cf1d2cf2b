//! Executable bit normalization for the extracted binary

use std::path::Path;

/// Mode applied to the delegate binary on unix hosts
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Mark `binary` executable (0755) where the platform has permission bits
///
/// Returns whether the mode was applied. A failure is logged, never returned.
pub fn ensure_executable(binary: &Path) -> bool {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            use std::os::unix::fs::PermissionsExt;

            match std::fs::set_permissions(binary, std::fs::Permissions::from_mode(EXECUTABLE_MODE)) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!(
                        "Could not set executable permissions on {}: {e}",
                        binary.display()
                    );
                    false
                }
            }
        } else {
            // Executability follows the .exe extension
            let _ = binary;
            true
        }
    }
}
