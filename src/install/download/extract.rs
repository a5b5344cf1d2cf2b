//! Archive extraction for release formats
//!
//! `.tar.gz` for linux/macos, `.zip` for windows. Both paths refuse entries
//! that would land outside the destination directory.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, warn};
use tar::Archive;
use zip::ZipArchive;

use super::platform::Platform;
use crate::error::InstallError;

/// Extract `archive` into `destination` and return the path of the delegate binary
///
/// Runs on the blocking pool; the binary must sit at the archive root.
pub async fn extract_archive(
    archive: &Path,
    destination: &Path,
    platform: Platform,
) -> Result<PathBuf, InstallError> {
    let archive_path = archive.to_path_buf();
    let destination_path = destination.to_path_buf();

    tokio::task::spawn_blocking(move || match platform {
        Platform::Windows => unpack_zip(&archive_path, &destination_path),
        Platform::Linux | Platform::MacOs => unpack_tar_gz(&archive_path, &destination_path),
    })
    .await
    .map_err(|e| InstallError::ExtractionFailed {
        archive: archive.to_path_buf(),
        code: None,
        reason: format!("extraction task failed: {e}"),
    })??;

    let binary = destination.join(platform.binary_name());
    if !tokio::fs::try_exists(&binary).await.unwrap_or(false) {
        return Err(InstallError::BinaryMissing {
            archive: archive.to_path_buf(),
            binary: platform.binary_name().to_string(),
        });
    }

    debug!("Extracted {}", binary.display());
    Ok(binary)
}

fn unpack_tar_gz(archive: &Path, destination: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(destination).map_err(|e| InstallError::io(destination, e))?;

    let file = File::open(archive).map_err(|e| extraction_failed(archive, e))?;
    let mut tar = Archive::new(GzDecoder::new(file));
    tar.set_preserve_permissions(true);
    tar.set_overwrite(true);
    tar.unpack(destination).map_err(|e| extraction_failed(archive, e))
}

fn unpack_zip(archive: &Path, destination: &Path) -> Result<(), InstallError> {
    std::fs::create_dir_all(destination).map_err(|e| InstallError::io(destination, e))?;

    let file = File::open(archive).map_err(|e| extraction_failed(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| zip_failed(archive, e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| zip_failed(archive, e))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| entry_failed(archive, &out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| entry_failed(archive, parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| entry_failed(archive, &out_path, e))?;
        std::io::copy(&mut entry, &mut out).map_err(|e| extraction_failed(archive, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| entry_failed(archive, &out_path, e))?;
            }
        }
    }

    Ok(())
}

fn extraction_failed(archive: &Path, e: std::io::Error) -> InstallError {
    InstallError::ExtractionFailed {
        archive: archive.to_path_buf(),
        code: e.raw_os_error(),
        reason: e.to_string(),
    }
}

fn entry_failed(archive: &Path, path: &Path, e: std::io::Error) -> InstallError {
    InstallError::ExtractionFailed {
        archive: archive.to_path_buf(),
        code: e.raw_os_error(),
        reason: format!("{}: {e}", path.display()),
    }
}

fn zip_failed(archive: &Path, e: zip::result::ZipError) -> InstallError {
    InstallError::ExtractionFailed {
        archive: archive.to_path_buf(),
        code: None,
        reason: format!("invalid zip archive: {e}"),
    }
}
