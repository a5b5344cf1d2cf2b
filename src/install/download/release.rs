//! Release URL composition

use std::path::{Path, PathBuf};

use super::platform::{Arch, Platform, ReleaseCoordinate};

/// Archive filename for a platform/arch pair, e.g. `easygit-linux-x64.tar.gz`
pub fn archive_name(platform: Platform, arch: Arch) -> String {
    format!("easygit-{}-{}{}", platform, arch, platform.archive_extension())
}

/// `<host>/v<version>/easygit-<platform>-<arch><ext>`
///
/// `version` is a bare semver string; the `v` tag prefix is added here.
/// The host is only trimmed of trailing slashes; malformed hosts fail at download time.
pub fn release_url(host: &str, version: &str, platform: Platform, arch: Arch) -> String {
    format!(
        "{}/v{}/{}",
        host.trim_end_matches('/'),
        version,
        archive_name(platform, arch)
    )
}

/// One archive to fetch and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,
    pub local_path: PathBuf,
}

impl DownloadTarget {
    pub fn new(host: &str, coordinate: &ReleaseCoordinate, dir: &Path) -> Self {
        Self {
            url: release_url(host, &coordinate.version, coordinate.platform, coordinate.arch),
            local_path: dir.join(archive_name(coordinate.platform, coordinate.arch)),
        }
    }
}
