//! Platform detection for release archive selection

use std::fmt;

use once_cell::sync::OnceCell;

use crate::error::InstallError;

/// Operating system names as they appear in release archive filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

/// CPU architecture names as they appear in release archive filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X64,
    Arm64,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
        }
    }

    /// Archive extension, including the leading dot
    pub fn archive_extension(&self) -> &'static str {
        match self {
            Platform::Windows => ".zip",
            Platform::Linux | Platform::MacOs => ".tar.gz",
        }
    }

    /// Filename of the delegate binary inside the archive
    pub fn binary_name(&self) -> &'static str {
        match self {
            Platform::Windows => "easygit.exe",
            Platform::Linux | Platform::MacOs => "easygit",
        }
    }
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw identifiers reported by the host environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentifiers {
    pub os: String,
    pub arch: String,
}

impl HostIdentifiers {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Identifiers of the running process
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map raw identifiers onto canonical names; no guessing for unknown values
    pub fn resolve(&self) -> Result<(Platform, Arch), InstallError> {
        let platform = match self.os.as_str() {
            "darwin" | "macos" => Some(Platform::MacOs),
            "linux" => Some(Platform::Linux),
            "win32" | "windows" => Some(Platform::Windows),
            _ => None,
        };
        let arch = match self.arch.as_str() {
            "x64" | "x86_64" => Some(Arch::X64),
            "arm64" | "aarch64" => Some(Arch::Arm64),
            _ => None,
        };

        match (platform, arch) {
            (Some(platform), Some(arch)) => Ok((platform, arch)),
            _ => Err(InstallError::UnsupportedPlatform {
                platform: self.os.clone(),
                arch: self.arch.clone(),
            }),
        }
    }
}

/// The `(version, platform, arch)` triple naming one release archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCoordinate {
    pub version: String,
    pub platform: Platform,
    pub arch: Arch,
}

/// Global cache for host resolution (initialized once, used everywhere)
static HOST_CACHE: OnceCell<(Platform, Arch)> = OnceCell::new();

impl ReleaseCoordinate {
    pub fn resolve(version: impl Into<String>, host: &HostIdentifiers) -> Result<Self, InstallError> {
        let (platform, arch) = host.resolve()?;
        Ok(Self {
            version: version.into(),
            platform,
            arch,
        })
    }

    /// Resolve against the running host (cached after first success)
    pub fn current(version: impl Into<String>) -> Result<Self, InstallError> {
        let (platform, arch) = *HOST_CACHE.get_or_try_init(|| HostIdentifiers::current().resolve())?;
        Ok(Self {
            version: version.into(),
            platform,
            arch,
        })
    }
}
