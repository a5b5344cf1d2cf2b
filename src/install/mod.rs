//! Install pipeline for the prebuilt easygit binary
//!
//! Runs once per package-manager install:
//! skip check → platform resolution → already-installed check →
//! download → extract → permission fix → archive cleanup.
//!
//! Every failure is terminal for the run. There is no retry anywhere; the
//! caller reports the error together with the manual download URL.

pub mod cli;
pub mod detection;
pub mod download;
pub mod permissions;
pub mod runners;

use std::path::{Path, PathBuf};

use log::{info, warn};
use thiserror::Error;

use crate::config::InstallerConfig;
use crate::error::InstallError;
use detection::{InstallationState, check_installation_state};
use download::{ArchiveFetcher, DownloadTarget, HostIdentifiers, ReleaseCoordinate, extract_archive};

/// Successful end states of an install run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// `EASYGIT_SKIP_POSTINSTALL` was set
    Skipped,
    /// Binary already present; no network access happened
    AlreadyInstalled { binary: PathBuf },
    /// Fresh download and extraction
    Installed { binary: PathBuf, bytes: u64 },
    /// `--dry-run`: what would have been fetched
    Planned { target: DownloadTarget, binary: PathBuf },
}

/// Terminal install error plus what the user needs to finish by hand
#[derive(Debug, Error)]
#[error("{error}")]
pub struct InstallFailure {
    #[source]
    pub error: InstallError,
    /// Known once the platform resolved
    pub target: Option<DownloadTarget>,
    pub binary_path: Option<PathBuf>,
}

impl InstallFailure {
    fn before_resolution(error: InstallError) -> Self {
        Self {
            error,
            target: None,
            binary_path: None,
        }
    }
}

/// Sequences the install steps for one host
#[derive(Debug, Clone)]
pub struct Installer {
    config: InstallerConfig,
    /// `None` resolves the running host
    host: Option<HostIdentifiers>,
    force: bool,
    dry_run: bool,
    show_progress: Option<bool>,
    normalize: fn(&Path) -> bool,
}

impl Installer {
    pub fn new(config: InstallerConfig) -> Self {
        Self {
            config,
            host: None,
            force: false,
            dry_run: false,
            show_progress: None,
            normalize: permissions::ensure_executable,
        }
    }

    /// Resolve against explicit identifiers instead of the running host
    pub fn with_host(mut self, host: HostIdentifiers) -> Self {
        self.host = Some(host);
        self
    }

    /// Download even when the binary is already present
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = Some(show_progress);
        self
    }

    /// Replace the permission step; it reports whether the mode was applied
    pub fn with_permission_normalizer(mut self, normalize: fn(&Path) -> bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn config(&self) -> &InstallerConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<InstallOutcome, InstallFailure> {
        if self.config.skip_install {
            info!("EASYGIT_SKIP_POSTINSTALL is set, skipping binary download");
            return Ok(InstallOutcome::Skipped);
        }

        let version = self.config.version.clone();
        let coordinate = match &self.host {
            Some(host) => ReleaseCoordinate::resolve(version, host),
            None => ReleaseCoordinate::current(version),
        }
        .map_err(InstallFailure::before_resolution)?;
        let binary_path = self.config.binary_path(coordinate.platform);

        if !self.force && check_installation_state(&binary_path) == InstallationState::Installed {
            info!("easygit already installed at {}", binary_path.display());
            return Ok(InstallOutcome::AlreadyInstalled {
                binary: binary_path,
            });
        }

        let target = DownloadTarget::new(&self.config.host, &coordinate, &self.config.install_dir);
        let failure = |error| InstallFailure {
            error,
            target: Some(target.clone()),
            binary_path: Some(binary_path.clone()),
        };

        self.config.validate().map_err(failure)?;

        if self.dry_run {
            return Ok(InstallOutcome::Planned {
                target: target.clone(),
                binary: binary_path.clone(),
            });
        }

        match self.download_and_extract(&coordinate, &target, &binary_path).await {
            Ok((binary, bytes)) => Ok(InstallOutcome::Installed { binary, bytes }),
            Err(error) => {
                discard_partial(&target.local_path).await;
                Err(failure(error))
            }
        }
    }

    async fn download_and_extract(
        &self,
        coordinate: &ReleaseCoordinate,
        target: &DownloadTarget,
        binary_path: &Path,
    ) -> Result<(PathBuf, u64), InstallError> {
        let install_dir = &self.config.install_dir;
        tokio::fs::create_dir_all(install_dir)
            .await
            .map_err(|e| InstallError::io(install_dir, e))?;

        let mut fetcher = ArchiveFetcher::new()?.with_max_redirects(self.config.max_redirects);
        if let Some(show) = self.show_progress {
            fetcher = fetcher.with_progress(show);
        }

        info!("Downloading easygit {} from {}", coordinate.version, target.url);
        let bytes = fetcher.fetch(&target.url, &target.local_path).await?;

        info!("Extracting {}", target.local_path.display());
        let binary = match extract_archive(&target.local_path, install_dir, coordinate.platform).await {
            Ok(binary) => binary,
            Err(error) => {
                // Whatever landed at the binary path must not pass for an install
                discard_partial(binary_path).await;
                return Err(error);
            }
        };

        if !(self.normalize)(&binary) {
            warn!("Continuing without executable permissions on {}", binary.display());
        }

        if let Err(e) = tokio::fs::remove_file(&target.local_path).await {
            warn!("Could not remove {}: {e}", target.local_path.display());
        }

        info!("easygit installed at {}", binary.display());
        Ok((binary, bytes))
    }
}

/// Best-effort removal of a partial archive or half-extracted binary
async fn discard_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => info!("Removed incomplete {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove incomplete {}: {e}", path.display()),
    }
}
