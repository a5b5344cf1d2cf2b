//! Error taxonomy for the install and launch pipelines
//!
//! Every install-time error is terminal for the run; nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the install pipeline (resolve, fetch, extract, cleanup)
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("unsupported platform: {platform} {arch} (supported: darwin|linux|win32 on x64|arm64)")]
    UnsupportedPlatform { platform: String, arch: String },

    #[error("network error while downloading {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not initialise the HTTP client: {source}")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    #[error("download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("too many redirects (more than {max}) while downloading {url}")]
    TooManyRedirects { url: String, max: u32 },

    #[error("invalid redirect from {url} to {location:?}")]
    InvalidRedirect { url: String, location: String },

    #[error("failed to extract {}: {reason}{}", .archive.display(), .code.map(|c| format!(" (code {c})")).unwrap_or_default())]
    ExtractionFailed {
        archive: PathBuf,
        code: Option<i32>,
        reason: String,
    },

    #[error("archive {} did not contain {binary} at its root", .archive.display())]
    BinaryMissing { archive: PathBuf, binary: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl InstallError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by a `DownloadFailed`, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::DownloadFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failures of the launcher itself, as opposed to a non-zero exit of the delegate
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("easygit binary not found; searched:\n{}", format_paths(.searched))]
    BinaryNotFound { searched: Vec<PathBuf> },

    #[error("failed to start {}: {source}", .path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to install signal forwarding: {source}")]
    SignalSetup {
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for child process: {source}")]
    Wait {
        #[source]
        source: std::io::Error,
    },
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
