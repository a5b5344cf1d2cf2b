//! CLI argument parsing for the easygit installer

use clap::Parser;
use std::path::PathBuf;

use crate::config::InstallerConfig;

/// Command-line arguments for easygit-install
///
/// Every flag is optional: the package-manager hook runs it bare.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "easygit-install")]
#[command(version, about = "Download the prebuilt easygit binary for this platform")]
pub struct Cli {
    /// Release host base URL (overrides EASYGIT_BINARY_HOST)
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Release version to fetch, without the leading `v`
    #[arg(long, value_name = "X.Y.Z")]
    pub release_version: Option<String>,

    /// Directory to install the binary into (overrides EASYGIT_INSTALL_DIR)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Download again even if the binary is already installed
    #[arg(long)]
    pub force: bool,

    /// Print the download URL and destination without doing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Layer flags over a config built from the environment
    pub fn apply(&self, mut config: InstallerConfig) -> InstallerConfig {
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(version) = &self.release_version {
            config.version = version.trim_start_matches('v').to_string();
        }
        if let Some(dir) = &self.install_dir {
            config.install_dir = dir.clone();
        }
        config
    }
}
