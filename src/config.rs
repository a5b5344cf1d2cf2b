//! Installer configuration
//!
//! Layers, highest precedence first: command-line flags (applied by the
//! installer binary), environment variables, an optional TOML file, defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::InstallError;
use crate::install::download::{MAX_REDIRECTS, Platform};

/// Public release host used when nothing overrides it
pub const DEFAULT_HOST: &str = "https://github.com/easygit/easygit/releases/download";

pub const ENV_SKIP_POSTINSTALL: &str = "EASYGIT_SKIP_POSTINSTALL";
pub const ENV_BINARY_HOST: &str = "EASYGIT_BINARY_HOST";
pub const ENV_VERSION: &str = "EASYGIT_VERSION";
pub const ENV_INSTALL_DIR: &str = "EASYGIT_INSTALL_DIR";
pub const ENV_CONFIG: &str = "EASYGIT_CONFIG";

/// On-disk overrides (`installer.toml`)
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub version: Option<String>,
    pub install_dir: Option<PathBuf>,
}

/// Resolved settings shared by the installer and the launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Release host base URL
    pub host: String,
    /// Bare semver of the release to fetch
    pub version: String,
    /// Directory the binary is extracted into and launched from
    pub install_dir: PathBuf,
    /// Development escape hatch: skip the whole install pipeline
    pub skip_install: bool,
    pub max_redirects: u32,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            install_dir: default_install_dir(),
            skip_install: false,
            max_redirects: MAX_REDIRECTS,
        }
    }
}

impl InstallerConfig {
    /// Build from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let file_path = var(ENV_CONFIG).map(PathBuf::from).or_else(default_config_path);
        let file = file_path
            .as_deref()
            .and_then(load_config_file)
            .unwrap_or_default();

        let defaults = Self::default();
        Self {
            host: var(ENV_BINARY_HOST)
                .or(file.host)
                .unwrap_or(defaults.host),
            version: var(ENV_VERSION)
                .or(file.version)
                .map(|v| v.trim_start_matches('v').to_string())
                .unwrap_or(defaults.version),
            install_dir: var(ENV_INSTALL_DIR)
                .map(PathBuf::from)
                .or(file.install_dir)
                .unwrap_or(defaults.install_dir),
            skip_install: var(ENV_SKIP_POSTINSTALL).is_some_and(|v| is_truthy(&v)),
            max_redirects: defaults.max_redirects,
        }
    }

    /// Reject settings that cannot form a download URL
    pub fn validate(&self) -> Result<(), InstallError> {
        if self.host.trim().is_empty() {
            return Err(InstallError::InvalidConfig("release host is empty".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(InstallError::InvalidConfig("release version is empty".to_string()));
        }
        Ok(())
    }

    /// Expected location of the installed binary for `platform`
    pub fn binary_path(&self, platform: Platform) -> PathBuf {
        self.install_dir.join(platform.binary_name())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// `<data_local_dir>/easygit/bin`, falling back to the home or temp directory
pub fn default_install_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join("easygit")
        .join("bin")
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("easygit").join("installer.toml"))
}

fn load_config_file(path: &Path) -> Option<ConfigFile> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            log::warn!("Ignoring config file {}: {e}", path.display());
            return None;
        }
    };

    match toml::from_str(&contents) {
        Ok(file) => {
            log::debug!("Using config from: {}", path.display());
            Some(file)
        }
        Err(e) => {
            log::warn!("Ignoring unparsable config file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let mut map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        // Keep tests away from any real user config
        map.entry(ENV_CONFIG.to_string())
            .or_insert_with(|| "/nonexistent/easygit/installer.toml".to_string());
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let cfg = InstallerConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.host, DEFAULT_HOST);
        assert_eq!(cfg.version, env!("CARGO_PKG_VERSION"));
        assert!(!cfg.skip_install);
        assert_eq!(cfg.max_redirects, 5);
    }

    #[test]
    fn environment_overrides_host_and_dir() {
        let cfg = InstallerConfig::from_lookup(lookup(&[
            (ENV_BINARY_HOST, "https://mirror.example/eg"),
            (ENV_INSTALL_DIR, "/opt/easygit"),
            (ENV_VERSION, "v2.1.0"),
        ]));
        assert_eq!(cfg.host, "https://mirror.example/eg");
        assert_eq!(cfg.install_dir, PathBuf::from("/opt/easygit"));
        assert_eq!(cfg.version, "2.1.0");
    }

    #[test]
    fn empty_host_variable_falls_back_to_default() {
        let cfg = InstallerConfig::from_lookup(lookup(&[(ENV_BINARY_HOST, "")]));
        assert_eq!(cfg.host, DEFAULT_HOST);
    }

    #[test]
    fn skip_flag_accepts_common_truthy_values() {
        for value in ["1", "true", "YES", "on"] {
            let cfg = InstallerConfig::from_lookup(lookup(&[(ENV_SKIP_POSTINSTALL, value)]));
            assert!(cfg.skip_install, "{value}");
        }
        for value in ["0", "false", "no"] {
            let cfg = InstallerConfig::from_lookup(lookup(&[(ENV_SKIP_POSTINSTALL, value)]));
            assert!(!cfg.skip_install, "{value}");
        }
    }

    #[test]
    fn config_file_sits_below_environment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("installer.toml");
        std::fs::write(
            &file,
            "host = \"https://file.example\"\nversion = \"3.0.0\"\ninstall_dir = \"/srv/eg\"\n",
        )
        .unwrap();
        let file = file.to_string_lossy().into_owned();

        let cfg = InstallerConfig::from_lookup(lookup(&[(ENV_CONFIG, file.as_str())]));
        assert_eq!(cfg.host, "https://file.example");
        assert_eq!(cfg.version, "3.0.0");
        assert_eq!(cfg.install_dir, PathBuf::from("/srv/eg"));

        let cfg = InstallerConfig::from_lookup(lookup(&[
            (ENV_CONFIG, file.as_str()),
            (ENV_BINARY_HOST, "https://env.example"),
        ]));
        assert_eq!(cfg.host, "https://env.example");
        assert_eq!(cfg.version, "3.0.0");
    }

    #[test]
    fn unparsable_config_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("installer.toml");
        std::fs::write(&file, "host = [not toml").unwrap();
        let file = file.to_string_lossy().into_owned();

        let cfg = InstallerConfig::from_lookup(lookup(&[(ENV_CONFIG, file.as_str())]));
        assert_eq!(cfg.host, DEFAULT_HOST);
    }

    #[test]
    fn validate_rejects_empty_host() {
        let cfg = InstallerConfig {
            host: "  ".to_string(),
            ..InstallerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(InstallError::InvalidConfig(_))));
    }
}
