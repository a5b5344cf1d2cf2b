//! easygit installer and launcher
//!
//! `install` fetches the prebuilt binary for the running platform once, at
//! package install time. `launch` runs it on every invocation with full
//! stdio, exit code and signal fidelity.

pub mod config;
pub mod error;
pub mod install;
pub mod launch;

pub use config::InstallerConfig;
pub use error::{InstallError, LaunchError};
