//! easygit launcher
//!
//! Defines no flags of its own: every argument goes to the installed binary.

use anyhow::{Context, Result};
use log::debug;

use easygit::config::InstallerConfig;
use easygit::error::LaunchError;
use easygit::install::download::HostIdentifiers;
use easygit::launch::{self, ExitOutcome};

fn main() {
    // Quiet by default: a successful launch must look like running the binary directly
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[easygit {}] {}", record.level(), record.args())
        })
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("easygit: failed to create async runtime: {e}");
            std::process::exit(1);
        }
    };

    match rt.block_on(real_main()) {
        Ok(outcome) => launch::exit_like(outcome),
        Err(e) => {
            eprintln!("easygit: {e:#}");
            if let Some(LaunchError::BinaryNotFound { .. }) = e.downcast_ref::<LaunchError>() {
                eprintln!(
                    "Run `easygit-install` (or reinstall the package) to download the binary, \
                     or point EASYGIT_INSTALL_DIR at the directory that contains it."
                );
            }
            std::process::exit(1);
        }
    }
}

async fn real_main() -> Result<ExitOutcome> {
    let config = InstallerConfig::from_env();
    let candidates = launch::candidate_paths(&config.install_dir, &HostIdentifiers::current());
    let binary = launch::locate_binary(&candidates)?;
    debug!("Launching {}", binary.display());

    launch::run_delegate(&binary, std::env::args_os().skip(1))
        .await
        .with_context(|| format!("could not run {}", binary.display()))
}
