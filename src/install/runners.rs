//! Top-level install runner and its terminal output
//!
//! Success goes to stdout, failures to stderr, so the package manager shows
//! the recovery instructions even when it hides regular output.

use std::io::Write;
use std::process::ExitCode;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::cli::Cli;
use super::{InstallFailure, InstallOutcome, Installer};
use crate::config::InstallerConfig;
use crate::error::InstallError;

/// Run the installer as invoked by the package manager hook
pub async fn run_install(cli: &Cli) -> ExitCode {
    let config = cli.apply(InstallerConfig::from_env());
    let installer = Installer::new(config).force(cli.force).dry_run(cli.dry_run);

    match installer.run().await {
        Ok(outcome) => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            let _ = write_outcome(&mut stdout, &outcome);
            ExitCode::SUCCESS
        }
        Err(failure) => {
            log::debug!("install failure: {failure:?}");
            let mut stderr = StandardStream::stderr(ColorChoice::Auto);
            let _ = write_failure(&mut stderr, &failure, installer.config());
            ExitCode::FAILURE
        }
    }
}

/// Summary line(s) for a successful run
pub fn write_outcome<W: WriteColor>(out: &mut W, outcome: &InstallOutcome) -> std::io::Result<()> {
    match outcome {
        InstallOutcome::Skipped => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            writeln!(out, "⚠ Skipping easygit binary download (EASYGIT_SKIP_POSTINSTALL is set)")?;
            out.reset()?;
        }
        InstallOutcome::AlreadyInstalled { binary } => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            writeln!(out, "✓ easygit already installed")?;
            out.reset()?;
            writeln!(out, "   Binary: {}", binary.display())?;
        }
        InstallOutcome::Installed { binary, bytes } => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            writeln!(out, "✅ easygit installed")?;
            out.reset()?;
            writeln!(out, "   Binary: {}", binary.display())?;
            writeln!(out, "   Downloaded: {:.1} MB", *bytes as f64 / 1_048_576.0)?;
        }
        InstallOutcome::Planned { target, binary } => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            writeln!(out, "🔍 Dry run")?;
            out.reset()?;
            writeln!(out, "   Would download: {}", target.url)?;
            writeln!(out, "   Archive: {}", target.local_path.display())?;
            writeln!(out, "   Binary: {}", binary.display())?;
        }
    }
    Ok(())
}

/// Cause, involved URL/path and manual recovery steps for a failed run
pub fn write_failure<W: WriteColor>(
    out: &mut W,
    failure: &InstallFailure,
    config: &InstallerConfig,
) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    writeln!(out, "\n❌ FATAL: easygit installation failed")?;
    out.reset()?;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
    writeln!(out, "   Error: {}", failure.error)?;
    out.reset()?;

    match (&failure.target, &failure.binary_path) {
        (Some(target), Some(binary)) => {
            let binary_name = binary
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            writeln!(out, "   You can install it manually:")?;
            writeln!(out, "   • Download {}", target.url)?;
            writeln!(out, "   • Extract {binary_name} to {}", binary.display())?;
        }
        _ => {
            if let InstallError::UnsupportedPlatform { .. } = failure.error {
                writeln!(
                    out,
                    "   Prebuilt binaries exist for darwin, linux and win32 on x64 and arm64."
                )?;
            }
            writeln!(out, "   Release archives: {}/v{}/", config.host.trim_end_matches('/'), config.version)?;
        }
    }
    Ok(())
}
