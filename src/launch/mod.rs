//! Transparent delegation to the installed easygit binary
//!
//! The launcher finds the binary among a fixed list of candidates, runs it
//! with inherited stdio and verbatim arguments, and then leaves the same way
//! the child did: same exit code, or death by the same signal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use log::debug;

use crate::error::LaunchError;
use crate::install::download::HostIdentifiers;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        mod unix;
        use unix as platform;
    } else {
        mod windows;
        use windows as platform;
    }
}

/// How the delegate process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    ExitedWithCode(i32),
    KilledBySignal(i32),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::ExitedWithCode(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::KilledBySignal(signal);
            }
        }
        Self::ExitedWithCode(1)
    }

    /// Shell-style status: the code itself, or `128 + signal`
    pub fn shell_status(&self) -> i32 {
        match *self {
            Self::ExitedWithCode(code) => code,
            Self::KilledBySignal(signal) => 128 + signal,
        }
    }
}

/// Ordered locations to look for the binary
///
/// Platform-qualified subdirectory first (`<dir>/linux-x64/easygit`), then
/// the flat layout the installer writes (`<dir>/easygit`). An unresolvable
/// host only gets the flat candidate.
pub fn candidate_paths(install_dir: &Path, host: &HostIdentifiers) -> Vec<PathBuf> {
    match host.resolve() {
        Ok((platform, arch)) => vec![
            install_dir
                .join(format!("{platform}-{arch}"))
                .join(platform.binary_name()),
            install_dir.join(platform.binary_name()),
        ],
        Err(_) => {
            let name = if cfg!(windows) { "easygit.exe" } else { "easygit" };
            vec![install_dir.join(name)]
        }
    }
}

/// First existing candidate, or `BinaryNotFound` listing all of them
pub fn locate_binary(candidates: &[PathBuf]) -> Result<PathBuf, LaunchError> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| LaunchError::BinaryNotFound {
            searched: candidates.to_vec(),
        })
}

/// Spawn `binary` with inherited stdio and wait for it, forwarding signals meanwhile
pub async fn run_delegate<I, S>(binary: &Path, args: I) -> Result<ExitOutcome, LaunchError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let forwarder = platform::SignalForwarder::install()?;

    let mut child = tokio::process::Command::new(binary)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            path: binary.to_path_buf(),
            source,
        })?;
    debug!("Spawned {} (pid {:?})", binary.display(), child.id());

    let status = forwarder.wait(&mut child).await?;
    let outcome = ExitOutcome::from_status(status);
    debug!("Delegate finished: {outcome:?}");
    Ok(outcome)
}

/// Terminate the current process the same way the delegate terminated
pub fn exit_like(outcome: ExitOutcome) -> ! {
    platform::exit_like(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_candidate_comes_first() {
        let dir = Path::new("/opt/eg");
        let candidates = candidate_paths(dir, &HostIdentifiers::new("linux", "x64"));
        assert_eq!(
            candidates,
            vec![dir.join("linux-x64").join("easygit"), dir.join("easygit")]
        );
    }

    #[test]
    fn windows_candidates_use_exe() {
        let dir = Path::new("/opt/eg");
        let candidates = candidate_paths(dir, &HostIdentifiers::new("win32", "arm64"));
        assert_eq!(
            candidates,
            vec![
                dir.join("windows-arm64").join("easygit.exe"),
                dir.join("easygit.exe")
            ]
        );
    }

    #[test]
    fn unknown_host_keeps_flat_fallback() {
        let candidates = candidate_paths(Path::new("/x"), &HostIdentifiers::new("plan9", "mips"));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn locate_prefers_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let host = HostIdentifiers::new("linux", "arm64");
        let candidates = candidate_paths(dir.path(), &host);

        std::fs::write(&candidates[1], b"flat").unwrap();
        assert_eq!(locate_binary(&candidates).unwrap(), candidates[1]);

        std::fs::create_dir_all(candidates[0].parent().unwrap()).unwrap();
        std::fs::write(&candidates[0], b"qualified").unwrap();
        assert_eq!(locate_binary(&candidates).unwrap(), candidates[0]);
    }

    #[test]
    fn not_found_lists_every_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = candidate_paths(dir.path(), &HostIdentifiers::new("darwin", "arm64"));
        match locate_binary(&candidates) {
            Err(LaunchError::BinaryNotFound { searched }) => assert_eq!(searched, candidates),
            other => panic!("expected BinaryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn shell_status_encodes_signals() {
        assert_eq!(ExitOutcome::ExitedWithCode(3).shell_status(), 3);
        assert_eq!(ExitOutcome::KilledBySignal(15).shell_status(), 143);
    }
}
