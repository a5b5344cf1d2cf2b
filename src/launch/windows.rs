//! Windows delegate waiting
//!
//! The console delivers Ctrl-C to every process attached to it, so the child
//! already sees it; the launcher only has to survive long enough to report
//! the child's exit code.

use std::process::ExitStatus;

use log::debug;
use tokio::process::Child;

use super::ExitOutcome;
use crate::error::LaunchError;

pub(super) struct SignalForwarder;

impl SignalForwarder {
    pub(super) fn install() -> Result<Self, LaunchError> {
        Ok(Self)
    }

    pub(super) async fn wait(self, child: &mut Child) -> Result<ExitStatus, LaunchError> {
        loop {
            tokio::select! {
                status = child.wait() => {
                    return status.map_err(|source| LaunchError::Wait { source });
                }
                result = tokio::signal::ctrl_c() => {
                    if let Err(source) = result {
                        return Err(LaunchError::SignalSetup { source });
                    }
                    debug!("Ctrl-C received; left to the child");
                }
            }
        }
    }
}

pub(super) fn exit_like(outcome: ExitOutcome) -> ! {
    std::process::exit(outcome.shell_status())
}
