//! Unix signal proxying for the delegate process

use std::process::ExitStatus;

use log::{debug, warn};
use nix::sys::signal::{self, SigHandler, Signal};
use nix::unistd::{Pid, getpgrp, tcgetpgrp};
use tokio::process::Child;
use tokio::signal::unix::{SignalKind, signal as listen};

use super::ExitOutcome;
use crate::error::LaunchError;

/// Termination signals received by the launcher while the child runs
pub(super) struct SignalForwarder {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

impl SignalForwarder {
    /// Register before spawning so nothing slips through between spawn and wait
    pub(super) fn install() -> Result<Self, LaunchError> {
        let setup = |kind| listen(kind).map_err(|source| LaunchError::SignalSetup { source });
        Ok(Self {
            interrupt: setup(SignalKind::interrupt())?,
            terminate: setup(SignalKind::terminate())?,
            hangup: setup(SignalKind::hangup())?,
            quit: setup(SignalKind::quit())?,
        })
    }

    pub(super) async fn wait(mut self, child: &mut Child) -> Result<ExitStatus, LaunchError> {
        let pid = child.id().map(|id| Pid::from_raw(id as i32));

        loop {
            let received = tokio::select! {
                status = child.wait() => {
                    return status.map_err(|source| LaunchError::Wait { source });
                }
                _ = self.interrupt.recv() => Signal::SIGINT,
                _ = self.terminate.recv() => Signal::SIGTERM,
                _ = self.hangup.recv() => Signal::SIGHUP,
                _ = self.quit.recv() => Signal::SIGQUIT,
            };
            if should_forward(received, in_terminal_foreground()) {
                forward(pid, received);
            } else {
                debug!("{received:?} came from the terminal and already reached the child");
            }
        }
    }
}

/// Keyboard signals hit the whole foreground process group, child included
fn should_forward(sig: Signal, in_foreground: bool) -> bool {
    !(in_foreground && matches!(sig, Signal::SIGINT | Signal::SIGQUIT))
}

/// Whether our process group owns the controlling terminal on stdin
fn in_terminal_foreground() -> bool {
    tcgetpgrp(std::io::stdin()).is_ok_and(|foreground| foreground == getpgrp())
}

fn forward(pid: Option<Pid>, sig: Signal) {
    let Some(pid) = pid else {
        return;
    };
    match signal::kill(pid, sig) {
        Ok(()) => debug!("Forwarded {sig:?} to pid {pid}"),
        Err(e) => warn!("Failed to forward {sig:?} to pid {pid}: {e}"),
    }
}

/// Exit with the child's code, or die from the child's signal
pub(super) fn exit_like(outcome: ExitOutcome) -> ! {
    if let ExitOutcome::KilledBySignal(signo) = outcome
        && let Ok(sig) = Signal::try_from(signo)
    {
        // SAFETY: restoring the default disposition right before raising;
        // no handler of ours runs afterwards.
        unsafe {
            let _ = signal::signal(sig, SigHandler::SigDfl);
        }
        let _ = signal::raise(sig);
    }
    // Still alive: either a plain exit or a signal whose default action is not fatal
    std::process::exit(outcome.shell_status())
}
