use anyhow::Result;
use libc::STDOUT_FILENO;
use nix::sys::signal::{
    SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal, kill, sigaction, sigprocmask,
};
use nix::unistd::Pid;
use smallsh_types::{ShellError, ShellResult};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

const ENTER_FOREGROUND_ONLY: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY: &[u8] = b"\nExiting foreground-only mode\n";

// Written from the SIGTSTP handler, so it has to stay a lone atomic.
static FOREGROUND_ONLY: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigtstp(_: libc::c_int) {
    toggle_foreground_only();
}

/// Flips foreground-only mode and announces the new mode on stdout.
///
/// Runs in signal context: one atomic op and one raw `write`, nothing else.
pub(crate) fn toggle_foreground_only() -> bool {
    let was = FOREGROUND_ONLY.fetch_xor(true, Ordering::SeqCst);
    let msg = if was {
        EXIT_FOREGROUND_ONLY
    } else {
        ENTER_FOREGROUND_ONLY
    };
    let _ = nix::unistd::write(STDOUT_FILENO, msg);
    !was
}

pub fn is_foreground_only() -> bool {
    FOREGROUND_ONLY.load(Ordering::SeqCst)
}

/// A `&` request is honoured only while foreground-only mode is off.
pub fn effective_background(requested: bool) -> bool {
    requested && !is_foreground_only()
}

/// Shell dispositions: immune to SIGINT, SIGTSTP toggles foreground-only mode.
pub(crate) fn install_shell_signals() -> ShellResult<()> {
    tracing::info!("🔧 SIGNAL: Installing shell signal dispositions");
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    let toggle = SigAction::new(
        SigHandler::Handler(handle_sigtstp),
        SaFlags::SA_RESTART,
        SigSet::all(),
    );
    unsafe {
        sigaction(Signal::SIGINT, &ignore).map_err(ShellError::Signal)?;
        sigaction(Signal::SIGTSTP, &toggle).map_err(ShellError::Signal)?;
    }
    Ok(())
}

/// Child dispositions, applied between fork and exec.
///
/// SIGTSTP is always ignored; SIGINT keeps its default action only for
/// foreground children. SIGPIPE goes back to the default the runtime replaced.
pub(crate) fn set_child_signals(foreground: bool) -> nix::Result<()> {
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::all());
    let interrupt = if foreground {
        SigHandler::SigDfl
    } else {
        SigHandler::SigIgn
    };
    let interrupt = SigAction::new(interrupt, SaFlags::empty(), SigSet::all());
    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    unsafe {
        sigaction(Signal::SIGTSTP, &ignore)?;
        sigaction(Signal::SIGINT, &interrupt)?;
        sigaction(Signal::SIGPIPE, &default)?;
    }
    Ok(())
}

/// Blocks SIGTSTP and returns the mask that was in effect before.
///
/// Held across fork so a stop signal cannot reach the child while it still
/// carries the shell's handler. The child restores the mask only after
/// `set_child_signals` has switched the disposition to ignore, which discards
/// anything left pending.
pub(crate) fn block_stop_signal() -> nix::Result<SigSet> {
    let mut stop = SigSet::empty();
    stop.add(Signal::SIGTSTP);
    let mut previous = SigSet::empty();
    sigprocmask(SigmaskHow::SIG_BLOCK, Some(&stop), Some(&mut previous))?;
    Ok(previous)
}

pub(crate) fn restore_signal_mask(mask: &SigSet) -> nix::Result<()> {
    sigprocmask(SigmaskHow::SIG_SETMASK, Some(mask), None)
}

pub(crate) fn send_signal(pid: Pid, signal: Signal) -> Result<()> {
    debug!("📡 SIGNAL: Sending signal {:?} to pid {}", signal, pid);
    match kill(pid, signal) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(
                "📡 SIGNAL: Failed to send signal {:?} to pid {}: {}",
                signal, pid, e
            );
            Err(ShellError::Signal(e).into())
        }
    }
}
