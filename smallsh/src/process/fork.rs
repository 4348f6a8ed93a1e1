use nix::unistd::{ForkResult, Pid, fork};
use smallsh_types::{ShellError, ShellResult};
use tracing::{debug, error, warn};

use super::process::Process;
use super::signal::{block_stop_signal, restore_signal_mask};

pub(crate) fn fork_process(process: &Process) -> ShellResult<Pid> {
    debug!(
        "🍴 FORK: cmd:{:?} argv:{:?} foreground:{}",
        process.cmd, process.argv, process.foreground
    );

    let mask = block_stop_signal().map_err(ShellError::Signal)?;

    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            debug!("🍴 FORK: Parent process - child pid: {}", child);
            if let Err(e) = restore_signal_mask(&mask) {
                warn!("🍴 FORK: failed to restore signal mask: {}", e);
            }
            Ok(child)
        }
        // no tracing in the child; the shell is single threaded, so the
        // allocation inside execvp is safe
        Ok(ForkResult::Child) => process.launch(&mask),
        Err(e) => {
            error!("🍴 FORK: fork failed: {}", e);
            let _ = restore_signal_mask(&mask);
            Err(ShellError::Fork(e))
        }
    }
}
