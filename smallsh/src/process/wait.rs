use nix::errno::Errno;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use smallsh_types::Termination;
use tracing::{debug, error};

fn termination(status: WaitStatus) -> Option<(Pid, Termination)> {
    match status {
        WaitStatus::Exited(pid, code) => Some((pid, Termination::Exited(code))),
        WaitStatus::Signaled(pid, signal, _core_dumped) => {
            Some((pid, Termination::Signaled(signal as i32)))
        }
        _ => None,
    }
}

/// Blocks until `pid` terminates.
pub fn wait_pid(pid: Pid) -> Termination {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                debug!("WAIT_PID: {} -> {:?}", pid, status);
                if let Some((_, term)) = termination(status) {
                    return term;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => {
                debug!(
                    "WAIT_PID_ECHILD: No child process {} (ECHILD) - treating as completed",
                    pid
                );
                return Termination::Exited(1);
            }
            Err(e) => {
                error!("WAIT_PID: waitpid {} failed: {}", pid, e);
                return Termination::Exited(1);
            }
        }
    }
}

/// Collects one already terminated child, if any, without blocking.
pub fn try_wait_any() -> Option<(Pid, Termination)> {
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => return None,
            Ok(status) => {
                debug!("WAIT_ANY: {:?}", status);
                match termination(status) {
                    Some(res) => return Some(res),
                    None => {
                        error!("WAIT_ANY: Unexpected waitpid status: {:?}", status);
                        return None;
                    }
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => return None,
            Err(e) => {
                error!("WAIT_ANY: waitpid failed: {}", e);
                return None;
            }
        }
    }
}
