use super::Shell;
use crate::parser::Command;
use crate::process::fork::fork_process;
use crate::process::wait::try_wait_any;
use crate::process::{Process, wait_pid};
use anyhow::Result;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use smallsh_types::{Context, Termination};
use tracing::{debug, info};

/// Runs an external command, in the background or to completion.
///
/// Failures to prepare or fork are reported and never end the shell.
pub fn launch_command(
    shell: &mut Shell,
    ctx: &Context,
    cmd: &Command,
    background: bool,
) -> Result<()> {
    let process = match Process::new(cmd, background, &shell.config.null_device) {
        Ok(process) => process,
        Err(err) => {
            debug!("cannot prepare {}: {}", cmd.program(), err);
            ctx.write_stdout(&err.to_string())?;
            shell.last_status = Termination::Exited(1);
            return Ok(());
        }
    };

    let pid = match fork_process(&process) {
        Ok(pid) => pid,
        Err(err) => {
            ctx.write_stdout(&err.to_string())?;
            return Ok(());
        }
    };

    if background {
        shell.wait_jobs.track(pid);
        ctx.write_stdout(&format!("background pid is {pid}"))?;
    } else {
        let status = wait_pid(pid);
        debug!("foreground pid {} finished: {}", pid, status);
        shell.last_status = status;
        if status.is_signaled() {
            ctx.write_stdout(&status.to_string())?;
        }
    }
    Ok(())
}

/// Reports every background child that finished since the last call.
pub fn reap_background_jobs(shell: &mut Shell, ctx: &Context) -> Result<()> {
    for (pid, status) in shell.wait_jobs.reap_all() {
        ctx.write_stdout(&format!("background pid {pid} is done: {status}"))?;
    }
    Ok(())
}

pub fn terminate_background_jobs(shell: &mut Shell) -> Vec<Pid> {
    if shell.wait_jobs.is_empty() {
        return Vec::new();
    }
    let killed = shell.wait_jobs.signal_all(Signal::SIGKILL);
    info!(
        "killed {} of {} background jobs",
        killed.len(),
        shell.wait_jobs.len()
    );
    shell.wait_jobs.clear();
    killed
}

pub(crate) fn sweep_zombies() {
    let mut count = 0;
    while try_wait_any().is_some() {
        count += 1;
    }
    debug!("final sweep reaped {} children", count);
}
