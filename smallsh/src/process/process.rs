use libc::STDOUT_FILENO;
use nix::sys::signal::SigSet;
use nix::unistd::{execvp, write};
use smallsh_types::{Direction, ShellError, ShellResult};
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use super::redirect::{Redirect, redirect_to_null};
use super::signal::{restore_signal_mask, set_child_signals};
use crate::parser::Command;

/// Everything a child needs between fork and exec.
///
/// Built in the parent so the child never allocates or formats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub(crate) cmd: CString,
    pub(crate) argv: Vec<CString>,
    pub(crate) stdin: Option<Redirect>,
    pub(crate) stdout: Option<Redirect>,
    pub(crate) foreground: bool,
    null_device: CString,
    exec_failure: Vec<u8>,
}

impl Process {
    pub fn new(command: &Command, background: bool, null_device: &Path) -> ShellResult<Self> {
        let not_found = || ShellError::Exec {
            program: command.program().to_string(),
        };
        let argv = command
            .argv()
            .iter()
            .map(|a| CString::new(a.as_str()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| not_found())?;
        let cmd = argv[0].clone();
        let stdin = command.input().map(Redirect::input).transpose()?;
        let stdout = command.output().map(Redirect::output).transpose()?;
        let null_device = CString::new(null_device.as_os_str().as_bytes())
            .map_err(|e| ShellError::System(e.to_string()))?;

        Ok(Process {
            cmd,
            argv,
            stdin,
            stdout,
            foreground: !background,
            null_device,
            exec_failure: format!("{}\n", not_found()).into_bytes(),
        })
    }

    /// Child side: dispositions, redirections, then exec. Never returns.
    ///
    /// `mask` is the signal mask from before fork. It is put back only once
    /// SIGTSTP is ignored, so a stop signal pending since fork is dropped.
    pub(crate) fn launch(&self, mask: &SigSet) -> ! {
        let _ = set_child_signals(self.foreground);
        let _ = restore_signal_mask(mask);

        match &self.stdin {
            Some(redirect) => {
                if let Err(msg) = redirect.apply() {
                    child_exit(msg);
                }
            }
            None if !self.foreground => redirect_to_null(&self.null_device, Direction::Input),
            None => {}
        }

        match &self.stdout {
            Some(redirect) => {
                if let Err(msg) = redirect.apply() {
                    child_exit(msg);
                }
            }
            None if !self.foreground => redirect_to_null(&self.null_device, Direction::Output),
            None => {}
        }

        let _ = execvp(&self.cmd, &self.argv);
        child_exit(&self.exec_failure)
    }
}

fn child_exit(msg: &[u8]) -> ! {
    let _ = write(STDOUT_FILENO, msg);
    unsafe { libc::_exit(1) }
}
