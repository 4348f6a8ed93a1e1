use anyhow::Result;
use libc::{STDERR_FILENO, STDOUT_FILENO};
pub use nix::unistd::Pid;
use std::fmt::Debug;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::os::unix::io::FromRawFd;
use std::os::unix::io::RawFd;
use thiserror::Error;

/// Which standard stream a redirection replaces.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// smallsh specific error types
///
/// Where the shell has a fixed user-facing message for a failure, the variant's
/// `Display` renders exactly that message.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("fork failed")]
    Fork(#[source] nix::Error),

    #[error("{path}: cannot open {direction} file")]
    Redirect { path: String, direction: Direction },

    #[error("{program}: no such file or directory")]
    Exec { program: String },

    #[error("cd: no such file or directory")]
    ChangeDir,

    #[error("Signal operation failed: {0}")]
    Signal(#[source] nix::Error),

    #[error("System call failed: {0}")]
    System(String),
}

pub type ShellResult<T> = std::result::Result<T, ShellError>;

/// How a child process ended.
///
/// Used both for the shell's last-status record and for background completion
/// reports.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Termination {
    Exited(i32),
    Signaled(i32),
}

impl Default for Termination {
    fn default() -> Self {
        Termination::Exited(0)
    }
}

impl Termination {
    pub fn is_signaled(&self) -> bool {
        matches!(self, Termination::Signaled(_))
    }

    /// Exit code a parent shell would observe, using the usual 128 + signal
    /// convention for signaled children.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Exited(code) => *code,
            Termination::Signaled(signal) => 128 + signal,
        }
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Exited(code) => write!(f, "exit value {code}"),
            Termination::Signaled(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

/// Execution context handed to builtins and the executor.
///
/// Every message the shell prints goes through `outfile` unbuffered, so nothing
/// is left sitting in a userspace buffer when the shell forks.
#[derive(Clone)]
pub struct Context {
    pub shell_pid: Pid,
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Context {
    pub fn new(shell_pid: Pid) -> Self {
        Context {
            shell_pid,
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("shell_pid", &self.shell_pid)
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}

impl Context {
    /// Writes `msg` without a trailing newline (used for the prompt).
    pub fn write(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        let res = file.write_all(msg.as_bytes());
        mem::forget(file);
        res?;
        Ok(())
    }

    pub fn write_stdout(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }

    pub fn write_stderr(&self, msg: &str) -> Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.errfile) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res?;
        Ok(())
    }
}

/// Result of running a builtin command.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
}
