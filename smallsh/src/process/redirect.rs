use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use nix::fcntl::{OFlag, open};
use nix::sys::stat::Mode;
use nix::unistd::{close, dup2};
use smallsh_types::{Direction, ShellError, ShellResult};
use std::ffi::{CStr, CString};
use std::os::unix::io::RawFd;

/// A file that replaces the child's stdin or stdout.
///
/// The path and the failure message are prepared before fork so the child
/// only has to issue syscalls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    path: CString,
    direction: Direction,
    failure: Vec<u8>,
}

impl Redirect {
    pub fn input(path: &str) -> ShellResult<Self> {
        Self::new(path, Direction::Input)
    }

    pub fn output(path: &str) -> ShellResult<Self> {
        Self::new(path, Direction::Output)
    }

    fn new(path: &str, direction: Direction) -> ShellResult<Self> {
        let err = || ShellError::Redirect {
            path: path.to_string(),
            direction,
        };
        let failure = format!("{}\n", err()).into_bytes();
        let path = CString::new(path).map_err(|_| err())?;
        Ok(Redirect {
            path,
            direction,
            failure,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Message printed by the child when the file cannot be opened.
    pub fn failure(&self) -> &[u8] {
        &self.failure
    }

    pub(crate) fn open(&self) -> nix::Result<RawFd> {
        match self.direction {
            Direction::Input => open(self.path.as_c_str(), OFlag::O_RDONLY, Mode::empty()),
            Direction::Output => open(
                self.path.as_c_str(),
                OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
                Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP | Mode::S_IROTH,
            ),
        }
    }

    /// Child side: opens the file and moves it onto fd 0 or 1.
    pub(crate) fn apply(&self) -> Result<(), &[u8]> {
        let fd = self.open().map_err(|_| self.failure())?;
        let target = match self.direction {
            Direction::Input => STDIN_FILENO,
            Direction::Output => STDOUT_FILENO,
        };
        replace_fd(fd, target).map_err(|_| self.failure())
    }
}

fn replace_fd(fd: RawFd, target: RawFd) -> nix::Result<()> {
    if fd != target {
        dup2(fd, target)?;
        close(fd)?;
    }
    Ok(())
}

/// Child side, best effort: points stdin, or stdout and stderr, at the null
/// device. Failures leave the inherited descriptors in place.
pub(crate) fn redirect_to_null(null_device: &CStr, direction: Direction) {
    match direction {
        Direction::Input => {
            if let Ok(fd) = open(null_device, OFlag::O_RDONLY, Mode::empty()) {
                let _ = replace_fd(fd, STDIN_FILENO);
            }
        }
        Direction::Output => {
            if let Ok(fd) = open(null_device, OFlag::O_WRONLY, Mode::empty()) {
                if fd != STDOUT_FILENO {
                    let _ = dup2(fd, STDOUT_FILENO);
                }
                if fd != STDERR_FILENO {
                    let _ = dup2(fd, STDERR_FILENO);
                }
                if fd != STDOUT_FILENO && fd != STDERR_FILENO {
                    let _ = close(fd);
                }
            }
        }
    }
}
