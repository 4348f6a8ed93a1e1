use anyhow::Result;
use once_cell::sync::Lazy;
use smallsh_types::{Context, ExitStatus, Termination};
use std::collections::HashMap;
use tracing::debug;

// Builtin command modules
pub mod cd;
mod status;

/// Trait that provides an interface for builtin commands to interact with the shell
/// This allows builtin commands to perform shell operations without direct coupling
pub trait ShellProxy {
    /// Initiates shell exit: background jobs are killed and the loop stops
    fn exit_shell(&mut self);

    /// Changes the current working directory
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// How the most recent foreground command ended
    fn last_status(&self) -> Termination;
}

/// Type alias for builtin command function signature
/// All builtin commands must conform to this signature
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Registry of all builtin commands, built on first lookup
pub static BUILTIN_COMMAND: Lazy<HashMap<&str, BuiltinCommand>> = Lazy::new(|| {
    let mut builtin = HashMap::new();

    builtin.insert("exit", exit as BuiltinCommand);
    builtin.insert("cd", cd::command as BuiltinCommand);
    builtin.insert("status", status::command as BuiltinCommand);

    builtin
});

/// Retrieves a builtin command function by name
/// Returns None if the command is not found
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    BUILTIN_COMMAND.get(name).copied()
}

/// Built-in exit command implementation
pub fn exit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("Exit command called - initiating normal shell exit");
    proxy.exit_shell();
    ExitStatus::ExitedWith(0)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ShellProxy;
    use anyhow::{Result, bail};
    use smallsh_types::{Context, Termination};
    use std::fs::File;
    use std::io::{Read, Seek, SeekFrom};
    use std::os::unix::io::AsRawFd;

    #[derive(Default)]
    pub struct MockProxy {
        pub exited: bool,
        pub dirs: Vec<String>,
        pub fail_chdir: bool,
        pub status: Termination,
    }

    impl ShellProxy for MockProxy {
        fn exit_shell(&mut self) {
            self.exited = true;
        }

        fn changepwd(&mut self, path: &str) -> Result<()> {
            if self.fail_chdir {
                bail!("no such directory: {path}");
            }
            self.dirs.push(path.to_string());
            Ok(())
        }

        fn last_status(&self) -> Termination {
            self.status
        }
    }

    /// A context whose output lands in a temporary file.
    pub fn capture_context() -> (Context, File) {
        let file = tempfile::tempfile().expect("create capture file");
        let mut ctx = Context::new(nix_pid());
        ctx.outfile = file.as_raw_fd();
        ctx.errfile = file.as_raw_fd();
        (ctx, file)
    }

    pub fn captured(file: &mut File) -> String {
        let mut out = String::new();
        file.seek(SeekFrom::Start(0)).expect("rewind");
        file.read_to_string(&mut out).expect("read capture");
        out
    }

    fn nix_pid() -> smallsh_types::Pid {
        smallsh_types::Pid::from_raw(std::process::id() as i32)
    }
}
