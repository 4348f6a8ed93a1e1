pub mod eval;
pub mod job;

use crate::config::ShellConfig;
use crate::parser::Command;
use crate::process::JobRegistry;
use anyhow::Result;
use nix::unistd::{Pid, getpid};
use smallsh_types::{Context, ExitStatus, Termination};
use tracing::{debug, warn};

pub const APP_NAME: &str = "smallsh";

/// Interpreter state owned by the read-eval loop.
///
/// Foreground-only mode is the one piece of shared state that lives outside,
/// since the SIGTSTP handler writes it (see `process::signal`).
pub struct Shell {
    pub config: ShellConfig,
    pub exited: Option<ExitStatus>,
    pub pid: Pid,
    pub last_status: Termination,
    pub(crate) wait_jobs: JobRegistry,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("pid", &self.pid)
            .field("last_status", &self.last_status)
            .field("jobs", &self.wait_jobs.len())
            .finish()
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        let _ = self.terminate_background_jobs();
    }
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        let pid = getpid();
        let wait_jobs = JobRegistry::new(config.max_jobs);

        Shell {
            config,
            exited: None,
            pid,
            last_status: Termination::default(),
            wait_jobs,
        }
    }

    pub fn set_signals(&mut self) {
        use crate::process::signal::install_shell_signals;
        if let Err(e) = install_shell_signals() {
            warn!("Failed to install signal handlers: {}", e);
        }
        debug!("Signal handlers setup completed");
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.wait_jobs
    }

    /// Parses and runs one input line.
    pub fn eval_str(&mut self, ctx: &Context, input: &str) -> Result<()> {
        eval::eval_str(self, ctx, input)
    }

    pub fn launch_command(&mut self, ctx: &Context, cmd: &Command, background: bool) -> Result<()> {
        job::launch_command(self, ctx, cmd, background)
    }

    pub fn reap_background_jobs(&mut self, ctx: &Context) -> Result<()> {
        job::reap_background_jobs(self, ctx)
    }

    /// Kills every tracked background job
    pub fn terminate_background_jobs(&mut self) -> Vec<Pid> {
        job::terminate_background_jobs(self)
    }

    pub fn exit(&mut self) {
        self.terminate_background_jobs();
        self.exited = Some(ExitStatus::ExitedWith(0));
    }

    /// Last non-blocking sweep before the process goes away.
    pub fn finish(&mut self) {
        job::sweep_zombies();
    }
}
