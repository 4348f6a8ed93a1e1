use crate::parser::MAX_ARGS;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str = ": ";
/// Default bound on concurrently tracked background jobs.
pub const MAX_JOBS: usize = 1024;
pub const NULL_DEVICE: &str = "/dev/null";

/// Runtime knobs of the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    /// Argument vector bound, counting the terminating slot.
    pub max_args: usize,
    pub max_jobs: usize,
    /// Where background jobs read from and write to when not redirected.
    pub null_device: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            prompt: DEFAULT_PROMPT.to_string(),
            max_args: MAX_ARGS,
            max_jobs: MAX_JOBS,
            null_device: PathBuf::from(NULL_DEVICE),
        }
    }
}

impl ShellConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}
