use crate::config::ShellConfig;
use crate::input::LineSource;
use crate::shell::{APP_NAME, Shell};
use anyhow::{Context as _, Result, anyhow};
use clap::Parser;
use smallsh_types::Context;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod input;
pub mod parser;
pub mod process;
pub mod proxy;
pub mod shell;

const LOG_FILE: &str = "smallsh.log";
const LOG_ENV: &str = "SMALLSH_LOG";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run a single command line and exit
    #[arg(short, long)]
    pub command: Option<String>,

    /// Write diagnostics here instead of the XDG cache directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Prompt printed before each line is read
    #[arg(long, default_value = config::DEFAULT_PROMPT)]
    pub prompt: String,
}

pub fn lib_main() -> ExitCode {
    let cli = Cli::parse();

    let config = ShellConfig::default().with_prompt(cli.prompt.clone());
    let mut shell = Shell::new(config);
    let ctx = create_context(&shell);

    if let Err(err) = init_tracing(cli.log_file.clone()) {
        let _ = ctx.write_stderr(&format!("smallsh: logging disabled: {err:#}"));
    }
    shell.set_signals();

    if let Some(command) = cli.command.as_deref() {
        execute_command(&mut shell, &ctx, command)
    } else {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        match run_interactive(&mut shell, &ctx, &mut input) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                tracing::error!("shell loop failed: {:#}", err);
                let _ = ctx.write_stderr(&format!("smallsh: {err:#}"));
                ExitCode::FAILURE
            }
        }
    }
}

pub fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => {
            let xdg_dir = xdg::BaseDirectories::with_prefix(APP_NAME)
                .context("failed get xdg directory")?;
            xdg_dir.place_cache_file(LOG_FILE).context("failed get path")?
        }
    };
    let log_file = std::sync::Arc::new(
        std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?,
    );
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .try_init()
        .map_err(|e| anyhow!(e))?;
    Ok(())
}

pub fn create_context(shell: &Shell) -> Context {
    Context::new(shell.pid)
}

/// The read-eval loop.
///
/// Background completions are reported before every prompt and after every
/// command. End of input behaves like `exit`.
pub fn run_interactive<S: LineSource>(
    shell: &mut Shell,
    ctx: &Context,
    input: &mut S,
) -> Result<()> {
    loop {
        shell.reap_background_jobs(ctx)?;
        ctx.write(&shell.config.prompt)?;

        let line = match input.next_line().context("failed to read input")? {
            Some(line) => line,
            None => {
                debug!("end of input");
                shell.exit();
                break;
            }
        };

        shell.eval_str(ctx, &line)?;
        if shell.exited.is_some() {
            break;
        }
    }
    shell.finish();
    Ok(())
}

/// Runs one line as `-c` does and exits with the resulting status.
pub fn execute_command(shell: &mut Shell, ctx: &Context, command: &str) -> ExitCode {
    let result = shell.eval_str(ctx, command);
    if shell.exited.is_none() {
        shell.exit();
    }
    shell.finish();

    match result {
        Ok(()) => ExitCode::from(shell.last_status.exit_code().clamp(0, 255) as u8),
        Err(err) => {
            let _ = ctx.write_stderr(&format!("smallsh: {err:#}"));
            ExitCode::FAILURE
        }
    }
}
