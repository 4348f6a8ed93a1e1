use super::ShellProxy;
use smallsh_types::{Context, ExitStatus};

/// Prints how the last foreground command ended. Never touches the record.
pub fn command(ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let status = proxy.last_status();
    match ctx.write_stdout(&status.to_string()) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(_) => ExitStatus::ExitedWith(1),
    }
}
