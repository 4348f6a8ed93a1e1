use super::Shell;
use crate::parser::parse_line;
use crate::process::signal::effective_background;
use anyhow::Result;
use smallsh_types::Context;
use tracing::debug;

pub fn eval_str(shell: &mut Shell, ctx: &Context, input: &str) -> Result<()> {
    let Some(cmd) = parse_line(input, ctx.shell_pid, shell.config.max_args) else {
        return Ok(());
    };

    if let Some(builtin) = smallsh_builtin::get_command(cmd.program()) {
        debug!("builtin {} argv:{:?}", cmd.program(), cmd.argv());
        let status = builtin(ctx, cmd.argv().to_vec(), shell);
        debug!("builtin {} -> {:?}", cmd.program(), status);
    } else {
        let background = effective_background(cmd.background());
        shell.launch_command(ctx, &cmd, background)?;
    }

    if shell.exited.is_none() {
        shell.reap_background_jobs(ctx)?;
    }
    Ok(())
}
