use super::ShellProxy;
use smallsh_types::{Context, ExitStatus, ShellError};
use tracing::debug;

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let dir = match argv.get(1) {
        Some(dir) => dir.to_string(),
        None => match home_dir() {
            Some(home) => home,
            None => {
                debug!("cd: no home directory available");
                ctx.write_stdout(&ShellError::ChangeDir.to_string()).ok();
                return ExitStatus::ExitedWith(1);
            }
        },
    };

    match proxy.changepwd(&dir) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => {
            debug!("cd: {}: {}", dir, err);
            ctx.write_stdout(&ShellError::ChangeDir.to_string()).ok();
            ExitStatus::ExitedWith(1)
        }
    }
}

/// `$HOME`, or the platform's idea of the home directory when it is unset.
fn home_dir() -> Option<String> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| home.to_string_lossy().into_owned())
        .or_else(|| dirs::home_dir().map(|home| home.to_string_lossy().into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockProxy, capture_context, captured};

    #[test]
    fn changes_to_given_directory() {
        let (ctx, mut file) = capture_context();
        let mut proxy = MockProxy::default();
        let status = command(
            &ctx,
            vec!["cd".to_string(), "/tmp".to_string()],
            &mut proxy,
        );
        assert_eq!(status, ExitStatus::ExitedWith(0));
        assert_eq!(proxy.dirs, vec!["/tmp".to_string()]);
        assert_eq!(captured(&mut file), "");
    }

    #[test]
    fn ignores_extra_arguments() {
        let (ctx, _file) = capture_context();
        let mut proxy = MockProxy::default();
        command(
            &ctx,
            vec!["cd".to_string(), "a".to_string(), "b".to_string()],
            &mut proxy,
        );
        assert_eq!(proxy.dirs, vec!["a".to_string()]);
    }

    #[test]
    fn without_argument_goes_home() {
        let (ctx, _file) = capture_context();
        let mut proxy = MockProxy::default();
        let status = command(&ctx, vec!["cd".to_string()], &mut proxy);
        assert_eq!(status, ExitStatus::ExitedWith(0));
        assert_eq!(proxy.dirs, vec![home_dir().expect("home directory")]);
    }

    #[test]
    fn reports_missing_directory() {
        let (ctx, mut file) = capture_context();
        let mut proxy = MockProxy {
            fail_chdir: true,
            ..Default::default()
        };
        let status = command(
            &ctx,
            vec!["cd".to_string(), "/no/such/dir".to_string()],
            &mut proxy,
        );
        assert_eq!(status, ExitStatus::ExitedWith(1));
        assert_eq!(captured(&mut file), "cd: no such file or directory\n");
    }
}
