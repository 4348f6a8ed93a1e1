use nix::unistd::Pid;

const PID_VARIABLE: &str = "$$";

/// Replaces every `$$` with the shell's pid.
///
/// Matches are taken left to right without overlap and the inserted text is
/// never scanned again, so `$$$` becomes `<pid>$`.
pub fn expand_pid(input: &str, shell_pid: Pid) -> String {
    if !input.contains(PID_VARIABLE) {
        return input.to_string();
    }
    input.replace(PID_VARIABLE, &shell_pid.as_raw().to_string())
}
