pub mod expansion;

use expansion::expand_pid;
use nix::unistd::Pid;
use tracing::{debug, warn};

/// Default bound on the argument vector, counting the terminating slot.
pub const MAX_ARGS: usize = 512;

const BACKGROUND: &str = "&";
const REDIRECT_INPUT: &str = "<";
const REDIRECT_OUTPUT: &str = ">";

/// One parsed input line.
///
/// `argv` always holds at least the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
    input: Option<String>,
    output: Option<String>,
    background: bool,
}

impl Command {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Whether the line asked for background execution. Foreground-only mode
    /// may still overrule this.
    pub fn background(&self) -> bool {
        self.background
    }
}

/// Parses one raw input line.
///
/// Returns `None` for blank lines, comments and lines that name no program.
/// At most `max_args - 1` arguments are kept; later words are dropped while
/// `<`, `>` and `&` keep their meaning.
pub fn parse_line(line: &str, shell_pid: Pid, max_args: usize) -> Option<Command> {
    let line = strip_terminator(line);
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let expanded = expand_pid(line, shell_pid);
    let limit = max_args.saturating_sub(1);

    let mut argv = Vec::new();
    let mut input = None;
    let mut output = None;
    let mut background = false;
    let mut dropped = 0usize;

    let mut words = expanded.split(' ').filter(|w| !w.is_empty());
    while let Some(word) = words.next() {
        match word {
            BACKGROUND => background = true,
            REDIRECT_INPUT => {
                if let Some(path) = words.next() {
                    input = Some(path.to_string());
                }
            }
            REDIRECT_OUTPUT => {
                if let Some(path) = words.next() {
                    output = Some(path.to_string());
                }
            }
            _ if argv.len() < limit => argv.push(word.to_string()),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("too many arguments: dropped {} past the limit of {}", dropped, limit);
    }

    if argv.is_empty() {
        debug!("no program in line {:?}", expanded);
        return None;
    }

    let cmd = Command {
        argv,
        input,
        output,
        background,
    };
    debug!("parsed {:?}", cmd);
    Some(cmd)
}

fn strip_terminator(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(line) => line.strip_suffix('\r').unwrap_or(line),
        None => line,
    }
}
