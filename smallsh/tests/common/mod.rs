#![allow(dead_code)]

use nix::unistd::Pid;
use std::io::{Read, Write};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Output, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempDir;

const WAIT_LIMIT: Duration = Duration::from_secs(10);

pub fn smallsh(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_smallsh"));
    cmd.arg("--log-file")
        .arg(dir.join("smallsh.log"))
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

/// Feeds `input` to a fresh shell and collects everything it printed.
pub fn run_script(dir: &Path, input: &str) -> Output {
    let mut child = smallsh(dir).spawn().expect("failed to execute smallsh");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write script");
    child.wait_with_output().expect("wait for smallsh")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Extracts N from the first "background pid is N" line.
pub fn background_pid(out: &str) -> Option<i32> {
    out.lines()
        .filter_map(|l| l.rsplit_once("background pid is "))
        .map(|(_, pid)| pid.trim())
        .find_map(|pid| pid.parse().ok())
}

/// True while `pid` exists and is not a zombie.
pub fn is_running(pid: i32) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => !stat.contains(") Z "),
        Err(_) => false,
    }
}

pub fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < WAIT_LIMIT {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    check()
}

/// A shell running in its own process group, driven line by line.
pub struct Session {
    child: Child,
    stdin: Option<ChildStdin>,
    out: Arc<Mutex<String>>,
    reader: Option<JoinHandle<()>>,
    dir: TempDir,
}

impl Session {
    pub fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut cmd = smallsh(dir.path());
        cmd.process_group(0);
        let mut child = cmd.spawn().expect("failed to execute smallsh");

        let stdin = child.stdin.take();
        let mut stdout = child.stdout.take().expect("stdout");
        let out = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&out);
        let reader = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap()
                        .push_str(&String::from_utf8_lossy(&buf[..n])),
                }
            }
        });

        Session {
            child,
            stdin,
            out,
            reader: Some(reader),
            dir,
        }
    }

    pub fn pid(&self) -> Pid {
        Pid::from_raw(self.child.id() as i32)
    }

    pub fn dir(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn send(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin open");
        stdin.write_all(line.as_bytes()).expect("write line");
        stdin.write_all(b"\n").expect("write newline");
        stdin.flush().expect("flush");
    }

    pub fn output(&self) -> String {
        self.out.lock().unwrap().clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.output().matches(needle).count()
    }

    pub fn wait_for(&self, needle: &str) -> bool {
        eventually(|| self.output().contains(needle))
    }

    pub fn wait_for_count(&self, needle: &str, n: usize) -> bool {
        eventually(|| self.count(needle) >= n)
    }

    /// Closes stdin and waits for the shell to exit.
    pub fn finish(mut self) -> (ExitStatus, String) {
        drop(self.stdin.take());
        let status = self.child.wait().expect("wait for smallsh");
        if let Some(reader) = self.reader.take() {
            reader.join().expect("reader thread");
        }
        let out = self.output();
        (status, out)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
