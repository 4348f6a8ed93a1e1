use nix::sys::signal::Signal;
use nix::unistd::Pid;
use smallsh_types::Termination;
use tracing::{debug, warn};

use super::signal::send_signal;
use super::wait::try_wait_any;

/// Background children that are still running.
///
/// Bounded: once full, new jobs are not tracked. They still run and are
/// still reaped, they just cannot be killed on exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRegistry {
    pids: Vec<Pid>,
    capacity: usize,
}

impl JobRegistry {
    pub fn new(capacity: usize) -> Self {
        JobRegistry {
            pids: Vec::new(),
            capacity,
        }
    }

    /// Returns false when the registry is full and `pid` was not recorded.
    pub fn track(&mut self, pid: Pid) -> bool {
        if self.pids.len() >= self.capacity {
            warn!(
                "job registry full ({} jobs); not tracking pid {}",
                self.capacity, pid
            );
            return false;
        }
        self.pids.push(pid);
        true
    }

    pub fn remove(&mut self, pid: Pid) -> bool {
        match self.pids.iter().position(|p| *p == pid) {
            Some(index) => {
                self.pids.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn pids(&self) -> &[Pid] {
        &self.pids
    }

    pub fn clear(&mut self) {
        self.pids.clear();
    }

    /// Collects every child that has already terminated, without blocking.
    ///
    /// Reaped pids are dropped from the registry. Children that were never
    /// tracked (the registry was full) are reported too.
    pub fn reap_all(&mut self) -> Vec<(Pid, Termination)> {
        self.reap_with(try_wait_any)
    }

    pub(crate) fn reap_with<F>(&mut self, mut wait: F) -> Vec<(Pid, Termination)>
    where
        F: FnMut() -> Option<(Pid, Termination)>,
    {
        let mut done = Vec::new();
        while let Some((pid, term)) = wait() {
            let tracked = self.remove(pid);
            debug!("reaped pid {} ({}) tracked:{}", pid, term, tracked);
            done.push((pid, term));
        }
        done
    }

    /// Sends `signal` to every tracked job. Returns the pids it was delivered to.
    pub fn signal_all(&self, signal: Signal) -> Vec<Pid> {
        self.pids
            .iter()
            .copied()
            .filter(|pid| send_signal(*pid, signal).is_ok())
            .collect()
    }
}
