#![allow(clippy::module_inception)]

pub mod fork;
pub mod job;
pub mod process;
pub mod redirect;
pub mod signal;
pub mod wait;

pub use job::JobRegistry;
pub use process::Process;
pub use redirect::Redirect;
pub use wait::wait_pid;
