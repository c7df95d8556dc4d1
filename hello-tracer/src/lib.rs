//! Loads `hello.bpf.o`, attaches its programs and prints the events they
//! write to the `output` perf event array until interrupted.

pub mod attach;
pub mod aya_backend;
pub mod config;
pub mod error;
pub mod event;
pub mod kernel;
pub mod loader;
pub mod logging;
pub mod perf;
pub mod poller;
pub mod program;
pub mod resolver;
pub mod session;
pub mod shutdown;

#[cfg(test)]
mod testing;

pub use aya_backend::AyaKernel;
pub use error::{Error, Result};
pub use program::ProgramHandle;
pub use shutdown::{CancellationFlag, ShutdownController};
