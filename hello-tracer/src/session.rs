//! Startup, steady state and teardown of one traced object.

use std::path::Path;

use crate::{config::TracerConfig, error::Error, kernel::Kernel, program::ProgramHandle};

/// Builds the program, runs `steady` against it, then destroys it.
///
/// A construction failure returns before `steady` is called and leaves
/// nothing attached. Whatever `steady` returns, the program is destroyed
/// before this function returns.
pub async fn run<K, T, E, F>(
    kernel: K,
    path: &Path,
    config: &TracerConfig,
    steady: F,
) -> Result<T, E>
where
    K: Kernel,
    E: From<Error>,
    F: AsyncFnOnce(&mut ProgramHandle<K>) -> Result<T, E>,
{
    let mut program = ProgramHandle::open_and_attach(kernel, path, config)?;
    let outcome = steady(&mut program).await;
    program.destroy();
    outcome
}

/// Process exit status for a session outcome: `0` on a clean (including
/// interrupted) shutdown, `1` on any failure.
pub fn exit_status<T, E>(outcome: &Result<T, E>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
