use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::{error, info};
use tokio::{
    signal::unix::{SignalKind, signal},
    task::JoinHandle,
};

/// Cooperative stop signal shared between the interrupt handler and the
/// poller. Once stopped it stays stopped.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    stopped: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }
}

/// Stops a [`CancellationFlag`] on SIGINT.
///
/// The handler is registered before `install` returns. Dropping the
/// controller stops listening.
pub struct ShutdownController {
    task: JoinHandle<()>,
}

impl ShutdownController {
    /// Must be called from within a tokio runtime.
    pub fn install(flag: CancellationFlag) -> io::Result<Self> {
        let mut interrupts = signal(SignalKind::interrupt())?;
        let task = tokio::spawn(async move {
            loop {
                if interrupts.recv().await.is_none() {
                    error!("interrupt handler stream closed");
                    return;
                }
                info!("signal {} received", libc::SIGINT);
                flag.stop();
            }
        });
        Ok(Self { task })
    }
}

impl Drop for ShutdownController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn flag_is_monotonic() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();
        assert!(observer.is_running());
        flag.stop();
        assert!(!observer.is_running());
        flag.stop();
        assert!(!observer.is_running());
    }

    #[tokio::test]
    async fn interrupt_stops_flag() {
        let flag = CancellationFlag::new();
        let _controller = ShutdownController::install(flag.clone()).unwrap();

        let ret = unsafe { libc::kill(libc::getpid(), libc::SIGINT) };
        assert_eq!(ret, 0);

        tokio::time::timeout(Duration::from_secs(5), async {
            while flag.is_running() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("flag not stopped after SIGINT");
    }
}
