use std::time::Duration;

use log::error;

use crate::{error::Result, event::EventSink, shutdown::CancellationFlag};

/// A buffer that can be waited on for records.
pub trait EventSource {
    /// Waits up to `timeout` for records and hands each one to `sink` in
    /// arrival order. Returns how many were dispatched; `0` means nothing was
    /// available before the timeout.
    fn wait(
        &mut self,
        timeout: Duration,
        sink: &mut dyn EventSink,
    ) -> impl Future<Output = Result<usize>>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollStats {
    pub waits: u64,
    pub records: u64,
    pub failures: u64,
}

/// Drains `source` into `sink` until `flag` is stopped.
///
/// The flag is checked before every bounded wait. Records that arrive are
/// drained with zero-timeout waits before the flag is checked again, so a
/// stop is noticed within one `timeout`. A failed wait is logged and counts
/// as an empty one.
pub async fn run<S: EventSource>(
    source: &mut S,
    sink: &mut dyn EventSink,
    flag: &CancellationFlag,
    timeout: Duration,
) -> PollStats {
    let mut stats = PollStats::default();

    while flag.is_running() {
        let mut ready = wait_once(source, sink, timeout, &mut stats).await;
        while ready > 0 {
            stats.records += ready as u64;
            ready = wait_once(source, sink, Duration::ZERO, &mut stats).await;
        }
    }

    stats
}

async fn wait_once<S: EventSource>(
    source: &mut S,
    sink: &mut dyn EventSink,
    timeout: Duration,
    stats: &mut PollStats,
) -> usize {
    stats.waits += 1;
    match source.wait(timeout, sink).await {
        Ok(ready) => ready,
        Err(e) => {
            stats.failures += 1;
            error!("{e}");
            0
        }
    }
}
