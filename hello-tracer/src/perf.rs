use std::{
    future, io, mem,
    os::fd::{AsFd, AsRawFd, RawFd},
    task::{Context, Poll},
    time::Duration,
};

use aya::{
    maps::{Map, MapData, PerfEventArray, perf::PerfEventArrayBuffer},
    util::online_cpus,
};
use bytes::BytesMut;
use hello_tracer_common::EventRecord;
use log::{debug, warn};
use tokio::{io::unix::AsyncFd, time};

use crate::{
    error::{Error, Result},
    event::EventSink,
    poller::EventSource,
    resolver::MapBinding,
};

// Samples read per ring per read_events call.
const SCRATCH_BUFFERS: usize = 16;

struct Ring<'a> {
    cpu: u32,
    // Declared before `buffer` so it deregisters the fd before the fd closes.
    readiness: AsyncFd<RawFd>,
    buffer: PerfEventArrayBuffer<&'a mut MapData>,
}

/// Per-CPU perf rings over a `BPF_MAP_TYPE_PERF_EVENT_ARRAY` map, waited on
/// through the tokio reactor.
///
/// Borrows the map from its binding, so the owning program cannot be torn
/// down while the buffer exists. Must be created inside a tokio runtime.
pub struct PerfBuffer<'a> {
    rings: Vec<Ring<'a>>,
    scratch: Vec<BytesMut>,
}

impl<'a> PerfBuffer<'a> {
    pub fn new(binding: &'a mut MapBinding<Map>, pages_per_cpu: usize) -> Result<Self> {
        let name = binding.name().to_owned();
        let mut array = PerfEventArray::try_from(binding.map_mut())
            .map_err(|e| Error::buffer_create(&name, e))?;

        let cpus = online_cpus().map_err(|e| {
            Error::buffer_create(&name, format!("failed to list online cpus: {e:?}"))
        })?;

        let mut rings = Vec::with_capacity(cpus.len());
        for cpu in cpus {
            let buffer = array
                .open(cpu, Some(pages_per_cpu))
                .map_err(|e| Error::buffer_create(&name, e))?;
            let readiness = AsyncFd::new(buffer.as_fd().as_raw_fd())
                .map_err(|e| Error::buffer_create(&name, e))?;
            rings.push(Ring {
                cpu,
                readiness,
                buffer,
            });
        }
        debug!("opened {} perf rings over `{name}`", rings.len());

        let scratch = (0..SCRATCH_BUFFERS)
            .map(|_| BytesMut::with_capacity(mem::size_of::<EventRecord>()))
            .collect();

        Ok(Self { rings, scratch })
    }
}

/// Drains every ring the reactor reports readable. Pending until at least
/// one ring was readable.
fn poll_drain(
    rings: &mut [Ring<'_>],
    scratch: &mut [BytesMut],
    sink: &mut dyn EventSink,
    cx: &mut Context<'_>,
) -> Poll<Result<usize>> {
    let mut woken = false;
    let mut records = 0;

    for ring in rings.iter_mut() {
        let mut guard = match ring.readiness.poll_read_ready(cx) {
            Poll::Ready(Ok(guard)) => guard,
            Poll::Ready(Err(e)) => return Poll::Ready(Err(Error::Poll(e))),
            Poll::Pending => continue,
        };
        woken = true;

        while ring.buffer.readable() {
            let events = match ring.buffer.read_events(scratch) {
                Ok(events) => events,
                Err(e) => return Poll::Ready(Err(Error::Poll(io::Error::other(e)))),
            };
            if events.lost > 0 {
                warn!("lost {} events on cpu {}", events.lost, ring.cpu);
            }
            for buf in scratch.iter().take(events.read) {
                sink.emit(buf);
            }
            records += events.read;
        }
        // Readiness is edge-triggered: a ring that woke with nothing to read
        // (e.g. hung up) stays quiet until the kernel signals it again.
        guard.clear_ready();
    }

    if woken {
        Poll::Ready(Ok(records))
    } else {
        Poll::Pending
    }
}

impl EventSource for PerfBuffer<'_> {
    async fn wait(&mut self, timeout: Duration, sink: &mut dyn EventSink) -> Result<usize> {
        let Self { rings, scratch } = self;
        let drained = future::poll_fn(|cx| poll_drain(rings, scratch, sink, cx));
        match time::timeout(timeout, drained).await {
            Ok(result) => result,
            Err(_elapsed) => Ok(0),
        }
    }
}
