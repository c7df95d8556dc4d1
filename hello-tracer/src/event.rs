use std::{io::Write, mem};

use hello_tracer_common::EventRecord;
use log::{error, warn};

/// Receives raw samples drained from the event buffer.
pub trait EventSink {
    fn emit(&mut self, raw: &[u8]);
}

impl<F: FnMut(&[u8])> EventSink for F {
    fn emit(&mut self, raw: &[u8]) {
        self(raw)
    }
}

fn cstr_from_u8(bytes: &[u8]) -> String {
    let len = bytes.iter().position(|&c| c == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..len]).into_owned()
}

/// Reads one record from the front of `raw`.
///
/// Perf samples may carry trailing padding, so only the length up to
/// `size_of::<EventRecord>()` is required.
pub fn decode(raw: &[u8]) -> Option<EventRecord> {
    if raw.len() < mem::size_of::<EventRecord>() {
        return None;
    }
    // EventRecord is plain integers and byte arrays; any bit pattern is valid.
    Some(unsafe { raw.as_ptr().cast::<EventRecord>().read_unaligned() })
}

pub fn render(program: &str, event: &EventRecord) -> String {
    format!(
        "[info '{}'] pid: {}, uid: {}, command: {}, message: {}, path: {}",
        program,
        event.pid,
        event.uid,
        cstr_from_u8(&event.command),
        cstr_from_u8(&event.message),
        cstr_from_u8(&event.path),
    )
}

/// Prints one line per record, tagged with the owning program's name.
///
/// After the first failed write (e.g. a closed pipe) records are dropped
/// silently.
pub struct EventPrinter<'a, W> {
    program: &'a str,
    out: W,
    closed: bool,
}

impl<'a, W: Write> EventPrinter<'a, W> {
    pub fn new(program: &'a str, out: W) -> Self {
        Self {
            program,
            out,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn decode_and_emit(&mut self, raw: &[u8]) {
        if self.closed {
            return;
        }
        let Some(event) = decode(raw) else {
            error!(
                "unexpected EventRecord size: {} (expected {})",
                raw.len(),
                mem::size_of::<EventRecord>()
            );
            return;
        };
        if let Err(e) = writeln!(self.out, "{}", render(self.program, &event)) {
            warn!("failed to write event, dropping further output: {e}");
            self.closed = true;
        }
    }
}

impl<W: Write> EventSink for EventPrinter<'_, W> {
    fn emit(&mut self, raw: &[u8]) {
        self.decode_and_emit(raw)
    }
}
