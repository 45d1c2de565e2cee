// Shared fixtures for integration tests: scripted byte sources that count
// closes, inject failures and record which thread performed each read.

#![allow(dead_code)]

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

/// Observations shared between a test and the source it handed away.
#[derive(Clone, Default)]
pub struct Probe {
    closes: Arc<AtomicUsize>,
    read_threads: Arc<Mutex<Vec<ThreadId>>>,
}

impl Probe {
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn read_threads(&self) -> Vec<ThreadId> {
        self.read_threads.lock().unwrap().clone()
    }
}

/// An in-memory source with configurable read sizes and failure injection.
pub struct ScriptedSource {
    data: Vec<u8>,
    pos: usize,
    max_read: usize,
    fail_on_read: Option<usize>,
    reads: usize,
    probe: Probe,
}

impl ScriptedSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            pos: 0,
            max_read: usize::MAX,
            fail_on_read: None,
            reads: 0,
            probe: Probe::default(),
        }
    }

    /// Returns at most `max` bytes per read.
    pub fn with_max_read(mut self, max: usize) -> Self {
        self.max_read = max;
        self
    }

    /// Fails the read after `reads` successful ones.
    pub fn failing_after(mut self, reads: usize) -> Self {
        self.fail_on_read = Some(reads);
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

impl stepdigest::ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.probe
            .read_threads
            .lock()
            .unwrap()
            .push(thread::current().id());

        if self.fail_on_read == Some(self.reads) {
            return Err(io::Error::other("injected read failure"));
        }
        self.reads += 1;

        let n = buf
            .len()
            .min(self.max_read)
            .min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn close(&mut self) -> io::Result<()> {
        self.probe.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Deterministic pseudo-random bytes.
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 13) as u8).collect()
}

/// Wraps an already-built source as a provider.
pub fn provide(source: ScriptedSource) -> stepdigest::Opened<ScriptedSource> {
    stepdigest::Opened(source)
}

/// Routes `log` output through the test harness; safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
