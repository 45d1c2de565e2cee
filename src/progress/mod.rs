//! Progress reporting.
//!
//! - [`ProgressEvent`] - One event per hashed chunk
//! - [`ProgressSink`] - The observer capability a session reports to
//! - [`NoProgress`] - Discards events
//! - [`ProgressLog`] - Collects events in order
//!
//! Any `FnMut(ProgressEvent)` closure is a sink.

/// Bytes per "MB" in progress labels.
const LABEL_UNIT: u64 = 1_000_000;

/// Progress for one hashed chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    sequence: u64,
    chunk_len: usize,
    bytes_hashed: u64,
    label: Option<String>,
}

impl ProgressEvent {
    /// Creates an unlabelled event.
    pub fn new(sequence: u64, chunk_len: usize, bytes_hashed: u64) -> Self {
        Self {
            sequence,
            chunk_len,
            bytes_hashed,
            label: None,
        }
    }

    /// Attaches a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// 0-based chunk sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Length of the chunk this event reports.
    pub fn chunk_len(&self) -> usize {
        self.chunk_len
    }

    /// Total bytes hashed including this chunk.
    pub fn bytes_hashed(&self) -> u64 {
        self.bytes_hashed
    }

    /// Optional human-readable label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Receives progress events on the observer's context.
///
/// Called once per non-empty chunk, in chunk order, from inside the step
/// that produced the chunk. Implementations should return promptly: time
/// spent here delays the next suspension point.
pub trait ProgressSink {
    /// Handles one event.
    fn report(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent),
{
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// A sink that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}

/// A sink that keeps every event.
#[derive(Debug, Clone, Default)]
pub struct ProgressLog {
    events: Vec<ProgressEvent>,
}

impl ProgressLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the events received so far.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Returns the number of events received.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no event was received.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consumes the log.
    pub fn into_events(self) -> Vec<ProgressEvent> {
        self.events
    }
}

impl ProgressSink for ProgressLog {
    fn report(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}

/// Builds events for one session from step summaries.
pub(crate) struct Reporter {
    labels: bool,
    next_sequence: u64,
}

impl Reporter {
    pub(crate) fn new(labels: bool) -> Self {
        Self {
            labels,
            next_sequence: 0,
        }
    }

    /// Reports a hashed chunk to `sink`.
    pub(crate) fn report<P: ProgressSink + ?Sized>(
        &mut self,
        sink: &mut P,
        chunk_len: usize,
        bytes_hashed: u64,
    ) {
        let mut event = ProgressEvent::new(self.next_sequence, chunk_len, bytes_hashed);
        if self.labels {
            event = event.with_label(format!("{} MB", bytes_hashed / LABEL_UNIT));
        }
        self.next_sequence += 1;
        sink.report(event);
    }

    /// Number of events reported.
    pub(crate) fn reported(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |event: ProgressEvent| seen.push(event.sequence());
            sink.report(ProgressEvent::new(0, 1, 1));
            sink.report(ProgressEvent::new(1, 1, 2));
        }
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn test_reporter_sequences_and_labels() {
        let mut log = ProgressLog::new();
        let mut reporter = Reporter::new(true);
        reporter.report(&mut log, 1_000_000, 1_000_000);
        reporter.report(&mut log, 1_000_000, 2_000_000);
        reporter.report(&mut log, 500_000, 2_500_000);

        let sequences: Vec<_> = log.events().iter().map(|e| e.sequence()).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(log.events()[2].label(), Some("2 MB"));
        assert_eq!(log.events()[2].chunk_len(), 500_000);
        assert_eq!(reporter.reported(), 3);
    }

    #[test]
    fn test_reporter_without_labels() {
        let mut log = ProgressLog::new();
        Reporter::new(false).report(&mut log, 10, 10);
        assert!(log.events()[0].label().is_none());
    }

    #[test]
    fn test_no_progress() {
        let mut sink = NoProgress;
        sink.report(ProgressEvent::new(0, 0, 0));
    }
}
