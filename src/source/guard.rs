//! Scoped ownership of a session's byte source.

use std::io;

use super::ByteSource;

/// Owns a [`ByteSource`] for one session and closes it exactly once.
///
/// The session closes the guard explicitly on every path it controls. If the
/// guard is dropped first (a cancelled future, a panicking worker step) the
/// drop closes the source instead.
#[derive(Debug)]
pub(crate) struct SourceGuard<S: ByteSource> {
    source: S,
    closed: bool,
}

impl<S: ByteSource> SourceGuard<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    pub(crate) fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.source.read(buf)
    }

    /// Closes the source. Later calls are no-ops.
    pub(crate) fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close()
    }

    /// Closes the source on a failure path, where the original error wins.
    pub(crate) fn close_quietly(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("closing byte source after failure: {}", e);
        }
    }
}

impl<S: ByteSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        if !self.closed {
            log::debug!("byte source dropped before the session closed it");
            self.close_quietly();
        }
    }
}
