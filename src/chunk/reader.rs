//! ChunkReader - successive bounded reads from a byte source.

use crate::buffer::Buffer;
use crate::chunk::Chunk;
use crate::config::{DigestConfig, ReadPolicy};
use crate::error::DigestError;
use crate::source::{ByteSource, SourceGuard};

/// Pulls chunks of at most `chunk_size` bytes from a [`ByteSource`].
///
/// A zero-byte read ends the stream. Under [`ReadPolicy::Single`] a short
/// read is returned as a short chunk and the stream continues; under
/// [`ReadPolicy::Fill`] reads are repeated until the chunk is full or the
/// source is exhausted.
///
/// The reader owns its source and closes it when dropped, unless
/// [`close`](Self::close) already did.
///
/// # Example
///
/// ```
/// use stepdigest::{ChunkReader, ReadPolicy, ReaderSource};
///
/// let source = ReaderSource::new(&[7u8; 10][..]);
/// let mut reader = ChunkReader::new(source, 4, ReadPolicy::Single)?;
///
/// let mut lens = Vec::new();
/// while let Some(chunk) = reader.next_chunk()? {
///     lens.push(chunk.len());
/// }
/// assert_eq!(lens, vec![4, 4, 2]);
/// # Ok::<(), stepdigest::DigestError>(())
/// ```
#[derive(Debug)]
pub struct ChunkReader<S: ByteSource> {
    source: SourceGuard<S>,
    buffer: Buffer,
    policy: ReadPolicy,
    index: u64,
    offset: u64,
    finished: bool,
}

impl<S: ByteSource> ChunkReader<S> {
    /// Creates a reader over `source`.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfig`] if `chunk_size` is zero or above
    /// [`MAX_CHUNK_SIZE`](crate::MAX_CHUNK_SIZE). The source is closed before the error is returned.
    pub fn new(source: S, chunk_size: usize, policy: ReadPolicy) -> Result<Self, DigestError> {
        let source = SourceGuard::new(source);
        DigestConfig::new(chunk_size)?;

        Ok(Self {
            source,
            buffer: Buffer::take(chunk_size),
            policy,
            index: 0,
            offset: 0,
            finished: false,
        })
    }

    /// Reads the next chunk, or `None` at end of stream.
    ///
    /// Read errors are returned as [`DigestError::Io`] and are not retried;
    /// the reader is finished afterwards.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk<'_>>, DigestError> {
        if self.finished {
            return Ok(None);
        }

        let len = match self.policy {
            ReadPolicy::Single => self.read_once(),
            ReadPolicy::Fill => self.read_full(),
        }
        .inspect_err(|_| self.finished = true)?;

        if len == 0 {
            self.finished = true;
            return Ok(None);
        }

        let (index, offset) = (self.index, self.offset);
        self.index += 1;
        self.offset += len as u64;

        Ok(Some(Chunk::new(self.buffer.filled(len), index, offset)))
    }

    fn read_once(&mut self) -> Result<usize, DigestError> {
        let n = self.source.read(self.buffer.as_mut_slice())?;
        Ok(n.min(self.buffer.len()))
    }

    fn read_full(&mut self) -> Result<usize, DigestError> {
        let buf = self.buffer.as_mut_slice();
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.source.read(&mut buf[filled..])?;
            if n == 0 {
                // Remember the end so the next call does not read again.
                self.finished = true;
                break;
            }
            filled += n;
        }
        Ok(filled.min(buf.len()))
    }

    /// Returns the number of chunks produced so far.
    pub fn chunks_read(&self) -> u64 {
        self.index
    }

    /// Returns the number of bytes produced so far.
    pub fn bytes_read(&self) -> u64 {
        self.offset
    }

    /// Returns true once the end of stream or an error has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Closes the underlying source. Later calls are no-ops.
    pub fn close(&mut self) -> Result<(), DigestError> {
        self.source.close().map_err(DigestError::Io)
    }

    pub(crate) fn close_quietly(&mut self) {
        self.source.close_quietly();
    }
}
