//! The Chunk type - one step's worth of bytes.

use std::fmt;

/// A chunk borrowed from the reader's buffer.
///
/// A chunk lives until the next call to
/// [`ChunkReader::next_chunk`](super::ChunkReader::next_chunk); the buffer
/// behind it is reused for the following read.
#[derive(Clone, Copy)]
pub struct Chunk<'a> {
    data: &'a [u8],
    index: u64,
    offset: u64,
}

impl<'a> Chunk<'a> {
    pub(crate) fn new(data: &'a [u8], index: u64, offset: u64) -> Self {
        Self {
            data,
            index,
            offset,
        }
    }

    /// Returns the chunk bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the 0-based position of this chunk in the stream.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the offset of the first byte in the stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the length of the chunk data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the chunk has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}

impl fmt::Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("index", &self.index)
            .field("offset", &self.offset)
            .field("len", &self.data.len())
            .finish()
    }
}
