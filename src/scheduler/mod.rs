//! Step scheduling disciplines.
//!
//! A session is a loop of steps. Each step reads one chunk, folds it into the
//! digest and reports progress. The discipline decides where the step runs
//! and where control goes back to the host executor:
//!
//! - [`Discipline::CooperativeYield`] runs every step on the calling task
//!   and yields to the executor after each report.
//! - [`Discipline::OffloadAwait`] moves each read+hash step onto a
//!   [`WorkerPool`] thread and awaits it; reports happen back on the calling
//!   task.
//!
//! Both disciplines process chunks strictly in order with at most one step in
//! flight, so they hash the same bytes and emit the same events.

mod cancel;
mod cooperative;
mod offload;
mod pool;
mod yield_now;

pub use cancel::CancelToken;
pub use pool::{StepHandle, WorkerPool};

pub(crate) use cooperative::run as run_cooperative;
pub(crate) use offload::run as run_offloaded;

use crate::chunk::ChunkReader;
use crate::error::DigestError;
use crate::hash::{DigestState, Hasher};
use crate::source::ByteSource;

/// How a session interleaves its steps with the host executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Discipline {
    /// Read and hash on the calling task; yield after every chunk.
    #[default]
    CooperativeYield,

    /// Read and hash on a worker thread; await each step.
    OffloadAwait,
}

/// Everything a step mutates. Owned by exactly one context at a time.
#[derive(Debug)]
pub(crate) struct StepState<S: ByteSource, H> {
    pub(crate) reader: ChunkReader<S>,
    pub(crate) digest: DigestState<H>,
}

/// What one successful step produced.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StepSummary {
    pub(crate) len: usize,
    pub(crate) bytes_hashed: u64,
}

impl<S: ByteSource, H: Hasher> StepState<S, H> {
    pub(crate) fn new(reader: ChunkReader<S>, digest: DigestState<H>) -> Self {
        Self { reader, digest }
    }

    /// Reads one chunk and folds it into the digest. `None` at end of stream.
    pub(crate) fn step(&mut self) -> Result<Option<StepSummary>, DigestError> {
        let Some(chunk) = self.reader.next_chunk()? else {
            return Ok(None);
        };
        let len = chunk.len();
        self.digest.update(chunk.data())?;

        log::trace!(
            "hashed chunk {} ({} bytes at offset {})",
            chunk.index(),
            len,
            chunk.offset()
        );

        Ok(Some(StepSummary {
            len,
            bytes_hashed: self.digest.bytes(),
        }))
    }

    /// Closes the source and hands back `err` for propagation.
    pub(crate) fn fail(mut self, err: DigestError) -> DigestError {
        self.reader.close_quietly();
        err
    }
}
