//! Digest sessions - one byte source, end to end.
//!
//! - [`DigestSession`] - Opens a source, runs a discipline, finalizes
//! - [`SessionResult`] - Digest, timing and counts of a completed session
//! - [`compute_digest`] - One-call BLAKE3 entry point

use std::time::{Duration, Instant};

use crate::chunk::ChunkReader;
use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::hash::{Digest, DigestState, Hasher};
use crate::progress::{ProgressSink, Reporter};
use crate::scheduler::{
    CancelToken, Discipline, StepState, WorkerPool, run_cooperative, run_offloaded,
};
use crate::source::OpenSource;

#[cfg(feature = "hash-blake3")]
use crate::hash::Blake3Hasher;

/// The outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    /// The finalized digest.
    pub digest: Digest,

    /// Wall time from opening the source to finalizing the digest.
    pub elapsed: Duration,

    /// Number of non-empty chunks hashed (equals the number of events).
    pub chunk_count: u64,

    /// Total bytes hashed.
    pub bytes_hashed: u64,

    /// Name of the hash algorithm.
    pub algorithm: &'static str,
}

/// Hashes one byte source under a configured discipline.
///
/// A session can be run any number of times; every run opens its own source
/// and owns it until the run ends.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "hash-blake3")]
/// # {
/// use stepdigest::{Blake3Hasher, DigestConfig, DigestSession, ProgressLog, ReaderSource};
///
/// let session = DigestSession::new(DigestConfig::new(4)?);
/// let mut log = ProgressLog::new();
///
/// let result = session.run_blocking(
///     || Ok(ReaderSource::new(&b"hello world"[..])),
///     Blake3Hasher::new(),
///     &mut log,
/// )?;
///
/// assert_eq!(result.chunk_count, 3);
/// assert_eq!(log.len(), 3);
/// # }
/// # Ok::<(), stepdigest::DigestError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DigestSession {
    config: DigestConfig,
    pool: Option<WorkerPool>,
    cancel: CancelToken,
}

impl DigestSession {
    /// Creates a session with the given configuration.
    pub fn new(config: DigestConfig) -> Self {
        Self {
            config,
            pool: None,
            cancel: CancelToken::new(),
        }
    }

    /// Uses `pool` for [`Discipline::OffloadAwait`] instead of starting a
    /// single-thread pool per run.
    pub fn with_worker_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Replaces the session's cancel token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that cancels this session's runs.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Opens a source from `open`, hashes it with `hasher`, and reports every
    /// chunk to `sink`.
    ///
    /// The source is closed exactly once whether the run succeeds, fails or
    /// is cancelled. Dropping the returned future also closes it.
    ///
    /// # Errors
    ///
    /// - [`DigestError::InvalidConfig`] before anything is opened
    /// - [`DigestError::SourceUnavailable`] if `open` fails
    /// - [`DigestError::Io`] for read or close failures
    /// - [`DigestError::Cancelled`] if the cancel token was set
    /// - [`DigestError::WorkerLost`] if an offloaded step panicked
    pub async fn run<O, H, P>(
        &self,
        open: O,
        hasher: H,
        sink: &mut P,
    ) -> Result<SessionResult, DigestError>
    where
        O: OpenSource,
        O::Source: Send + 'static,
        H: Hasher + Send + 'static,
        P: ProgressSink + ?Sized,
    {
        self.config.validate()?;
        if self.cancel.is_cancelled() {
            return Err(DigestError::Cancelled);
        }

        let pool = match self.config.discipline() {
            Discipline::CooperativeYield => None,
            Discipline::OffloadAwait => Some(match &self.pool {
                Some(pool) => pool.clone(),
                None => WorkerPool::new(1)?,
            }),
        };

        let source = open.open().map_err(DigestError::SourceUnavailable)?;
        let start = Instant::now();

        log::debug!(
            "digest session started: discipline={:?} chunk_size={} algorithm={}",
            self.config.discipline(),
            self.config.chunk_size(),
            H::ALGORITHM
        );

        let reader = ChunkReader::new(
            source,
            self.config.chunk_size(),
            self.config.read_policy(),
        )?;
        let state = StepState::new(reader, DigestState::new(hasher));
        let mut reporter = Reporter::new(self.config.progress_labels());

        let mut state = match pool {
            None => run_cooperative(state, sink, &mut reporter, &self.cancel).await?,
            Some(pool) => run_offloaded(state, sink, &mut reporter, &self.cancel, &pool).await?,
        };

        let digest = match state.digest.finalize() {
            Ok(digest) => digest,
            Err(e) => return Err(state.fail(e)),
        };
        let elapsed = start.elapsed();
        state.reader.close()?;

        let result = SessionResult {
            digest,
            elapsed,
            chunk_count: state.reader.chunks_read(),
            bytes_hashed: state.digest.bytes(),
            algorithm: H::ALGORITHM,
        };

        log::debug!(
            "digest session finished: {} chunks, {} bytes in {:?}",
            result.chunk_count,
            result.bytes_hashed,
            result.elapsed
        );

        Ok(result)
    }

    /// Runs the session to completion on the current thread.
    ///
    /// Suspension points still happen; there is simply nothing else for the
    /// local executor to run in between.
    pub fn run_blocking<O, H, P>(
        &self,
        open: O,
        hasher: H,
        sink: &mut P,
    ) -> Result<SessionResult, DigestError>
    where
        O: OpenSource,
        O::Source: Send + 'static,
        H: Hasher + Send + 'static,
        P: ProgressSink + ?Sized,
    {
        futures_executor::block_on(self.run(open, hasher, sink))
    }
}

/// Computes the BLAKE3 digest of a source.
///
/// `chunk_size` bounds each step, `discipline` picks where steps run, and
/// `on_progress` receives one event per chunk.
///
/// # Example
///
/// ```
/// use std::io::Read;
/// use stepdigest::{Discipline, ProgressEvent, ReaderSource, compute_digest};
///
/// let result = futures_executor::block_on(compute_digest(
///     || Ok(ReaderSource::new(std::io::repeat(0).take(2_500))),
///     1_000,
///     Discipline::CooperativeYield,
///     |event: ProgressEvent| println!("chunk {}", event.sequence()),
/// ))?;
///
/// assert_eq!(result.chunk_count, 3);
/// # Ok::<(), stepdigest::DigestError>(())
/// ```
#[cfg(feature = "hash-blake3")]
pub async fn compute_digest<O, P>(
    source: O,
    chunk_size: usize,
    discipline: Discipline,
    mut on_progress: P,
) -> Result<SessionResult, DigestError>
where
    O: OpenSource,
    O::Source: Send + 'static,
    P: ProgressSink,
{
    let config = DigestConfig::new(chunk_size)?.with_discipline(discipline);
    DigestSession::new(config)
        .run(source, Blake3Hasher::new(), &mut on_progress)
        .await
}
