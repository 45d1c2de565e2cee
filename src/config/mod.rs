//! Configuration for digest sessions.
//!
//! - [`DigestConfig`] - Chunk size, read policy, labels and discipline
//! - [`ReadPolicy`] - How many `read` calls make up one chunk
//!
//! # Example
//!
//! ```
//! use stepdigest::{DigestConfig, Discipline, ReadPolicy};
//!
//! let config = DigestConfig::new(64 * 1024)?
//!     .with_read_policy(ReadPolicy::Fill)
//!     .with_discipline(Discipline::OffloadAwait);
//!
//! assert_eq!(config.chunk_size(), 64 * 1024);
//! # Ok::<(), stepdigest::DigestError>(())
//! ```

use crate::error::DigestError;
use crate::scheduler::Discipline;

/// Default chunk size (1,000,000 bytes, one "MB" of progress per chunk).
pub const DEFAULT_CHUNK_SIZE: usize = 1_000_000;

/// Largest chunk size a session accepts (256 MiB).
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// How the chunk reader fills a chunk from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadPolicy {
    /// One `read` call per chunk. A short read becomes a short chunk.
    #[default]
    Single,

    /// Keep reading until the chunk is full or the source reports end of
    /// stream. Only the last chunk can be short.
    Fill,
}

/// Configuration for a digest session.
///
/// The chunk size bounds how much work happens between two suspension
/// points, so it also bounds how long the observer can be kept waiting.
///
/// # Example
///
/// ```
/// use stepdigest::DigestConfig;
///
/// let config = DigestConfig::default().with_progress_labels(true);
/// assert!(config.progress_labels());
/// assert!(DigestConfig::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestConfig {
    chunk_size: usize,
    read_policy: ReadPolicy,
    progress_labels: bool,
    discipline: Discipline,
}

impl DigestConfig {
    /// Creates a new configuration with the given chunk size.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::InvalidConfig`] if `chunk_size` is zero or
    /// larger than [`MAX_CHUNK_SIZE`].
    pub fn new(chunk_size: usize) -> Result<Self, DigestError> {
        if chunk_size == 0 {
            return Err(DigestError::InvalidConfig {
                message: "chunk size must be non-zero",
            });
        }

        if chunk_size > MAX_CHUNK_SIZE {
            return Err(DigestError::InvalidConfig {
                message: "chunk size exceeds the 256 MiB ceiling",
            });
        }

        Ok(Self {
            chunk_size,
            ..Self::default()
        })
    }

    /// Sets the chunk size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`DigestConfig::validate`] to check it.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the read policy.
    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.read_policy = policy;
        self
    }

    /// Attaches a human-readable label ("3 MB") to every progress event.
    ///
    /// The label counts whole megabytes hashed including the reported chunk,
    /// so a 1,000,000-byte first chunk is labelled "1 MB".
    pub fn with_progress_labels(mut self, enabled: bool) -> Self {
        self.progress_labels = enabled;
        self
    }

    /// Sets the scheduling discipline.
    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.discipline = discipline;
        self
    }

    /// Returns the maximum chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the read policy.
    pub fn read_policy(&self) -> ReadPolicy {
        self.read_policy
    }

    /// Returns whether progress events carry labels.
    pub fn progress_labels(&self) -> bool {
        self.progress_labels
    }

    /// Returns the scheduling discipline.
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), DigestError> {
        Self::new(self.chunk_size).map(|_| ())
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            read_policy: ReadPolicy::default(),
            progress_labels: false,
            discipline: Discipline::default(),
        }
    }
}
