//! stepdigest
//!
//! Streaming content digests with cooperative progress reporting.
//!
//! `stepdigest` hashes a byte source one bounded chunk at a time and reports
//! progress after every chunk, without ever holding the observer's executor
//! for longer than one chunk. It is designed as a small primitive for:
//!
//! - checksum dialogs and progress bars in event-loop applications
//! - integrity checks of large downloads
//! - content addressing in services that must stay responsive
//!
//! The crate intentionally:
//! - does NOT pick which file to hash
//! - does NOT render progress
//! - does NOT retry failed reads
//! - does NOT persist results
//!
//! It only does one thing: **Read bytes → step → digest & progress**
//!
//! Two disciplines decide where each step runs:
//!
//! - [`Discipline::CooperativeYield`]: on the calling task, yielding to the
//!   executor after every chunk.
//! - [`Discipline::OffloadAwait`]: on a [`WorkerPool`] thread, awaited by the
//!   calling task, which reports progress.
//!
//! Both produce identical digests and identical progress sequences.
//!
//! # Example
//!
//! ```no_run
//! use stepdigest::{Discipline, FileSource, ProgressEvent, compute_digest};
//!
//! async fn checksum(path: &str) -> Result<(), stepdigest::DigestError> {
//!     let result = compute_digest(
//!         FileSource::opener(path),
//!         1_000_000,
//!         Discipline::CooperativeYield,
//!         |event: ProgressEvent| println!("{} bytes", event.bytes_hashed()),
//!     )
//!     .await?;
//!
//!     println!("{} in {:?}", result.digest, result.elapsed);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod config;
mod error;
mod hash;
mod progress;
mod scheduler;
mod session;
mod source;

mod buffer; // internal (thread-local reuse)

//
// Public surface
//

pub use chunk::{Chunk, ChunkReader};
pub use config::{DEFAULT_CHUNK_SIZE, DigestConfig, MAX_CHUNK_SIZE, ReadPolicy};
pub use error::DigestError;
pub use hash::{Digest, DigestState, Hasher};
pub use progress::{NoProgress, ProgressEvent, ProgressLog, ProgressSink};
pub use scheduler::{CancelToken, Discipline, StepHandle, WorkerPool};
pub use session::{DigestSession, SessionResult};
pub use source::{ByteSource, FileSource, OpenSource, Opened, ReaderSource};

#[cfg(feature = "hash-blake3")]
pub use hash::Blake3Hasher;
#[cfg(feature = "hash-sha1")]
pub use hash::Sha1Hasher;
#[cfg(feature = "hash-sha2")]
pub use hash::Sha256Hasher;

#[cfg(feature = "hash-blake3")]
pub use session::compute_digest;
