//! Pluggable hash primitives and the incremental digest state.
//!
//! - [`Hasher`] - The primitive a session folds chunks into
//! - [`DigestState`] - Single-use accumulator guarding finalize semantics
//! - [`Digest`] - The finalized output
//! - [`Blake3Hasher`] - BLAKE3 (requires `hash-blake3` feature)
//! - [`Sha256Hasher`] - SHA-256 (requires `hash-sha2` feature)
//! - [`Sha1Hasher`] - SHA-1 (requires `hash-sha1` feature)

mod digest;

#[cfg(feature = "hash-blake3")]
mod blake3;
#[cfg(feature = "hash-sha1")]
mod sha1;
#[cfg(feature = "hash-sha2")]
mod sha2;

pub use digest::Digest;

#[cfg(feature = "hash-blake3")]
pub use blake3::Blake3Hasher;
#[cfg(feature = "hash-sha1")]
pub use sha1::Sha1Hasher;
#[cfg(feature = "hash-sha2")]
pub use sha2::Sha256Hasher;

use crate::error::DigestError;

/// An incremental cryptographic hash.
///
/// Implementations must be deterministic: feeding the same bytes split at
/// any boundaries yields the same digest as feeding them in one call.
pub trait Hasher {
    /// Short algorithm name, e.g. `"blake3"`.
    const ALGORITHM: &'static str;

    /// Digest length in bytes.
    const OUTPUT_LEN: usize;

    /// Folds `data` into the running state.
    fn update(&mut self, data: &[u8]);

    /// Returns the digest of everything fed so far.
    fn finalize(&self) -> Digest;

    /// Resets the hasher to its initial state.
    fn reset(&mut self);
}

/// The running digest of one session.
///
/// Wraps a [`Hasher`] and enforces single use: once finalized, both
/// [`update`](Self::update) and [`finalize`](Self::finalize) fail with
/// [`DigestError::InvalidState`].
#[derive(Debug)]
pub struct DigestState<H> {
    hasher: H,
    bytes: u64,
    finalized: bool,
}

impl<H: Hasher> DigestState<H> {
    /// Creates a fresh state around `hasher`, resetting it first.
    pub fn new(mut hasher: H) -> Self {
        hasher.reset();
        Self {
            hasher,
            bytes: 0,
            finalized: false,
        }
    }

    /// Folds `data` into the digest.
    pub fn update(&mut self, data: &[u8]) -> Result<(), DigestError> {
        if self.finalized {
            return Err(DigestError::InvalidState {
                message: "update after finalize",
            });
        }
        self.hasher.update(data);
        self.bytes += data.len() as u64;
        Ok(())
    }

    /// Produces the digest. Callable once.
    pub fn finalize(&mut self) -> Result<Digest, DigestError> {
        if self.finalized {
            return Err(DigestError::InvalidState {
                message: "digest already finalized",
            });
        }
        self.finalized = true;
        Ok(self.hasher.finalize())
    }

    /// Returns the number of bytes folded in so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// Returns true once [`finalize`](Self::finalize) has succeeded.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}
