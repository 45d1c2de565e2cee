//! SHA-1 digest implementation.
//!
//! SHA-1 is not collision resistant. It is here to match checksums published
//! by existing tools, not for new content addressing.

use sha1::Digest as _;

use super::{Digest, Hasher};

/// A hasher that computes SHA-1 digests.
#[derive(Debug, Clone, Default)]
pub struct Sha1Hasher {
    state: sha1::Sha1,
}

impl Sha1Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hasher for Sha1Hasher {
    const ALGORITHM: &'static str = "sha1";
    const OUTPUT_LEN: usize = 20;

    fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    fn finalize(&self) -> Digest {
        Digest::new(self.state.clone().finalize().to_vec())
    }

    fn reset(&mut self) {
        sha1::Digest::reset(&mut self.state);
    }
}
