//! SHA-256 digest implementation.

use sha2::Digest as _;

use super::{Digest, Hasher};

/// A hasher that computes SHA-256 digests.
#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    state: sha2::Sha256,
}

impl Sha256Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hasher for Sha256Hasher {
    const ALGORITHM: &'static str = "sha256";
    const OUTPUT_LEN: usize = 32;

    fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    fn finalize(&self) -> Digest {
        Digest::new(self.state.clone().finalize().to_vec())
    }

    fn reset(&mut self) {
        sha2::Digest::reset(&mut self.state);
    }
}
