//! BLAKE3 digest implementation.

use super::{Digest, Hasher};

/// A hasher that computes BLAKE3 digests.
#[derive(Debug, Clone)]
pub struct Blake3Hasher {
    state: blake3::Hasher,
}

impl Blake3Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: blake3::Hasher::new(),
        }
    }

    /// Creates a new hasher in keyed mode.
    pub fn new_keyed(key: &[u8; 32]) -> Self {
        Self {
            state: blake3::Hasher::new_keyed(key),
        }
    }
}

impl Hasher for Blake3Hasher {
    const ALGORITHM: &'static str = "blake3";
    const OUTPUT_LEN: usize = blake3::OUT_LEN;

    fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    fn finalize(&self) -> Digest {
        Digest::new(self.state.finalize().as_bytes().to_vec())
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_BLAKE3: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

    #[test]
    fn test_empty_input() {
        let hasher = Blake3Hasher::new();
        assert_eq!(hasher.finalize().to_hex(), EMPTY_BLAKE3);
        assert_eq!(hasher.finalize().len(), Blake3Hasher::OUTPUT_LEN);
    }

    #[test]
    fn test_incremental_hashing() {
        let mut hasher = Blake3Hasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");

        assert_eq!(
            hasher.finalize().as_bytes(),
            blake3::hash(b"hello world").as_bytes()
        );
    }

    #[test]
    fn test_reset() {
        let mut hasher = Blake3Hasher::new();
        hasher.update(b"some data");

        hasher.reset();
        hasher.update(b"hello world");

        assert_eq!(
            hasher.finalize().as_bytes(),
            blake3::hash(b"hello world").as_bytes()
        );
    }

    #[test]
    fn test_keyed_differs() {
        let mut keyed = Blake3Hasher::new_keyed(&[7u8; 32]);
        keyed.update(b"hello world");
        let mut plain = Blake3Hasher::new();
        plain.update(b"hello world");
        assert_ne!(keyed.finalize(), plain.finalize());
    }
}
