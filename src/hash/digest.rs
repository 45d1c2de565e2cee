//! The finalized digest value.

use std::fmt;

use bytes::Bytes;

/// The output of a finalized hash.
///
/// Length is fixed per algorithm (32 bytes for both shipped algorithms).
/// Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(Bytes);

impl Digest {
    /// Creates a digest from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Returns the digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the digest length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for a zero-length digest.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut result = String::with_capacity(self.0.len() * 2);
        for byte in self.0.iter() {
            result.push(HEX[(byte >> 4) as usize] as char);
            result.push(HEX[(byte & 0xf) as usize] as char);
        }
        result
    }

    /// Parses a digest from a hex string.
    ///
    /// Returns `None` if the string has odd length or contains non-hex
    /// characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() % 2 != 0 || !hex_str.is_ascii() {
            return None;
        }
        let bytes = (0..hex_str.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex_str[i..i + 2], 16).ok())
            .collect::<Option<Vec<u8>>>()?;
        Some(Self(Bytes::from(bytes)))
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_hex() {
        let digest = Digest::new(vec![0xABu8; 32]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c == 'a' || c == 'b'));
        assert_eq!(hex, digest.to_string());
    }

    #[test]
    fn test_from_hex() {
        let digest = Digest::from_hex("0123456789abcdef").unwrap();
        assert_eq!(
            digest.as_bytes(),
            &[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]
        );

        assert!(Digest::from_hex("abc").is_none());
        assert!(Digest::from_hex("zz").is_none());
        assert!(Digest::from_hex("é0").is_none());
    }
}
