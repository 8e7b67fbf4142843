//! Hashes used to derive stable index keys.
//!
//! Uses BLAKE3 for all hashing operations.

use std::fmt;

/// BLAKE3 digest, rendered as lowercase hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Digest of `data`
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Hash `/`-joined path components
    #[must_use]
    pub fn of_parts(parts: &[&str]) -> Self {
        Self::compute(parts.join("/").as_bytes())
    }

    /// Index-key form
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
