//! Chunk digest values.

use std::fmt;

use bytes::Bytes;

/// The finalized digest of one chunk.
///
/// A thin wrapper around [`Bytes`], so any output length works (20-byte SHA-1,
/// 32-byte SHA-256 or BLAKE3, ...) and clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkDigest(Bytes);

impl ChunkDigest {
    /// Creates a digest from owned bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Creates a digest by copying a slice.
    pub fn from_slice(slice: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(slice))
    }

    /// Returns the digest as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the digest length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the digest has no bytes.
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
    /// Returns `None` if the string has odd length or contains non-hex characters.
    pub fn from_hex(hex_str: &str) -> Option<Self> {
        if hex_str.len() % 2 != 0 || !hex_str.is_ascii() {
            return None;
        }
        let mut bytes = Vec::with_capacity(hex_str.len() / 2);
        for i in (0..hex_str.len()).step_by(2) {
            bytes.push(u8::from_str_radix(&hex_str[i..i + 2], 16).ok()?);
        }
        Some(Self(Bytes::from(bytes)))
    }

    /// Consumes the digest and returns the underlying bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl AsRef<[u8]> for ChunkDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ChunkDigest {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<Bytes> for ChunkDigest {
    fn from(bytes: Bytes) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}
