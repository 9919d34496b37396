//! Content hashing for change detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use xxhash_rust::xxh3::Xxh3;

/// A 128-bit content hash computed using XXH3.
///
/// Two entries with the same `ContentHash` are assumed to have identical content.
/// Snapshots attach one to every file node and compose them into directory
/// tree hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the raw little-endian bytes of the hash.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// Incremental hasher for values composed of several parts.
///
/// Every part is length-prefixed, so `["ab", "c"]` and `["a", "bc"]` hash
/// differently.
pub struct ContentHasher {
    state: Xxh3,
}

impl ContentHasher {
    /// Creates an empty hasher.
    pub fn new() -> Self {
        Self { state: Xxh3::new() }
    }

    /// Feeds a length-prefixed byte string.
    pub fn write_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.state.update(&(data.len() as u64).to_le_bytes());
        self.state.update(data);
        self
    }

    /// Feeds a length-prefixed UTF-8 string.
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        self.write_bytes(s.as_bytes())
    }

    /// Feeds a previously computed hash.
    pub fn write_hash(&mut self, hash: &ContentHash) -> &mut Self {
        self.state.update(&hash.0);
        self
    }

    /// Feeds a single tag byte.
    pub fn write_u8(&mut self, tag: u8) -> &mut Self {
        self.state.update(&[tag]);
        self
    }

    /// Returns the hash of everything written so far.
    pub fn finish(&self) -> ContentHash {
        ContentHash(self.state.digest128().to_le_bytes())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"hello world");
        let b = ContentHash::from_bytes(b"hello world");
        assert_eq!(a, b);
    }

    #[test]
    fn different_inputs_differ() {
        let a = ContentHash::from_bytes(b"hello");
        let b = ContentHash::from_bytes(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn display_format() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h}");
        assert_eq!(s.len(), 32, "Display should be 32 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let h = ContentHash::from_bytes(b"test");
        let s = format!("{h:?}");
        assert!(s.starts_with("ContentHash("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"serde test");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }

    #[test]
    fn hasher_is_length_prefixed() {
        let a = ContentHasher::new().write_str("ab").write_str("c").finish();
        let b = ContentHasher::new().write_str("a").write_str("bc").finish();
        assert_ne!(a, b);
    }

    #[test]
    fn hasher_deterministic() {
        let h = ContentHash::from_bytes(b"child");
        let a = ContentHasher::new().write_u8(1).write_hash(&h).finish();
        let b = ContentHasher::new().write_u8(1).write_hash(&h).finish();
        assert_eq!(a, b);
    }

    #[test]
    fn hasher_order_sensitive() {
        let x = ContentHash::from_bytes(b"x");
        let y = ContentHash::from_bytes(b"y");
        let a = ContentHasher::new().write_hash(&x).write_hash(&y).finish();
        let b = ContentHasher::new().write_hash(&y).write_hash(&x).finish();
        assert_ne!(a, b);
    }
}
