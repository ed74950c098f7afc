//! Blake3 hashing utilities for content-addressed identifiers.
//!
//! Graph nodes are keyed by a hash of their structural content, so identical
//! descriptors collapse to the same node across rebuilds.

use std::hash::{Hash, Hasher};

/// Number of hex characters kept from a blake3 digest for identifiers
pub const CONTENT_ID_LEN: usize = 32;

/// Compute Blake3 hash of data
pub fn blake3_hash(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hash.to_hex().to_string()
}

/// `std::hash::Hasher` adapter feeding a blake3 digest.
///
/// Lets any `Hash` value be content-addressed without a fallible
/// serialization step. Integers are fed little-endian and `usize`/`isize`
/// (including the length prefixes of strings and collections) as 64 bits, so
/// ids do not depend on the host's endianness or pointer width.
///
/// The byte stream still follows the `Hash` impls of std, which are not
/// guaranteed across Rust releases. Ids are meant for one build session and
/// must not be persisted.
#[derive(Debug, Default, Clone)]
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    /// Create an empty hasher
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish and return the truncated hex digest
    pub fn finish_hex(&self) -> String {
        let digest = self.inner.finalize();
        digest.to_hex()[..CONTENT_ID_LEN].to_string()
    }
}

impl Hasher for ContentHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    fn write_u16(&mut self, i: u16) {
        self.write(&i.to_le_bytes());
    }

    fn write_u32(&mut self, i: u32) {
        self.write(&i.to_le_bytes());
    }

    fn write_u64(&mut self, i: u64) {
        self.write(&i.to_le_bytes());
    }

    fn write_u128(&mut self, i: u128) {
        self.write(&i.to_le_bytes());
    }

    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    fn write_i16(&mut self, i: i16) {
        self.write_u16(i as u16);
    }

    fn write_i32(&mut self, i: i32) {
        self.write_u32(i as u32);
    }

    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    fn write_i128(&mut self, i: i128) {
        self.write_u128(i as u128);
    }

    fn write_isize(&mut self, i: isize) {
        self.write_i64(i as i64);
    }

    fn finish(&self) -> u64 {
        let digest = self.inner.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }
}

/// Derive an identifier from the structural content of a value, stable
/// within a build session
pub fn content_id<T: Hash + ?Sized>(value: &T) -> String {
    let mut hasher = ContentHasher::new();
    value.hash(&mut hasher);
    hasher.finish_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_are_fed_little_endian() {
        assert_eq!(content_id(&1u32), blake3_hash(&1u32.to_le_bytes())[..CONTENT_ID_LEN]);
        assert_eq!(content_id(&7usize), content_id(&7u64));
        assert_eq!(content_id(&-2isize), content_id(&-2i64));
    }

    #[test]
    fn test_blake3_hash() {
        let data = b"hello world";
        let hash = blake3_hash(data);

        assert_eq!(hash.len(), 64); // 32 bytes = 64 hex chars
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_content_id_is_stable() {
        let a = content_id(&("./index.js", Some("target"), true));
        let b = content_id(&("./index.js", Some("target"), true));
        assert_eq!(a, b);
        assert_eq!(a.len(), CONTENT_ID_LEN);
    }

    #[test]
    fn test_content_id_distinguishes_fields() {
        let a = content_id(&("a", "bc"));
        let b = content_id(&("ab", "c"));
        assert_ne!(a, b);

        let none: Option<&str> = None;
        assert_ne!(content_id(&("x", none)), content_id(&("x", Some(""))));
    }
}
