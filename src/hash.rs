#![forbid(unsafe_code)]
//! Jenkins' one-at-a-time hash.
//!
//! All arithmetic is modulo 2^32. The hash is not cryptographic.

use std::hash::{BuildHasherDefault, Hasher};

/// Incremental 32-bit hash over a byte stream.
pub trait RowHasher {
    /// Returns the hasher to its initial state.
    fn reset(&mut self);
    /// Feeds more bytes.
    fn update(&mut self, bytes: &[u8]);
    /// Value of everything fed since the last reset. Does not consume the state.
    fn finalize(&self) -> u32;
}

/// Streaming one-at-a-time hasher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OneAtATime {
    state: u32,
}

impl OneAtATime {
    /// Fresh hasher.
    pub const fn new() -> Self {
        Self { state: 0 }
    }
}

impl RowHasher for OneAtATime {
    fn reset(&mut self) {
        self.state = 0;
    }

    #[inline]
    fn update(&mut self, bytes: &[u8]) {
        self.state = mix(self.state, bytes);
    }

    fn finalize(&self) -> u32 {
        avalanche(self.state)
    }
}

impl Hasher for OneAtATime {
    fn write(&mut self, bytes: &[u8]) {
        RowHasher::update(self, bytes);
    }

    fn finish(&self) -> u64 {
        u64::from(RowHasher::finalize(self))
    }
}

/// `BuildHasher` for using [`OneAtATime`] in std collections.
pub type BuildOneAtATime = BuildHasherDefault<OneAtATime>;

/// One-shot hash of `bytes`.
pub fn one_at_a_time(bytes: &[u8]) -> u32 {
    avalanche(mix(0, bytes))
}

#[inline]
fn mix(mut hash: u32, bytes: &[u8]) -> u32 {
    for &b in bytes {
        hash = hash.wrapping_add(u32::from(b));
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash
}

#[inline]
fn avalanche(mut hash: u32) -> u32 {
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash.wrapping_add(hash << 15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_input_hashes_to_zero() {
        assert_eq!(one_at_a_time(&[]), 0);
        assert_eq!(OneAtATime::new().finalize(), 0);
    }

    #[test]
    fn known_vectors() {
        assert_eq!(one_at_a_time(b"a"), 0xca2e_9442);
        assert_eq!(one_at_a_time(b"abc"), 0xed13_1f5b);
        assert_eq!(
            one_at_a_time(b"The quick brown fox jumps over the lazy dog"),
            0x519e_91f5
        );
    }

    #[test]
    fn repeated_calls_agree() {
        let data = [0xffu8, 2, 0, 17, 200];
        assert_eq!(one_at_a_time(&data), one_at_a_time(&data));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut h = OneAtATime::new();
        h.update(b"The quick brown ");
        let partial = h.finalize();
        h.update(b"fox jumps over the lazy dog");
        assert_ne!(partial, h.finalize());
        assert_eq!(
            h.finalize(),
            one_at_a_time(b"The quick brown fox jumps over the lazy dog")
        );
        h.reset();
        h.update(b"a");
        assert_eq!(h.finalize(), 0xca2e_9442);
    }

    #[test]
    fn backs_std_hash_map() {
        let mut map: HashMap<&str, u32, BuildOneAtATime> = HashMap::default();
        map.insert("abc", 1);
        map.insert("def", 2);
        assert_eq!(map.get("abc"), Some(&1));
        assert_eq!(map.get("def"), Some(&2));

        let mut h = OneAtATime::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xca2e_9442);
    }
}
