//! Stable string hashing for multimap keys.
//!
//! [`hash_str`] is a rolling polynomial over the UTF-16 code units of a string
//! (multiplier 65599) with the top half folded into the bottom half at the end.
//! The value is identical across runs and platforms, unlike `std`'s `RandomState`.
//!
//! ```rust
//! use tagconf::hash::{hash_str, HashKey};
//!
//! assert_eq!(hash_str("a"), 97);
//! let key = HashKey::new("width");
//! assert_eq!(key.key_hash(), hash_str("width"));
//! ```

use indexmap::Equivalent;
use std::fmt;
use std::hash::{Hash, Hasher};

const MULTIPLIER: u32 = 65599;

/// Hashes `s` to a 32-bit key.
#[inline]
#[must_use]
pub fn hash_str(s: &str) -> u32 {
    let hash = s.encode_utf16().fold(0u32, |hash, unit| {
        hash.wrapping_mul(MULTIPLIER).wrapping_add(u32::from(unit))
    });
    hash ^ (hash >> 16)
}

/// Hashes `s` to a 64-bit key. Same polynomial as [`hash_str`], computed in 64 bits.
#[inline]
#[must_use]
pub fn hash_str_u64(s: &str) -> u64 {
    let hash = s.encode_utf16().fold(0u64, |hash, unit| {
        hash.wrapping_mul(u64::from(MULTIPLIER))
            .wrapping_add(u64::from(unit))
    });
    hash ^ (hash >> 16)
}

/// An owned key together with its precomputed hash.
///
/// Hashing only feeds the stored hash; equality compares the hash and then the
/// string, so two colliding keys stay distinct.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HashKey {
    hash: u32,
    key: String,
}

impl HashKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        HashKey {
            hash: hash_str(&key),
            key,
        }
    }

    #[inline]
    #[must_use]
    pub fn key_hash(&self) -> u32 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.key
    }

    pub(crate) fn as_key_ref(&self) -> KeyRef<'_> {
        KeyRef {
            hash: self.hash,
            key: &self.key,
        }
    }
}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl fmt::Debug for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{:08x}", self.key, self.hash)
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<&str> for HashKey {
    fn from(key: &str) -> Self {
        HashKey::new(key)
    }
}

impl From<String> for HashKey {
    fn from(key: String) -> Self {
        HashKey::new(key)
    }
}

/// Borrowed lookup form of [`HashKey`]; hashes identically.
#[derive(Clone, Copy, Debug)]
pub(crate) struct KeyRef<'a> {
    pub(crate) hash: u32,
    pub(crate) key: &'a str,
}

impl<'a> KeyRef<'a> {
    pub(crate) fn new(key: &'a str) -> Self {
        KeyRef {
            hash: hash_str(key),
            key,
        }
    }

    pub(crate) fn to_hash_key(self) -> HashKey {
        HashKey {
            hash: self.hash,
            key: self.key.to_string(),
        }
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl Equivalent<HashKey> for KeyRef<'_> {
    fn equivalent(&self, key: &HashKey) -> bool {
        self.hash == key.hash && self.key == key.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[test]
    fn test_known_values() {
        assert_eq!(hash_str(""), 0);
        assert_eq!(hash_str("a"), 97);
        // 97 * 65599 + 98 = 6_363_201, folded with itself >> 16 (= 97)
        assert_eq!(hash_str("ab"), 6_363_201 ^ 97);
        assert_eq!(hash_str_u64("ab"), 6_363_201u64 ^ 97);
    }

    #[test]
    fn test_hash_is_deterministic() {
        for s in ["ROOT", "Display", "width", "höhe", "日本語"] {
            assert_eq!(hash_str(s), hash_str(s));
            assert_eq!(hash_str_u64(s), hash_str_u64(s));
        }
    }

    #[test]
    fn test_utf16_units_are_hashed() {
        // U+1F600 is a surrogate pair in UTF-16: two rolling steps
        let expected = {
            let h = 0xD83Du32.wrapping_mul(MULTIPLIER).wrapping_add(0xDE00);
            h ^ (h >> 16)
        };
        assert_eq!(hash_str("\u{1F600}"), expected);
    }

    #[test]
    fn test_key_ref_hashes_like_owned_key() {
        fn digest<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let owned = HashKey::new("section");
        let borrowed = KeyRef::new("section");
        assert_eq!(digest(&owned), digest(&borrowed));
        assert!(borrowed.equivalent(&owned));
        assert!(!KeyRef::new("other").equivalent(&owned));
    }
}
