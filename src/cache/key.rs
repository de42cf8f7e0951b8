//! Cache Key Module
//!
//! Canonical string keys. Callers may supply keys as strings or integers;
//! every key is normalized to its string form at the API boundary, before
//! any lookup, insertion, or hashing. All internal structures operate only
//! on the canonical form.

use std::fmt;

// == Cache Key ==
/// A canonical cache key.
///
/// Constructed through `From` impls for string and integer types, which
/// makes a key of any other type unrepresentable at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the canonical string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CacheKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&String> for CacheKey {
    fn from(key: &String) -> Self {
        Self(key.clone())
    }
}

impl From<&str> for CacheKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for CacheKey {
                fn from(key: $int) -> Self {
                    Self(key.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
