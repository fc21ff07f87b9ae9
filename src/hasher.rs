//! Pluggable name hashing.

use core::hash::BuildHasher;
use hashbrown::hash_map::DefaultHashBuilder;

/// Hash capability supplied at construction. Must be deterministic for a
/// given table; it is invoked once per operation and never during
/// migration, which reuses the hash stored with each entry.
pub trait NameHasher {
    fn hash_name(&self, name: &str) -> u64;
}

impl<F> NameHasher for F
where
    F: Fn(&str) -> u64,
{
    #[inline]
    fn hash_name(&self, name: &str) -> u64 {
        self(name)
    }
}

/// Multiplicative x33 string hash over bytes, in 32-bit wrapping arithmetic.
/// Bytes are added as signed chars, so bytes >= 0x80 sign-extend.
pub fn times33(name: &str) -> u64 {
    name.bytes()
        .fold(0u32, |h, b| h.wrapping_mul(33).wrapping_add(b as i8 as u32)) as u64
}

/// Adapts any [`BuildHasher`] into a [`NameHasher`].
#[derive(Clone, Debug, Default)]
pub struct BuildNameHasher<S = DefaultHashBuilder>(S);

impl<S: BuildHasher> BuildNameHasher<S> {
    pub fn new(build: S) -> Self {
        BuildNameHasher(build)
    }
}

impl<S: BuildHasher> NameHasher for BuildNameHasher<S> {
    #[inline]
    fn hash_name(&self, name: &str) -> u64 {
        self.0.hash_one(name)
    }
}
