//! Adapters between structural hashing and std hash-based collections.
//!
//! [`Token`](crate::formula::token::Token), [`Formula`](crate::formula::Formula) and
//! [`FormulaPair`](crate::formula::FormulaPair) implement [`std::hash::Hash`] by writing
//! their structural hash as a single `u64`. [`PassThroughHasher`] turns that value into
//! the bucket hash with [`spread`], a bijection, so two keys share a bucket hash exactly
//! when they share a [`StructuralHash`](crate::hash::StructuralHash).
use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};

use crate::hash::hash_combine;

/// Bijective 64-bit finalizer applied to structural hashes before bucketing.
///
/// Structural hashes of short formulas are small numbers (`Constant(k)` hashes to `k`),
/// while `HashMap` takes its control tag from the top bits. Mixing keeps that tag
/// spread out without introducing new collisions.
#[inline]
pub const fn spread(h: u64) -> u64 {
    let mut h = h;
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// Hasher that forwards pre-computed structural hashes.
///
/// The first `u64` written is kept as-is; any further write is folded in with
/// [`hash_combine`]. [`finish`](Hasher::finish) returns [`spread`] of the state. Byte
/// writes are folded one byte at a time, so keys hashed through their derived `Hash`
/// still work, only with a weaker distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughHasher {
    state: u64,
    written: bool,
}

impl PassThroughHasher {
    #[inline]
    fn fold(&mut self, v: u64) {
        self.state = if self.written {
            hash_combine(self.state, v)
        } else {
            v
        };
        self.written = true;
    }
}

impl Hasher for PassThroughHasher {
    #[inline]
    fn finish(&self) -> u64 {
        spread(self.state)
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.fold(byte as u64);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }
}

pub type StructuralBuildHasher = BuildHasherDefault<PassThroughHasher>;

/// `HashMap` bucketing keys by their structural hash.
pub type StructuralMap<K, V> = HashMap<K, V, StructuralBuildHasher>;

/// `HashSet` bucketing keys by their structural hash.
pub type StructuralSet<K> = HashSet<K, StructuralBuildHasher>;
