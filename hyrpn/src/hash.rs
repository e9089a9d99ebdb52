//! Structural hashing primitives.
//!
//! Role
//! - [`hash_combine`] folds a running hash with the hash of a new element. It is
//!   order-sensitive, so sequences that only differ by permutation get different hashes.
//! - [`StructuralHash`] and [`StructuralEq`] are the two capabilities a key type must
//!   provide to be stored in a hash table. They are implemented here for integers, pairs
//!   and sequences; the formula types implement them in [`crate::formula`].
//!
//! Hash codes are `u64` on every platform and integers hash to themselves, so hash values
//! are stable across runs and machines.

/// Fold `v` into the running hash `h`.
///
/// Computes `h ^ (v + 0x9e3779b9 + (h << 6) + (h >> 2))` with wrapping arithmetic.
/// `hash_combine(hash_combine(0, a), b)` and `hash_combine(hash_combine(0, b), a)`
/// differ for `a != b` in practice.
#[inline]
pub const fn hash_combine(h: u64, v: u64) -> u64 {
    h ^ v
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(h << 6)
        .wrapping_add(h >> 2)
}

/// Fold [`hash_combine`] over a sequence of hashes, starting from `0`.
#[inline]
pub fn hash_sequence<I: IntoIterator<Item = u64>>(hashes: I) -> u64 {
    hashes.into_iter().fold(0, hash_combine)
}

/// Types with a deterministic hash consistent with [`StructuralEq`].
///
/// For all `a`, `b`: `a.structural_eq(&b)` implies
/// `a.structural_hash() == b.structural_hash()`.
pub trait StructuralHash {
    fn structural_hash(&self) -> u64;
}

/// Structural equality: reflexive, symmetric and transitive.
pub trait StructuralEq {
    fn structural_eq(&self, other: &Self) -> bool;
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {
        $(
            impl StructuralHash for $ty {
                #[inline]
                fn structural_hash(&self) -> u64 {
                    *self as u64
                }
            }

            impl StructuralEq for $ty {
                #[inline]
                fn structural_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {
        $(
            impl StructuralHash for $ty {
                #[inline]
                fn structural_hash(&self) -> u64 {
                    // Sign-extend so that `-1` maps to all ones at every width.
                    *self as i64 as u64
                }
            }

            impl StructuralEq for $ty {
                #[inline]
                fn structural_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_unsigned!(u8, u16, u32, u64, usize);
impl_signed!(i8, i16, i32, i64, isize);

impl StructuralHash for bool {
    #[inline]
    fn structural_hash(&self) -> u64 {
        *self as u64
    }
}

impl StructuralEq for bool {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: StructuralHash + ?Sized> StructuralHash for &T {
    #[inline]
    fn structural_hash(&self) -> u64 {
        (**self).structural_hash()
    }
}

impl<T: StructuralEq + ?Sized> StructuralEq for &T {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        (**self).structural_eq(*other)
    }
}

impl<A: StructuralHash, B: StructuralHash> StructuralHash for (A, B) {
    #[inline]
    fn structural_hash(&self) -> u64 {
        hash_combine(self.0.structural_hash(), self.1.structural_hash())
    }
}

impl<A: StructuralEq, B: StructuralEq> StructuralEq for (A, B) {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self.0.structural_eq(&other.0) && self.1.structural_eq(&other.1)
    }
}

impl<T: StructuralHash> StructuralHash for [T] {
    fn structural_hash(&self) -> u64 {
        hash_sequence(self.iter().map(StructuralHash::structural_hash))
    }
}

impl<T: StructuralEq> StructuralEq for [T] {
    fn structural_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.structural_eq(b))
    }
}

impl<T: StructuralHash> StructuralHash for Vec<T> {
    #[inline]
    fn structural_hash(&self) -> u64 {
        self.as_slice().structural_hash()
    }
}

impl<T: StructuralEq> StructuralEq for Vec<T> {
    #[inline]
    fn structural_eq(&self, other: &Self) -> bool {
        self.as_slice().structural_eq(other.as_slice())
    }
}
