//! Mapping physical indices to per-level child indices ("digits").
//!
//! A node at level `shift` (where the leaves are at shift zero and every level
//! above adds `bits::<N>()`) picks its child by looking at the digit of the
//! index obtained by shifting right by `shift` and masking off everything but
//! the low `bits::<N>()` bits.

/// The number of index bits consumed by one level of the tree.
pub const fn bits<const N: usize>() -> u32 {
    N.trailing_zeros()
}

/// The index with the digits below `shift` removed.
///
/// At the root this is the same as [`digit`], as long as the index fits into
/// the tree.
#[inline]
pub fn first_digit(idx: usize, shift: u32) -> usize {
    idx >> shift
}

/// The child index selected by `idx` in a node at level `shift`.
#[inline]
pub fn digit<const N: usize>(idx: usize, shift: u32) -> usize {
    last_digit::<N>(first_digit(idx, shift))
}

/// The position of `idx` within its leaf.
#[inline]
pub fn last_digit<const N: usize>(idx: usize) -> usize {
    idx & (N - 1)
}

/// The number of physical indices addressable by a tree whose root is at
/// level `shift`.
#[inline]
pub fn capacity<const N: usize>(shift: u32) -> usize {
    N << shift
}

/// The number of physical indices addressable by the first `branches`
/// children of a root at level `shift`.
#[inline]
pub fn branches_size(branches: usize, shift: u32) -> usize {
    branches << shift
}
