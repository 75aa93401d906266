//! This crate provides a persistent bit-mapped vector trie.
//!
//! [`Trie`] is a wide and shallow tree of fixed-size arrays (32 slots by
//! default), in the spirit of Clojure's persistent vector. Clones are cheap
//! and every modification copies only the path from the root to the affected
//! leaf, sharing all other nodes with the previous version. On top of the
//! usual random access and appending, it supports
//! - prepending in amortized constant time, by keeping an `offset` into the
//!   physical index space and growing the tree "to the left" when needed;
//! - slicing (`drop`/`take`) in logarithmic time, trimming the cut path so
//!   that the discarded elements are actually released.
//!
//! Indices are resolved by cutting the physical index `offset + i` into
//! `log2(N)`-bit digits, one per level; see [`addressing`].

pub mod addressing;
pub mod error;
pub mod iter;
mod node;
pub mod trie;

/// [`Trie`] takes a "branching factor" parameter, which must be a
/// reasonably-sized power of two. We use this trait to enforce that.
pub trait ValidBranchingConstant {}
pub struct Const<const N: usize> {}

impl ValidBranchingConstant for Const<2> {}
impl ValidBranchingConstant for Const<4> {}
impl ValidBranchingConstant for Const<8> {}
impl ValidBranchingConstant for Const<16> {}
impl ValidBranchingConstant for Const<32> {}
impl ValidBranchingConstant for Const<64> {}
impl ValidBranchingConstant for Const<128> {}

/// The default number of slots per node.
pub const BRANCHING_FACTOR: usize = 32;

pub use error::Error;
pub use iter::Iter;
pub use trie::Trie;
