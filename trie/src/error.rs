/// Errors reported by the fallible [`Trie`](crate::Trie) operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} out of range for a trie of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}
