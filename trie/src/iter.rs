use std::iter::FusedIterator;

use crate::{addressing::last_digit, trie::Trie, Const, ValidBranchingConstant};

/// An iterator over references to the elements of a [`Trie`].
///
/// It caches the leaf it is currently reading from, so that it only needs to
/// walk down from the root once every `N` elements.
#[derive(Debug)]
pub struct Iter<'a, T, const N: usize>
where
    Const<N>: ValidBranchingConstant,
{
    trie: &'a Trie<T, N>,
    leaf: std::slice::Iter<'a, T>,
    // The logical index of the next element.
    index: usize,
}

impl<'a, T, const N: usize> Iter<'a, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    pub(crate) fn new(trie: &'a Trie<T, N>, index: usize) -> Self {
        Iter {
            trie,
            leaf: [].iter(),
            index,
        }
    }

    /// The rest of the leaf containing the current index, up to the end of the
    /// trie.
    fn fetch_leaf(&self) -> std::slice::Iter<'a, T> {
        let trie = self.trie;
        let idx = trie.offset + self.index;
        let found = trie
            .root
            .as_ref()
            .and_then(|root| root.find_leaf(trie.depth_shift, idx));
        debug_assert!(found.is_some(), "no leaf for physical index {idx}");
        let Some((start, data)) = found else {
            return [].iter();
        };

        let from = last_digit::<N>(idx) - start;
        let to = data.len().min(from + self.len());
        data[from..to].iter()
    }
}

impl<T, const N: usize> Clone for Iter<'_, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn clone(&self) -> Self {
        Iter {
            trie: self.trie,
            leaf: self.leaf.clone(),
            index: self.index,
        }
    }
}

impl<'a, T, const N: usize> Iterator for Iter<'a, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.trie.len() {
            return None;
        }
        let ret = match self.leaf.next() {
            Some(ret) => ret,
            None => {
                self.leaf = self.fetch_leaf();
                self.leaf.next()?
            }
        };
        self.index += 1;
        Some(ret)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<T, const N: usize> ExactSizeIterator for Iter<'_, T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn len(&self) -> usize {
        self.trie.len().saturating_sub(self.index)
    }
}

impl<T, const N: usize> FusedIterator for Iter<'_, T, N> where Const<N>: ValidBranchingConstant {}
