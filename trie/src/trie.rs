use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Index,
    sync::Arc,
};

use crate::{
    addressing::{bits, branches_size, capacity, last_digit},
    error::Error,
    iter::Iter,
    node::{self, Edit, Node},
    Const, ValidBranchingConstant, BRANCHING_FACTOR,
};

/// A persistent bit-mapped vector trie.
///
/// The elements live in the leaves of a tree whose nodes have up to `N`
/// slots. Logical index `i` is stored at physical index `offset + i`, and the
/// physical index is split into digits that select a child on each level.
/// Having an offset lets us prepend (by growing the tree to the left and
/// decreasing the offset) and drop a prefix without renumbering anything.
///
/// Cloning is cheap (it bumps a reference count), and all the operations that
/// return a new trie (like [`Trie::append`] or [`Trie::drop`]) copy only the
/// nodes on one root-to-leaf path. Each of them has an in-place counterpart
/// (like [`Trie::push_back`] or [`Trie::drop_front`]) that avoids even that
/// copy when the nodes aren't shared.
///
/// `N` controls the branching factor. It must be a power of two, and values
/// between `8` and `64` are pretty reasonable.
#[derive(Clone)]
pub struct Trie<T, const N: usize = BRANCHING_FACTOR>
where
    Const<N>: ValidBranchingConstant,
{
    // `None` for the empty trie, which always has a zero offset and height.
    pub(crate) root: Option<Arc<Node<T, N>>>,
    pub(crate) offset: usize,
    pub(crate) length: usize,
    // The level of the root, i.e. `log2(N)` times the number of levels above
    // the leaves.
    pub(crate) depth_shift: u32,
}

enum Side {
    Front,
    Back,
}

impl<T, const N: usize> Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// The empty trie.
    pub const fn new() -> Self {
        Self {
            root: None,
            offset: 0,
            length: 0,
            depth_shift: 0,
        }
    }

    /// A trie holding just `elt`.
    pub fn unit(elt: T) -> Self {
        Self {
            root: Some(Arc::new(Node::unit(elt))),
            offset: 0,
            length: 1,
            depth_shift: 0,
        }
    }

    /// The number of elements in this trie.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let trie: Trie<_> = [0, 1, 2, 3, 4, 5].into_iter().collect();
    /// assert_eq!(trie.len(), 6);
    /// ```
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the length is zero.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The level of the root: `log2(N)` times the number of levels above the
    /// leaves.
    pub fn depth_shift(&self) -> u32 {
        self.depth_shift
    }

    /// The physical index of the first element.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Gets an element at a given index, or `None` if `idx` is out-of-bounds.
    ///
    /// Runs in time `O(log n)`, with a logarithm base of `N`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let trie: Trie<_> = [0, 1, 2, 3, 4, 5].into_iter().collect();
    /// assert_eq!(trie.get(2), Some(&2));
    /// assert_eq!(trie.get(6), None);
    /// ```
    pub fn get(&self, idx: usize) -> Option<&T> {
        if idx >= self.length {
            return None;
        }
        let idx = self.offset + idx;
        let (start, leaf) = self.root.as_ref()?.find_leaf(self.depth_shift, idx)?;
        leaf.get(last_digit::<N>(idx).checked_sub(start)?)
    }

    /// The first element, or `None` if the trie is empty.
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// The last element, or `None` if the trie is empty.
    pub fn last(&self) -> Option<&T> {
        self.get(self.length.checked_sub(1)?)
    }

    /// Returns an iterator over references to the elements.
    pub fn iter(&self) -> Iter<'_, T, N> {
        Iter::new(self, 0)
    }

    /// Returns an iterator over references to the elements, starting at index
    /// `idx` (or an empty iterator, if `idx` is past the end).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let trie: Trie<_> = (0..100).collect();
    /// assert_eq!(trie.iter_from(97).copied().collect::<Vec<_>>(), vec![97, 98, 99]);
    /// ```
    pub fn iter_from(&self, idx: usize) -> Iter<'_, T, N> {
        Iter::new(self, idx.min(self.length))
    }

    /// Checks the structure of the tree, panicking if anything is off.
    ///
    /// Besides the bookkeeping of length and offset, this checks that the tree
    /// holds no elements outside of the logical range: nothing before the
    /// offset, nothing past the end.
    pub fn check_invariants(&self) {
        match &self.root {
            None => {
                assert_eq!(self.length, 0);
                assert_eq!(self.offset, 0);
                assert_eq!(self.depth_shift, 0);
            }
            Some(root) => {
                assert!(self.length > 0);
                assert_eq!(self.depth_shift % bits::<N>(), 0);
                assert!(self.offset + self.length <= capacity::<N>(self.depth_shift));
                root.check_root(self.depth_shift, self.offset, self.length);
            }
        }
    }

    fn is_full_right(&self) -> bool {
        self.offset + self.length + 1 > capacity::<N>(self.depth_shift)
    }

    fn is_full_left(&self) -> bool {
        self.offset == 0
    }

    /// Adds a level on top of the tree. The current root becomes the first
    /// child of the new one when growing to the back, and the last child when
    /// growing to the front.
    fn add_level(&mut self, side: Side) {
        let Some(old_root) = self.root.take() else {
            return;
        };
        let start = match side {
            Side::Back => 0,
            Side::Front => N - 1,
        };
        self.root = Some(Arc::new(Node::parent_of(old_root, start)));
        self.depth_shift += bits::<N>();
        if let Side::Front = side {
            // Only valid because the old offset was zero: the old root's first
            // element now comes right after the first `N - 1` branches.
            self.offset = branches_size(N - 1, self.depth_shift);
        }
        log::trace!(
            "trie of length {} grew to depth shift {}",
            self.length,
            self.depth_shift
        );
    }
}

impl<T: Clone, const N: usize> Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn modify(&mut self, idx: usize, edit: Edit<T>) {
        if let Some(root) = self.root.as_mut() {
            node::modify_leaf(root, self.depth_shift, idx, edit);
        }
    }

    /// Adds an element to the end of this trie.
    ///
    /// Runs in time `O(log n)`. The tree grows a level only when it is full,
    /// and the new level has room for `N - 1` more copies of the old tree.
    pub fn push_back(&mut self, elt: T) {
        if self.is_empty() {
            *self = Self::unit(elt);
            return;
        }
        if self.is_full_right() {
            self.add_level(Side::Back);
        }
        let idx = self.offset + self.length;
        self.modify(idx, Edit::PushBack(elt));
        self.length += 1;
    }

    /// Adds an element to the front of this trie.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let mut trie: Trie<_> = [1, 2, 3].into_iter().collect();
    /// trie.push_front(0);
    /// assert_eq!(trie.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    /// ```
    pub fn push_front(&mut self, elt: T) {
        if self.is_empty() {
            *self = Self::unit(elt);
            return;
        }
        if self.is_full_left() {
            self.add_level(Side::Front);
        }
        self.offset -= 1;
        self.modify(self.offset, Edit::PushFront(elt));
        self.length += 1;
    }

    /// Replaces the element at index `idx`.
    pub fn set(&mut self, idx: usize, elt: T) -> Result<(), Error> {
        if idx >= self.length {
            return Err(Error::IndexOutOfRange {
                index: idx,
                len: self.length,
            });
        }
        self.modify(self.offset + idx, Edit::Replace(elt));
        Ok(())
    }

    /// Removes the first `n` elements.
    ///
    /// The nodes on the path to the new first element are trimmed, so the
    /// removed elements aren't kept alive by this trie.
    pub fn drop_front(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        if n >= self.length {
            *self = Self::new();
            return;
        }
        self.modify(self.offset + n, Edit::DropPrefix);
        self.offset += n;
        self.length -= n;
    }

    /// Shrinks the length of this trie to `len`, if it was longer.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.length {
            return;
        }
        if len == 0 {
            *self = Self::new();
            return;
        }
        self.modify(self.offset + len - 1, Edit::DropSuffix);
        self.length = len;
    }

    /// Returns a new trie with `elt` added at the end.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let trie: Trie<_> = [0, 1, 2].into_iter().collect();
    /// let longer = trie.append(3);
    /// assert_eq!(trie.len(), 3);
    /// assert_eq!(longer.iter().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    /// ```
    pub fn append(&self, elt: T) -> Self {
        let mut ret = self.clone();
        ret.push_back(elt);
        ret
    }

    /// Returns a new trie with `elt` added at the front.
    pub fn prepend(&self, elt: T) -> Self {
        let mut ret = self.clone();
        ret.push_front(elt);
        ret
    }

    /// Returns a new trie with the element at `idx` replaced by `elt`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::{Error, Trie};
    /// let trie: Trie<_> = [0, 1, 2].into_iter().collect();
    /// assert_eq!(trie.update(1, 10).unwrap()[1], 10);
    /// assert_eq!(trie[1], 1);
    /// assert_eq!(trie.update(3, 10), Err(Error::IndexOutOfRange { index: 3, len: 3 }));
    /// ```
    pub fn update(&self, idx: usize, elt: T) -> Result<Self, Error> {
        let mut ret = self.clone();
        ret.set(idx, elt)?;
        Ok(ret)
    }

    /// Returns a new trie without the first `n` elements.
    pub fn drop(&self, n: usize) -> Self {
        let mut ret = self.clone();
        ret.drop_front(n);
        ret
    }

    /// Returns a new trie with only the first `n` elements.
    pub fn take(&self, n: usize) -> Self {
        let mut ret = self.clone();
        ret.truncate(n);
        ret
    }

    /// Returns the elements from index `from` (inclusive) to index `to`
    /// (exclusive). Both bounds are clamped to the length of this trie.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bitmapped_trie::Trie;
    /// let trie: Trie<_> = [0, 1, 2, 3, 4, 5].into_iter().collect();
    /// let slice = trie.slice(1, 5);
    /// assert_eq!(slice.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert!(trie.slice(4, 2).is_empty());
    /// ```
    pub fn slice(&self, from: usize, to: usize) -> Self {
        let mut ret = self.clone();
        ret.truncate(to);
        ret.drop_front(from);
        ret
    }
}

impl<T, const N: usize> Default for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> FromIterator<T> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    /// Builds a packed tree level by level: the elements are grouped into
    /// leaves, the leaves into parents, and so on until one root is left.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        match node::build(iter.into_iter()) {
            None => Self::new(),
            Some((root, depth_shift, length)) => Self {
                root: Some(root),
                offset: 0,
                length,
                depth_shift,
            },
        }
    }
}

impl<T, const N: usize> From<Vec<T>> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn from(vec: Vec<T>) -> Self {
        vec.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> Extend<T> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if self.is_empty() {
            *self = iter.into_iter().collect();
        } else {
            for elt in iter {
                self.push_back(elt);
            }
        }
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, const N: usize> Index<usize> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("index out of range")
    }
}

// Equality and hashing look at the elements only, not at how they happen to
// be laid out in the tree.
impl<T: PartialEq, const N: usize> PartialEq for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const N: usize> Eq for Trie<T, N> where Const<N>: ValidBranchingConstant {}

impl<T: Hash, const N: usize> Hash for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: serde::Serialize, const N: usize> serde::Serialize for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for elt in self.iter() {
            seq.serialize_element(elt)?;
        }
        seq.end()
    }
}

impl<'de, T: serde::Deserialize<'de>, const N: usize> serde::Deserialize<'de> for Trie<T, N>
where
    Const<N>: ValidBranchingConstant,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let vec: Vec<T> = Vec::deserialize(deserializer)?;
        Ok(vec.into_iter().collect())
    }
}
