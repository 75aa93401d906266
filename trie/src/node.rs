use std::sync::Arc;

use imbl_sized_chunks::Chunk;

use crate::addressing::{bits, digit, first_digit};

pub(crate) type Children<T, const N: usize> = Chunk<Arc<Node<T, N>>, N>;

/// A node of the trie.
///
/// A node only stores the slots that are in use, and `start` is the digit of
/// its first slot: the child for digit `d` lives at `children[d - start]`.
/// Nodes on the left edge of a tree may start at a non-zero digit (after a
/// `drop` or a `prepend`); every other node starts at zero. This is what lets
/// `drop` physically remove the dropped prefix instead of just hiding it
/// behind the offset.
///
/// The tree height tells us which variant to expect at any level, so the
/// code that walks the tree treats a mismatch as unreachable.
#[derive(Debug, Clone)]
pub(crate) enum Node<T, const N: usize> {
    Leaf { start: usize, data: Chunk<T, N> },
    Interior { start: usize, children: Children<T, N> },
}

/// A modification of the path from the root to one leaf.
///
/// Every mutating operation of the trie is a walk down to the leaf holding a
/// single physical index. At each interior node on the way, the edit decides
/// how that node is rebuilt and which child to continue with; at the leaf, it
/// applies its final change.
///
/// | edit         | interior nodes                      | leaf                        |
/// |--------------|-------------------------------------|-----------------------------|
/// | `Replace`    | copied unchanged                    | replace one element         |
/// | `PushBack`   | copied, with a new last child if needed  | write a new last element    |
/// | `PushFront`  | copied, with a new first child if needed | write a new first element   |
/// | `DropPrefix` | keep the children from the cut on   | keep the elements from the cut on |
/// | `DropSuffix` | keep the children up to the cut     | keep the elements up to the cut   |
///
/// The copying itself is done by [`Arc::make_mut`], which only clones nodes
/// that are shared with another trie.
#[derive(Debug)]
pub(crate) enum Edit<T> {
    Replace(T),
    PushBack(T),
    PushFront(T),
    DropPrefix,
    DropSuffix,
}

impl<T> Edit<T> {
    /// Rebuilds an interior node at level `shift` and returns the slot of the
    /// child to descend into.
    fn interior<const N: usize>(
        &self,
        start: &mut usize,
        children: &mut Children<T, N>,
        digit: usize,
        shift: u32,
    ) -> usize {
        debug_assert!(shift > 0);
        match self {
            Edit::Replace(_) => digit - *start,
            Edit::PushBack(_) => {
                if children.is_empty() {
                    *start = digit;
                }
                let slot = digit - *start;
                debug_assert!(slot <= children.len());
                if slot == children.len() {
                    children.push_back(Arc::new(Node::empty(shift - bits::<N>())));
                }
                slot
            }
            Edit::PushFront(_) => {
                if children.is_empty() {
                    children.push_back(Arc::new(Node::empty(shift - bits::<N>())));
                    *start = digit;
                } else if digit + 1 == *start {
                    children.push_front(Arc::new(Node::empty(shift - bits::<N>())));
                    *start = digit;
                }
                digit - *start
            }
            Edit::DropPrefix => {
                children.drop_left(digit - *start);
                *start = digit;
                0
            }
            Edit::DropSuffix => {
                let slot = digit - *start;
                children.drop_right(slot + 1);
                slot
            }
        }
    }

    /// Applies the edit to the leaf holding the target index, whose position in
    /// the leaf is `digit`.
    fn leaf<const N: usize>(self, start: &mut usize, data: &mut Chunk<T, N>, digit: usize) {
        match self {
            Edit::Replace(elt) => {
                data.set(digit - *start, elt);
            }
            Edit::PushBack(elt) => {
                if data.is_empty() {
                    *start = digit;
                }
                debug_assert_eq!(digit, *start + data.len());
                data.push_back(elt);
            }
            Edit::PushFront(elt) => {
                debug_assert!(data.is_empty() || digit + 1 == *start);
                *start = digit;
                data.push_front(elt);
            }
            Edit::DropPrefix => {
                data.drop_left(digit - *start);
                *start = digit;
            }
            Edit::DropSuffix => {
                data.drop_right(digit - *start + 1);
            }
        }
    }
}

impl<T, const N: usize> Node<T, N> {
    /// A node with no slots in use, for the level `shift`.
    fn empty(shift: u32) -> Self {
        if shift == 0 {
            Node::Leaf {
                start: 0,
                data: Chunk::new(),
            }
        } else {
            Node::Interior {
                start: 0,
                children: Chunk::new(),
            }
        }
    }

    pub(crate) fn unit(elt: T) -> Self {
        Node::Leaf {
            start: 0,
            data: Chunk::unit(elt),
        }
    }

    /// Wraps `child` in a new node, at slot `start`.
    pub(crate) fn parent_of(child: Arc<Node<T, N>>, start: usize) -> Self {
        Node::Interior {
            start,
            children: Chunk::unit(child),
        }
    }

    /// If this node is at level `shift`, find the leaf containing the physical
    /// index `idx`.
    ///
    /// Returns the leaf's data together with the digit of its first slot.
    pub(crate) fn find_leaf(&self, mut shift: u32, idx: usize) -> Option<(usize, &Chunk<T, N>)> {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { start, data } => {
                    debug_assert_eq!(shift, 0);
                    return Some((*start, data));
                }
                Node::Interior { start, children } => {
                    let slot = digit::<N>(idx, shift).checked_sub(*start)?;
                    node = children.get(slot)?;
                    shift = shift.checked_sub(bits::<N>())?;
                }
            }
        }
    }

    /// The physical index of the first element of this subtree.
    fn first_index(&self, shift: u32) -> usize {
        match self {
            Node::Leaf { start, .. } => *start,
            Node::Interior { start, children } => {
                (*start << shift) + children[0].first_index(shift - bits::<N>())
            }
        }
    }

    /// The physical index of the last element of this subtree.
    fn last_index(&self, shift: u32) -> usize {
        match self {
            Node::Leaf { start, data } => start + data.len() - 1,
            Node::Interior { start, children } => {
                ((*start + children.len() - 1) << shift)
                    + children[children.len() - 1].last_index(shift - bits::<N>())
            }
        }
    }

    /// Checks the shape of this subtree and returns the number of elements in
    /// it.
    ///
    /// Nodes that aren't on the left edge of the tree must start at digit
    /// zero, and nodes that aren't on the right edge must be full. Together
    /// with the element count, this guarantees that nothing outside of the
    /// trie's logical range is reachable.
    fn check(&self, shift: u32, left_edge: bool, right_edge: bool) -> usize {
        let (start, len) = match self {
            Node::Leaf { start, data } => {
                assert_eq!(shift, 0, "leaf above the bottom level");
                (*start, data.len())
            }
            Node::Interior { start, children } => {
                assert!(shift > 0, "interior node at the bottom level");
                (*start, children.len())
            }
        };
        assert!(len > 0, "empty node");
        assert!(start + len <= N, "node overflows its slots");
        if !left_edge {
            assert_eq!(start, 0, "inner node with leading gap");
        }
        if !right_edge {
            assert_eq!(start + len, N, "inner node with trailing gap");
        }

        match self {
            Node::Leaf { .. } => len,
            Node::Interior { children, .. } => children
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    c.check(
                        shift - bits::<N>(),
                        left_edge && i == 0,
                        right_edge && i + 1 == len,
                    )
                })
                .sum(),
        }
    }

    /// Checks a root at level `shift`, holding the physical range
    /// `[offset, offset + length)`.
    pub(crate) fn check_root(&self, shift: u32, offset: usize, length: usize) {
        assert_eq!(self.check(shift, true, true), length);
        assert_eq!(self.first_index(shift), offset);
        assert_eq!(self.last_index(shift), offset + length - 1);
    }
}

/// Walks from `root` (at level `shift`) down to the leaf holding the physical
/// index `idx`, applying `edit` to every node on the way.
///
/// Nodes are copied before being modified whenever they are shared, so other
/// tries holding `root` (or any node below it) never observe the change.
pub(crate) fn modify_leaf<T: Clone, const N: usize>(
    root: &mut Arc<Node<T, N>>,
    mut shift: u32,
    idx: usize,
    edit: Edit<T>,
) {
    let mut node = root;
    let mut pos = first_digit(idx, shift);
    debug_assert!(pos < N);

    while shift > 0 {
        let Node::Interior { start, children } = Arc::make_mut(node) else {
            unreachable!("expected an interior node above the leaves");
        };
        let slot = edit.interior(start, children, pos, shift);
        node = &mut children[slot];
        shift -= bits::<N>();
        pos = digit::<N>(idx, shift);
    }

    let Node::Leaf { start, data } = Arc::make_mut(node) else {
        unreachable!("expected a leaf at the bottom level");
    };
    edit.leaf(start, data, pos);
}

/// Splits `iter` into consecutive chunks of `N` elements (the last one may be
/// shorter).
pub(crate) fn group<A, const N: usize>(
    iter: impl Iterator<Item = A>,
) -> impl Iterator<Item = Chunk<A, N>> {
    let mut iter = iter.peekable();
    std::iter::from_fn(move || {
        iter.peek()?;
        Some(iter.by_ref().take(N).collect())
    })
}

/// Builds a packed tree out of `iter`.
///
/// Returns the root, its level and the number of elements, or `None` if the
/// iterator was empty.
pub(crate) fn build<T, const N: usize>(
    iter: impl Iterator<Item = T>,
) -> Option<(Arc<Node<T, N>>, u32, usize)> {
    let mut length = 0;
    let mut level: Vec<Arc<Node<T, N>>> = group::<T, N>(iter)
        .map(|data| {
            length += data.len();
            Arc::new(Node::Leaf { start: 0, data })
        })
        .collect();

    let mut shift = 0;
    while level.len() > 1 {
        level = group::<_, N>(level.into_iter())
            .map(|children| Arc::new(Node::Interior { start: 0, children }))
            .collect();
        shift += bits::<N>();
    }

    level.pop().map(|root| (root, shift, length))
}
