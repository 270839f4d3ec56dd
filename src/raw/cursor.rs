use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::{Handle, MAX_DEPTH};
use super::node::{Node, Side};

/// Stack of ancestor handles, root first.
pub(crate) type Path = SmallVec<[Handle; MAX_DEPTH]>;

/// An in-order position kept as an explicit stack of pending ancestors.
///
/// A cursor seeded `toward` [`Side::Left`] follows left spines and yields keys in increasing
/// order; one seeded toward [`Side::Right`] yields them in decreasing order. The top of the stack
/// is always the next node to be yielded.
#[derive(Clone)]
pub(crate) struct Cursor {
    stack: Path,
    toward: Side,
}

impl Cursor {
    /// Creates an exhausted cursor.
    pub(crate) fn empty(toward: Side) -> Self {
        Self {
            stack: Path::new(),
            toward,
        }
    }

    /// Creates a cursor positioned at the extreme node of the subtree rooted at `from`.
    pub(crate) fn at_extreme<K, V>(nodes: &Arena<Node<K, V>>, from: Option<Handle>, toward: Side) -> Self {
        let mut cursor = Self::empty(toward);
        cursor.push_spine(nodes, from);
        cursor
    }

    /// Records `handle` as a pending ancestor. Used by bounded seeks.
    #[inline]
    pub(crate) fn push(&mut self, handle: Handle) {
        self.stack.push(handle);
    }

    /// Returns the node that the next call to [`Cursor::advance`] yields.
    #[inline]
    pub(crate) fn peek(&self) -> Option<Handle> {
        self.stack.last().copied()
    }

    /// Yields the current node and moves to its in-order neighbour.
    pub(crate) fn advance<K, V>(&mut self, nodes: &Arena<Node<K, V>>) -> Option<Handle> {
        let handle = self.stack.pop()?;
        let next = nodes.get(handle).child(self.toward.opposite());
        self.push_spine(nodes, next);
        Some(handle)
    }

    fn push_spine<K, V>(&mut self, nodes: &Arena<Node<K, V>>, mut from: Option<Handle>) {
        while let Some(handle) = from {
            self.stack.push(handle);
            from = nodes.get(handle).child(self.toward);
        }
    }
}
