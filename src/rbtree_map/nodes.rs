use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::raw::{Arena, Color, Handle, MAX_DEPTH, Node};

/// Where a node hangs relative to its parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Position {
    /// The node is the root of the tree.
    Root,
    /// The node is its parent's left child.
    Left,
    /// The node is its parent's right child.
    Right,
}

/// A read-only view of one tree node, yielded by [`Nodes`].
#[derive(Debug)]
pub struct NodeView<'a, K, V> {
    /// The node's key.
    pub key: &'a K,
    /// The node's value.
    pub value: &'a V,
    /// The node's colour.
    pub color: Color,
    /// Which child slot of its parent the node occupies.
    pub position: Position,
    /// Number of edges between the root and the node.
    pub depth: usize,
}

impl<K, V> Clone for NodeView<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeView<'_, K, V> {}

/// A pre-order iterator over the nodes of a `RBTreeMap`.
///
/// This `struct` is created by the [`nodes`] method on [`RBTreeMap`]. Each node is yielded
/// before its left subtree, which comes before its right subtree, so a consumer can rebuild the
/// tree's shape from the positions and depths alone.
///
/// # Examples
///
/// Rendering the tree as indented text:
///
/// ```
/// use rbtree_map::{Color, RBTreeMap};
///
/// let map = RBTreeMap::from([(1, ()), (2, ()), (3, ()), (4, ())]);
///
/// let mut out = String::new();
/// for node in map.nodes() {
///     let color = if node.color == Color::Red { 'R' } else { 'B' };
///     out.push_str(&format!("{}{:?} {}{}\n", "  ".repeat(node.depth), node.position, color, node.key));
/// }
/// assert_eq!(out, "Root B2\n  Left B1\n  Right B3\n    Right R4\n");
/// ```
///
/// [`nodes`]: super::RBTreeMap::nodes
/// [`RBTreeMap`]: super::RBTreeMap
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Nodes<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    pending: SmallVec<[(Handle, Position, usize); MAX_DEPTH]>,
}

impl<'a, K, V> Nodes<'a, K, V> {
    pub(super) fn new(nodes: &'a Arena<Node<K, V>>, root: Option<Handle>) -> Self {
        let mut pending = SmallVec::new();
        if let Some(root) = root {
            pending.push((root, Position::Root, 0));
        }
        Nodes { nodes, pending }
    }
}

impl<'a, K, V> Iterator for Nodes<'a, K, V> {
    type Item = NodeView<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let (handle, position, depth) = self.pending.pop()?;
        let node = self.nodes.get(handle);
        if let Some(right) = node.right {
            self.pending.push((right, Position::Right, depth + 1));
        }
        if let Some(left) = node.left {
            self.pending.push((left, Position::Left, depth + 1));
        }
        Some(NodeView {
            key: &node.key,
            value: &node.value,
            color: node.color,
            position,
            depth,
        })
    }
}

impl<K, V> FusedIterator for Nodes<'_, K, V> {}

impl<K, V> Clone for Nodes<'_, K, V> {
    fn clone(&self) -> Self {
        Nodes {
            nodes: self.nodes,
            pending: self.pending.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Nodes<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
