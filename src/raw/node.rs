use super::handle::Handle;

/// The colour bit of a red-black tree node.
///
/// Empty child positions count as [`Color::Black`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    /// A red node. Its children are always black.
    Red,
    /// A black node. Every path from a node to its empty descendants crosses the same number of these.
    Black,
}

/// A single tree node: the key/value payload, its colour and its two owned child slots.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a childless node.
    pub(crate) fn new(key: K, value: V, color: Color) -> Self {
        Self {
            key,
            value,
            color,
            left: None,
            right: None,
        }
    }

    /// Returns the child on the requested side.
    #[inline]
    pub(crate) fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Returns the child slot on the requested side.
    #[inline]
    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<Handle> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}
