use alloc::vec::Vec;
use core::borrow::Borrow;
use core::mem;
use core::ops::Bound;

use log::{debug, trace};

use super::arena::Arena;
use super::cursor::{Cursor, Path};
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::comparator::Comparator;
use crate::error::{InvariantViolation, TryInsertError};

/// The red-black tree engine backing `RBTreeMap` and `RBTreeSet`.
///
/// Nodes live in an arena and refer to their children by handle. There are no parent links:
/// every mutating operation records the ancestor path during its search and threads it through
/// the rotations and fixups that follow.
#[derive(Clone)]
pub(crate) struct RawRBTree<K, V, C> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live nodes.
    len: usize,
    cmp: C,
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(cmp: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(cmp: C, capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            cmp,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryInsertError> {
        self.nodes.try_reserve(additional).inspect_err(|err| {
            debug!("reserving {additional} nodes failed: {err}");
        })
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.cmp
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) const fn nodes(&self) -> &Arena<Node<K, V>> {
        &self.nodes
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        debug!("clearing tree of {} nodes", self.len);
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the colour of a node, counting empty positions as black.
    #[inline]
    fn color(&self, handle: Option<Handle>) -> Color {
        handle.map_or(Color::Black, |h| self.nodes.get(h).color)
    }

    #[inline]
    fn is_red(&self, handle: Option<Handle>) -> bool {
        self.color(handle) == Color::Red
    }

    #[inline]
    fn set_color(&mut self, handle: Handle, color: Color) {
        self.nodes.get_mut(handle).color = color;
    }

    /// Returns which child slot of `parent` holds `child`.
    #[inline]
    fn side_of(&self, parent: Handle, child: Handle) -> Side {
        if self.nodes.get(parent).left == Some(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever referred to `old` (its parent's child slot, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(parent, old);
                *self.nodes.get_mut(parent).child_mut(side) = new;
            }
        }
    }

    /// Single rotation of `node` toward `dir`: `Side::Left` is a left rotation, `Side::Right` a
    /// right rotation.
    ///
    /// The child of `node` opposite to `dir` becomes the top of the subtree and is reattached to
    /// `parent` (or becomes the root). Returns the new top.
    fn rotate(&mut self, parent: Option<Handle>, node: Handle, dir: Side) -> Handle {
        let pivot = self
            .nodes
            .get(node)
            .child(dir.opposite())
            .expect("`RawRBTree::rotate()` - rotation needs a pivot child!");
        let inner = self.nodes.get(pivot).child(dir);
        *self.nodes.get_mut(node).child_mut(dir.opposite()) = inner;
        *self.nodes.get_mut(pivot).child_mut(dir) = Some(node);
        self.replace_child(parent, node, Some(pivot));
        pivot
    }

    /// Walks from `from` toward `side` until the extreme node, pushing every node passed on the
    /// way. Returns the extreme node, which is not pushed.
    fn descend_spine(&self, path: &mut Path, from: Handle, side: Side) -> Handle {
        let mut current = from;
        while let Some(next) = self.nodes.get(current).child(side) {
            path.push(current);
            current = next;
        }
        current
    }

    /// Returns the leftmost (`Side::Left`) or rightmost (`Side::Right`) node.
    pub(crate) fn extreme(&self, side: Side) -> Option<Handle> {
        let mut path = Path::new();
        self.root.map(|root| self.descend_spine(&mut path, root, side))
    }

    /// Removes the leftmost or rightmost node.
    pub(crate) fn pop_extreme(&mut self, side: Side) -> Option<(K, V)> {
        let mut path = Path::new();
        let target = self.descend_spine(&mut path, self.root?, side);
        Some(self.remove_at(&mut path, target))
    }

    /// Restores the colour invariants after `node` was attached as a red leaf.
    ///
    /// `path` holds the ancestors of `node`, root first, and is consumed as the walk moves up.
    pub(crate) fn fix_after_insert(&mut self, path: &mut Path, mut node: Handle) {
        while let Some(parent) = path.pop() {
            if !self.is_red(Some(parent)) {
                return;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = path.pop() else {
                self.set_color(parent, Color::Black);
                return;
            };
            let parent_side = self.side_of(grand, parent);
            let uncle = self.nodes.get(grand).child(parent_side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.is_red(Some(u))) {
                trace!("insert fixup: red uncle, recolouring below {grand:?}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                node = grand;
                continue;
            }

            // Black uncle: one or two rotations finish the job.
            let mut top = parent;
            if self.side_of(parent, node) != parent_side {
                trace!("insert fixup: inner grandchild {node:?}, double rotation");
                self.rotate(Some(grand), parent, parent_side);
                top = node;
            } else {
                trace!("insert fixup: outer grandchild {node:?}, single rotation");
            }
            self.set_color(top, Color::Black);
            self.set_color(grand, Color::Red);
            self.rotate(path.last().copied(), grand, parent_side.opposite());
            return;
        }
        self.set_color(node, Color::Black);
    }

    /// Removes `target` from the tree and returns its payload.
    ///
    /// `path` must hold the ancestors of `target`, root first. A node with two children trades
    /// payloads with its in-order successor, which is then removed in its place.
    pub(crate) fn remove_at(&mut self, path: &mut Path, mut target: Handle) -> (K, V) {
        self.len -= 1;

        let node = self.nodes.get(target);
        if let (Some(_), Some(right)) = (node.left, node.right) {
            path.push(target);
            let successor = self.descend_spine(path, right, Side::Left);
            let (node, next) = self.nodes.get_pair_mut(target, successor);
            mem::swap(&mut node.key, &mut next.key);
            mem::swap(&mut node.value, &mut next.value);
            target = successor;
        }

        let node = self.nodes.get(target);
        let child = node.left.or(node.right);
        let removed_black = node.color == Color::Black;

        match path.last().copied() {
            None => {
                self.root = child;
                if let Some(child) = child {
                    self.set_color(child, Color::Black);
                }
            }
            Some(parent) => {
                if removed_black && !self.is_red(child) {
                    // The fixup runs while `target` still stands in for the deficient position.
                    self.fix_double_black(path, target);
                } else if let Some(child) = child {
                    self.set_color(child, Color::Black);
                }
                self.replace_child(Some(parent), target, child);
            }
        }

        let node = self.nodes.take(target);
        (node.key, node.value)
    }

    /// Resolves a double-black deficiency at `node`.
    ///
    /// `path` holds the ancestors of `node`, root first. Rotations only ever happen at or above
    /// the deficient node's parent, and never move the deficient node to another parent.
    pub(crate) fn fix_double_black(&mut self, path: &mut Path, mut node: Handle) {
        while let Some(&parent) = path.last() {
            let side = self.side_of(parent, node);
            let Some(sibling) = self.nodes.get(parent).child(side.opposite()) else {
                node = parent;
                path.pop();
                continue;
            };

            if self.is_red(Some(sibling)) {
                trace!("delete fixup: red sibling {sibling:?}, rotating {parent:?}");
                self.set_color(parent, Color::Red);
                self.set_color(sibling, Color::Black);
                path.pop();
                self.rotate(path.last().copied(), parent, side);
                path.push(sibling);
                path.push(parent);
                continue;
            }

            let near = self.nodes.get(sibling).child(side);
            let far = self.nodes.get(sibling).child(side.opposite());

            if self.is_red(near) || self.is_red(far) {
                path.pop();
                let grand = path.last().copied();
                let parent_color = self.nodes.get(parent).color;
                match far.filter(|&f| self.is_red(Some(f))) {
                    Some(far) => {
                        trace!("delete fixup: red far nephew {far:?}");
                        self.set_color(far, Color::Black);
                        self.set_color(sibling, parent_color);
                    }
                    None => {
                        trace!("delete fixup: red near nephew {near:?}");
                        let near = self.rotate(Some(parent), sibling, side.opposite());
                        self.set_color(near, parent_color);
                    }
                }
                self.rotate(grand, parent, side);
                self.set_color(parent, Color::Black);
                return;
            }

            self.set_color(sibling, Color::Red);
            if self.is_red(Some(parent)) {
                self.set_color(parent, Color::Black);
                return;
            }
            trace!("delete fixup: black sibling {sibling:?}, deficiency moves to {parent:?}");
            node = parent;
            path.pop();
        }
    }

    /// Visits every node in pre-order until `visit` returns `false`.
    pub(crate) fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut pending = Path::new();
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if !visit(&node.key, &node.value) {
                return;
            }
            if let Some(right) = node.right {
                pending.push(right);
            }
            current = node.left.or_else(|| pending.pop());
        }
    }

    /// Checks every red-black and bookkeeping invariant.
    pub(crate) fn validate(&self) -> Result<(), InvariantViolation>
    where
        C: Comparator<K>,
    {
        if self.is_red(self.root) {
            return Err(InvariantViolation::RedRoot);
        }
        self.black_height(self.root, 0)?;

        let mut cursor = Cursor::at_extreme(&self.nodes, self.root, Side::Left);
        let mut previous: Option<&K> = None;
        let mut count = 0;
        while let Some(handle) = cursor.advance(&self.nodes) {
            let key = &self.nodes.get(handle).key;
            if previous.is_some_and(|prev| self.cmp.less(key, prev)) {
                return Err(InvariantViolation::OutOfOrder { position: count });
            }
            previous = Some(key);
            count += 1;
        }

        // Reachable nodes first, then live arena slots.
        for actual in [count, self.nodes.len()] {
            if actual != self.len {
                return Err(InvariantViolation::LenMismatch {
                    expected: self.len,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Returns the black height of the subtree at `node`, counting the empty positions.
    fn black_height(&self, node: Option<Handle>, depth: usize) -> Result<usize, InvariantViolation> {
        let Some(handle) = node else {
            return Ok(1);
        };
        let node = self.nodes.get(handle);
        if node.color == Color::Red && (self.is_red(node.left) || self.is_red(node.right)) {
            return Err(InvariantViolation::RedViolation { depth: depth + 1 });
        }
        let left = self.black_height(node.left, depth + 1)?;
        let right = self.black_height(node.right, depth + 1)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(node.color == Color::Black))
    }
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Finds a node whose key equals `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let node_key = node.key.borrow();
            if self.cmp.equal(key, node_key) {
                return Some(handle);
            }
            current = if self.cmp.less(key, node_key) { node.left } else { node.right };
        }
        None
    }

    /// Like [`RawRBTree::find`], additionally pushing every node visited above the result.
    ///
    /// When the key is absent, `path` ends at the node under which it would be attached.
    pub(crate) fn find_with_path<Q>(&self, key: &Q, path: &mut Path) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let node_key = node.key.borrow();
            if self.cmp.equal(key, node_key) {
                return Some(handle);
            }
            path.push(handle);
            current = if self.cmp.less(key, node_key) { node.left } else { node.right };
        }
        None
    }

    /// Positions a cursor at the first node (toward `Side::Left`) or last node (toward
    /// `Side::Right`) that lies within `bound`.
    ///
    /// The cursor's pending stack holds exactly the in-bound nodes on the search path, so
    /// advancing it continues the in-order walk from there.
    pub(crate) fn seek<Q>(&self, bound: Bound<&Q>, toward: Side) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let (limit, inclusive) = match bound {
            Bound::Included(limit) => (limit, true),
            Bound::Excluded(limit) => (limit, false),
            Bound::Unbounded => return Cursor::at_extreme(&self.nodes, self.root, toward),
        };

        let mut cursor = Cursor::empty(toward);
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let key = node.key.borrow();
            let outside = match (toward, inclusive) {
                (Side::Left, true) => self.cmp.less(key, limit),
                (Side::Left, false) => !self.cmp.less(limit, key),
                (Side::Right, true) => self.cmp.less(limit, key),
                (Side::Right, false) => !self.cmp.less(key, limit),
            };
            if outside {
                current = node.child(toward.opposite());
            } else {
                cursor.push(handle);
                current = node.child(toward);
            }
        }
        cursor
    }
}

impl<K, V, C: Comparator<K>> RawRBTree<K, V, C> {
    /// Extends `path` from `from` down to the empty slot where `key` belongs, routing equal keys
    /// right. Returns the parent for the new node and the side to attach it on, or `None` when
    /// the tree is empty.
    ///
    /// Pass `from = None` when `path` already ends at the insertion parent (a failed
    /// [`RawRBTree::find_with_path`]); pass the found node to place a duplicate below it.
    pub(crate) fn find_insertion_point(&self, path: &mut Path, from: Option<Handle>, key: &K) -> Option<(Handle, Side)> {
        let mut current = from;
        while let Some(handle) = current {
            path.push(handle);
            current = self.nodes.get(handle).child(self.direction(key, handle));
        }
        path.last().map(|&parent| (parent, self.direction(key, parent)))
    }

    #[inline]
    fn direction(&self, key: &K, handle: Handle) -> Side {
        if self.cmp.less(key, &self.nodes.get(handle).key) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Creates a red leaf at `point` and rebalances.
    fn attach(&mut self, path: &mut Path, point: Option<(Handle, Side)>, key: K, value: V) -> Handle {
        let handle = self.nodes.alloc(Node::new(key, value, Color::Red));
        self.len += 1;
        match point {
            None => self.root = Some(handle),
            Some((parent, side)) => *self.nodes.get_mut(parent).child_mut(side) = Some(handle),
        }
        self.fix_after_insert(path, handle);
        handle
    }

    /// Overwrites the value of `key` if present, otherwise inserts it.
    pub(crate) fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        let mut path = Path::new();
        if let Some(found) = self.find_with_path(&key, &mut path) {
            return Some(mem::replace(&mut self.nodes.get_mut(found).value, value));
        }
        let point = self.find_insertion_point(&mut path, None, &key);
        self.attach(&mut path, point, key, value);
        None
    }

    pub(crate) fn try_insert_or_update(&mut self, key: K, value: V) -> Result<Option<V>, TryInsertError> {
        let mut path = Path::new();
        if let Some(found) = self.find_with_path(&key, &mut path) {
            return Ok(Some(mem::replace(&mut self.nodes.get_mut(found).value, value)));
        }
        self.try_reserve(1)?;
        let point = self.find_insertion_point(&mut path, None, &key);
        self.attach(&mut path, point, key, value);
        Ok(None)
    }

    /// Inserts `key` only if absent. Returns `Ok` with the new node, or `Err` with the node
    /// already holding the key.
    pub(crate) fn insert_if_absent(&mut self, key: K, value: V) -> Result<Handle, Handle> {
        let mut path = Path::new();
        if let Some(found) = self.find_with_path(&key, &mut path) {
            return Err(found);
        }
        let point = self.find_insertion_point(&mut path, None, &key);
        Ok(self.attach(&mut path, point, key, value))
    }

    pub(crate) fn try_insert_if_absent(&mut self, key: K, value: V) -> Result<Result<Handle, Handle>, TryInsertError> {
        let mut path = Path::new();
        if let Some(found) = self.find_with_path(&key, &mut path) {
            return Ok(Err(found));
        }
        self.try_reserve(1)?;
        let point = self.find_insertion_point(&mut path, None, &key);
        Ok(Ok(self.attach(&mut path, point, key, value)))
    }

    /// Inserts a new node even when `key` is already present. Returns `true` if no node held
    /// `key` before.
    pub(crate) fn insert_always(&mut self, key: K, value: V) -> bool {
        let mut path = Path::new();
        let found = self.find_with_path(&key, &mut path);
        let point = self.find_insertion_point(&mut path, found, &key);
        self.attach(&mut path, point, key, value);
        found.is_none()
    }

    pub(crate) fn try_insert_always(&mut self, key: K, value: V) -> Result<bool, TryInsertError> {
        self.try_reserve(1)?;
        Ok(self.insert_always(key, value))
    }
}

impl<K, V, C> RawRBTree<K, V, C> {
    /// Overwrites the value of `key` only if present.
    pub(crate) fn update_if_present<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let found = self.find(key)?;
        Some(mem::replace(&mut self.nodes.get_mut(found).value, value))
    }

    /// Swaps in `key` for the stored key equal to it, returning the old key.
    pub(crate) fn replace_key(&mut self, key: K) -> Result<K, K>
    where
        C: Comparator<K>,
    {
        match self.find(&key) {
            Some(found) => Ok(mem::replace(&mut self.nodes.get_mut(found).key, key)),
            None => Err(key),
        }
    }

    /// Empties the tree, returning its entries in order.
    pub(crate) fn drain_in_order(&mut self) -> Vec<(K, V)> {
        let mut cursor = Cursor::at_extreme(&self.nodes, self.root, Side::Left);
        let mut order = Vec::with_capacity(self.len);
        while let Some(handle) = cursor.advance(&self.nodes) {
            order.push(handle);
        }
        let entries = order
            .into_iter()
            .map(|handle| {
                let node = self.nodes.take(handle);
                (node.key, node.value)
            })
            .collect();
        self.clear();
        entries
    }

    /// Removes a node whose key equals `key`.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut path = Path::new();
        let target = self.find_with_path(key, &mut path)?;
        Some(self.remove_at(&mut path, target))
    }
}
