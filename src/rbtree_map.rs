use alloc::vec;
use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::{Bound, Index, RangeBounds};

use crate::comparator::{Comparator, NaturalOrder, Predicates};
use crate::error::{InvariantViolation, TryInsertError};
use crate::raw::{Arena, Cursor, Node, RawRBTree, Side};

mod capacity;
mod nodes;

pub use nodes::{NodeView, Nodes, Position};

/// An ordered map based on a [red-black tree].
///
/// Keys are ordered by the map's comparator `C`, fixed when the map is created. The default,
/// [`NaturalOrder`], uses the key's [`Ord`] implementation; [`RBTreeMap::with_predicates`]
/// builds the order from three caller-supplied functions instead.
///
/// Every node lives in a single arena and refers to its children by index. The tree keeps no
/// parent links; insertions and removals record their path from the root and rebalance along it.
///
/// Besides the usual unique-key operations the map supports [`insert_always`], which stores a new
/// entry even when an equal key is already present. Entries with equal keys sit next to each
/// other in iteration order; their relative order is unspecified.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to any
/// other key changes while it is in the map, or for the comparator not to be a strict total
/// order. The behavior resulting from such a logic error is not specified, but is confined to the
/// map that observed it and never results in undefined behavior.
///
/// # Examples
///
/// ```
/// use rbtree_map::RBTreeMap;
///
/// let mut movie_reviews = RBTreeMap::new();
///
/// movie_reviews.insert_or_update("Office Space", "Deals with real issues in the workplace.");
/// movie_reviews.insert_or_update("Pulp Fiction", "Masterpiece.");
/// movie_reviews.insert_or_update("The Godfather", "Very enjoyable.");
/// movie_reviews.insert_or_update("The Blues Brothers", "Eye lyked it a lot.");
///
/// if !movie_reviews.contains_key("Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.", movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove("The Blues Brothers");
///
/// for movie in ["Up!", "Office Space"] {
///     match movie_reviews.get(movie) {
///         Some(review) => println!("{movie}: {review}"),
///         None => println!("{movie} is unreviewed."),
///     }
/// }
///
/// println!("Movie review: {}", movie_reviews["Office Space"]);
///
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// A map with a known list of items can be initialized from an array:
///
/// ```
/// use rbtree_map::RBTreeMap;
///
/// let solar_distance = RBTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.min(), Some((&"Earth", &1.0)));
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [`insert_always`]: RBTreeMap::insert_always
pub struct RBTreeMap<K, V, C = NaturalOrder> {
    pub(crate) raw: RawRBTree<K, V, C>,
}

/// Shared front/back traversal state of [`Iter`] and [`Range`].
struct Walker<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    front: Cursor,
    back: Cursor,
    finished: bool,
}

impl<'a, K, V> Walker<'a, K, V> {
    fn new(nodes: &'a Arena<Node<K, V>>, front: Cursor, back: Cursor, finished: bool) -> Self {
        Walker {
            nodes,
            front,
            back,
            finished,
        }
    }

    fn next_front(&mut self) -> Option<(&'a K, &'a V)> {
        if self.finished {
            return None;
        }
        let handle = self.front.advance(self.nodes)?;
        // The two ends met: this was the last entry.
        if self.back.peek() == Some(handle) {
            self.finished = true;
        }
        let node = self.nodes.get(handle);
        Some((&node.key, &node.value))
    }

    fn next_back(&mut self) -> Option<(&'a K, &'a V)> {
        if self.finished {
            return None;
        }
        let handle = self.back.advance(self.nodes)?;
        if self.front.peek() == Some(handle) {
            self.finished = true;
        }
        let node = self.nodes.get(handle);
        Some((&node.key, &node.value))
    }
}

impl<K, V> Clone for Walker<'_, K, V> {
    fn clone(&self) -> Self {
        Walker {
            nodes: self.nodes,
            front: self.front.clone(),
            back: self.back.clone(),
            finished: self.finished,
        }
    }
}

/// An iterator over the entries of a `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree_map::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: Walker<'a, K, V>,
    remaining: usize,
}

/// An iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of a `RBTreeMap`, in key order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

/// An iterator over a sub-range of entries in a `RBTreeMap`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// [`range`]: RBTreeMap::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    inner: Walker<'a, K, V>,
}

impl<K, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by the keys' [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert_or_update(1, "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> RBTreeMap<K, V> {
        RBTreeMap {
            raw: RawRBTree::new(NaturalOrder),
        }
    }
}

impl<K, V, L, E, U> RBTreeMap<K, V, Predicates<L, E, U>>
where
    L: Fn(&K, &K) -> bool,
    E: Fn(&K, &K) -> bool,
    U: Fn(&K) -> bool,
{
    /// Makes a new, empty `RBTreeMap` ordered by three predicates.
    ///
    /// `less` and `equal` must form a strict total order (see [`Comparator`]). `is_unbounded`
    /// marks the sentinel key that [`ascend_from_to`] and [`descend_from_to`] read as an open
    /// end of the range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_predicates(
    ///     |a: &u32, b: &u32| a < b,
    ///     |a: &u32, b: &u32| a == b,
    ///     |k: &u32| *k == u32::MAX,
    /// );
    /// map.insert_or_update(3, "c");
    /// map.insert_or_update(1, "a");
    /// assert_eq!(map.min(), Some((&1, &"a")));
    /// ```
    ///
    /// [`ascend_from_to`]: RBTreeMap::ascend_from_to
    /// [`descend_from_to`]: RBTreeMap::descend_from_to
    #[must_use]
    pub const fn with_predicates(less: L, equal: E, is_unbounded: U) -> Self {
        RBTreeMap::with_comparator(Predicates::new(less, equal, is_unbounded))
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::{NaturalOrder, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::with_comparator(NaturalOrder);
    /// map.insert_or_update("b", 2);
    /// map.insert_or_update("a", 1);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::new(cmp),
        }
    }

    /// Returns a reference to the map's comparator.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.raw.comparator()
    }

    /// Returns the number of entries in the map, counting every duplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert_or_update(1, "a");
    /// a.insert_always(1, "b");
    /// assert_eq!(a.len(), 2);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert_or_update(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, removing all entries.
    ///
    /// The node arena keeps its allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert_or_update(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the comparator must order the
    /// borrowed form the same way it orders the key type. With duplicates present, any one of the
    /// matching entries is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the stored key and the value corresponding to the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(String::from("apple"), 1);
    /// assert_eq!(map.get_key_value("apple"), Some((&String::from("apple"), &1)));
    /// assert_eq!(map.get_key_value("pear"), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let node = self.raw.node(self.raw.find(key)?);
        Some((&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let found = self.raw.find(key)?;
        Some(&mut self.raw.node_mut(found).value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.find(key).is_some()
    }

    /// Replaces the value stored under `key`, if there is one. Never inserts.
    ///
    /// Returns the previous value, or `None` (leaving the map untouched) if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.update_if_present(&1, "a"), None);
    /// assert!(map.is_empty());
    ///
    /// map.insert_or_update(1, "a");
    /// assert_eq!(map.update_if_present(&1, "b"), Some("a"));
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn update_if_present<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.update_if_present(key, value)
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in
    /// the map.
    ///
    /// With duplicates present, one matching entry is removed per call.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key was previously
    /// in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.raw.remove(key)
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.min(), None);
    /// map.insert_or_update(1, "b");
    /// map.insert_or_update(2, "a");
    /// assert_eq!(map.min(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.extreme(Side::Left)
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert_or_update(1, "b");
    /// map.insert_or_update(2, "a");
    /// assert_eq!(map.max(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.extreme(Side::Right)
    }

    fn extreme(&self, side: Side) -> Option<(&K, &V)> {
        let node = self.raw.node(self.raw.extreme(side)?);
        Some((&node.key, &node.value))
    }

    /// Removes and returns the entry with the minimum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_min(), Some((1, "a")));
    /// assert_eq!(map.pop_min(), Some((2, "b")));
    /// assert_eq!(map.pop_min(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_min(&mut self) -> Option<(K, V)> {
        self.raw.pop_extreme(Side::Left)
    }

    /// Removes and returns the entry with the maximum key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.pop_max(), Some((2, "b")));
    /// assert_eq!(map.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn pop_max(&mut self) -> Option<(K, V)> {
        self.raw.pop_extreme(Side::Right)
    }

    /// Visits every entry until `visit` returns `false`.
    ///
    /// Entries are visited in pre-order (each node before its left subtree, then its right
    /// subtree), not in key order. Use [`iter`](RBTreeMap::iter) or [`ascend`](RBTreeMap::ascend)
    /// for sorted traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    ///
    /// let mut total = 0;
    /// map.walk(|k, _| {
    ///     total += k;
    ///     true
    /// });
    /// assert_eq!(total, 6);
    ///
    /// let mut calls = 0;
    /// map.walk(|_, _| {
    ///     calls += 1;
    ///     false
    /// });
    /// assert_eq!(calls, 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn walk<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.raw.walk(visit);
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(3, "c"), (2, "b"), (1, "a")]);
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create, amortized O(1) per element.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let nodes = self.raw.nodes();
        let root = self.raw.root();
        Iter {
            inner: Walker::new(
                nodes,
                Cursor::at_extreme(nodes, root, Side::Left),
                Cursor::at_extreme(nodes, root, Side::Right),
                root.is_none(),
            ),
            remaining: self.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<_> = map.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Enumerates the tree's nodes in pre-order together with their colour and position.
    ///
    /// This exposes the tree's shape for debugging and visualization.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::{Color, Position, RBTreeMap};
    ///
    /// let map = RBTreeMap::from([(1, ()), (2, ()), (3, ())]);
    /// let shape: Vec<_> = map.nodes().map(|n| (*n.key, n.color, n.position, n.depth)).collect();
    /// assert_eq!(
    ///     shape,
    ///     [
    ///         (2, Color::Black, Position::Root, 0),
    ///         (1, Color::Red, Position::Left, 1),
    ///         (3, Color::Red, Position::Right, 1),
    ///     ]
    /// );
    /// ```
    pub fn nodes(&self) -> Nodes<'_, K, V> {
        Nodes::new(self.raw.nodes(), self.raw.root())
    }

    /// Constructs a double-ended iterator over a sub-range of entries in the map.
    ///
    /// The simplest way is to use the range syntax `min..max`, thus `range(min..max)` will
    /// yield entries from min (inclusive) to max (exclusive). The range may also be entered as
    /// `(Bound<T>, Bound<T>)`, so for example `range((Excluded(4), Included(10)))` will yield a
    /// left-exclusive, right-inclusive range from 4 to 10.
    ///
    /// A range whose start lies after its end yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    /// use std::ops::Bound::Included;
    ///
    /// let map = RBTreeMap::from([(3, "a"), (5, "b"), (8, "c")]);
    /// for (&key, &value) in map.range((Included(&4), Included(&8))) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// assert_eq!(map.range(6..4).next(), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) to create, amortized O(1) per element.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        let front = self.raw.seek(range.start_bound(), Side::Left);
        let back = self.raw.seek(range.end_bound(), Side::Right);
        let finished = match (front.peek(), back.peek()) {
            (Some(first), Some(last)) => self
                .comparator()
                .less(self.raw.node(last).key.borrow(), self.raw.node(first).key.borrow()),
            _ => true,
        };
        Range {
            inner: Walker::new(self.raw.nodes(), front, back, finished),
        }
    }

    /// Visits the entries within `range` in increasing key order until `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = (0..=100).map(|k| (k, ())).collect();
    ///
    /// let mut seen = Vec::new();
    /// map.ascend(45..=55, |k, _| {
    ///     seen.push(*k);
    ///     true
    /// });
    /// assert_eq!(seen, (45..=55).collect::<Vec<_>>());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + m) for `m` visited entries.
    pub fn ascend<Q, R, F>(&self, range: R, mut visit: F)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        F: FnMut(&K, &V) -> bool,
    {
        for (k, v) in self.range(range) {
            if !visit(k, v) {
                break;
            }
        }
    }

    /// Visits the entries within `range` in decreasing key order until `visit` returns `false`.
    ///
    /// The range is given lower bound first, as for [`ascend`](RBTreeMap::ascend); the walk
    /// starts at its upper end.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = (0..=100).map(|k| (k, ())).collect();
    ///
    /// let mut seen = Vec::new();
    /// map.descend(..=50, |k, _| {
    ///     seen.push(*k);
    ///     true
    /// });
    /// assert_eq!(seen, (0..=50).rev().collect::<Vec<_>>());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + m) for `m` visited entries.
    pub fn descend<Q, R, F>(&self, range: R, mut visit: F)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        F: FnMut(&K, &V) -> bool,
    {
        for (k, v) in self.range(range).rev() {
            if !visit(k, v) {
                break;
            }
        }
    }

    /// Checks the red-black and ordering invariants of the whole tree.
    ///
    /// A map built with a consistent comparator always passes; this is meant for tests and
    /// debugging.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<u32, u32> = (0..64).map(|k| (k, k)).collect();
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn validate(&self) -> Result<(), InvariantViolation>
    where
        C: Comparator<K>,
    {
        self.raw.validate()
    }
}

impl<K, V, C: Comparator<K>> RBTreeMap<K, V, C> {
    /// Inserts a key-value pair, overwriting the value if the key is already present.
    ///
    /// Returns `None` if a new entry was created, or the previous value otherwise. The stored key
    /// is not replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert_or_update(37, "a"), None);
    /// assert!(!map.is_empty());
    ///
    /// map.insert_or_update(37, "b");
    /// assert_eq!(map.insert_or_update(37, "c"), Some("b"));
    /// assert_eq!(map[&37], "c");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the map already holds the maximum number of nodes. See
    /// [`try_insert_or_update`](RBTreeMap::try_insert_or_update) for a fallible version.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_or_update(&mut self, key: K, value: V) -> Option<V> {
        self.raw.insert_or_update(key, value)
    }

    /// Inserts a key-value pair only if the key is absent.
    ///
    /// Returns `None` if a new entry was created. Otherwise the map is left unchanged, `value` is
    /// dropped, and the value already stored under the key is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.insert_if_absent(1, "a"), None);
    /// assert_eq!(map.insert_if_absent(1, "b"), Some(&"a"));
    /// assert_eq!(map[&1], "a");
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the map already holds the maximum number of nodes.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_if_absent(&mut self, key: K, value: V) -> Option<&V> {
        match self.raw.insert_if_absent(key, value) {
            Ok(_) => None,
            Err(existing) => Some(&self.raw.node(existing).value),
        }
    }

    /// Inserts a new entry even if the key is already present.
    ///
    /// Returns `true` if no entry with an equal key existed before. The map then holds several
    /// entries under the key; lookups and removals by key reach one of them at a time.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert!(map.insert_always(5, "x"));
    /// assert!(!map.insert_always(5, "y"));
    /// assert_eq!(map.len(), 2);
    ///
    /// let mut values: Vec<_> = map.values().copied().collect();
    /// values.sort_unstable();
    /// assert_eq!(values, ["x", "y"]);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the map already holds the maximum number of nodes.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert_always(&mut self, key: K, value: V) -> bool {
        self.raw.insert_always(key, value)
    }

    /// Fallible version of [`insert_or_update`](RBTreeMap::insert_or_update).
    ///
    /// # Errors
    ///
    /// Returns a [`TryInsertError`] if a new node cannot be allocated. The map is unchanged in
    /// that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.try_insert_or_update(1, "a"), Ok(None));
    /// assert_eq!(map.try_insert_or_update(1, "b"), Ok(Some("a")));
    /// ```
    pub fn try_insert_or_update(&mut self, key: K, value: V) -> Result<Option<V>, TryInsertError> {
        self.raw.try_insert_or_update(key, value)
    }

    /// Fallible version of [`insert_if_absent`](RBTreeMap::insert_if_absent).
    ///
    /// # Errors
    ///
    /// Returns a [`TryInsertError`] if a new node cannot be allocated. The map is unchanged in
    /// that case.
    pub fn try_insert_if_absent(&mut self, key: K, value: V) -> Result<Option<&V>, TryInsertError> {
        Ok(match self.raw.try_insert_if_absent(key, value)? {
            Ok(_) => None,
            Err(existing) => Some(&self.raw.node(existing).value),
        })
    }

    /// Fallible version of [`insert_always`](RBTreeMap::insert_always).
    ///
    /// # Errors
    ///
    /// Returns a [`TryInsertError`] if a new node cannot be allocated. The map is unchanged in
    /// that case.
    pub fn try_insert_always(&mut self, key: K, value: V) -> Result<bool, TryInsertError> {
        self.raw.try_insert_always(key, value)
    }

    /// Visits the entries between `from` and `to` (both inclusive) in increasing key order until
    /// `visit` returns `false`.
    ///
    /// A bound for which the comparator's [`is_unbounded`](Comparator::is_unbounded) returns
    /// `true` leaves that side of the range open, so two sentinels walk the whole map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_predicates(
    ///     |a: &i64, b: &i64| a < b,
    ///     |a: &i64, b: &i64| a == b,
    ///     |k: &i64| *k == i64::MIN,
    /// );
    /// for k in 0..=100 {
    ///     map.insert_or_update(k, ());
    /// }
    ///
    /// let mut seen = Vec::new();
    /// map.ascend_from_to(&50, &i64::MIN, |k, _| {
    ///     seen.push(*k);
    ///     true
    /// });
    /// assert_eq!(seen, (50..=100).collect::<Vec<_>>());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + m) for `m` visited entries.
    pub fn ascend_from_to<F>(&self, from: &K, to: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let range = (self.sentinel_bound(from), self.sentinel_bound(to));
        self.ascend::<K, _, _>(range, visit);
    }

    /// Visits the entries between `from` and `to` (both inclusive) in decreasing key order until
    /// `visit` returns `false`.
    ///
    /// `from` is the lower bound and `to` the upper one; the walk starts at `to`. Sentinel
    /// bounds are handled as in [`ascend_from_to`](RBTreeMap::ascend_from_to).
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_predicates(
    ///     |a: &i64, b: &i64| a < b,
    ///     |a: &i64, b: &i64| a == b,
    ///     |k: &i64| *k == i64::MIN,
    /// );
    /// for k in 0..=100 {
    ///     map.insert_or_update(k, ());
    /// }
    ///
    /// let mut seen = Vec::new();
    /// map.descend_from_to(&i64::MIN, &50, |k, _| {
    ///     seen.push(*k);
    ///     true
    /// });
    /// assert_eq!(seen, (0..=50).rev().collect::<Vec<_>>());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + m) for `m` visited entries.
    pub fn descend_from_to<F>(&self, from: &K, to: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let range = (self.sentinel_bound(from), self.sentinel_bound(to));
        self.descend::<K, _, _>(range, visit);
    }

    fn sentinel_bound<'k>(&self, key: &'k K) -> Bound<&'k K> {
        if self.comparator().is_unbounded(key) {
            Bound::Unbounded
        } else {
            Bound::Included(key)
        }
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RBTreeMap { raw: self.raw.clone() }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    /// Creates an empty `RBTreeMap` with the default comparator.
    fn default() -> Self {
        RBTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert_or_update(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert_or_update(k, v);
        }
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<K, Q, V, C> Index<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_in_order().into_iter(),
        }
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next_front()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next_back()?;
        self.remaining -= 1;
        Some(entry)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_front()
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
