use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::RangeBounds;

use crate::comparator::{Comparator, NaturalOrder, Predicates};
use crate::error::{InvariantViolation, TryInsertError};
use crate::rbtree_map::{IntoIter as MapIntoIter, Keys, Range as MapRange};
use crate::RBTreeMap;

mod capacity;

/// An ordered set based on a red-black tree.
///
/// See [`RBTreeMap`]'s documentation for a discussion of the underlying structure. A set is a map
/// whose keys are the elements and whose values are `()`.
///
/// It is a logic error for an item to be modified in such a way that its ordering relative to any
/// other item changes while it is in the set. The behavior resulting from such a logic error is
/// not specified, but is confined to the set that observed it and never results in undefined
/// behavior.
///
/// # Examples
///
/// ```
/// use rbtree_map::RBTreeSet;
///
/// let mut books = RBTreeSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// books.remove("The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// A `RBTreeSet` with a known list of items can be initialized from an array:
///
/// ```
/// use rbtree_map::RBTreeSet;
///
/// let set = RBTreeSet::from([1, 2, 3]);
/// assert_eq!(set.max(), Some(&3));
/// ```
pub struct RBTreeSet<T, C = NaturalOrder> {
    map: RBTreeMap<T, (), C>,
}

/// An iterator over the items of a `RBTreeSet`, in order.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    iter: Keys<'a, T, ()>,
}

/// An owning iterator over the items of a `RBTreeSet`, in order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    iter: MapIntoIter<T, ()>,
}

/// An iterator over a sub-range of items in a `RBTreeSet`.
///
/// This `struct` is created by the [`range`] method on [`RBTreeSet`].
///
/// [`range`]: RBTreeSet::range
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T: 'a> {
    iter: MapRange<'a, T, ()>,
}

impl<T> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet` ordered by the items' [`Ord`] implementation.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> RBTreeSet<T> {
        RBTreeSet { map: RBTreeMap::new() }
    }
}

impl<T, L, E, U> RBTreeSet<T, Predicates<L, E, U>>
where
    L: Fn(&T, &T) -> bool,
    E: Fn(&T, &T) -> bool,
    U: Fn(&T) -> bool,
{
    /// Makes a new, empty `RBTreeSet` ordered by three predicates.
    ///
    /// See [`RBTreeMap::with_predicates`].
    #[must_use]
    pub const fn with_predicates(less: L, equal: E, is_unbounded: U) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_predicates(less, equal, is_unbounded),
        }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Makes a new, empty `RBTreeSet` ordered by `cmp`.
    #[must_use]
    pub const fn with_comparator(cmp: C) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_comparator(cmp),
        }
    }

    /// Returns the number of elements in the set, counting every duplicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// If the set contains an element equal to the value, removes it from the set and drops it.
    /// Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }

    /// Returns the minimum element in the set, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.min(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn min(&self) -> Option<&T> {
        self.map.min().map(|(k, ())| k)
    }

    /// Returns the maximum element in the set, if any.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn max(&self) -> Option<&T> {
        self.map.max().map(|(k, ())| k)
    }

    /// Removes the minimum element from the set and returns it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([2, 1]);
    /// assert_eq!(set.pop_min(), Some(1));
    /// assert_eq!(set.pop_min(), Some(2));
    /// assert!(set.is_empty());
    /// ```
    pub fn pop_min(&mut self) -> Option<T> {
        self.map.pop_min().map(|(k, ())| k)
    }

    /// Removes the maximum element from the set and returns it, if any.
    pub fn pop_max(&mut self) -> Option<T> {
        self.map.pop_max().map(|(k, ())| k)
    }

    /// Gets an iterator that visits the elements in the set in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), Some(&3));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { iter: self.map.keys() }
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    /// use std::ops::Bound::Included;
    ///
    /// let set = RBTreeSet::from([3, 5, 8]);
    /// for &elem in set.range((Included(&4), Included(&8))) {
    ///     println!("{elem}");
    /// }
    /// assert_eq!(Some(&5), set.range(4..).next());
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        Range {
            iter: self.map.range(range),
        }
    }

    /// Visits every element in pre-order until `visit` returns `false`.
    ///
    /// See [`RBTreeMap::walk`].
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.walk(|k, ()| visit(k));
    }

    /// Visits the elements within `range` in increasing order until `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set: RBTreeSet<u8> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// set.ascend(3..6, |&x| {
    ///     seen.push(x);
    ///     true
    /// });
    /// assert_eq!(seen, [3, 4, 5]);
    /// ```
    pub fn ascend<Q, R, F>(&self, range: R, mut visit: F)
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        F: FnMut(&T) -> bool,
    {
        self.map.ascend(range, |k, ()| visit(k));
    }

    /// Visits the elements within `range` in decreasing order until `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set: RBTreeSet<u8> = (0..10).collect();
    /// let mut seen = Vec::new();
    /// set.descend(3..6, |&x| {
    ///     seen.push(x);
    ///     true
    /// });
    /// assert_eq!(seen, [5, 4, 3]);
    /// ```
    pub fn descend<Q, R, F>(&self, range: R, mut visit: F)
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
        F: FnMut(&T) -> bool,
    {
        self.map.descend(range, |k, ()| visit(k));
    }

    /// Checks the red-black and ordering invariants of the whole tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn validate(&self) -> Result<(), InvariantViolation>
    where
        C: Comparator<T>,
    {
        self.map.validate()
    }
}

impl<T, C: Comparator<T>> RBTreeSet<T, C> {
    /// Adds a value to the set if no equal element is present.
    ///
    /// Returns whether the value was newly inserted. An existing element is left untouched and
    /// `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert_if_absent(value, ()).is_none()
    }

    /// Adds a value to the set, replacing the existing element, if any, that is equal to the
    /// value. Returns the replaced element.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// set.insert(Vec::<i32>::new());
    ///
    /// assert_eq!(set.get(&[][..]).unwrap().capacity(), 0);
    /// set.replace(Vec::with_capacity(10));
    /// assert_eq!(set.get(&[][..]).unwrap().capacity(), 10);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn replace(&mut self, value: T) -> Option<T> {
        match self.map.raw.replace_key(value) {
            Ok(previous) => Some(previous),
            Err(value) => {
                self.map.insert_or_update(value, ());
                None
            }
        }
    }

    /// Adds a value to the set even if an equal element is already present.
    ///
    /// Returns `true` if no equal element existed before.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert!(set.insert_always(5));
    /// assert!(!set.insert_always(5));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [5, 5]);
    /// ```
    pub fn insert_always(&mut self, value: T) -> bool {
        self.map.insert_always(value, ())
    }

    /// Visits the elements between `from` and `to` (both inclusive) in increasing order until
    /// `visit` returns `false`.
    ///
    /// A bound the comparator reports as [`is_unbounded`](Comparator::is_unbounded) leaves that
    /// side open. See [`RBTreeMap::ascend_from_to`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::with_predicates(
    ///     |a: &i32, b: &i32| a < b,
    ///     |a: &i32, b: &i32| a == b,
    ///     |x: &i32| *x < 0,
    /// );
    /// set.extend(0..10);
    ///
    /// let mut seen = Vec::new();
    /// set.ascend_from_to(&7, &-1, |&x| {
    ///     seen.push(x);
    ///     true
    /// });
    /// assert_eq!(seen, [7, 8, 9]);
    /// ```
    pub fn ascend_from_to<F>(&self, from: &T, to: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.ascend_from_to(from, to, |k, ()| visit(k));
    }

    /// Visits the elements between `from` and `to` (both inclusive) in decreasing order until
    /// `visit` returns `false`.
    ///
    /// `from` is the lower bound; the walk starts at `to`.
    pub fn descend_from_to<F>(&self, from: &T, to: &T, mut visit: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.descend_from_to(from, to, |k, ()| visit(k));
    }

    /// Fallible version of [`insert`](RBTreeSet::insert).
    ///
    /// # Errors
    ///
    /// Returns a [`TryInsertError`] if a new node cannot be allocated. The set is unchanged in
    /// that case.
    pub fn try_insert(&mut self, value: T) -> Result<bool, TryInsertError> {
        Ok(self.map.try_insert_if_absent(value, ())?.is_none())
    }
}

impl<T: Clone, C: Clone> Clone for RBTreeSet<T, C> {
    fn clone(&self) -> Self {
        RBTreeSet { map: self.map.clone() }
    }
}

impl<T: PartialEq, C> PartialEq for RBTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map.eq(&other.map)
    }
}

impl<T: Eq, C> Eq for RBTreeSet<T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for RBTreeSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RBTreeSet<T, C> {
    /// Creates an empty `RBTreeSet` with the default comparator.
    fn default() -> Self {
        RBTreeSet {
            map: RBTreeMap::default(),
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for RBTreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBTreeSet::default();
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: 'a + Copy, C: Comparator<T>> Extend<&'a T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, C> IntoIterator for RBTreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RBTreeSet`'s contents in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RBTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.iter.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            iter: self.iter.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.iter.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.iter.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.iter.next_back().map(|(k, ())| k)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.iter).finish()
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.iter.next().map(|(k, ())| k)
    }
}

impl<'a, T> DoubleEndedIterator for Range<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        self.iter.next_back().map(|(k, ())| k)
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range {
            iter: self.iter.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
