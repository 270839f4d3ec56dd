use super::RBTreeSet;
use crate::RBTreeMap;
use crate::error::TryInsertError;

impl<T> RBTreeSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity(capacity),
        }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Returns the number of elements the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Reserves capacity for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        self.map.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// See [`RBTreeMap::try_reserve`].
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryInsertError> {
        self.map.try_reserve(additional)
    }
}
