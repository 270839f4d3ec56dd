use super::RBTreeMap;
use crate::comparator::NaturalOrder;
use crate::error::TryInsertError;
use crate::raw::RawRBTree;

impl<K, V> RBTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `cmp`, with capacity for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::with_capacity(cmp, capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Reserves capacity for at least `additional` more entries.
    ///
    /// Slots freed by earlier removals count toward the reservation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// map.reserve(10);
    /// assert!(map.capacity() >= 10);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.raw.reserve(additional);
    }

    /// Tries to reserve capacity for at least `additional` more entries.
    ///
    /// After a successful call the next `additional` insertions do not allocate.
    ///
    /// # Errors
    ///
    /// Returns [`TryInsertError::CapacityOverflow`] if the map could never address that many
    /// entries, or [`TryInsertError::AllocError`] if the allocator reports a failure. The map is
    /// unchanged in either case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree_map::{RBTreeMap, TryInsertError};
    ///
    /// let mut map: RBTreeMap<i32, i32> = RBTreeMap::new();
    /// assert_eq!(map.try_reserve(10), Ok(()));
    /// assert_eq!(map.try_reserve(usize::MAX), Err(TryInsertError::CapacityOverflow));
    /// ```
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryInsertError> {
        self.raw.try_reserve(additional)
    }
}
