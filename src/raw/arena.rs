use alloc::vec::Vec;

use super::handle::Handle;
use crate::TryInsertError;

/// Slot storage for tree nodes, addressed by [`Handle`].
///
/// Freed slots are recycled through a free list, so handles stay stable for the lifetime of the
/// element they were issued for.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    /// Makes room for `additional` more elements without reallocating.
    pub(crate) fn reserve(&mut self, additional: usize) {
        let needed = additional.saturating_sub(self.free.len());
        self.slots.reserve(needed);
    }

    /// Makes room for `additional` more elements, reporting instead of aborting on failure.
    ///
    /// Once this returns `Ok`, the next `additional` calls to [`Arena::alloc`] neither allocate
    /// nor panic.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), TryInsertError> {
        let needed = additional.saturating_sub(self.free.len());
        if self.slots.len().saturating_add(needed) > Handle::MAX {
            return Err(TryInsertError::CapacityOverflow);
        }
        self.slots.try_reserve(needed)?;
        Ok(())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            h
        } else {
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::alloc()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Some(element));
            Handle::from_index(self.slots.len() - 1)
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns mutable references to two distinct elements.
    pub(crate) fn get_pair_mut(&mut self, a: Handle, b: Handle) -> (&mut T, &mut T) {
        let (i, j) = (a.to_index(), b.to_index());
        assert_ne!(i, j, "`Arena::get_pair_mut()` - handles must be distinct!");
        let (first, second) = if i < j {
            let (lo, hi) = self.slots.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        };
        (
            first.as_mut().expect("`Arena::get_pair_mut()` - `a` is invalid!"),
            second.as_mut().expect("`Arena::get_pair_mut()` - `b` is invalid!"),
        )
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
