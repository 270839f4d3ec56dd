use core::fmt;

/// The ordering a tree is built on, fixed for the tree's lifetime.
///
/// `less` and `equal` must together describe a strict total order over the keys: `equal` is an
/// equivalence, `less` is irreflexive and transitive, and for any two keys exactly one of
/// `less(a, b)`, `less(b, a)` or `equal(a, b)` holds. This is a precondition, not something the
/// tree checks. A comparator that breaks it leaves the tree's behaviour unspecified (lookups may
/// miss, iteration may be out of order), though never memory-unsafe.
///
/// `is_unbounded` marks a sentinel key value that the `*_from_to` traversal methods read as
/// "no bound on this side". It defaults to `false` for every key.
///
/// # Examples
///
/// A comparator ordering strings by length, then lexicographically:
///
/// ```
/// use rbtree_map::{Comparator, RBTreeMap};
///
/// struct ByLength;
///
/// impl Comparator<String> for ByLength {
///     fn less(&self, a: &String, b: &String) -> bool {
///         (a.len(), a) < (b.len(), b)
///     }
///
///     fn equal(&self, a: &String, b: &String) -> bool {
///         a == b
///     }
/// }
///
/// let mut map = RBTreeMap::with_comparator(ByLength);
/// map.insert_or_update(String::from("ccc"), 3);
/// map.insert_or_update(String::from("a"), 1);
/// map.insert_or_update(String::from("bb"), 2);
/// let keys: Vec<&str> = map.keys().map(String::as_str).collect();
/// assert_eq!(keys, ["a", "bb", "ccc"]);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Returns `true` if `a` orders strictly before `b`.
    fn less(&self, a: &K, b: &K) -> bool;

    /// Returns `true` if `a` and `b` are the same key.
    fn equal(&self, a: &K, b: &K) -> bool;

    /// Returns `true` if `key` is the sentinel meaning "unbounded".
    fn is_unbounded(&self, key: &K) -> bool {
        let _ = key;
        false
    }
}

/// Orders keys by their [`Ord`] implementation. No key is a sentinel.
///
/// This is the comparator used by [`RBTreeMap::new`](crate::RBTreeMap::new).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        a < b
    }

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        a == b
    }
}

/// A comparator assembled from three caller-supplied predicates.
///
/// # Examples
///
/// Reverse numeric order, with `0` reserved as the "unbounded" sentinel:
///
/// ```
/// use rbtree_map::RBTreeMap;
///
/// let mut map = RBTreeMap::with_predicates(
///     |a: &i32, b: &i32| a > b,
///     |a: &i32, b: &i32| a == b,
///     |k: &i32| *k == 0,
/// );
/// for k in 1..=5 {
///     map.insert_or_update(k, k * 10);
/// }
/// assert_eq!(map.min(), Some((&5, &50)));
///
/// let mut seen = Vec::new();
/// map.ascend_from_to(&4, &0, |k, _| {
///     seen.push(*k);
///     true
/// });
/// assert_eq!(seen, [4, 3, 2, 1]);
/// ```
#[derive(Clone, Copy)]
pub struct Predicates<L, E, U> {
    less: L,
    equal: E,
    is_unbounded: U,
}

impl<L, E, U> Predicates<L, E, U> {
    /// Bundles the three predicates.
    pub const fn new(less: L, equal: E, is_unbounded: U) -> Self {
        Self {
            less,
            equal,
            is_unbounded,
        }
    }
}

impl<K, L, E, U> Comparator<K> for Predicates<L, E, U>
where
    K: ?Sized,
    L: Fn(&K, &K) -> bool,
    E: Fn(&K, &K) -> bool,
    U: Fn(&K) -> bool,
{
    #[inline]
    fn less(&self, a: &K, b: &K) -> bool {
        (self.less)(a, b)
    }

    #[inline]
    fn equal(&self, a: &K, b: &K) -> bool {
        (self.equal)(a, b)
    }

    #[inline]
    fn is_unbounded(&self, key: &K) -> bool {
        (self.is_unbounded)(key)
    }
}

impl<L, E, U> fmt::Debug for Predicates<L, E, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicates").finish_non_exhaustive()
    }
}
