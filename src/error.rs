use alloc::collections::TryReserveError;
use core::fmt;

/// The error returned by the fallible insertion and reservation methods.
///
/// When one of these is returned the tree is unchanged: the node slot is reserved before any
/// structural mutation takes place.
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
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TryInsertError {
    /// The tree already holds the maximum number of nodes its handles can address.
    CapacityOverflow,
    /// The allocator could not provide memory for the node arena.
    AllocError(TryReserveError),
}

impl fmt::Display for TryInsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryInsertError::CapacityOverflow => f.write_str("tree node capacity exceeded"),
            TryInsertError::AllocError(err) => write!(f, "memory allocation failed: {err}"),
        }
    }
}

impl core::error::Error for TryInsertError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TryInsertError::CapacityOverflow => None,
            TryInsertError::AllocError(err) => Some(err),
        }
    }
}

impl From<TryReserveError> for TryInsertError {
    fn from(err: TryReserveError) -> Self {
        TryInsertError::AllocError(err)
    }
}

/// A broken red-black or ordering invariant, as reported by `validate`.
///
/// A correctly configured tree never produces one of these; seeing one means the comparator is
/// not a consistent strict total order, or a key was mutated while in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root node is red.
    RedRoot,
    /// A red node has a red child.
    RedViolation {
        /// Depth of the offending child below the root.
        depth: usize,
    },
    /// Two paths from the same node to empty positions cross different numbers of black nodes.
    BlackHeightMismatch {
        /// Black height found on the left side.
        left: usize,
        /// Black height found on the right side.
        right: usize,
    },
    /// An in-order walk produced a key smaller than its predecessor.
    OutOfOrder {
        /// Zero-based in-order position of the offending key.
        position: usize,
    },
    /// The maintained length does not match the number of reachable nodes.
    LenMismatch {
        /// The maintained length.
        expected: usize,
        /// The number of nodes found by traversal.
        actual: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            InvariantViolation::RedRoot => f.write_str("root node is red"),
            InvariantViolation::RedViolation { depth } => write!(f, "red node with a red child at depth {depth}"),
            InvariantViolation::BlackHeightMismatch { left, right } => {
                write!(f, "black height mismatch: left {left}, right {right}")
            }
            InvariantViolation::OutOfOrder { position } => write!(f, "key at in-order position {position} is out of order"),
            InvariantViolation::LenMismatch { expected, actual } => {
                write!(f, "length is {expected} but {actual} nodes are reachable")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}
