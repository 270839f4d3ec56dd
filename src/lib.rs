//! Red-black tree ordered collections for Rust.
//!
//! This crate provides [`RBTreeMap`] and [`RBTreeSet`], ordered associative containers built on a
//! red-black tree whose key order comes from a pluggable [`Comparator`]:
//!
//! - [`NaturalOrder`] orders keys by their [`Ord`] implementation.
//! - [`Predicates`] assembles the order from three caller functions: `less`, `equal`, and an
//!   `is_unbounded` test marking a sentinel key that range walks read as "no bound".
//!
//! Beyond the usual map operations the tree offers several insertion flavours
//! ([`insert_or_update`](RBTreeMap::insert_or_update),
//! [`insert_if_absent`](RBTreeMap::insert_if_absent),
//! [`update_if_present`](RBTreeMap::update_if_present) and
//! [`insert_always`](RBTreeMap::insert_always), which admits duplicate keys), visitor-style
//! traversals ([`walk`](RBTreeMap::walk), [`ascend`](RBTreeMap::ascend),
//! [`descend`](RBTreeMap::descend)), and [`validate`](RBTreeMap::validate) for checking every
//! red-black invariant.
//!
//! # Example
//!
//! ```
//! use rbtree_map::RBTreeMap;
//!
//! let mut scores = RBTreeMap::new();
//! scores.insert_or_update(100, "Alice");
//! scores.insert_or_update(85, "Bob");
//! scores.insert_or_update(92, "Carol");
//!
//! assert_eq!(scores.get(&85), Some(&"Bob"));
//! assert_eq!(scores.insert_if_absent(85, "Dave"), Some(&"Bob"));
//! assert_eq!(scores.len(), 3);
//!
//! // Scores of 90 and above, best first.
//! let mut names = Vec::new();
//! scores.descend(90.., |_, name| {
//!     names.push(*name);
//!     true
//! });
//! assert_eq!(names, ["Alice", "Carol"]);
//!
//! assert_eq!(scores.validate(), Ok(()));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No `unsafe`** - Nodes live in an index-addressed arena
//! - **No parent links** - Insertions and removals record their root-to-node path and rebalance
//!   along it
//! - **Fallible insertion** - `try_*` variants report allocation failure and leave the tree
//!   untouched
//!
//! # Logging
//!
//! Rebalancing cases are reported through the [`log`] facade at `trace` level; bulk operations
//! and reservation failures at `debug` level. No logger is installed by this crate.
//!
//! # Concurrency
//!
//! The collections do no locking of their own. They are `Send` and `Sync` whenever their key,
//! value and comparator types are, so shared mutation goes through an external lock such as a
//! `Mutex` or `RwLock`.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod comparator;
mod error;
mod raw;

pub mod rbtree_map;
pub mod rbtree_set;

pub use comparator::{Comparator, NaturalOrder, Predicates};
pub use error::{InvariantViolation, TryInsertError};
pub use raw::Color;
pub use rbtree_map::{NodeView, Nodes, Position, RBTreeMap};
pub use rbtree_set::RBTreeSet;
