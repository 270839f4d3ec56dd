mod arena;
mod cursor;
mod handle;
mod node;
mod raw_rb_tree;

pub(crate) use arena::Arena;
pub(crate) use cursor::Cursor;
pub(crate) use handle::{Handle, MAX_DEPTH};
pub use node::Color;
pub(crate) use node::{Node, Side};
pub(crate) use raw_rb_tree::RawRBTree;
