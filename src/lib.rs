#![doc = include_str!("../README.md")]
pub mod btree;
mod types;
pub use btree::BTree;
pub use types::{DEFAULT_MAX_CHILDREN, Order};
use std::error;
use std::fmt::{Display, Formatter};

/// The error returned when the node arena cannot satisfy an allocation
/// because the tree's node capacity is exhausted.
///
/// The operation that hit the limit is a no-op on the entries of the tree;
/// removing entries frees nodes and makes room again.
#[derive(Debug, PartialEq, Eq)]
pub struct AllocError {
    pub(crate) allocated: usize,
    pub(crate) max_nodes: usize,
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to allocate a node: {} of {} slots in use",
            self.allocated, self.max_nodes
        )
    }
}

impl error::Error for AllocError {}
