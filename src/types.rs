use core::fmt;

/// The fan-out used by the default [`Order`].
pub const DEFAULT_MAX_CHILDREN: usize = 10;

/// A sentinel for "no node", used to terminate the arena's free list.
pub(crate) const NULL: NodeId = NodeId(u32::MAX);

/// A handle to a node slot in the arena.
///
/// Handles are plain indices; they carry no lifetime and are only meaningful
/// for the arena that issued them. `u32::MAX` is reserved as [`NULL`].
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        assert!(
            index < u32::MAX as usize,
            "node id space exhausted: {index} slots"
        );
        Self(index as u32)
    }

    /// The slot index this handle refers to.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == NULL {
            write!(f, "NodeId(NULL)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// The fan-out of a tree: the maximum number of children an internal node may
/// have. Fixed per tree instance at construction.
///
/// All node-size thresholds derive from it:
///
/// * `max_keys = max_children - 1`
/// * `min_children = (max_children + 1) / 2`
/// * `min_keys = min_children - 1`
///
/// A fan-out below 3 cannot form a valid tree and is rejected.
#[derive(Debug, PartialEq, Copy, Clone, Eq)]
pub struct Order {
    max_children: usize,
}

impl Order {
    /// Creates an order with the given fan-out.
    ///
    /// # Panics
    ///
    /// Panics if `max_children < 3`.
    pub fn new(max_children: usize) -> Self {
        assert!(
            max_children >= 3,
            "a B-tree requires a fan-out of at least 3, got {max_children}"
        );
        Self { max_children }
    }

    /// The maximum number of children an internal node may have.
    pub fn max_children(self) -> usize {
        self.max_children
    }

    /// The maximum number of keys any node may hold.
    pub(crate) fn max_keys(self) -> usize {
        self.max_children - 1
    }

    pub(crate) fn min_children(self) -> usize {
        (self.max_children + 1) / 2
    }

    /// The minimum number of keys a non-root node must hold.
    pub(crate) fn min_keys(self) -> usize {
        self.min_children() - 1
    }

    /// The position of the median entry promoted when a full node splits.
    pub(crate) fn split_index(self) -> usize {
        self.max_keys() / 2
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHILDREN)
    }
}
