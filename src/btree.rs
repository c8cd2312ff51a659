//! An in-memory B-tree keyed by `u64`, with all nodes held in an arena.
//!
//! The tree follows the classic design in which entries live in internal
//! nodes as well as leaves, so a lookup can stop as soon as it meets the key
//! on the way down. Rebalancing happens on the way down too: `insert` splits
//! any full node before stepping into it and `remove` tops up any minimal
//! node before stepping into it, so neither ever has to walk back up.
//!
//! Nodes are addressed through `NodeId` handles into an `Allocator` arena
//! rather than through owning pointers. This keeps ownership reasoning
//! trivial (the arena owns every node, the tree owns the arena), lets freed
//! nodes be reused through a free list, and releases the whole structure in
//! one sweep when the tree is dropped.

mod allocator;
mod node;

#[cfg(test)]
mod proptests;

use crate::types::{NodeId, Order};
use crate::AllocError;
use allocator::Allocator;
use node::{Entry, Node, NodeType};
use std::fmt;

/// A B-tree map from `u64` keys to values of type `V`.
///
/// The fan-out is chosen per instance via [`Order`] and never changes
/// afterwards. Construct with [`BTree::new`] for an unbounded node arena, or
/// with [`BTree::with_node_capacity`] to put a hard ceiling on the number of
/// nodes the tree may allocate.
///
/// # Examples
///
/// ```
/// use arena_btree::{BTree, Order};
///
/// let mut tree: BTree<&str> = BTree::new(Order::new(4));
/// tree.insert(1, "one").unwrap();
/// tree.insert(2, "two").unwrap();
///
/// assert_eq!(tree.get(1), Some(&"one"));
/// assert_eq!(tree.remove(2), Some("two"));
/// assert_eq!(tree.get(2), None);
/// ```
pub struct BTree<V> {
    // The id of the root node. The root always exists; an empty tree is a
    // root leaf with zero entries.
    root: NodeId,

    // The fan-out this tree was built with.
    order: Order,

    // An arena used for allocating nodes, with free-list reuse.
    allocator: Allocator<V>,

    // The number of entries in the tree.
    length: u64,
}

impl<V> BTree<V> {
    /// Creates an empty tree with an unbounded node arena.
    pub fn new(order: Order) -> Self {
        Self::with_allocator(order, Allocator::new(None))
            .expect("an unbounded arena always has room for the root")
    }

    /// Creates an empty tree whose arena will never hold more than
    /// `max_nodes` nodes at once.
    ///
    /// Fails if even the root leaf cannot be allocated (`max_nodes == 0`).
    /// Once the cap is reached, inserts that would grow the tree return an
    /// error and leave the entries untouched; removals make room again.
    pub fn with_node_capacity(order: Order, max_nodes: usize) -> Result<Self, AllocError> {
        Self::with_allocator(order, Allocator::new(Some(max_nodes)))
    }

    fn with_allocator(order: Order, mut allocator: Allocator<V>) -> Result<Self, AllocError> {
        let root = allocator.allocate(Node::new(NodeType::Leaf, order))?;
        Ok(Self {
            root,
            order,
            allocator,
            length: 0,
        })
    }

    /// The fan-out this tree was built with.
    pub fn order(&self) -> Order {
        self.order
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Returns `true` if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Inserts a key-value pair into the tree.
    ///
    /// The previous value of the key, if present, is returned. If a node
    /// allocation fails, the entries of the tree are exactly as they were
    /// before the call: every split allocates its new node before touching
    /// an existing one, so a refused allocation never leaves a half-applied
    /// split behind.
    pub fn insert(&mut self, key: u64, value: V) -> Result<Option<V>, AllocError> {
        // Check if the key already exists in the root.
        if let Ok(idx) = self.node(self.root).search(key) {
            // The key exists. Overwrite it and return the previous value.
            let (_, previous_value) = self.node_mut(self.root).swap_entry(idx, (key, value));
            return Ok(Some(previous_value));
        }

        // If the root is full, introduce a new node above it.
        //
        // NOTE: in the case where we end up overwriting an existing key
        // further down, splitting the root isn't strictly necessary. That
        // micro-optimization isn't worth the added complexity.
        if self.node(self.root).is_full(self.order) {
            let new_root_id = self
                .allocator
                .allocate(Node::new(NodeType::Internal, self.order))?;
            let old_root = self.root;
            self.node_mut(new_root_id).push_child(old_root);

            // Only adopt the new root once the split of the old one has its
            // sibling allocated; otherwise back out without a trace.
            match self.split_child(new_root_id, 0) {
                Ok(()) => self.root = new_root_id,
                Err(err) => {
                    self.allocator.deallocate(new_root_id);
                    return Err(err);
                }
            }
        }

        self.insert_nonfull(self.root, key, value)
    }

    /// Inserts an entry into the subtree of a node that is *not full*.
    fn insert_nonfull(
        &mut self,
        node_id: NodeId,
        key: u64,
        value: V,
    ) -> Result<Option<V>, AllocError> {
        // We're guaranteed by the caller that the provided node is not full.
        debug_assert!(!self.node(node_id).is_full(self.order));

        // Look for the key in the node.
        match self.node(node_id).search(key) {
            Ok(idx) => {
                // The key is already in the node. Overwrite it and return the
                // previous value.
                let (_, previous_value) = self.node_mut(node_id).swap_entry(idx, (key, value));
                Ok(Some(previous_value))
            }
            Err(idx) => {
                // The key isn't in the node. `idx` is where it belongs.
                match self.node(node_id).node_type() {
                    NodeType::Leaf => {
                        // The node is a non-full leaf. Insert the entry at
                        // the proper location.
                        self.node_mut(node_id).insert_entry(idx, (key, value));
                        self.length += 1;
                        Ok(None)
                    }
                    NodeType::Internal => {
                        // The child that the entry belongs in.
                        let child_id = self.node(node_id).child(idx);

                        if self.node(child_id).is_full(self.order) {
                            // Check if the key already exists in the child.
                            if let Ok(idx) = self.node(child_id).search(key) {
                                let (_, previous_value) =
                                    self.node_mut(child_id).swap_entry(idx, (key, value));
                                return Ok(Some(previous_value));
                            }

                            // The child is full. Split it.
                            self.split_child(node_id, idx)?;

                            // The children have changed. Search again for the
                            // child to descend into.
                            let idx = self.node(node_id).search(key).unwrap_or_else(|idx| idx);
                            let child_id = self.node(node_id).child(idx);
                            return self.insert_nonfull(child_id, key, value);
                        }

                        self.insert_nonfull(child_id, key, value)
                    }
                }
            }
        }
    }

    /// Takes a node and the index of its full child, then splits the child in
    /// two, adding an additional child to `node_id`.
    ///
    /// Example:
    /// ```ignore
    ///                [ ... M   Y ... ]
    ///                        |
    ///            [ N  O  P  Q  R  S  T ]
    /// ```
    ///
    /// After splitting becomes:
    /// ```ignore
    ///                [ ... M  Q  Y ... ]
    ///                        /   \
    ///            [ N  O  P ]     [ R  S  T ]
    /// ```
    fn split_child(&mut self, node_id: NodeId, full_child_idx: usize) -> Result<(), AllocError> {
        // The node must not be full, and the child to split must be.
        assert!(!self.node(node_id).is_full(self.order));
        let child_id = self.node(node_id).child(full_child_idx);
        assert!(self.node(child_id).is_full(self.order));

        // Allocate the sibling before mutating anything, so a refused
        // allocation cannot leave a half-applied split behind.
        let sibling = Node::new(self.node(child_id).node_type(), self.order);
        let sibling_id = self.allocator.allocate(sibling)?;

        let (full_child, sibling) = self.allocator.get_pair_mut(child_id, sibling_id);
        let median = full_child.split(sibling, self.order);

        let node = self.node_mut(node_id);
        node.insert_child(full_child_idx + 1, sibling_id);
        node.insert_entry(full_child_idx, median);
        Ok(())
    }

    /// Returns a reference to the value for the given key, if it exists.
    pub fn get(&self, key: u64) -> Option<&V> {
        self.traverse(self.root, key, |node, idx| node.value(idx))
    }

    /// Returns `true` if the key exists in the tree.
    pub fn contains_key(&self, key: u64) -> bool {
        self.traverse(self.root, key, |_, _| ()).is_some()
    }

    /// Recursively descends from `node_id`, invoking `f` if `key` is found.
    /// Stops at a leaf if not.
    fn traverse<'a, F, R>(&'a self, node_id: NodeId, key: u64, f: F) -> Option<R>
    where
        F: Fn(&'a Node<V>, usize) -> R,
    {
        let node = self.node(node_id);
        match node.search(key) {
            Ok(idx) => Some(f(node, idx)), // Key found: apply `f`.
            Err(idx) => match node.node_type() {
                NodeType::Leaf => None, // At a leaf: key not present.
                NodeType::Internal => self.traverse(node.child(idx), key, f),
            },
        }
    }

    /// Overwrites the value of an existing key in place, returning the
    /// previous value. Returns `None`, and changes nothing, if the key is
    /// absent. The structure of the tree is never altered.
    pub fn update(&mut self, key: u64, value: V) -> Option<V> {
        let mut node_id = self.root;
        loop {
            match self.node(node_id).search(key) {
                Ok(idx) => {
                    let (_, previous_value) = self.node_mut(node_id).swap_entry(idx, (key, value));
                    return Some(previous_value);
                }
                Err(idx) => match self.node(node_id).node_type() {
                    NodeType::Leaf => return None,
                    NodeType::Internal => node_id = self.node(node_id).child(idx),
                },
            }
        }
    }

    /// Removes a key from the tree, returning the previous value if the key
    /// existed.
    pub fn remove(&mut self, key: u64) -> Option<V> {
        self.remove_helper(self.root, key)
    }

    /// A helper method for recursively removing a key from the tree.
    ///
    /// Every node this method is entered with (other than the root) has been
    /// topped up by its caller to hold more than the minimum number of
    /// entries whenever a sibling could spare one, so the removal below can
    /// almost always complete in a single downward pass.
    fn remove_helper(&mut self, node_id: NodeId, key: u64) -> Option<V> {
        match self.node(node_id).node_type() {
            NodeType::Leaf => {
                match self.node(node_id).search(key) {
                    Ok(idx) => {
                        // Case 1: the node is a leaf and the key is in it.
                        // Remove the entry directly. An empty leaf is legal
                        // only as the root, where it represents the empty
                        // tree.
                        let (_, value) = self.node_mut(node_id).remove_entry(idx);
                        self.length -= 1;
                        Some(value)
                    }
                    _ => None, // Key not found.
                }
            }
            NodeType::Internal => {
                match self.node(node_id).search(key) {
                    Ok(idx) => {
                        // Case 2: the node is internal and the key is in it.

                        let left_child_id = self.node(node_id).child(idx);
                        if self
                            .node(left_child_id)
                            .can_remove_entry_without_merging(self.order)
                        {
                            // Case 2.a: the left child can spare an entry.
                            //
                            //             [..., key, ...]
                            //                  /   \
                            //       [left child]   [...]
                            //
                            // Replace `key` with its predecessor (the largest
                            // entry of the left subtree), deleting the
                            // predecessor from that subtree.
                            let (predecessor_key, _) = self
                                .max_entry(left_child_id)
                                .expect("a child that can spare an entry is not empty");
                            let predecessor_value = self
                                .remove_helper(left_child_id, predecessor_key)
                                .expect("the predecessor exists in the left subtree");
                            let (_, old_value) = self
                                .node_mut(node_id)
                                .swap_entry(idx, (predecessor_key, predecessor_value));
                            return Some(old_value);
                        }

                        let right_child_id = self.node(node_id).child(idx + 1);
                        if self
                            .node(right_child_id)
                            .can_remove_entry_without_merging(self.order)
                        {
                            // Case 2.b: the right child can spare an entry.
                            // Symmetric to 2.a, using the successor (the
                            // smallest entry of the right subtree).
                            let (successor_key, _) = self
                                .min_entry(right_child_id)
                                .expect("a child that can spare an entry is not empty");
                            let successor_value = self
                                .remove_helper(right_child_id, successor_key)
                                .expect("the successor exists in the right subtree");
                            let (_, old_value) = self
                                .node_mut(node_id)
                                .swap_entry(idx, (successor_key, successor_value));
                            return Some(old_value);
                        }

                        // Case 2.c: both children are at minimum occupancy.
                        //
                        //             [..., key, ...]
                        //                  /   \
                        //       [left child]   [right child]
                        //
                        // Merge (left child, key, right child) into a single
                        // node and recurse into it to delete `key`. If the
                        // node was the root and is now empty, the merged
                        // child becomes the new root.
                        assert!(self.node(left_child_id).at_minimum(self.order));
                        assert!(self.node(right_child_id).at_minimum(self.order));

                        let separator = self.node_mut(node_id).remove_entry(idx);
                        self.node_mut(node_id).remove_child(idx + 1);
                        self.merge(left_child_id, right_child_id, separator);
                        self.collapse_root_if_empty(node_id);
                        self.remove_helper(left_child_id, key)
                    }
                    Err(idx) => {
                        // Case 3: the node is internal and the key is NOT in
                        // it. If the key is in the tree at all, it is in the
                        // subtree at `idx`.
                        let child_id = self.node(node_id).child(idx);

                        if self
                            .node(child_id)
                            .can_remove_entry_without_merging(self.order)
                        {
                            // The child has entries to spare. Descend.
                            return self.remove_helper(child_id, key);
                        }

                        // The child is at minimum occupancy. Top it up from a
                        // sibling before descending, preferring the left one.
                        let left_sibling_id = if idx > 0 {
                            Some(self.node(node_id).child(idx - 1))
                        } else {
                            None
                        };
                        let right_sibling_id = if idx + 1 < self.node(node_id).children_len() {
                            Some(self.node(node_id).child(idx + 1))
                        } else {
                            None
                        };

                        if let Some(left_sibling_id) = left_sibling_id {
                            if self
                                .node(left_sibling_id)
                                .can_remove_entry_without_merging(self.order)
                            {
                                // Case 3.a (left): rotate an entry through
                                // the parent.
                                //
                                //            [d] (parent)
                                //           /   \
                                //  [a, b, c]     [e, f] (child)
                                //
                                // becomes
                                //
                                //            [c] (parent)
                                //           /   \
                                //     [a, b]     [d, e, f] (child)
                                let (sibling_key, sibling_value) = self
                                    .node_mut(left_sibling_id)
                                    .pop_entry()
                                    .expect("a sibling that can spare an entry is not empty");
                                let parent_entry = self
                                    .node_mut(node_id)
                                    .swap_entry(idx - 1, (sibling_key, sibling_value));
                                self.node_mut(child_id).insert_entry(0, parent_entry);

                                // The sibling's right-most subtree moves with
                                // its entry.
                                if let Some(last_child) =
                                    self.node_mut(left_sibling_id).pop_child()
                                {
                                    self.node_mut(child_id).insert_child(0, last_child);
                                }

                                return self.remove_helper(child_id, key);
                            }
                        }

                        if let Some(right_sibling_id) = right_sibling_id {
                            if self
                                .node(right_sibling_id)
                                .can_remove_entry_without_merging(self.order)
                            {
                                // Case 3.a (right): the mirror rotation.
                                //
                                //       [c] (parent)
                                //      /   \
                                // [a, b]    [d, e, f] (right sibling)
                                //
                                // becomes
                                //
                                //          [d] (parent)
                                //         /   \
                                // [a, b, c]    [e, f] (right sibling)
                                let (sibling_key, sibling_value) =
                                    self.node_mut(right_sibling_id).remove_entry(0);
                                let parent_entry = self
                                    .node_mut(node_id)
                                    .swap_entry(idx, (sibling_key, sibling_value));
                                self.node_mut(child_id).push_entry(parent_entry);

                                if self.node(right_sibling_id).node_type() == NodeType::Internal {
                                    let first_child =
                                        self.node_mut(right_sibling_id).remove_child(0);
                                    self.node_mut(child_id).push_child(first_child);
                                }

                                return self.remove_helper(child_id, key);
                            }
                        }

                        // Case 3.b: no sibling can spare an entry. Merge the
                        // child with one of them, pulling the separator down
                        // from the parent.
                        if let Some(left_sibling_id) = left_sibling_id {
                            assert!(self.node(left_sibling_id).at_minimum(self.order));
                            let separator = self.node_mut(node_id).remove_entry(idx - 1);
                            self.node_mut(node_id).remove_child(idx);
                            self.merge(left_sibling_id, child_id, separator);
                            self.collapse_root_if_empty(node_id);
                            return self.remove_helper(left_sibling_id, key);
                        }

                        if let Some(right_sibling_id) = right_sibling_id {
                            assert!(self.node(right_sibling_id).at_minimum(self.order));
                            let separator = self.node_mut(node_id).remove_entry(idx);
                            self.node_mut(node_id).remove_child(idx + 1);
                            self.merge(child_id, right_sibling_id, separator);
                            self.collapse_root_if_empty(node_id);
                            return self.remove_helper(child_id, key);
                        }

                        // A node holding no separators (possible transiently
                        // at odd fan-outs) offers its only child nothing to
                        // borrow or merge with. Descend as-is.
                        self.remove_helper(child_id, key)
                    }
                }
            }
        }
    }

    /// Merges the node `right_id` into `left_id` along with the entry that
    /// separates them; `right_id` is deallocated.
    fn merge(&mut self, left_id: NodeId, right_id: NodeId, separator: Entry<V>) {
        let right = self.allocator.deallocate(right_id);
        self.node_mut(left_id).append_from(right, separator);
    }

    /// After a merge, an internal node may be left without entries. If that
    /// node is the root, its sole remaining child becomes the new root and
    /// the tree shrinks by one level. A non-root node is left in place: its
    /// single child keeps every search well-directed until rebalancing
    /// reaches it again.
    fn collapse_root_if_empty(&mut self, node_id: NodeId) {
        if node_id == self.root && self.node(node_id).entries_len() == 0 {
            assert_eq!(self.node(node_id).children_len(), 1);
            let new_root = self.node(node_id).child(0);
            self.allocator.deallocate(node_id);
            self.root = new_root;
        }
    }

    /// Returns the entry with the smallest key in the tree.
    pub fn first_key_value(&self) -> Option<(u64, &V)> {
        self.min_entry(self.root)
    }

    /// Returns the entry with the largest key in the tree.
    pub fn last_key_value(&self) -> Option<(u64, &V)> {
        self.max_entry(self.root)
    }

    /// Removes and returns the entry with the smallest key in the tree.
    pub fn pop_first(&mut self) -> Option<(u64, V)> {
        let (key, _) = self.min_entry(self.root)?;
        let value = self
            .remove_helper(self.root, key)
            .expect("the minimum key was just looked up");
        Some((key, value))
    }

    /// Removes and returns the entry with the largest key in the tree.
    pub fn pop_last(&mut self) -> Option<(u64, V)> {
        let (key, _) = self.max_entry(self.root)?;
        let value = self
            .remove_helper(self.root, key)
            .expect("the maximum key was just looked up");
        Some((key, value))
    }

    /// The entry with the smallest key in the subtree rooted at `node_id`,
    /// or `None` if the subtree holds no entries.
    fn min_entry(&self, node_id: NodeId) -> Option<(u64, &V)> {
        let node = self.node(node_id);
        match node.node_type() {
            NodeType::Leaf => node.first_entry(),
            // An empty left-most subtree (possible transiently at odd
            // fan-outs) pushes the minimum up to the node's own first entry.
            NodeType::Internal => self
                .min_entry(node.child(0))
                .or_else(|| node.first_entry()),
        }
    }

    /// The entry with the largest key in the subtree rooted at `node_id`,
    /// or `None` if the subtree holds no entries.
    fn max_entry(&self, node_id: NodeId) -> Option<(u64, &V)> {
        let node = self.node(node_id);
        match node.node_type() {
            NodeType::Leaf => node.last_entry(),
            NodeType::Internal => self
                .max_entry(node.child(node.children_len() - 1))
                .or_else(|| node.last_entry()),
        }
    }

    /// Counts the nodes of the tree by full traversal. Diagnostic; costs a
    /// whole-tree walk, not `O(1)`.
    pub fn node_count(&self) -> u64 {
        self.count_nodes(self.root)
    }

    fn count_nodes(&self, node_id: NodeId) -> u64 {
        let node = self.node(node_id);
        let mut count = 1;
        for i in 0..node.children_len() {
            count += self.count_nodes(node.child(i));
        }
        count
    }

    /// Removes every entry, releasing all nodes back to the arena. The tree
    /// is afterwards indistinguishable from a freshly created one with the
    /// same order and node capacity.
    pub fn clear(&mut self) {
        self.allocator.clear();
        self.root = self
            .allocator
            .allocate(Node::new(NodeType::Leaf, self.order))
            .expect("a cleared arena always has room for the root");
        self.length = 0;
    }

    fn node(&self, id: NodeId) -> &Node<V> {
        self.allocator.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.allocator.get_mut(id)
    }
}

impl<V> Default for BTree<V> {
    fn default() -> Self {
        Self::new(Order::default())
    }
}

/// Renders every node's entries at each depth, depth-first, children visited
/// left to right. For debugging; the exact format is not part of the crate's
/// contract.
impl<V: fmt::Debug> fmt::Debug for BTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BTree(order={}, len={})",
            self.order.max_children(),
            self.length
        )?;
        self.fmt_node(f, self.root, 0)
    }
}

impl<V: fmt::Debug> BTree<V> {
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, node_id: NodeId, depth: usize) -> fmt::Result {
        let node = self.node(node_id);
        write!(f, "{:indent$}[", "", indent = depth * 2)?;
        for i in 0..node.entries_len() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", node.key(i), node.value(i))?;
        }
        writeln!(f, "]")?;
        for i in 0..node.children_len() {
            self.fmt_node(f, node.child(i), depth + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl<V> BTree<V> {
    /// Verifies the structural invariants of the whole tree, panicking on any
    /// violation:
    ///
    /// * keys are strictly increasing within a node and strictly separated
    ///   by the parent's keys across subtrees;
    /// * all leaves are at the same depth;
    /// * node occupancy stays within bounds (strict minimums hold for even
    ///   fan-outs; odd fan-outs admit transiently underfull or one-over-full
    ///   nodes, which is inherent to splitting an even number of keys around
    ///   a median);
    /// * an internal node with `k` entries has `k + 1` children;
    /// * the entry count matches `len()` and the node count matches the
    ///   arena's live-node count (no leaks, no stray allocations).
    pub(crate) fn check_invariants(&self) {
        let mut leaf_depth = None;
        let (nodes, entries) = self.check_node(self.root, None, None, 0, &mut leaf_depth);
        assert_eq!(entries, self.length, "entry count must match len()");
        assert_eq!(
            nodes as usize,
            self.allocator.num_allocated_nodes(),
            "every allocated node must be reachable from the root"
        );
    }

    fn check_node(
        &self,
        node_id: NodeId,
        lower: Option<u64>,
        upper: Option<u64>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
    ) -> (u64, u64) {
        let node = self.node(node_id);
        let len = node.entries_len();

        if self.order.max_children() % 2 == 0 {
            assert!(len <= self.order.max_keys(), "node over capacity");
            if node_id != self.root {
                assert!(len >= self.order.min_keys(), "non-root node underfull");
            }
        } else {
            assert!(len <= self.order.max_keys() + 1, "node over capacity");
        }

        for i in 0..len {
            let key = node.key(i);
            if i > 0 {
                assert!(node.key(i - 1) < key, "keys must be strictly increasing");
            }
            if let Some(lower) = lower {
                assert!(lower < key, "key below the subtree's range");
            }
            if let Some(upper) = upper {
                assert!(key < upper, "key above the subtree's range");
            }
        }

        match node.node_type() {
            NodeType::Leaf => {
                assert_eq!(node.children_len(), 0, "leaves must not have children");
                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) => {
                        assert_eq!(depth, expected, "all leaves must be at the same depth")
                    }
                }
                (1, len as u64)
            }
            NodeType::Internal => {
                assert_eq!(
                    node.children_len(),
                    len + 1,
                    "an internal node with k entries must have k + 1 children"
                );
                let mut nodes = 1;
                let mut entries = len as u64;
                for i in 0..=len {
                    let lower = if i == 0 { lower } else { Some(node.key(i - 1)) };
                    let upper = if i == len { upper } else { Some(node.key(i)) };
                    let (n, e) = self.check_node(node.child(i), lower, upper, depth + 1, leaf_depth);
                    nodes += n;
                    entries += e;
                }
                (nodes, entries)
            }
        }
    }
}
