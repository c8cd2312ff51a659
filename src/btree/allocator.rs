use crate::btree::node::Node;
use crate::types::{NodeId, NULL};
use crate::AllocError;

/// A slot in the arena: either a live node or a link in the free list.
#[derive(Debug)]
enum Slot<V> {
    Occupied(Node<V>),
    Vacant { next: NodeId },
}

/// An arena of B-tree nodes with free-list reuse.
///
/// Nodes are addressed by `NodeId` handles. Deallocated slots are threaded
/// into an intrusive free list and handed back by later allocations, so a
/// delete-heavy workload does not grow the arena. An optional `max_nodes`
/// bound caps the number of live nodes, making allocation fallible; without a
/// bound only the global allocator can fail, by aborting.
#[derive(Debug)]
pub(crate) struct Allocator<V> {
    slots: Vec<Slot<V>>,
    // Head of the free list; NULL when every slot is occupied.
    free_head: NodeId,
    // Number of occupied slots.
    allocated: usize,
    // Cap on occupied slots; `usize::MAX` means unbounded.
    max_nodes: usize,
}

impl<V> Allocator<V> {
    pub fn new(max_nodes: Option<usize>) -> Self {
        Self {
            slots: Vec::new(),
            free_head: NULL,
            allocated: 0,
            max_nodes: max_nodes.unwrap_or(usize::MAX),
        }
    }

    /// Places `node` into a slot and returns its handle, reusing a vacant
    /// slot when one is available.
    pub fn allocate(&mut self, node: Node<V>) -> Result<NodeId, AllocError> {
        if self.allocated >= self.max_nodes {
            return Err(AllocError {
                allocated: self.allocated,
                max_nodes: self.max_nodes,
            });
        }
        self.allocated += 1;

        if self.free_head != NULL {
            let id = self.free_head;
            match self.slots[id.index()] {
                Slot::Vacant { next } => self.free_head = next,
                Slot::Occupied(_) => unreachable!("the free list points at an occupied slot"),
            }
            self.slots[id.index()] = Slot::Occupied(node);
            Ok(id)
        } else {
            let id = NodeId::new(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            Ok(id)
        }
    }

    /// Frees the slot and returns the node it held. The slot becomes the new
    /// head of the free list.
    pub fn deallocate(&mut self, id: NodeId) -> Node<V> {
        let slot = core::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free_head = id;
                self.allocated -= 1;
                node
            }
            Slot::Vacant { .. } => panic!("double free of node slot {id:?}"),
        }
    }

    pub fn get(&self, id: NodeId) -> &Node<V> {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("no node allocated at {id:?}"),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("no node allocated at {id:?}"),
        }
    }

    /// Mutably borrows two distinct nodes at once.
    pub fn get_pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<V>, &mut Node<V>) {
        assert!(a != b, "cannot borrow node {a:?} twice");
        let (a_idx, b_idx) = (a.index(), b.index());
        if a_idx < b_idx {
            let (lower, upper) = self.slots.split_at_mut(b_idx);
            (occupied(&mut lower[a_idx], a), occupied(&mut upper[0], b))
        } else {
            let (lower, upper) = self.slots.split_at_mut(a_idx);
            let (first, second) = (occupied(&mut upper[0], a), occupied(&mut lower[b_idx], b));
            (first, second)
        }
    }

    /// The number of live nodes.
    pub fn num_allocated_nodes(&self) -> usize {
        self.allocated
    }

    /// The number of slots the arena has ever grown to, vacant ones included.
    #[cfg(test)]
    pub fn num_slots(&self) -> usize {
        self.slots.len()
    }

    /// Drops every node and resets the arena to its initial state. The
    /// `max_nodes` bound is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NULL;
        self.allocated = 0;
    }
}

fn occupied<V>(slot: &mut Slot<V>, id: NodeId) -> &mut Node<V> {
    match slot {
        Slot::Occupied(node) => node,
        Slot::Vacant { .. } => panic!("no node allocated at {id:?}"),
    }
}
