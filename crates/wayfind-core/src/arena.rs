//! Generation-checked slab of node records.

use crate::node::{Node, NodeHandle, NodeId};

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    generation: u32,
    occupied: bool,
}

/// Slab allocator for [`Node`] records.
///
/// Freed slots are recycled; every free bumps the slot generation so that
/// handles into a previous occupant stop resolving. Capacity is kept across
/// [`clear`](Self::clear) so repeated searches stop allocating after
/// warm-up.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store a fresh record for `id`. Returns `None` if the slot index space
    /// is exhausted.
    pub fn insert(&mut self, id: NodeId) -> Option<NodeHandle> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).ok()?;
                self.slots.push(Slot {
                    node: Node::new(id),
                    generation: 0,
                    occupied: false,
                });
                index
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.node = Node::new(id);
        slot.occupied = true;
        self.live += 1;
        Some(NodeHandle::new(index, slot.generation))
    }

    /// Free the record behind `handle`. Returns it if the handle was live.
    pub fn remove(&mut self, handle: NodeHandle) -> Option<Node> {
        let slot = self.slots.get_mut(handle.index())?;
        if !slot.occupied || slot.generation != handle.generation() {
            return None;
        }
        slot.occupied = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index() as u32);
        self.live -= 1;
        Some(slot.node)
    }

    #[inline]
    pub fn get(&self, handle: NodeHandle) -> Option<&Node> {
        let slot = self.slots.get(handle.index())?;
        (slot.occupied && slot.generation == handle.generation()).then_some(&slot.node)
    }

    #[inline]
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        let slot = self.slots.get_mut(handle.index())?;
        (slot.occupied && slot.generation == handle.generation()).then_some(&mut slot.node)
    }

    /// Free every record.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.occupied {
                slot.occupied = false;
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.live = 0;
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterate over live records with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.occupied).map(|(i, s)| {
            (NodeHandle::new(i as u32, s.generation), &s.node)
        })
    }
}
