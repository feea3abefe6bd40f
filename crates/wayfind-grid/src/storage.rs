//! Dense, generation-stamped node storage for grids.

use wayfind_core::{AStarFlags, Map, Node, NodeHandle, NodeId, OpenQueue, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    None,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    node: Node,
    /// Search generation that owns this record; 0 means never used.
    generation: u32,
    membership: Membership,
}

impl Cell {
    const EMPTY: Self = Self {
        node: Node {
            id: NodeId::INVALID,
            parent: None,
            g: f32::INFINITY,
            h: 0.0,
            f: f32::INFINITY,
            aux: 0,
        },
        generation: 0,
        membership: Membership::None,
    };
}

/// [`Storage`] with one preallocated record per cell, indexed directly by
/// [`NodeId`].
///
/// Records carry the generation of the search that created them, and
/// [`reset`](Storage::reset) just bumps the current generation, so clearing
/// costs nothing no matter how many cells the last search touched. Ids at
/// or beyond [`capacity`](Self::capacity) cannot be allocated.
#[derive(Debug)]
pub struct DenseStorage {
    cells: Vec<Cell>,
    generation: u32,
    queue: OpenQueue,
    closed_len: usize,
}

impl Default for DenseStorage {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DenseStorage {
    /// Storage for ids `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![Cell::EMPTY; len],
            generation: 1,
            queue: OpenQueue::new(),
            closed_len: 0,
        }
    }

    /// Number of addressable ids.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Change the number of addressable ids. Resets the storage.
    pub fn resize(&mut self, len: usize) {
        self.reset();
        self.cells.resize(len, Cell::EMPTY);
    }

    #[inline]
    fn live(&self, handle: NodeHandle) -> Option<&Cell> {
        self.cells
            .get(handle.index())
            .filter(|c| c.generation == self.generation && handle.generation() == self.generation)
    }

    #[inline]
    fn live_mut(&mut self, handle: NodeHandle) -> Option<&mut Cell> {
        let generation = self.generation;
        self.cells
            .get_mut(handle.index())
            .filter(|c| c.generation == generation && handle.generation() == generation)
    }

    fn find(&self, id: NodeId, membership: Membership) -> Option<NodeHandle> {
        let cell = self.cells.get(id.index())?;
        (cell.generation == self.generation && cell.membership == membership)
            .then(|| NodeHandle::new(id.0, self.generation))
    }
}

impl Storage for DenseStorage {
    fn reset(&mut self) {
        self.queue.clear();
        self.closed_len = 0;
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could alias the new generation.
            for cell in self.cells.iter_mut() {
                cell.generation = 0;
            }
            self.generation = 1;
        }
    }

    fn create_node(&mut self, id: NodeId) -> Option<NodeHandle> {
        if !id.is_valid() {
            return None;
        }
        let generation = self.generation;
        let cell = self.cells.get_mut(id.index())?;
        debug_assert!(cell.generation != generation, "node {id} created twice");
        *cell = Cell {
            node: Node::new(id),
            generation,
            membership: Membership::None,
        };
        Some(NodeHandle::new(id.0, generation))
    }

    fn destroy_node(&mut self, node: NodeHandle) {
        let Some(cell) = self.live_mut(node) else {
            return;
        };
        let membership = cell.membership;
        cell.generation = 0;
        cell.membership = Membership::None;
        match membership {
            Membership::Open => {
                self.queue.remove(node);
            }
            Membership::Closed => self.closed_len -= 1,
            Membership::None => {}
        }
    }

    fn node(&self, node: NodeHandle) -> Option<&Node> {
        self.live(node).map(|c| &c.node)
    }

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node> {
        self.live_mut(node).map(|c| &mut c.node)
    }

    fn add_to_open_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(cell) = self.live_mut(node) else {
            return;
        };
        let (id, f) = (cell.node.id, cell.node.f);
        if std::mem::replace(&mut cell.membership, Membership::Open) == Membership::Closed {
            self.closed_len -= 1;
        }
        self.queue.push(node, f);
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::OPEN));
    }

    fn add_to_closed_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(cell) = self.live_mut(node) else {
            return;
        };
        let id = cell.node.id;
        match std::mem::replace(&mut cell.membership, Membership::Closed) {
            Membership::Closed => {}
            Membership::Open => {
                self.queue.remove(node);
                self.closed_len += 1;
            }
            Membership::None => self.closed_len += 1,
        }
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::CLOSED));
    }

    fn remove_from_open_list(&mut self, node: NodeHandle) {
        if let Some(cell) = self.live_mut(node) {
            if cell.membership == Membership::Open {
                cell.membership = Membership::None;
                self.queue.remove(node);
            }
        }
    }

    fn remove_from_closed_list(&mut self, node: NodeHandle) {
        if let Some(cell) = self.live_mut(node) {
            if cell.membership == Membership::Closed {
                cell.membership = Membership::None;
                self.closed_len -= 1;
            }
        }
    }

    fn find_in_open_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.find(id, Membership::Open)
    }

    fn find_in_closed_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.find(id, Membership::Closed)
    }

    fn remove_best_open_node(&mut self) -> Option<NodeHandle> {
        let node = self.queue.pop()?;
        if let Some(cell) = self.live_mut(node) {
            cell.membership = Membership::None;
        }
        Some(node)
    }

    fn open_len(&self) -> usize {
        self.queue.len()
    }

    fn closed_len(&self) -> usize {
        self.closed_len
    }
}
