//! Flat-vector storage with linear lookups.

use crate::arena::NodeArena;
use crate::flags::AStarFlags;
use crate::node::{Node, NodeHandle, NodeId};
use crate::traits::{Map, Storage};

/// The simplest [`Storage`]: open and closed lists are plain vectors.
///
/// Every lookup is a linear scan, so this only suits small searches, but it
/// carries no per-node index overhead. The open list is kept in insertion
/// order and scanned for the lowest `f`; the first minimum wins, which gives
/// FIFO ordering among equal keys.
#[derive(Debug, Default)]
pub struct ListStorage {
    arena: NodeArena,
    open: Vec<NodeHandle>,
    closed: Vec<NodeHandle>,
}

impl ListStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn id_of(&self, node: NodeHandle) -> Option<NodeId> {
        self.arena.get(node).map(|n| n.id)
    }

    fn find(&self, list: &[NodeHandle], id: NodeId) -> Option<NodeHandle> {
        list.iter()
            .copied()
            .find(|&h| self.arena.get(h).is_some_and(|n| n.id == id))
    }
}

fn remove_handle(list: &mut Vec<NodeHandle>, node: NodeHandle) -> bool {
    match list.iter().position(|&h| h == node) {
        Some(pos) => {
            list.remove(pos);
            true
        }
        None => false,
    }
}

impl Storage for ListStorage {
    fn reset(&mut self) {
        self.arena.clear();
        self.open.clear();
        self.closed.clear();
    }

    fn create_node(&mut self, id: NodeId) -> Option<NodeHandle> {
        self.arena.insert(id)
    }

    fn destroy_node(&mut self, node: NodeHandle) {
        remove_handle(&mut self.open, node);
        remove_handle(&mut self.closed, node);
        self.arena.remove(node);
    }

    fn node(&self, node: NodeHandle) -> Option<&Node> {
        self.arena.get(node)
    }

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node> {
        self.arena.get_mut(node)
    }

    fn add_to_open_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(id) = self.id_of(node) else {
            return;
        };
        // Re-keying moves the node to the back of the insertion order.
        remove_handle(&mut self.open, node);
        self.open.push(node);
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::OPEN));
    }

    fn add_to_closed_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(id) = self.id_of(node) else {
            return;
        };
        if !self.closed.contains(&node) {
            self.closed.push(node);
        }
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::CLOSED));
    }

    fn remove_from_open_list(&mut self, node: NodeHandle) {
        remove_handle(&mut self.open, node);
    }

    fn remove_from_closed_list(&mut self, node: NodeHandle) {
        remove_handle(&mut self.closed, node);
    }

    fn find_in_open_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.find(&self.open, id)
    }

    fn find_in_closed_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.find(&self.closed, id)
    }

    fn remove_best_open_node(&mut self) -> Option<NodeHandle> {
        let mut best: Option<(usize, f32)> = None;
        for (pos, &h) in self.open.iter().enumerate() {
            let f = self.arena.get(h).map_or(f32::INFINITY, |n| n.f);
            if best.is_none_or(|(_, bf)| f < bf) {
                best = Some((pos, f));
            }
        }
        let (pos, _) = best?;
        Some(self.open.remove(pos))
    }

    fn open_len(&self) -> usize {
        self.open.len()
    }

    fn closed_len(&self) -> usize {
        self.closed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn open_with(storage: &mut ListStorage, map: &mut Graph, id: u32, f: f32) -> NodeHandle {
        let h = storage.create_node(NodeId(id)).unwrap();
        storage.node_mut(h).unwrap().f = f;
        storage.add_to_open_list(h, map);
        h
    }

    #[test]
    fn best_is_lowest_then_oldest() {
        let mut map = Graph::new(4);
        let mut s = ListStorage::new();
        let a = open_with(&mut s, &mut map, 0, 2.0);
        let b = open_with(&mut s, &mut map, 1, 1.0);
        let c = open_with(&mut s, &mut map, 2, 1.0);

        assert_eq!(s.remove_best_open_node(), Some(b));
        assert_eq!(s.remove_best_open_node(), Some(c));
        assert_eq!(s.remove_best_open_node(), Some(a));
        assert_eq!(s.remove_best_open_node(), None);
    }

    #[test]
    fn open_closed_membership_and_flags() {
        let mut map = Graph::new(2);
        let mut s = ListStorage::new();
        let a = open_with(&mut s, &mut map, 1, 0.0);
        assert_eq!(s.find_in_open_list(NodeId(1)), Some(a));
        assert_eq!(map.flags(NodeId(1)), AStarFlags::OPEN);

        s.remove_from_open_list(a);
        s.add_to_closed_list(a, &mut map);
        assert_eq!(s.find_in_open_list(NodeId(1)), None);
        assert_eq!(s.find_in_closed_list(NodeId(1)), Some(a));
        assert_eq!(map.flags(NodeId(1)), AStarFlags::CLOSED);
        assert_eq!((s.open_len(), s.closed_len()), (0, 1));
    }

    #[test]
    fn reset_drops_everything() {
        let mut map = Graph::new(2);
        let mut s = ListStorage::new();
        let a = open_with(&mut s, &mut map, 0, 1.0);
        s.reset();
        assert!(s.node(a).is_none());
        assert_eq!(s.open_len(), 0);
        assert_eq!(s.find_in_open_list(NodeId(0)), None);
    }

    #[test]
    fn destroy_removes_from_lists() {
        let mut map = Graph::new(2);
        let mut s = ListStorage::new();
        let a = open_with(&mut s, &mut map, 0, 1.0);
        s.destroy_node(a);
        assert_eq!(s.open_len(), 0);
        assert!(s.node(a).is_none());
    }
}
