//! Hash-indexed storage with a heap-ordered open list.

use std::collections::HashMap;

use crate::arena::NodeArena;
use crate::flags::AStarFlags;
use crate::node::{Node, NodeHandle, NodeId};
use crate::queue::OpenQueue;
use crate::traits::{Map, Storage};

/// General-purpose [`Storage`].
///
/// Membership lookups go through a `HashMap` per list and the open list is
/// an [`OpenQueue`], so every operation is O(1) or O(log n) regardless of
/// search size. An optional node limit bounds memory: once that many
/// records are live, [`create_node`](Storage::create_node) returns `None`.
#[derive(Debug, Default)]
pub struct HashStorage {
    arena: NodeArena,
    queue: OpenQueue,
    open: HashMap<NodeId, NodeHandle>,
    closed: HashMap<NodeId, NodeHandle>,
    node_limit: Option<usize>,
}

impl HashStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that refuses to hold more than `limit` live records.
    pub fn with_node_limit(limit: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(limit),
            node_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn node_limit(&self) -> Option<usize> {
        self.node_limit
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Iterate over every live record with its handle.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeHandle, &Node)> {
        self.arena.iter()
    }
}

impl Storage for HashStorage {
    fn reset(&mut self) {
        self.arena.clear();
        self.queue.clear();
        self.open.clear();
        self.closed.clear();
    }

    fn create_node(&mut self, id: NodeId) -> Option<NodeHandle> {
        if self.node_limit.is_some_and(|limit| self.arena.len() >= limit) {
            return None;
        }
        debug_assert!(
            !self.open.contains_key(&id) && !self.closed.contains_key(&id),
            "node {id} created twice"
        );
        self.arena.insert(id)
    }

    fn destroy_node(&mut self, node: NodeHandle) {
        if let Some(removed) = self.arena.remove(node) {
            if self.open.get(&removed.id) == Some(&node) {
                self.open.remove(&removed.id);
                self.queue.remove(node);
            }
            if self.closed.get(&removed.id) == Some(&node) {
                self.closed.remove(&removed.id);
            }
        }
    }

    fn node(&self, node: NodeHandle) -> Option<&Node> {
        self.arena.get(node)
    }

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node> {
        self.arena.get_mut(node)
    }

    fn add_to_open_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(&Node { id, f, .. }) = self.arena.get(node) else {
            return;
        };
        self.queue.push(node, f);
        self.open.insert(id, node);
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::OPEN));
    }

    fn add_to_closed_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        let Some(id) = self.arena.get(node).map(|n| n.id) else {
            return;
        };
        self.closed.insert(id, node);
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::CLOSED));
    }

    fn remove_from_open_list(&mut self, node: NodeHandle) {
        if let Some(id) = self.arena.get(node).map(|n| n.id) {
            if self.open.get(&id) == Some(&node) {
                self.open.remove(&id);
                self.queue.remove(node);
            }
        }
    }

    fn remove_from_closed_list(&mut self, node: NodeHandle) {
        if let Some(id) = self.arena.get(node).map(|n| n.id) {
            if self.closed.get(&id) == Some(&node) {
                self.closed.remove(&id);
            }
        }
    }

    fn find_in_open_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.open.get(&id).copied()
    }

    fn find_in_closed_list(&self, id: NodeId) -> Option<NodeHandle> {
        self.closed.get(&id).copied()
    }

    fn remove_best_open_node(&mut self) -> Option<NodeHandle> {
        let node = self.queue.pop()?;
        if let Some(id) = self.arena.get(node).map(|n| n.id) {
            self.open.remove(&id);
        }
        Some(node)
    }

    fn open_len(&self) -> usize {
        self.queue.len()
    }

    fn closed_len(&self) -> usize {
        self.closed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn open_with(storage: &mut HashStorage, map: &mut Graph, id: u32, f: f32) -> NodeHandle {
        let h = storage.create_node(NodeId(id)).unwrap();
        storage.node_mut(h).unwrap().f = f;
        storage.add_to_open_list(h, map);
        h
    }

    #[test]
    fn best_is_lowest_then_oldest() {
        let mut map = Graph::new(4);
        let mut s = HashStorage::new();
        let a = open_with(&mut s, &mut map, 0, 2.0);
        let b = open_with(&mut s, &mut map, 1, 1.0);
        let c = open_with(&mut s, &mut map, 2, 1.0);

        assert_eq!(s.remove_best_open_node(), Some(b));
        assert_eq!(s.find_in_open_list(NodeId(1)), None);
        assert_eq!(s.remove_best_open_node(), Some(c));
        assert_eq!(s.remove_best_open_node(), Some(a));
        assert_eq!(s.remove_best_open_node(), None);
    }

    #[test]
    fn rekey_after_improvement() {
        let mut map = Graph::new(4);
        let mut s = HashStorage::new();
        let a = open_with(&mut s, &mut map, 0, 5.0);
        let _b = open_with(&mut s, &mut map, 1, 3.0);

        s.node_mut(a).unwrap().f = 1.0;
        s.add_to_open_list(a, &mut map);
        assert_eq!(s.open_len(), 2);
        assert_eq!(s.remove_best_open_node(), Some(a));
    }

    #[test]
    fn closed_to_open_transition() {
        let mut map = Graph::new(2);
        let mut s = HashStorage::new();
        let a = open_with(&mut s, &mut map, 1, 1.0);
        assert_eq!(s.remove_best_open_node(), Some(a));
        s.add_to_closed_list(a, &mut map);
        assert_eq!(s.find_in_closed_list(NodeId(1)), Some(a));
        assert_eq!(map.flags(NodeId(1)), AStarFlags::CLOSED);

        s.remove_from_closed_list(a);
        s.add_to_open_list(a, &mut map);
        assert_eq!(s.find_in_closed_list(NodeId(1)), None);
        assert_eq!(s.find_in_open_list(NodeId(1)), Some(a));
        assert_eq!(map.flags(NodeId(1)), AStarFlags::OPEN);
    }

    #[test]
    fn node_limit_reports_exhaustion() {
        let mut s = HashStorage::with_node_limit(2);
        assert!(s.create_node(NodeId(0)).is_some());
        assert!(s.create_node(NodeId(1)).is_some());
        assert!(s.create_node(NodeId(2)).is_none());
        s.reset();
        assert!(s.create_node(NodeId(2)).is_some());
    }

    #[test]
    fn reset_invalidates_handles() {
        let mut map = Graph::new(2);
        let mut s = HashStorage::new();
        let a = open_with(&mut s, &mut map, 0, 1.0);
        s.reset();
        assert!(s.node(a).is_none());
        assert!(s.is_empty());
        assert_eq!(s.remove_best_open_node(), None);
    }

    #[test]
    fn destroy_node_cleans_up() {
        let mut map = Graph::new(2);
        let mut s = HashStorage::new();
        let a = open_with(&mut s, &mut map, 0, 1.0);
        s.destroy_node(a);
        assert_eq!(s.open_len(), 0);
        assert_eq!(s.find_in_open_list(NodeId(0)), None);
        assert_eq!(s.len(), 0);
    }
}
