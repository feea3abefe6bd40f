//! Explicit weighted graphs as a [`Map`], with a table-driven [`Goal`].
//!
//! [`Graph`] stores an adjacency list. Edge costs live in the graph, so
//! [`Map::initialize_neighbour`] copies the cost of the edge being relaxed
//! into [`Node::aux`], where [`GraphGoal::cost`] reads it back. This keeps
//! the goal free of any reference to the map.

use crate::flags::AStarFlags;
use crate::node::{Node, NodeId};
use crate::traits::{Goal, Map};

/// Weighted adjacency-list graph over `NodeId(0)..NodeId(n)`.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    edges: Vec<Vec<(NodeId, f32)>>,
    flags: Vec<AStarFlags>,
}

impl Graph {
    /// Graph with `node_count` vertices and no edges.
    pub fn new(node_count: usize) -> Self {
        Self {
            edges: vec![Vec::new(); node_count],
            flags: vec![AStarFlags::NONE; node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Add the directed edge `from -> to`. Out-of-range endpoints are
    /// ignored.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: f32) {
        debug_assert!(cost >= 0.0, "edge cost must be non-negative, got {cost}");
        if to.index() >= self.edges.len() {
            return;
        }
        if let Some(list) = self.edges.get_mut(from.index()) {
            list.push((to, cost));
        }
    }

    /// Add `a -> b` and `b -> a` with the same cost.
    pub fn add_undirected_edge(&mut self, a: NodeId, b: NodeId, cost: f32) {
        self.add_edge(a, b, cost);
        self.add_edge(b, a, cost);
    }

    /// Cheapest edge `from -> to`, if any.
    pub fn edge_cost(&self, from: NodeId, to: NodeId) -> Option<f32> {
        self.edges
            .get(from.index())?
            .iter()
            .filter(|(n, _)| *n == to)
            .map(|&(_, c)| c)
            .reduce(f32::min)
    }

    /// Outgoing edges of `id` in insertion order.
    pub fn edges(&self, id: NodeId) -> &[(NodeId, f32)] {
        self.edges.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Mark a vertex as impassable: edges into it are reported as empty
    /// neighbour slots.
    pub fn set_blocked(&mut self, id: NodeId, blocked: bool) {
        if let Some(f) = self.flags.get_mut(id.index()) {
            *f = if blocked {
                *f | AStarFlags::NOT_PASSABLE
            } else {
                *f & !AStarFlags::NOT_PASSABLE
            };
        }
    }

    pub fn is_blocked(&self, id: NodeId) -> bool {
        self.flags(id).contains(AStarFlags::NOT_PASSABLE)
    }
}

impl Map for Graph {
    fn neighbour_count(&self, node: &Node) -> usize {
        self.edges(node.id).len()
    }

    fn neighbour(&self, node: &Node, index: usize) -> Option<NodeId> {
        let &(to, _) = self.edges(node.id).get(index)?;
        (!self.is_blocked(to)).then_some(to)
    }

    fn initialize_neighbour(&mut self, parent: Option<&Node>, child: &mut Node) {
        let cost = parent
            .and_then(|p| self.edge_cost(p.id, child.id))
            .unwrap_or(0.0);
        child.set_aux_f32(cost);
    }

    fn set_flags(&mut self, id: NodeId, flags: AStarFlags) {
        if let Some(f) = self.flags.get_mut(id.index()) {
            *f = flags;
        }
    }

    fn flags(&self, id: NodeId) -> AStarFlags {
        self.flags.get(id.index()).copied().unwrap_or(AStarFlags::NONE)
    }

    fn clear_flags(&mut self) {
        for f in self.flags.iter_mut() {
            *f = f.with_membership(AStarFlags::NONE);
        }
    }
}

/// Goal over a [`Graph`]: reach one destination vertex.
///
/// The heuristic is a per-vertex lookup table; vertices missing from the
/// table estimate 0, so an empty table turns the search into Dijkstra.
#[derive(Debug, Clone, Default)]
pub struct GraphGoal {
    destination: NodeId,
    heuristic: Vec<f32>,
}

impl GraphGoal {
    pub fn new(destination: NodeId) -> Self {
        Self {
            destination,
            heuristic: Vec::new(),
        }
    }

    /// Use `table[id]` as the heuristic of vertex `id` (builder).
    pub fn with_heuristic(mut self, table: Vec<f32>) -> Self {
        self.heuristic = table;
        self
    }

    pub fn destination(&self) -> NodeId {
        self.destination
    }
}

impl Goal for GraphGoal {
    fn set_destination_node(&mut self, id: NodeId) {
        self.destination = id;
    }

    fn heuristic(&self, node: &Node) -> f32 {
        self.heuristic.get(node.id.index()).copied().unwrap_or(0.0)
    }

    fn cost(&self, _from: &Node, to: &Node) -> f32 {
        to.aux_f32()
    }

    fn is_search_finished(&self, node: &Node) -> bool {
        node.id == self.destination
    }
}
