//! The A* search driver.

use crate::config::SearchConfig;
use crate::node::{Node, NodeHandle, NodeId};
use crate::traits::{Goal, Map, Storage};

/// Coarse state of a [`Pathfinder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// No search has run since the source was last set.
    #[default]
    Idle,
    Searching,
    /// The goal accepted a popped node.
    Succeeded,
    /// The open list ran dry, or the source could not be allocated.
    Failed,
}

impl Status {
    /// Whether a search has completed, successfully or not.
    pub fn is_finished(self) -> bool {
        matches!(self, Status::Succeeded | Status::Failed)
    }
}

/// Counters collected during the last [`Pathfinder::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Nodes popped and expanded (the terminal node is not counted).
    pub expanded: usize,
    /// Records allocated through [`Storage::create_node`].
    pub created: usize,
    /// Successful relaxations.
    pub relaxed: usize,
    /// Relaxations that moved a node from closed back to open.
    pub reopened: usize,
}

/// Best-first search over a [`Map`], scored by a [`Goal`], with node
/// records kept in a [`Storage`].
///
/// A pathfinder owns its three collaborators and one search state. Typical
/// use:
///
/// ```
/// use wayfind_core::{Graph, GraphGoal, HashStorage, NodeId, Pathfinder, Status};
///
/// let mut graph = Graph::new(3);
/// graph.add_undirected_edge(NodeId(0), NodeId(1), 1.0);
/// graph.add_undirected_edge(NodeId(1), NodeId(2), 1.0);
///
/// let mut pf = Pathfinder::new(HashStorage::new(), GraphGoal::new(NodeId(2)), graph);
/// pf.set_source_node(NodeId(0));
/// assert_eq!(pf.run(), Status::Succeeded);
/// assert_eq!(pf.current_node().map(|n| n.g), Some(2.0));
/// ```
///
/// After a run, follow [`Node::parent`] from [`current_node`](Self::current_node)
/// through [`storage`](Self::storage) to recover the path.
pub struct Pathfinder<S, G, M> {
    storage: S,
    goal: G,
    map: M,
    config: SearchConfig,
    source: NodeId,
    destination: NodeId,
    current: Option<NodeHandle>,
    status: Status,
    stats: SearchStats,
}

impl<S: Storage, G: Goal, M: Map> Pathfinder<S, G, M> {
    pub fn new(storage: S, goal: G, map: M) -> Self {
        Self::with_config(storage, goal, map, SearchConfig::default())
    }

    pub fn with_config(storage: S, goal: G, map: M, config: SearchConfig) -> Self {
        Self {
            storage,
            goal,
            map,
            config,
            source: NodeId::INVALID,
            destination: NodeId::INVALID,
            current: None,
            status: Status::Idle,
            stats: SearchStats::default(),
        }
    }

    /// Set where the next search starts. Resets the storage, clears the
    /// map's cached flags and returns the pathfinder to [`Status::Idle`].
    pub fn set_source_node(&mut self, id: NodeId) {
        self.storage.reset();
        self.map.clear_flags();
        self.source = id;
        self.current = None;
        self.status = Status::Idle;
    }

    /// Set the destination, forwarding it to the goal.
    ///
    /// **This does not reset the storage.** Records and open/closed
    /// membership from a previous run survive, with costs and heuristics
    /// computed against the old destination, and the next [`run`](Self::run)
    /// continues from them. Call [`set_source_node`](Self::set_source_node)
    /// as well for a clean search.
    pub fn set_destination_node(&mut self, id: NodeId) {
        self.destination = id;
        self.goal.set_destination_node(id);
    }

    pub fn source_node(&self) -> NodeId {
        self.source
    }

    pub fn destination_node(&self) -> NodeId {
        self.destination
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    /// Handle of the most recently popped node. After a successful run this
    /// is the terminal node; after a failed run it is `None`.
    pub fn current_handle(&self) -> Option<NodeHandle> {
        self.current
    }

    pub fn current_node(&self) -> Option<&Node> {
        self.storage.node(self.current?)
    }

    /// Resolve any handle against the storage.
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.storage.node(handle)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn goal(&self) -> &G {
        &self.goal
    }

    pub fn goal_mut(&mut self) -> &mut G {
        &mut self.goal
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    /// Mutable access to the map. Topology must not change during a run,
    /// which `&mut self` on [`run`](Self::run) already guarantees.
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn into_parts(self) -> (S, G, M) {
        (self.storage, self.goal, self.map)
    }

    /// Run one complete search from the source. Returns the final status.
    pub fn run(&mut self) -> Status {
        self.status = Status::Searching;
        self.current = None;
        self.stats = SearchStats::default();
        log::debug!(
            "search {} -> {} started",
            self.source,
            self.destination
        );

        if self.open_source().is_none() {
            log::warn!("search aborted: no record for source {}", self.source);
            self.status = Status::Failed;
            return self.status;
        }

        let finished = loop {
            let Some(current) = self.storage.remove_best_open_node() else {
                self.current = None;
                break false;
            };
            self.storage.add_to_closed_list(current, &mut self.map);
            self.current = Some(current);

            let Some(&current_node) = self.storage.node(current) else {
                log::warn!("storage returned a dead handle {current:?}");
                self.current = None;
                break false;
            };
            if self.goal.is_search_finished(&current_node) {
                break true;
            }

            log::trace!("expand {} (g={}, f={})", current_node.id, current_node.g, current_node.f);
            self.stats.expanded += 1;
            self.expand(current, &current_node);
        };

        self.status = if finished {
            Status::Succeeded
        } else {
            Status::Failed
        };
        log::debug!(
            "search {} -> {} {:?}: {} expanded, {} created, {} reopened",
            self.source,
            self.destination,
            self.status,
            self.stats.expanded,
            self.stats.created,
            self.stats.reopened
        );
        self.status
    }

    /// Put the source record on the open list with zero cost.
    ///
    /// A record left over from a previous run (no reset in between) is
    /// reused rather than created a second time.
    fn open_source(&mut self) -> Option<NodeHandle> {
        let id = self.source;
        if !id.is_valid() {
            return None;
        }
        let handle = if let Some(h) = self.storage.find_in_open_list(id) {
            self.storage.remove_from_open_list(h);
            h
        } else if let Some(h) = self.storage.find_in_closed_list(id) {
            self.storage.remove_from_closed_list(h);
            h
        } else {
            let h = self.storage.create_node(id)?;
            self.stats.created += 1;
            h
        };

        let node = self.storage.node_mut(handle)?;
        self.map.initialize_neighbour(None, node);
        let h = checked("heuristic", self.goal.heuristic(node));
        node.parent = None;
        node.g = 0.0;
        node.h = h;
        node.f = h;

        self.storage.add_to_open_list(handle, &mut self.map);
        Some(handle)
    }

    fn expand(&mut self, current: NodeHandle, current_node: &Node) {
        let count = self.map.neighbour_count(current_node);
        for index in 0..count {
            let Some(id) = self.map.neighbour(current_node, index) else {
                continue;
            };
            if !id.is_valid() {
                continue;
            }

            let (handle, in_closed, fresh) = if let Some(h) = self.storage.find_in_open_list(id) {
                (h, false, false)
            } else if let Some(h) = self.storage.find_in_closed_list(id) {
                (h, true, false)
            } else {
                if !self.goal.is_node_valid(id) {
                    continue;
                }
                let Some(h) = self.storage.create_node(id) else {
                    log::warn!("no record for neighbour {id}, skipping");
                    continue;
                };
                self.stats.created += 1;
                (h, false, true)
            };

            // A record that is in neither list would be created again the
            // next time its id is discovered.
            if !self.relax(current, current_node, handle, in_closed) && fresh {
                self.storage.destroy_node(handle);
            }
        }
    }

    /// Returns whether `handle` was updated and put on the open list.
    fn relax(
        &mut self,
        current: NodeHandle,
        current_node: &Node,
        handle: NodeHandle,
        in_closed: bool,
    ) -> bool {
        let Some(neighbour) = self.storage.node_mut(handle) else {
            return false;
        };
        self.map.initialize_neighbour(Some(current_node), neighbour);
        if neighbour.parent == Some(current) {
            return false;
        }

        let g = current_node.g + checked("cost", self.goal.cost(current_node, neighbour));
        let h = checked("heuristic", self.goal.heuristic(neighbour));
        let f = g + h;
        if !self.config.improves(f, neighbour.f) {
            return false;
        }

        log::trace!(
            "relax {} via {}: f {} -> {}",
            neighbour.id,
            current_node.id,
            neighbour.f,
            f
        );
        neighbour.g = g;
        neighbour.h = h;
        neighbour.f = f;
        neighbour.parent = Some(current);
        self.stats.relaxed += 1;

        if in_closed {
            self.storage.remove_from_closed_list(handle);
            self.stats.reopened += 1;
        }
        self.storage.add_to_open_list(handle, &mut self.map);
        true
    }
}

/// Goals must return non-negative, non-NaN values.
#[inline]
fn checked(what: &str, value: f32) -> f32 {
    debug_assert!(value >= 0.0, "goal returned invalid {what}: {value}");
    if !(value >= 0.0) {
        log::warn!("goal returned invalid {what}: {value}");
    }
    value
}


#[cfg(test)]
mod optimality_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::graph::{Graph, GraphGoal};
    use crate::hash_storage::HashStorage;
    use crate::list_storage::ListStorage;

    type Edge = (usize, usize, u8);

    /// Plain O(n^2) Dijkstra, forwards or over reversed edges.
    fn distances(n: usize, edges: &[Edge], from: usize, reverse: bool) -> Vec<Option<f32>> {
        let mut dist: Vec<Option<f32>> = vec![None; n];
        let mut done = vec![false; n];
        dist[from] = Some(0.0);
        loop {
            let next = (0..n)
                .filter(|&i| !done[i])
                .filter_map(|i| dist[i].map(|d| (i, d)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let Some((u, du)) = next else {
                break;
            };
            done[u] = true;
            for &(a, b, c) in edges {
                let (src, dst) = if reverse { (b, a) } else { (a, b) };
                if src != u {
                    continue;
                }
                let nd = du + f32::from(c);
                if dist[dst].is_none_or(|d| nd < d) {
                    dist[dst] = Some(nd);
                }
            }
        }
        dist
    }

    fn build(n: usize, edges: &[Edge]) -> Graph {
        let mut g = Graph::new(n);
        for &(a, b, c) in edges {
            g.add_edge(NodeId::from_index(a), NodeId::from_index(b), f32::from(c));
        }
        g
    }

    fn check<T: Storage>(
        storage: T,
        n: usize,
        edges: &[Edge],
        from: usize,
        to: usize,
        weight: f32,
    ) -> Result<(), TestCaseError> {
        let expected = distances(n, edges, from, false)[to];
        let heuristic = distances(n, edges, to, true)
            .into_iter()
            .map(|d| d.unwrap_or(0.0) * weight)
            .collect();

        let graph = build(n, edges);
        let goal = GraphGoal::new(NodeId::from_index(to)).with_heuristic(heuristic);
        let mut pf = Pathfinder::new(storage, goal, graph);
        pf.set_source_node(NodeId::from_index(from));
        let status = pf.run();

        match expected {
            None => prop_assert_eq!(status, Status::Failed),
            Some(best) => {
                prop_assert_eq!(status, Status::Succeeded);
                let end = pf.current_node().unwrap();
                prop_assert_eq!(end.id, NodeId::from_index(to));
                prop_assert_eq!(end.g, best);

                // Walk the parent chain and re-price it from the graph.
                let mut total = 0.0;
                let mut node = *end;
                while let Some(parent) = node.parent {
                    let p = *pf.node(parent).unwrap();
                    total += pf.map().edge_cost(p.id, node.id).unwrap();
                    node = p;
                }
                prop_assert_eq!(node.id, NodeId::from_index(from));
                prop_assert_eq!(total, best);
            }
        }
        Ok(())
    }

    fn graph_case() -> impl Strategy<Value = (usize, Vec<Edge>, usize, usize, f32)> {
        (2_usize..12).prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n, 0..n, 0_u8..10), 0..40),
                0..n,
                0..n,
                0.0_f32..=1.0,
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(512))]
        #[test]
        fn matches_dijkstra_with_hash_storage((n, edges, from, to, weight) in graph_case()) {
            check(HashStorage::new(), n, &edges, from, to, weight)?;
        }

        #[test]
        fn matches_dijkstra_with_list_storage((n, edges, from, to, weight) in graph_case()) {
            check(ListStorage::new(), n, &edges, from, to, weight)?;
        }
    }
}
