use crate::flags::AStarFlags;
use crate::node::{Node, NodeHandle, NodeId};

/// Search-space topology.
///
/// Neighbours are enumerated by index so that the driver never needs a
/// scratch buffer. The count and the neighbour at each index must stay the
/// same for the duration of one search.
pub trait Map {
    /// Number of neighbour slots of `node`.
    fn neighbour_count(&self, node: &Node) -> usize;

    /// The neighbour in slot `index`, or `None` if the slot is empty
    /// (blocked, out of range, ...). [`NodeId::INVALID`] is treated the
    /// same as `None`.
    fn neighbour(&self, node: &Node, index: usize) -> Option<NodeId>;

    /// Called each time `child` is associated with a parent during
    /// relaxation, before its cost is evaluated. Called once with
    /// `parent == None` for the source.
    ///
    /// Maps use this to attach derived data to [`Node::aux`].
    fn initialize_neighbour(&mut self, _parent: Option<&Node>, _child: &mut Node) {}

    /// Cache membership flags for `id`. No-op by default.
    fn set_flags(&mut self, _id: NodeId, _flags: AStarFlags) {}

    /// Cached membership flags for `id`.
    fn flags(&self, _id: NodeId) -> AStarFlags {
        AStarFlags::NONE
    }

    /// Drop cached open/closed flags. Called whenever the storage is reset.
    fn clear_flags(&mut self) {}
}

/// Problem-specific cost model and termination test.
pub trait Goal {
    fn set_destination_node(&mut self, id: NodeId);

    /// Estimate of the remaining cost from `node`. Must be >= 0, and must
    /// never overestimate for the result to be optimal.
    fn heuristic(&self, node: &Node) -> f32;

    /// Cost of the edge `from -> to`. Must be >= 0. Only called for pairs
    /// the map reported as adjacent, right after
    /// [`Map::initialize_neighbour`] ran on `to`.
    fn cost(&self, from: &Node, to: &Node) -> f32;

    /// Evaluated on every node popped from the open list, the source
    /// included. `true` stops the search with `node` as the result.
    fn is_search_finished(&self, node: &Node) -> bool;

    /// Gatekeeper for ids the search has not tracked yet.
    fn is_node_valid(&self, _id: NodeId) -> bool {
        true
    }
}

/// Owner of node records and of the open/closed lists.
pub trait Storage {
    /// Release every record and empty both lists. Handles issued before
    /// the reset stop resolving.
    fn reset(&mut self);

    /// Allocate a record for an id not seen since the last reset. `None`
    /// means the storage is exhausted.
    fn create_node(&mut self, id: NodeId) -> Option<NodeHandle>;

    /// Release a single record, removing it from whichever list holds it.
    fn destroy_node(&mut self, node: NodeHandle);

    fn node(&self, node: NodeHandle) -> Option<&Node>;

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node>;

    /// Insert `node` into the open list keyed on its current `f`. A node
    /// already open is re-keyed. Equal keys pop in insertion order.
    fn add_to_open_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M);

    fn add_to_closed_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M);

    fn remove_from_open_list(&mut self, node: NodeHandle);

    fn remove_from_closed_list(&mut self, node: NodeHandle);

    fn find_in_open_list(&self, id: NodeId) -> Option<NodeHandle>;

    fn find_in_closed_list(&self, id: NodeId) -> Option<NodeHandle>;

    /// Pop the open node with the lowest `f`.
    fn remove_best_open_node(&mut self) -> Option<NodeHandle>;

    fn open_len(&self) -> usize;

    fn closed_len(&self) -> usize;
}

// ---------------------------------------------------------------------------
// Borrowed collaborators
// ---------------------------------------------------------------------------

impl<T: Map + ?Sized> Map for &mut T {
    fn neighbour_count(&self, node: &Node) -> usize {
        (**self).neighbour_count(node)
    }

    fn neighbour(&self, node: &Node, index: usize) -> Option<NodeId> {
        (**self).neighbour(node, index)
    }

    fn initialize_neighbour(&mut self, parent: Option<&Node>, child: &mut Node) {
        (**self).initialize_neighbour(parent, child);
    }

    fn set_flags(&mut self, id: NodeId, flags: AStarFlags) {
        (**self).set_flags(id, flags);
    }

    fn flags(&self, id: NodeId) -> AStarFlags {
        (**self).flags(id)
    }

    fn clear_flags(&mut self) {
        (**self).clear_flags();
    }
}

impl<T: Goal + ?Sized> Goal for &mut T {
    fn set_destination_node(&mut self, id: NodeId) {
        (**self).set_destination_node(id);
    }

    fn heuristic(&self, node: &Node) -> f32 {
        (**self).heuristic(node)
    }

    fn cost(&self, from: &Node, to: &Node) -> f32 {
        (**self).cost(from, to)
    }

    fn is_search_finished(&self, node: &Node) -> bool {
        (**self).is_search_finished(node)
    }

    fn is_node_valid(&self, id: NodeId) -> bool {
        (**self).is_node_valid(id)
    }
}

impl<T: Storage> Storage for &mut T {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn create_node(&mut self, id: NodeId) -> Option<NodeHandle> {
        (**self).create_node(id)
    }

    fn destroy_node(&mut self, node: NodeHandle) {
        (**self).destroy_node(node);
    }

    fn node(&self, node: NodeHandle) -> Option<&Node> {
        (**self).node(node)
    }

    fn node_mut(&mut self, node: NodeHandle) -> Option<&mut Node> {
        (**self).node_mut(node)
    }

    fn add_to_open_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        (**self).add_to_open_list(node, map);
    }

    fn add_to_closed_list<M: Map + ?Sized>(&mut self, node: NodeHandle, map: &mut M) {
        (**self).add_to_closed_list(node, map);
    }

    fn remove_from_open_list(&mut self, node: NodeHandle) {
        (**self).remove_from_open_list(node);
    }

    fn remove_from_closed_list(&mut self, node: NodeHandle) {
        (**self).remove_from_closed_list(node);
    }

    fn find_in_open_list(&self, id: NodeId) -> Option<NodeHandle> {
        (**self).find_in_open_list(id)
    }

    fn find_in_closed_list(&self, id: NodeId) -> Option<NodeHandle> {
        (**self).find_in_closed_list(id)
    }

    fn remove_best_open_node(&mut self) -> Option<NodeHandle> {
        (**self).remove_best_open_node()
    }

    fn open_len(&self) -> usize {
        (**self).open_len()
    }

    fn closed_len(&self) -> usize {
        (**self).closed_len()
    }
}
