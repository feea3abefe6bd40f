use wayfind_core::{Goal, Node, NodeId};

use crate::geom::{Point, Range};
use crate::map::{CellIndex, GridMap};
use crate::settings::Heuristic;

/// [`Goal`] for a single destination cell on a [`GridMap`].
///
/// Edge cost is the entry cost the map stored in [`Node::aux`], scaled by
/// the diagonal multiplier for diagonal steps. An optional bounds range
/// keeps the search from creating records outside it.
#[derive(Debug, Clone)]
pub struct GridGoal {
    index: CellIndex,
    destination: NodeId,
    target: Option<Point>,
    heuristic: Heuristic,
    diagonal_cost: f32,
    bounds: Option<Range>,
}

impl GridGoal {
    /// Goal reaching `target` on `map`, using the map's heuristic and
    /// diagonal multiplier.
    pub fn new(map: &GridMap, target: Point) -> Self {
        let index = map.index();
        let settings = map.settings();
        let destination = index.id(target).unwrap_or(NodeId::INVALID);
        Self {
            index,
            destination,
            target: index.point(destination),
            heuristic: settings.heuristic,
            diagonal_cost: settings.diagonal_cost,
            bounds: None,
        }
    }

    /// Restrict the search to cells inside `bounds`.
    pub fn with_bounds(mut self, bounds: Range) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn bounds(&self) -> Option<Range> {
        self.bounds
    }
}

impl Goal for GridGoal {
    fn set_destination_node(&mut self, id: NodeId) {
        self.destination = id;
        self.target = self.index.point(id);
    }

    fn heuristic(&self, node: &Node) -> f32 {
        match (self.index.point(node.id), self.target) {
            (Some(from), Some(to)) => self.heuristic.estimate(from, to, self.diagonal_cost),
            _ => 0.0,
        }
    }

    fn cost(&self, from: &Node, to: &Node) -> f32 {
        let diagonal = self
            .index
            .point(from.id)
            .zip(self.index.point(to.id))
            .is_some_and(|(a, b)| (b - a).is_diagonal());
        if diagonal {
            to.aux_f32() * self.diagonal_cost
        } else {
            to.aux_f32()
        }
    }

    fn is_search_finished(&self, node: &Node) -> bool {
        node.id == self.destination
    }

    fn is_node_valid(&self, id: NodeId) -> bool {
        match self.bounds {
            Some(bounds) => self.index.point(id).is_some_and(|p| bounds.contains(p)),
            None => true,
        }
    }
}
