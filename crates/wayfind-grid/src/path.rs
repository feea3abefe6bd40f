//! Path reconstruction and one-call grid searches.

use wayfind_core::{NodeHandle, NodeId, Pathfinder, SearchConfig, SearchStats, Status, Storage};

use crate::geom::{Point, Range};
use crate::goal::GridGoal;
use crate::map::GridMap;
use crate::settings::GridSettings;
use crate::storage::DenseStorage;

/// Walk parent handles from `end` back to the root and return the ids in
/// source-to-`end` order.
///
/// The walk is capped at the number of tracked records, so a corrupted
/// parent chain yields an empty path instead of looping.
pub fn trace_path<S: Storage + ?Sized>(storage: &S, end: NodeHandle) -> Vec<NodeId> {
    let limit = storage.open_len() + storage.closed_len() + 1;
    let mut path = Vec::new();
    let mut next = Some(end);
    while let Some(handle) = next {
        if path.len() >= limit {
            log::warn!("parent chain from {end:?} exceeds {limit} records");
            return Vec::new();
        }
        let Some(node) = storage.node(handle) else {
            break;
        };
        path.push(node.id);
        next = node.parent;
    }
    path.reverse();
    path
}

/// A path found on a grid.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPath {
    /// Visited cells, source and destination included.
    pub points: Vec<Point>,
    /// Total cost.
    pub cost: f32,
}

impl GridPath {
    /// Number of steps (one less than the number of points).
    pub fn steps(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Reusable grid search.
///
/// Keeps a [`DenseStorage`] sized to the last map searched, so repeated
/// queries on the same map allocate nothing.
#[derive(Debug, Default)]
pub struct GridSearch {
    storage: DenseStorage,
    config: SearchConfig,
    bounds: Option<Range>,
    status: Status,
    stats: SearchStats,
}

impl GridSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Only create records for cells inside `bounds`.
    pub fn with_bounds(mut self, bounds: Range) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Status of the last search.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Counters of the last search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Cheapest path from `from` to `to`, or `None` if either point is off
    /// the map or no path exists.
    pub fn find_path(&mut self, map: &mut GridMap, from: Point, to: Point) -> Option<GridPath> {
        self.status = Status::Idle;
        self.stats = SearchStats::default();
        let source = map.id(from)?;
        let destination = map.id(to)?;

        let len = map.range().len();
        if self.storage.capacity() != len {
            self.storage.resize(len);
        }

        let mut goal = GridGoal::new(map, to);
        if let Some(bounds) = self.bounds {
            goal = goal.with_bounds(bounds);
        }

        let mut pf = Pathfinder::with_config(&mut self.storage, goal, &mut *map, self.config);
        pf.set_source_node(source);
        pf.set_destination_node(destination);
        self.status = pf.run();
        self.stats = pf.stats();
        if self.status != Status::Succeeded {
            return None;
        }

        let end = pf.current_handle()?;
        let cost = pf.current_node()?.g;
        let ids = trace_path(pf.storage(), end);
        let points = ids.into_iter().filter_map(|id| map.point(id)).collect();
        Some(GridPath { points, cost })
    }
}

/// One-off search: apply `settings` to `map` and find a path.
///
/// The settings stay on the map afterwards.
pub fn find_path(
    map: &mut GridMap,
    from: Point,
    to: Point,
    settings: GridSettings,
) -> Option<GridPath> {
    map.set_settings(settings);
    GridSearch::new().find_path(map, from, to)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::SQRT_2;

    use wayfind_core::{Graph, GraphGoal, HashStorage};

    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn solve(ascii: &str, settings: GridSettings) -> Option<GridPath> {
        let mut grid = GridMap::parse(ascii).unwrap();
        let (from, to) = (grid.start.unwrap(), grid.goal.unwrap());
        find_path(&mut grid.map, from, to, settings)
    }

    #[test]
    fn trace_path_on_graph() {
        let mut g = Graph::new(5);
        g.add_undirected_edge(NodeId(0), NodeId(1), 1.0);
        g.add_undirected_edge(NodeId(0), NodeId(2), 4.0);
        g.add_undirected_edge(NodeId(1), NodeId(2), 1.0);
        g.add_undirected_edge(NodeId(1), NodeId(3), 5.0);
        g.add_undirected_edge(NodeId(2), NodeId(4), 1.0);
        g.add_undirected_edge(NodeId(3), NodeId(4), 1.0);

        let mut pf = Pathfinder::new(HashStorage::new(), GraphGoal::new(NodeId(4)), g);
        pf.set_source_node(NodeId(0));
        assert_eq!(pf.run(), Status::Succeeded);
        let path = trace_path(pf.storage(), pf.current_handle().unwrap());
        assert_eq!(path, vec![NodeId(0), NodeId(1), NodeId(2), NodeId(4)]);
    }

    #[test]
    fn trace_path_from_root() {
        let mut s = HashStorage::new();
        let h = s.create_node(NodeId(7)).unwrap();
        assert_eq!(trace_path(&s, h), vec![NodeId(7)]);
    }

    #[test]
    fn corridor() {
        let path = solve("S...G", GridSettings::four_way()).unwrap();
        assert_eq!(path.cost, 4.0);
        assert_eq!(path.steps(), 4);
        assert_eq!(path.start(), Some(Point::new(0, 0)));
        assert_eq!(path.end(), Some(Point::new(4, 0)));
    }

    #[test]
    fn detour_around_wall() {
        let path = solve("S#G\n.#.\n...", GridSettings::four_way()).unwrap();
        assert_eq!(path.cost, 6.0);
        assert_eq!(
            path.points,
            pts(&[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2), (2, 1), (2, 0)])
        );
    }

    #[test]
    fn weighted_cells_are_avoided() {
        let path = solve("S9G\n...", GridSettings::four_way()).unwrap();
        assert_eq!(path.cost, 4.0);
        assert_eq!(path.points, pts(&[(0, 0), (0, 1), (1, 1), (2, 1), (2, 0)]));

        let path = solve("S2G\n...", GridSettings::four_way()).unwrap();
        assert_eq!(path.cost, 3.0);
        assert_eq!(path.points, pts(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn diagonal_walk() {
        let path = solve("S..\n...\n..G", GridSettings::default()).unwrap();
        assert!((path.cost - 2.0 * SQRT_2).abs() < 1e-5);
        assert_eq!(path.points, pts(&[(0, 0), (1, 1), (2, 2)]));
    }

    #[test]
    fn corner_cutting_rule() {
        assert_eq!(solve("S#\n#G", GridSettings::default()), None);
        let path = solve("S#\n#G", GridSettings::default().with_cut_corners(true)).unwrap();
        assert!((path.cost - SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn unreachable_and_off_map() {
        let mut map: GridMap = "..#..".parse().unwrap();
        let mut search = GridSearch::new();
        assert_eq!(search.find_path(&mut map, Point::new(0, 0), Point::new(4, 0)), None);
        assert_eq!(search.status(), Status::Failed);
        assert_eq!(search.stats().expanded, 2);

        assert_eq!(search.find_path(&mut map, Point::new(0, 0), Point::new(9, 0)), None);
        assert_eq!(search.status(), Status::Idle);
    }

    #[test]
    fn bounds_limit_the_search() {
        let mut map: GridMap = "S#G\n.#.\n...".parse().unwrap();
        map.set_settings(GridSettings::four_way());
        let (from, to) = (Point::new(0, 0), Point::new(2, 0));

        let mut bounded = GridSearch::new().with_bounds(Range::new(0, 0, 3, 2));
        assert_eq!(bounded.find_path(&mut map, from, to), None);
        assert!(GridSearch::new().find_path(&mut map, from, to).is_some());
    }

    #[test]
    fn search_is_reusable_across_maps() {
        let mut search = GridSearch::new();
        let mut small = GridMap::new(3, 1);
        let mut large = GridMap::new(6, 6);

        let a = search.find_path(&mut small, Point::new(0, 0), Point::new(2, 0)).unwrap();
        let b = search.find_path(&mut large, Point::new(0, 5), Point::new(5, 5)).unwrap();
        let c = search.find_path(&mut small, Point::new(2, 0), Point::new(0, 0)).unwrap();
        assert_eq!(a.cost, 2.0);
        assert_eq!(b.cost, 5.0);
        assert_eq!(c.points, pts(&[(2, 0), (1, 0), (0, 0)]));
    }

    #[test]
    fn same_cell() {
        let mut map = GridMap::new(2, 2);
        let p = Point::new(1, 1);
        let path = GridSearch::new().find_path(&mut map, p, p).unwrap();
        assert_eq!(path.points, pts(&[(1, 1)]));
        assert_eq!(path.cost, 0.0);
        assert_eq!(path.steps(), 0);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let path = GridPath {
            points: vec![Point::new(0, 0), Point::new(1, 1)],
            cost: 1.5,
        };
        let json = serde_json::to_string(&path).unwrap();
        let back: GridPath = serde_json::from_str(&json).unwrap();
        assert_eq!(path, back);
    }
}
