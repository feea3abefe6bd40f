//! Weighted grid maps.

use std::str::FromStr;

use wayfind_core::{AStarFlags, Map, Node, NodeId};

use crate::error::ParseGridError;
use crate::geom::{Point, Range};
use crate::settings::{Connectivity, GridSettings};

/// Cardinal steps first, so straight moves win ties.
const DIRS: [Point; 8] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
    Point::new(1, -1),
    Point::new(1, 1),
    Point::new(-1, 1),
    Point::new(-1, -1),
];

/// Conversion between grid points and flat [`NodeId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellIndex {
    range: Range,
    width: usize,
}

impl CellIndex {
    pub fn new(range: Range) -> Self {
        Self {
            range,
            width: range.width().max(0) as usize,
        }
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    /// Id of `p`, or `None` if out of range.
    #[inline]
    pub fn id(&self, p: Point) -> Option<NodeId> {
        if !self.range.contains(p) {
            return None;
        }
        let x = (p.x - self.range.min.x) as usize;
        let y = (p.y - self.range.min.y) as usize;
        Some(NodeId::from_index(y * self.width + x))
    }

    /// Point of `id`, or `None` if the id lies outside the range.
    #[inline]
    pub fn point(&self, id: NodeId) -> Option<Point> {
        if !id.is_valid() || id.index() >= self.range.len() {
            return None;
        }
        let i = id.index();
        let x = (i % self.width) as i32 + self.range.min.x;
        let y = (i / self.width) as i32 + self.range.min.y;
        Some(Point::new(x, y))
    }
}

/// A rectangular grid of cells, each either blocked or passable with an
/// entry cost from 1 to 255.
///
/// Blocked cells are cached as [`AStarFlags::NOT_PASSABLE`] in the same
/// per-cell flag array the storages use for open/closed membership, so the
/// neighbour test is a single lookup.
#[derive(Debug, Clone)]
pub struct GridMap {
    index: CellIndex,
    costs: Vec<u8>,
    flags: Vec<AStarFlags>,
    settings: GridSettings,
}

/// A parsed ASCII grid with its optional `S`/`G` markers.
#[derive(Debug, Clone)]
pub struct AsciiGrid {
    pub map: GridMap,
    pub start: Option<Point>,
    pub goal: Option<Point>,
}

impl GridMap {
    /// Open grid of `width` x `height` cells, every cell costing 1.
    pub fn new(width: i32, height: i32) -> Self {
        let index = CellIndex::new(Range::new(0, 0, width.max(0), height.max(0)));
        let len = index.range().len();
        Self {
            index,
            costs: vec![1; len],
            flags: vec![AStarFlags::NONE; len],
            settings: GridSettings::default(),
        }
    }

    /// Replace the movement rules (builder).
    pub fn with_settings(mut self, settings: GridSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GridSettings) {
        self.settings = settings;
    }

    #[inline]
    pub fn index(&self) -> CellIndex {
        self.index
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.index.range()
    }

    pub fn width(&self) -> i32 {
        self.range().width()
    }

    pub fn height(&self) -> i32 {
        self.range().height()
    }

    #[inline]
    pub fn id(&self, p: Point) -> Option<NodeId> {
        self.index.id(p)
    }

    #[inline]
    pub fn point(&self, id: NodeId) -> Option<Point> {
        self.index.point(id)
    }

    /// Entry cost of `p`. `None` for blocked or out-of-range cells.
    pub fn cost(&self, p: Point) -> Option<u8> {
        let cost = self.costs[self.id(p)?.index()];
        (cost > 0).then_some(cost)
    }

    /// Set the entry cost of `p`; 0 blocks the cell.
    pub fn set_cost(&mut self, p: Point, cost: u8) {
        let Some(id) = self.id(p) else {
            return;
        };
        let i = id.index();
        self.costs[i] = cost;
        self.flags[i] = if cost == 0 {
            self.flags[i] | AStarFlags::NOT_PASSABLE
        } else {
            self.flags[i] & !AStarFlags::NOT_PASSABLE
        };
    }

    pub fn set_wall(&mut self, p: Point) {
        self.set_cost(p, 0);
    }

    #[inline]
    pub fn is_passable(&self, p: Point) -> bool {
        self.id(p)
            .is_some_and(|id| !self.flags[id.index()].contains(AStarFlags::NOT_PASSABLE))
    }

    /// Cost of stepping from `from` into the adjacent cell `to`.
    pub fn step_cost(&self, from: Point, to: Point) -> Option<f32> {
        let entry = f32::from(self.cost(to)?);
        Some(if (to - from).is_diagonal() {
            entry * self.settings.diagonal_cost
        } else {
            entry
        })
    }

    fn directions(&self) -> &'static [Point] {
        match self.settings.connectivity {
            Connectivity::Four => &DIRS[..4],
            Connectivity::Eight => &DIRS,
        }
    }

    /// Parse an ASCII map: `#` wall, `.` floor, `1`-`9` weighted floor,
    /// `S` start and `G` goal (both floor). Blank lines are skipped.
    pub fn parse(s: &str) -> Result<AsciiGrid, ParseGridError> {
        let rows: Vec<&str> = s
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = rows.first() else {
            return Err(ParseGridError::Empty);
        };
        let width = first.chars().count();
        let height = rows.len();
        let cells = width.saturating_mul(height);
        if cells >= u32::MAX as usize || width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(ParseGridError::TooLarge(cells));
        }

        let mut map = GridMap::new(width as i32, height as i32);
        let mut start = None;
        let mut goal = None;

        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(ParseGridError::Ragged {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, tile) in row.chars().enumerate() {
                let p = Point::new(x as i32, y as i32);
                let cost = match tile {
                    '#' => 0,
                    '.' => 1,
                    '1'..='9' => tile as u8 - b'0',
                    'S' | 'G' => {
                        let slot = if tile == 'S' { &mut start } else { &mut goal };
                        if slot.replace(p).is_some() {
                            return Err(ParseGridError::DuplicateMarker(tile));
                        }
                        1
                    }
                    _ => return Err(ParseGridError::UnknownTile { tile, x, y }),
                };
                map.set_cost(p, cost);
            }
        }

        log::debug!("parsed {width}x{height} grid");
        Ok(AsciiGrid { map, start, goal })
    }

    /// Draw the grid as ASCII, marking `path` cells with `*`.
    pub fn render(&self, path: &[Point]) -> String {
        let mut out = String::with_capacity(self.costs.len() + self.height().max(0) as usize);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Point::new(x, y);
                let ch = if path.contains(&p) {
                    '*'
                } else {
                    match self.cost(p) {
                        None => '#',
                        Some(1) => '.',
                        Some(c @ 2..=9) => char::from(b'0' + c),
                        Some(_) => '+',
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for GridMap {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).map(|g| g.map)
    }
}

impl Map for GridMap {
    fn neighbour_count(&self, _node: &Node) -> usize {
        self.directions().len()
    }

    fn neighbour(&self, node: &Node, index: usize) -> Option<NodeId> {
        let p = self.point(node.id)?;
        let dir = *self.directions().get(index)?;
        let n = p + dir;
        if !self.is_passable(n) {
            return None;
        }
        if dir.is_diagonal()
            && !self.settings.cut_corners
            && (!self.is_passable(p.shift(dir.x, 0)) || !self.is_passable(p.shift(0, dir.y)))
        {
            return None;
        }
        self.id(n)
    }

    /// Attach the entry cost of `child` to `child.aux`. The goal applies
    /// the diagonal multiplier.
    fn initialize_neighbour(&mut self, _parent: Option<&Node>, child: &mut Node) {
        let entry = self.costs.get(child.id.index()).copied().unwrap_or(0);
        child.set_aux_f32(f32::from(entry));
    }

    fn set_flags(&mut self, id: NodeId, flags: AStarFlags) {
        if let Some(f) = self.flags.get_mut(id.index()) {
            *f = flags;
        }
    }

    fn flags(&self, id: NodeId) -> AStarFlags {
        self.flags.get(id.index()).copied().unwrap_or(AStarFlags::NOT_PASSABLE)
    }

    fn clear_flags(&mut self) {
        for f in self.flags.iter_mut() {
            *f = f.with_membership(AStarFlags::NONE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbours(map: &GridMap, p: Point) -> Vec<Point> {
        let node = Node::new(map.id(p).unwrap());
        (0..map.neighbour_count(&node))
            .filter_map(|i| map.neighbour(&node, i))
            .filter_map(|id| map.point(id))
            .collect()
    }

    #[test]
    fn index_round_trip() {
        let index = CellIndex::new(Range::new(2, 3, 6, 5));
        let p = Point::new(5, 4);
        let id = index.id(p).unwrap();
        assert_eq!(id, NodeId(7));
        assert_eq!(index.point(id), Some(p));
        assert_eq!(index.id(Point::new(6, 4)), None);
        assert_eq!(index.point(NodeId(8)), None);
        assert_eq!(index.point(NodeId::INVALID), None);
    }

    #[test]
    fn parse_tiles_and_markers() {
        let g = GridMap::parse("S.#\n.5G\n").unwrap();
        assert_eq!((g.map.width(), g.map.height()), (3, 2));
        assert_eq!(g.start, Some(Point::new(0, 0)));
        assert_eq!(g.goal, Some(Point::new(2, 1)));
        assert_eq!(g.map.cost(Point::new(2, 0)), None);
        assert_eq!(g.map.cost(Point::new(1, 1)), Some(5));
        let wall = g.map.id(Point::new(2, 0)).unwrap();
        assert!(g.map.flags(wall).contains(AStarFlags::NOT_PASSABLE));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(GridMap::parse("\n\n").unwrap_err(), ParseGridError::Empty);
        assert_eq!(
            GridMap::parse("...\n..\n").unwrap_err(),
            ParseGridError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            GridMap::parse("..x\n").unwrap_err(),
            ParseGridError::UnknownTile { tile: 'x', x: 2, y: 0 }
        );
        assert_eq!(
            GridMap::parse("S.S\n").unwrap_err(),
            ParseGridError::DuplicateMarker('S')
        );
        assert_eq!(
            "..?".parse::<GridMap>().unwrap_err().to_string(),
            "unknown tile '?' at (2, 0)"
        );
    }

    #[test]
    fn four_way_neighbours() {
        let map: GridMap = "...\n...\n...".parse().unwrap();
        let map = map.with_settings(GridSettings::four_way());
        let n = neighbours(&map, Point::new(1, 1));
        assert_eq!(
            n,
            vec![Point::new(1, 0), Point::new(2, 1), Point::new(1, 2), Point::new(0, 1)]
        );
        assert_eq!(neighbours(&map, Point::new(0, 0)).len(), 2);
    }

    #[test]
    fn corner_cutting() {
        let map: GridMap = ".#\n..".parse().unwrap();
        let n = neighbours(&map, Point::new(0, 1));
        assert!(!n.contains(&Point::new(1, 0)));
        assert_eq!(n.len(), 2);
        assert_eq!(neighbours(&map, Point::new(0, 0)), vec![Point::new(0, 1)]);

        let map = map.with_settings(GridSettings::default().with_cut_corners(true));
        let n = neighbours(&map, Point::new(0, 0));
        assert_eq!(n, vec![Point::new(0, 1), Point::new(1, 1)]);
    }

    #[test]
    fn entry_cost_attached_to_aux() {
        let mut map: GridMap = ".3\n..".parse().unwrap();
        let parent = Node::new(map.id(Point::new(0, 1)).unwrap());
        let mut child = Node::new(map.id(Point::new(1, 0)).unwrap());
        map.initialize_neighbour(Some(&parent), &mut child);
        assert_eq!(child.aux_f32(), 3.0);

        let step = map.step_cost(Point::new(0, 1), Point::new(1, 0)).unwrap();
        assert!((step - 3.0 * std::f32::consts::SQRT_2).abs() < 1e-6);
        assert_eq!(map.step_cost(Point::new(0, 0), Point::new(1, 0)), Some(3.0));
    }

    #[test]
    fn walls_and_flags() {
        let mut map = GridMap::new(2, 2);
        let p = Point::new(1, 1);
        map.set_wall(p);
        assert!(!map.is_passable(p));
        let id = map.id(p).unwrap();
        map.set_flags(id, map.flags(id).with_membership(AStarFlags::CLOSED));
        map.clear_flags();
        assert_eq!(map.flags(id), AStarFlags::NOT_PASSABLE);

        map.set_cost(p, 2);
        assert!(map.is_passable(p));
        assert_eq!(map.cost(p), Some(2));
        assert!(!map.is_passable(Point::new(2, 0)));
    }

    #[test]
    fn render_marks_path() {
        let map: GridMap = "..#\n.2.".parse().unwrap();
        let out = map.render(&[Point::new(0, 0), Point::new(0, 1)]);
        assert_eq!(out, "*.#\n*2.\n");
    }
}
