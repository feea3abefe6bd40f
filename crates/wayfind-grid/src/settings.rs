use crate::distance::{chebyshev, manhattan, octile};
use crate::geom::Point;

/// Which steps a grid allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Connectivity {
    /// Cardinal steps only.
    Four,
    /// Cardinal and diagonal steps.
    #[default]
    Eight,
}

/// Remaining-cost estimate used by [`GridGoal`](crate::GridGoal).
///
/// Every passable cell costs at least 1 to enter, so each estimate is
/// admissible for the connectivity noted below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// Always 0: plain Dijkstra.
    Zero,
    /// L1 distance. Admissible on 4-way grids only.
    Manhattan,
    /// L∞ distance. Admissible on both, loose on 8-way grids.
    Chebyshev,
    /// Octile distance. Exact on open 8-way grids.
    #[default]
    Octile,
}

impl Heuristic {
    pub fn estimate(self, from: Point, to: Point, diagonal_cost: f32) -> f32 {
        match self {
            Heuristic::Zero => 0.0,
            Heuristic::Manhattan => manhattan(from, to) as f32,
            Heuristic::Chebyshev => chebyshev(from, to) as f32,
            Heuristic::Octile => octile(from, to, diagonal_cost),
        }
    }
}

/// Movement rules shared by a [`GridMap`](crate::GridMap) and its goals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSettings {
    pub connectivity: Connectivity,
    pub heuristic: Heuristic,
    /// Multiplier applied to the entry cost of a diagonal step.
    pub diagonal_cost: f32,
    /// Allow diagonal steps that squeeze between two blocked orthogonal
    /// cells.
    pub cut_corners: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            heuristic: Heuristic::Octile,
            diagonal_cost: std::f32::consts::SQRT_2,
            cut_corners: false,
        }
    }
}

impl GridSettings {
    /// Cardinal movement with the Manhattan heuristic.
    pub fn four_way() -> Self {
        Self {
            connectivity: Connectivity::Four,
            heuristic: Heuristic::Manhattan,
            ..Self::default()
        }
    }

    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    /// Set the diagonal multiplier. Values below 1 are raised to 1 so the
    /// shipped heuristics stay admissible.
    pub fn with_diagonal_cost(mut self, cost: f32) -> Self {
        self.diagonal_cost = if cost.is_nan() { 1.0 } else { cost.max(1.0) };
        self
    }

    pub fn with_cut_corners(mut self, cut_corners: bool) -> Self {
        self.cut_corners = cut_corners;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 1);
        assert_eq!(Heuristic::Zero.estimate(a, b, 1.5), 0.0);
        assert_eq!(Heuristic::Manhattan.estimate(a, b, 1.5), 4.0);
        assert_eq!(Heuristic::Chebyshev.estimate(a, b, 1.5), 3.0);
        assert_eq!(Heuristic::Octile.estimate(a, b, 1.5), 3.5);
    }

    #[test]
    fn diagonal_cost_floor() {
        assert_eq!(GridSettings::default().with_diagonal_cost(0.5).diagonal_cost, 1.0);
        assert_eq!(GridSettings::default().with_diagonal_cost(f32::NAN).diagonal_cost, 1.0);
        assert_eq!(GridSettings::default().with_diagonal_cost(2.0).diagonal_cost, 2.0);
    }

    #[test]
    fn four_way_preset() {
        let s = GridSettings::four_way();
        assert_eq!(s.connectivity, Connectivity::Four);
        assert_eq!(s.heuristic, Heuristic::Manhattan);
    }
}
