//! Grid embedding for [`wayfind_core`].
//!
//! [`GridMap`] turns a rectangle of weighted cells into a [`Map`], and
//! [`GridGoal`] scores it with one of the [`Heuristic`]s. [`DenseStorage`]
//! keeps one record per cell and resets in O(1), which suits repeated
//! queries on the same map. [`GridSearch`] and [`find_path`] wire the three
//! into a [`Pathfinder`] and return a [`GridPath`].
//!
//! ```
//! use wayfind_grid::{GridMap, GridSettings, Point, find_path};
//!
//! let mut grid = GridMap::parse(
//!     "S.#.\n\
//!      .##.\n\
//!      ...G",
//! )?;
//! let (from, to) = (grid.start.unwrap(), grid.goal.unwrap());
//! let path = find_path(&mut grid.map, from, to, GridSettings::four_way()).unwrap();
//! assert_eq!(path.cost, 5.0);
//! assert_eq!(path.end(), Some(Point::new(3, 2)));
//! # Ok::<(), wayfind_grid::ParseGridError>(())
//! ```
//!
//! [`Map`]: wayfind_core::Map
//! [`Pathfinder`]: wayfind_core::Pathfinder

pub mod distance;
mod error;
mod geom;
mod goal;
mod map;
mod path;
mod settings;
mod storage;

pub use error::ParseGridError;
pub use geom::{Point, Range};
pub use goal::GridGoal;
pub use map::{AsciiGrid, CellIndex, GridMap};
pub use path::{GridPath, GridSearch, find_path, trace_path};
pub use settings::{Connectivity, GridSettings, Heuristic};
pub use storage::DenseStorage;
