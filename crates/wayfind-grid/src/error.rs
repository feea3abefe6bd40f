use thiserror::Error;

/// Errors from [`GridMap::parse`](crate::GridMap::parse).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseGridError {
    /// The input holds no rows.
    #[error("grid is empty")]
    Empty,

    /// A row is shorter or longer than the first one.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character that is not a tile or marker.
    #[error("unknown tile {tile:?} at ({x}, {y})")]
    UnknownTile { tile: char, x: usize, y: usize },

    /// `S` or `G` appears more than once.
    #[error("marker {0:?} appears more than once")]
    DuplicateMarker(char),

    /// More cells than node ids can address.
    #[error("grid of {0} cells is too large")]
    TooLarge(usize),
}
