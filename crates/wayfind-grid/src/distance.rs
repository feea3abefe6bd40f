//! Lower bounds on the cost of walking between two cells.
//!
//! Every passable cell costs at least 1 to enter, so each function below is
//! the cost of the cheapest walk on an all-floor grid and never exceeds the
//! cost on a weighted one.

use crate::geom::Point;

/// Cheapest 4-way walk: one unit per row and per column crossed.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    let d = a - b;
    d.x.abs() + d.y.abs()
}

/// Cheapest 8-way walk when a diagonal step costs the same as a straight
/// one. A lower bound for any diagonal multiplier of at least 1.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    let d = a - b;
    d.x.abs().max(d.y.abs())
}

/// Cheapest 8-way walk when a diagonal step costs `diagonal`: the shorter
/// axis is covered diagonally, the rest straight.
#[inline]
pub fn octile(a: Point, b: Point, diagonal: f32) -> f32 {
    let d = a - b;
    let (lo, hi) = if d.x.abs() < d.y.abs() {
        (d.x.abs(), d.y.abs())
    } else {
        (d.y.abs(), d.x.abs())
    };
    (hi - lo) as f32 + lo as f32 * diagonal
}
