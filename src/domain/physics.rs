//! Terrain queries: the single source of truth for "what obstacle is here".
//!
//! ## Obstacle resolution (first match wins)
//!
//! | Condition                                   | Result |
//! |---------------------------------------------|--------|
//! | left < 0, top < 0, or right > width         | Wall   |
//! | bottom >= height                            | Lava   |
//! | first non-empty cell in the covered region  | that   |
//! | otherwise                                   | None   |
//!
//! The bounds rows run before the cell scan, so anything leaving the
//! playfield reports Wall or Lava even if it also overlaps a grid cell.
//! The covered region is rows `floor(top)..ceil(bottom)` by columns
//! `floor(left)..ceil(right)`, scanned row-major.
//!
//! Rows may be ragged. `width` is the longest row; a column past the end of
//! a short row reads as open space.

use super::tile::Obstacle;
use super::vector::Vector;

/// Anything that can answer "which obstacle does this rectangle touch".
pub trait Terrain {
    fn obstacle_at(&self, at: Vector, size: Vector) -> Option<Obstacle>;
}

/// Static obstacle layer of a level, indexed `[row][col]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Option<Obstacle>>>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Option<Obstacle>>>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Grid { rows, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<Option<Obstacle>>] {
        &self.rows
    }

    /// Cell at (x, y). Missing cells of short rows are open space.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<Obstacle> {
        self.rows.get(y).and_then(|row| row.get(x)).copied().flatten()
    }
}

impl Terrain for Grid {
    fn obstacle_at(&self, at: Vector, size: Vector) -> Option<Obstacle> {
        let right = at.x + size.x;
        let bottom = at.y + size.y;

        if at.x < 0.0 || at.y < 0.0 || right > self.width as f64 {
            return Some(Obstacle::Wall);
        }
        if bottom >= self.height as f64 {
            return Some(Obstacle::Lava);
        }

        // Float → usize casts saturate, so NaN collapses to an empty range.
        let x_start = at.x.floor() as usize;
        let x_end = right.ceil() as usize;
        let y_start = at.y.floor() as usize;
        let y_end = bottom.ceil() as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                if let Some(obstacle) = self.cell(x, y) {
                    return Some(obstacle);
                }
            }
        }
        None
    }
}
