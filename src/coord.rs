use crate::consts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on the playfield, in coordinate units.  Positions produced by
/// the game are always multiples of [`consts::BLOCK_SIZE`], but a head that
/// has just left the playfield can be negative or past the far edge.
///
/// Serialized as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub(crate) struct Coord {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Coord {
    pub(crate) const fn new(x: i32, y: i32) -> Coord {
        Coord { x, y }
    }

    /// The coordinate of the grid cell at column `col` and row `row`
    pub(crate) const fn from_cell(col: i32, row: i32) -> Coord {
        Coord {
            x: col * consts::BLOCK_SIZE,
            y: row * consts::BLOCK_SIZE,
        }
    }

    /// The center of the playfield, where a brand-new snake starts
    pub(crate) const fn center() -> Coord {
        Coord {
            x: consts::WIDTH / 2,
            y: consts::HEIGHT / 2,
        }
    }

    /// Move `dx` grid cells horizontally and `dy` grid cells vertically
    pub(crate) fn offset(self, dx: i32, dy: i32) -> Coord {
        Coord {
            x: self.x + dx * consts::BLOCK_SIZE,
            y: self.y + dy * consts::BLOCK_SIZE,
        }
    }

    /// Is this position inside `[0, WIDTH) × [0, HEIGHT)`?
    pub(crate) fn in_bounds(self) -> bool {
        (0..consts::WIDTH).contains(&self.x) && (0..consts::HEIGHT).contains(&self.y)
    }

    /// Is this the corner of a grid cell inside the playfield?
    pub(crate) fn on_grid(self) -> bool {
        self.in_bounds() && self.x % consts::BLOCK_SIZE == 0 && self.y % consts::BLOCK_SIZE == 0
    }

    /// The `(column, row)` of the grid cell containing this position, or
    /// `None` if it's outside the playfield
    pub(crate) fn cell(self) -> Option<(u16, u16)> {
        if !self.in_bounds() {
            return None;
        }
        let col = u16::try_from(self.x / consts::BLOCK_SIZE).ok()?;
        let row = u16::try_from(self.y / consts::BLOCK_SIZE).ok()?;
        Some((col, row))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Coord {
        Coord { x, y }
    }
}

impl From<Coord> for (i32, i32) {
    fn from(c: Coord) -> (i32, i32) {
        (c.x, c.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
