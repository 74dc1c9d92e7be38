use crate::coord::Coord;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Direction {
    North,
    East,
    South,
    West,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Move `pos` one block in this direction.  The result may lie outside
    /// the playfield; the collision rule deals with that.
    pub(super) fn advance(self, pos: Coord) -> Coord {
        match self {
            Direction::North => pos.offset(0, -1),
            Direction::East => pos.offset(1, 0),
            Direction::South => pos.offset(0, 1),
            Direction::West => pos.offset(-1, 0),
        }
    }

    pub(super) fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::Vertical,
            Direction::East | Direction::West => Axis::Horizontal,
        }
    }

    /// The direction of travel from `from` to the adjacent cell `to`, if the
    /// two are adjacent
    pub(super) fn between(from: Coord, to: Coord) -> Option<Direction> {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
        .find(|d| d.advance(from) == to)
    }
}
