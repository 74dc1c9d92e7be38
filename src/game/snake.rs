use super::direction::Direction;
use crate::consts;
use crate::coord::Coord;
use std::collections::VecDeque;

/// The snake: its segments, the length it may grow to, its direction of
/// travel, and a turn waiting for the next tick
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The position of the snake's head
    pub(super) head: Coord,

    /// The positions of the rest of the snake's segments, oldest first.  The
    /// cell directly behind the head is at the end.
    pub(super) tail: VecDeque<Coord>,

    /// The maximum number of segments, head included
    pub(super) max_len: usize,

    /// The direction in which the snake is moving, or `None` if it hasn't
    /// started moving yet
    pub(super) direction: Option<Direction>,

    /// A turn accepted since the last tick, to be applied on the next one
    pub(super) queued: Option<Direction>,
}

impl Snake {
    /// Create a motionless snake of length one at the center of the playfield
    pub(super) fn new() -> Snake {
        Snake::from_body(Vec::new(), 1)
    }

    /// Rebuild a motionless snake from a saved body (head last) and maximum
    /// length.  An empty body places the head at the center of the
    /// playfield.
    pub(super) fn from_body(body: Vec<Coord>, max_len: usize) -> Snake {
        let mut tail = VecDeque::from(body);
        let head = tail.pop_back().unwrap_or_else(Coord::center);
        let mut snake = Snake {
            head,
            tail,
            max_len: max_len.max(1),
            direction: None,
            queued: None,
        };
        snake.trim();
        snake
    }

    /// Return the position of the snake's head
    pub(super) fn head(&self) -> Coord {
        self.head
    }

    /// Return every segment other than the head, oldest first
    pub(super) fn tail(&self) -> &VecDeque<Coord> {
        &self.tail
    }

    /// Return all segments, oldest first and the head last
    pub(super) fn segments(&self) -> impl Iterator<Item = Coord> + '_ {
        self.tail.iter().copied().chain(std::iter::once(self.head))
    }

    /// Return the number of segments currently making up the snake
    pub(super) fn len(&self) -> usize {
        self.tail.len() + 1
    }

    pub(super) fn max_len(&self) -> usize {
        self.max_len
    }

    /// Does the snake occupy `pos`?
    pub(super) fn occupies(&self, pos: Coord) -> bool {
        self.head == pos || self.tail.contains(&pos)
    }

    /// Is the head on top of another of the snake's segments?
    pub(super) fn bit_itself(&self) -> bool {
        self.tail.contains(&self.head)
    }

    /// Return the glyph to use for drawing the snake's head
    pub(super) fn head_symbol(&self) -> &'static str {
        match self.facing() {
            Some(Direction::North) | None => consts::SNAKE_HEAD_NORTH_SYMBOL,
            Some(Direction::South) => consts::SNAKE_HEAD_SOUTH_SYMBOL,
            Some(Direction::East) => consts::SNAKE_HEAD_EAST_SYMBOL,
            Some(Direction::West) => consts::SNAKE_HEAD_WEST_SYMBOL,
        }
    }

    /// The direction the snake is moving in or, if it hasn't started moving,
    /// the direction from its neck to its head
    pub(super) fn facing(&self) -> Option<Direction> {
        self.direction
            .or_else(|| Direction::between(*self.tail.back()?, self.head))
    }

    /// Queue a turn for the next tick.  Turns along the axis the snake is
    /// already travelling on are rejected, which keeps it from reversing into
    /// its own neck.  Returns `true` if the turn was queued.
    ///
    /// Only the most recent accepted turn is kept.
    pub(super) fn turn(&mut self, direction: Direction) -> bool {
        if self
            .facing()
            .is_some_and(|facing| facing.axis() == direction.axis())
        {
            return false;
        }
        self.queued = Some(direction);
        true
    }

    /// Apply any queued turn and move the snake forwards one block, dropping
    /// the oldest segments beyond `max_len`.  Returns `false` if the snake has
    /// no direction yet and so did not move.
    pub(super) fn advance(&mut self) -> bool {
        if let Some(d) = self.queued.take() {
            self.direction = Some(d);
        }
        let Some(direction) = self.direction else {
            return false;
        };
        self.tail.push_back(self.head);
        self.head = direction.advance(self.head);
        self.trim();
        true
    }

    /// Drop the oldest segments until the snake is no longer than `max_len`
    pub(super) fn trim(&mut self) {
        while self.len() > self.max_len {
            let _ = self.tail.pop_front();
        }
    }

    /// Extend the snake's maximum length by `amount` cells
    pub(super) fn grow(&mut self, amount: usize) {
        self.max_len += amount;
    }

    /// Return the snake's body as saved in a session: all segments, head last
    pub(super) fn body(&self) -> Vec<Coord> {
        self.segments().collect()
    }
}
