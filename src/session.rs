use crate::coord::Coord;
use crate::game::Food;

/// A player's saved progress
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Session {
    pub(crate) level: u32,
    pub(crate) score: u32,
    /// Maximum number of cells in the snake
    pub(crate) length: usize,
    /// The snake's cells, head last.  Empty for a snake that has never
    /// been placed.
    pub(crate) body: Vec<Coord>,
    pub(crate) food: Option<Food>,
}

impl Default for Session {
    fn default() -> Session {
        Session {
            level: 1,
            score: 0,
            length: 1,
            body: Vec::new(),
            food: None,
        }
    }
}
