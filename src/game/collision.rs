//! Per-tick collision & growth rule
use super::entities::{Food, Wall, Weight};
use super::snake::Snake;
use crate::consts;
use std::fmt;

/// What the snake's head ran into on a tick
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Outcome {
    /// Nothing happened
    Clear,
    /// The head landed on the food
    Ate(Weight),
    /// The game is over
    Crashed(Crash),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Crash {
    Boundary,
    Wall,
    SelfBite,
}

impl fmt::Display for Crash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Crash::Boundary => "left the playfield",
            Crash::Wall => "hit a wall",
            Crash::SelfBite => "bit itself",
        };
        f.write_str(s)
    }
}

/// Check the snake's head against, in order, the edges of the playfield, the
/// walls, the rest of its body, and the food.  Only the first match counts.
pub(super) fn evaluate(snake: &Snake, walls: &[Wall], food: Option<&Food>) -> Outcome {
    let head = snake.head();
    if !head.in_bounds() {
        Outcome::Crashed(Crash::Boundary)
    } else if walls.iter().any(|w| w.contains(head)) {
        Outcome::Crashed(Crash::Wall)
    } else if snake.bit_itself() {
        Outcome::Crashed(Crash::SelfBite)
    } else if let Some(food) = food.filter(|f| f.pos == head) {
        Outcome::Ate(food.weight)
    } else {
        Outcome::Clear
    }
}

/// Player progress affected by eating
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Progress {
    pub(super) level: u32,
    pub(super) score: u32,
}

impl Progress {
    /// Credit the player for eating food of the given weight and grow the
    /// snake.  Returns `true` if the player went up a level.
    ///
    /// At most one level is gained per meal, even if the new score is past
    /// more than one threshold.
    pub(super) fn eat(&mut self, snake: &mut Snake, weight: Weight) -> bool {
        snake.grow(weight.growth());
        self.score = self.score.saturating_add(weight.points());
        if self.score >= self.level.saturating_mul(consts::LEVEL_UP_POINTS) {
            self.level = self.level.saturating_add(1);
            true
        } else {
            false
        }
    }
}

impl Default for Progress {
    fn default() -> Progress {
        Progress { level: 1, score: 0 }
    }
}
