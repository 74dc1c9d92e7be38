//! Food & wall generation
use super::snake::Snake;
use crate::consts;
use crate::coord::Coord;
use rand::{seq::IteratorRandom, Rng};
use ratatui::style::{Color, Style};
use std::collections::HashSet;
use std::time::Duration;

/// How much a piece of food is worth.  The weight determines the food's
/// color, how long it lasts, and how much the snake grows upon eating it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Weight {
    Light,
    Medium,
    Heavy,
}

impl Weight {
    pub(crate) const ALL: [Weight; 3] = [Weight::Light, Weight::Medium, Weight::Heavy];

    /// Points scored for eating food of this weight
    pub(crate) fn points(self) -> u32 {
        match self {
            Weight::Light => 10,
            Weight::Medium => 30,
            Weight::Heavy => 50,
        }
    }

    /// Number of cells the snake grows by upon eating food of this weight
    pub(crate) fn growth(self) -> usize {
        match self {
            Weight::Light => 1,
            Weight::Medium => 3,
            Weight::Heavy => 5,
        }
    }

    /// How long food of this weight stays on the board before being replaced
    pub(crate) fn expiry(self) -> Duration {
        match self {
            Weight::Light => Duration::from_secs(5),
            Weight::Medium => Duration::from_secs(10),
            Weight::Heavy => Duration::from_secs(15),
        }
    }

    pub(crate) fn style(self) -> Style {
        let color = match self {
            Weight::Light => Color::Rgb(200, 0, 20),
            Weight::Medium => Color::Rgb(255, 165, 0),
            Weight::Heavy => Color::Rgb(255, 192, 203),
        };
        Style::new().fg(color)
    }

    /// Look up a weight by its point value
    pub(crate) fn from_points(points: u32) -> Option<Weight> {
        Weight::ALL.into_iter().find(|w| w.points() == points)
    }
}

/// A piece of food on the board
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Food {
    pub(crate) pos: Coord,
    pub(crate) weight: Weight,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight line of wall cells
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Wall {
    cells: Vec<Coord>,
}

impl Wall {
    /// Build the wall starting at `start` and extending `length` cells to the
    /// right (horizontal) or downwards (vertical)
    pub(super) fn new(start: Coord, length: i32, orientation: Orientation) -> Wall {
        let cells = (0..length)
            .map(|i| match orientation {
                Orientation::Horizontal => start.offset(i, 0),
                Orientation::Vertical => start.offset(0, i),
            })
            .collect();
        Wall { cells }
    }

    pub(super) fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub(super) fn contains(&self, pos: Coord) -> bool {
        self.cells.contains(&pos)
    }
}

/// All cells in which food & walls may start: everything except the
/// outermost ring of the playfield
fn spawn_cells() -> impl Iterator<Item = Coord> {
    (1..consts::ROWS - 1)
        .flat_map(|row| (1..consts::COLUMNS - 1).map(move |col| Coord::from_cell(col, row)))
}

fn occupied_cells(snake: &Snake, walls: &[Wall]) -> HashSet<Coord> {
    let mut occupied = HashSet::from_iter(snake.segments());
    occupied.extend(walls.iter().flat_map(|w| w.cells().iter().copied()));
    occupied
}

/// Place a new piece of food on a free spawn cell, chosen uniformly, with a
/// uniformly-chosen weight.  Returns `None` if every spawn cell is taken.
pub(super) fn generate_food<R: Rng>(rng: &mut R, snake: &Snake, walls: &[Wall]) -> Option<Food> {
    let occupied = occupied_cells(snake, walls);
    let pos = spawn_cells()
        .filter(|p| !occupied.contains(p))
        .choose(&mut *rng)?;
    let weight = Weight::ALL[rng.random_range(0..Weight::ALL.len())];
    Some(Food { pos, weight })
}

/// Create a new wall group, chosen uniformly from all placements (start cell,
/// length, orientation) that fit on the playfield without touching the snake
/// or an existing wall.  Returns `None` if there is no room for one.
pub(super) fn generate_wall<R: Rng>(rng: &mut R, snake: &Snake, walls: &[Wall]) -> Option<Wall> {
    let occupied = occupied_cells(snake, walls);
    spawn_cells()
        .flat_map(|start| {
            (consts::MIN_WALL_LENGTH..=consts::MAX_WALL_LENGTH).flat_map(move |length| {
                [Orientation::Horizontal, Orientation::Vertical]
                    .into_iter()
                    .map(move |orientation| Wall::new(start, length, orientation))
            })
        })
        .filter(|wall| {
            wall.cells()
                .iter()
                .all(|&c| c.in_bounds() && !occupied.contains(&c))
        })
        .choose(rng)
}
