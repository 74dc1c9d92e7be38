//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Width of the playfield, in coordinate units
pub(crate) const WIDTH: i32 = 600;

/// Height of the playfield, in coordinate units
pub(crate) const HEIGHT: i32 = 600;

/// Side length of one grid cell, in coordinate units.  Every position on the
/// playfield is a multiple of this.
pub(crate) const BLOCK_SIZE: i32 = 20;

/// Number of grid columns on the playfield
pub(crate) const COLUMNS: i32 = WIDTH / BLOCK_SIZE;

/// Number of grid rows on the playfield
pub(crate) const ROWS: i32 = HEIGHT / BLOCK_SIZE;

/// Ticks per second at level zero; the actual rate is this plus the current
/// level.
pub(crate) const BASE_TICK_RATE: u32 = 10;

/// A new wall group is spawned once this much time has passed since the
/// previous one
pub(crate) const WALL_SPAWN_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest wall group, in cells
pub(crate) const MIN_WALL_LENGTH: i32 = 3;

/// Longest wall group, in cells
pub(crate) const MAX_WALL_LENGTH: i32 = 6;

/// Points needed per level: the player advances once their score reaches this
/// times the current level.
pub(crate) const LEVEL_UP_POINTS: u32 = 50;

/// Each grid cell is drawn this many terminal columns wide so that the
/// playfield looks roughly square.
pub(crate) const CELL_WIDTH: u16 = 2;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 62,
    height: 35,
};

/// Glyph for the snake's head when it is moving north/up, or hasn't started
/// moving yet
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: &str = "vv";

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: &str = "^^";

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: &str = "<:";

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: &str = ":>";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "██";

/// Glyph for food
pub(crate) const FOOD_SYMBOL: &str = "()";

/// Glyph for wall cells
pub(crate) const WALL_SYMBOL: &str = "▓▓";

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: &str = "><";

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new()
    .fg(Color::Rgb(5, 210, 80))
    .add_modifier(Modifier::BOLD);

/// Style for wall cells
pub(crate) const WALL_STYLE: Style = Style::new().fg(Color::Rgb(169, 169, 169));

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the "GAME OVER" banner
pub(crate) const GAME_OVER_STYLE: Style = Style::new()
    .fg(Color::Rgb(200, 0, 20))
    .add_modifier(Modifier::BOLD);
