mod collision;
mod direction;
mod entities;
mod paused;
mod snake;
pub(crate) use self::entities::{Food, Weight};
use self::collision::{Outcome, Progress};
use self::direction::Direction;
use self::entities::Wall;
use self::paused::Paused;
use self::snake::Snake;
use crate::command::Command;
use crate::consts;
use crate::coord::Coord;
use crate::session::Session;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    player: String,
    progress: Progress,
    snake: Snake,
    food: Option<PendingFood>,
    walls: Vec<Wall>,
    state: GameState,
    /// Set when the snake crashes and cleared on retry
    crashed: bool,
    last_wall_spawn: Instant,
    next_tick: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    /// Start playing `session` as `player`
    pub(crate) fn new(player: String, session: Session) -> Self {
        Game::new_with_rng(player, session, rand::rng(), Instant::now())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(player: String, session: Session, rng: R, now: Instant) -> Game<R> {
        log::info!(
            "Starting game for {player:?} at level {} with score {}",
            session.level,
            session.score
        );
        Game {
            rng,
            player,
            progress: Progress {
                level: session.level.max(1),
                score: session.score,
            },
            snake: Snake::from_body(session.body, session.length),
            food: session.food.map(|food| PendingFood { food, spawned: now }),
            walls: Vec::new(),
            state: GameState::Running,
            crashed: false,
            last_wall_spawn: now,
            next_tick: None,
        }
    }

    /// Wait for either the next tick or an input event, and handle whichever
    /// comes first.  When the game isn't running, this blocks until the next
    /// input event.
    ///
    /// Returns `Some` if the caller needs to save the session.
    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Effect>> {
        if self.running() {
            let period = self.tick_period();
            let when = *self
                .next_tick
                .get_or_insert_with(|| Instant::now() + period);
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.next_tick = None;
                self.advance(Instant::now());
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    /// Run one tick of the game
    pub(crate) fn advance(&mut self, now: Instant) {
        if !self.running() {
            return;
        }
        if self.snake.advance() {
            let food = self.food.as_ref().map(|p| &p.food);
            match collision::evaluate(&self.snake, &self.walls, food) {
                Outcome::Crashed(crash) => {
                    log::info!(
                        "Game over for {:?}: snake {crash} at {}; score {}, level {}",
                        self.player,
                        self.snake.head(),
                        self.progress.score,
                        self.progress.level
                    );
                    self.state = GameState::GameOver;
                    self.crashed = true;
                    return;
                }
                Outcome::Ate(weight) => {
                    self.food = None;
                    if self.progress.eat(&mut self.snake, weight) {
                        log::info!(
                            "{:?} reached level {} with score {}",
                            self.player,
                            self.progress.level,
                            self.progress.score
                        );
                    }
                }
                Outcome::Clear => (),
            }
        }
        if self.food.as_ref().is_none_or(|p| p.expired(now)) {
            self.spawn_food(now);
        }
        if now.saturating_duration_since(self.last_wall_spawn) > consts::WALL_SPAWN_INTERVAL {
            self.spawn_wall(now);
        }
    }

    fn spawn_food(&mut self, now: Instant) {
        self.food = entities::generate_food(&mut self.rng, &self.snake, &self.walls)
            .map(|food| PendingFood { food, spawned: now });
        if let Some(PendingFood { food, .. }) = self.food {
            log::debug!(
                "Placed food of weight {} at {}",
                food.weight.points(),
                food.pos
            );
        } else {
            log::debug!("No free cell for food");
        }
    }

    fn spawn_wall(&mut self, now: Instant) {
        self.last_wall_spawn = now;
        if let Some(wall) = entities::generate_wall(&mut self.rng, &self.snake, &self.walls) {
            log::debug!("Placed wall covering {:?}", wall.cells());
            self.walls.push(wall);
        } else {
            log::warn!("No room left on the board for another wall");
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn player(&self) -> &str {
        &self.player
    }

    /// Return the state of play as it should be saved.  After a crash, the
    /// snake's body is left out so that the next session starts it afresh in
    /// the center.
    pub(crate) fn session(&self) -> Session {
        let body = if self.crashed {
            Vec::new()
        } else {
            self.snake.body()
        };
        Session {
            level: self.progress.level,
            score: self.progress.score,
            length: self.snake.max_len(),
            body,
            food: self.food.map(|p| p.food),
        }
    }

    pub(crate) fn terminated(&self) -> bool {
        self.state == GameState::Terminated
    }

    fn running(&self) -> bool {
        self.state == GameState::Running
    }

    /// Time between ticks at the current level
    fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / consts::BASE_TICK_RATE.saturating_add(self.progress.level)
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Option<Effect> {
        match self.state {
            GameState::Running => {
                if event == Event::FocusLost {
                    return Some(self.pause());
                }
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::Quit | Command::Q => return Some(self.terminate()),
                    Command::P | Command::Esc => return Some(self.pause()),
                    Command::Up => self.turn(Direction::North),
                    Command::Left => self.turn(Direction::West),
                    Command::Down => self.turn(Direction::South),
                    Command::Right => self.turn(Direction::East),
                    Command::C => (),
                }
            }
            GameState::Paused => {
                let key = event.as_key_press_event()?;
                if Command::from_key_event(key) == Some(Command::Quit) {
                    return Some(self.terminate());
                }
                log::info!("{:?} resumed the game", self.player);
                self.state = GameState::Running;
                self.next_tick = None;
            }
            GameState::GameOver => match Command::from_key_event(event.as_key_press_event()?)? {
                Command::C => self.retry(),
                Command::Q | Command::Quit => return Some(self.terminate()),
                _ => (),
            },
            GameState::Terminated => (),
        }
        None
    }

    fn turn(&mut self, direction: Direction) {
        if !self.snake.turn(direction) {
            log::trace!("Ignoring turn to {direction:?}");
        }
    }

    fn pause(&mut self) -> Effect {
        log::info!("{:?} paused the game", self.player);
        self.state = GameState::Paused;
        self.next_tick = None;
        Effect::Save
    }

    /// Start a new game from scratch for the same player
    fn retry(&mut self) {
        log::info!("{:?} is playing again", self.player);
        self.progress = Progress::default();
        self.snake = Snake::new();
        self.food = None;
        self.walls.clear();
        self.crashed = false;
        self.last_wall_spawn = Instant::now();
        self.next_tick = None;
        self.state = GameState::Running;
    }

    fn terminate(&mut self) -> Effect {
        log::info!("{:?} quit the game", self.player);
        self.state = GameState::Terminated;
        Effect::Exit
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, field_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}", self.progress.score),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);
        Line::from(format!("Level: {} ", self.progress.level))
            .right_aligned()
            .render(score_area, buf);

        let block = Block::bordered()
            .title(format!(" {} ", self.player))
            .title_alignment(Alignment::Center);
        let inner = block.inner(field_area);
        block.render(field_area, buf);

        let mut field = Canvas { area: inner, buf };
        for wall in &self.walls {
            for &pos in wall.cells() {
                field.draw_cell(pos, consts::WALL_SYMBOL, consts::WALL_STYLE);
            }
        }
        if let Some(PendingFood { food, .. }) = self.food {
            field.draw_cell(food.pos, consts::FOOD_SYMBOL, food.weight.style());
        }
        for &pos in self.snake.tail() {
            field.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if self.state == GameState::GameOver {
            field.draw_cell(
                self.snake.head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            field.draw_cell(
                self.snake.head(),
                self.snake.head_symbol(),
                consts::SNAKE_STYLE,
            );
        }

        match self.state {
            GameState::Running | GameState::Terminated => (),
            GameState::Paused => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                Paused.render(pause_area, buf);
            }
            GameState::GameOver => {
                Line::styled(" — GAME OVER —", consts::GAME_OVER_STYLE).render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Press "),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(" to quit or "),
                    Span::styled("c", consts::KEY_STYLE),
                    Span::raw(" to play again"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    /// Draw `symbol` (one character per terminal column) in the grid cell
    /// containing `pos`.  Positions off the playfield are skipped.
    fn draw_cell(&mut self, pos: Coord, symbol: &str, style: Style) {
        let Some((col, row)) = pos.cell() else {
            return;
        };
        let Some(x) = col
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(row) else {
            return;
        };
        if y >= self.area.bottom() {
            return;
        }
        for (ch, x) in symbol.chars().zip(x..self.area.right()) {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}

/// Food waiting to be eaten, and when it appeared
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PendingFood {
    food: Food,
    spawned: Instant,
}

impl PendingFood {
    fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.spawned) > self.food.weight.expiry()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum GameState {
    Running,
    /// Waiting for any key before resuming
    Paused,
    /// The snake crashed; waiting for the player to retry or quit
    GameOver,
    Terminated,
}

/// Something the owner of a [`Game`] needs to do in response to input
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Effect {
    /// Save the session; the game continues
    Save,
    /// Save the session; the game is over and the program should exit
    Exit,
}
