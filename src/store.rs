use crate::coord::Coord;
use crate::game::{Food, Weight};
use crate::session::Session;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use thiserror::Error;

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;
CREATE TABLE IF NOT EXISTS player (
    name TEXT PRIMARY KEY
);
CREATE TABLE IF NOT EXISTS session (
    name        TEXT PRIMARY KEY REFERENCES player(name),
    level       INTEGER NOT NULL,
    score       INTEGER NOT NULL,
    length      INTEGER NOT NULL,
    body        TEXT NOT NULL,
    food_x      INTEGER NOT NULL,
    food_y      INTEGER NOT NULL,
    food_weight INTEGER NOT NULL
);
";

/// Stored in the food columns when there is no pending food
const NO_FOOD: (i32, i32, u32) = (-1, -1, 0);

/// Saved sessions, one per player name, in a SQLite database
#[derive(Debug)]
pub(crate) struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    /// Open (creating if necessary) the session database at `path`
    pub(crate) fn open(path: &Path) -> Result<SessionStore, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(StoreError::Mkdir)?;
        }
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        SessionStore::init(conn)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<SessionStore, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        SessionStore::init(conn)
    }

    fn init(conn: Connection) -> Result<SessionStore, StoreError> {
        conn.execute_batch(SCHEMA).map_err(StoreError::Open)?;
        Ok(SessionStore { conn })
    }

    /// Return the saved level & score for `name`, first creating the player
    /// with a default session if they're not already known.
    ///
    /// A saved row whose level or score is out of range is left as it is
    /// until the next save, and the default level & score are returned.
    pub(crate) fn get_or_create(&mut self, name: &str) -> Result<(u32, u32), StoreError> {
        let session = Session::default();
        match self.progress(name)? {
            Some(Ok(progress)) => Ok(progress),
            Some(Err(e)) => {
                log::warn!("Saved progress for {name:?} is malformed; using defaults: {e}");
                Ok((session.level, session.score))
            }
            None => {
                self.create_player(name)?;
                self.save(name, &session)?;
                Ok((session.level, session.score))
            }
        }
    }

    /// Insert a new player record.  Returns `false` if the player already
    /// existed, in which case nothing is changed.
    pub(crate) fn create_player(&self, name: &str) -> Result<bool, StoreError> {
        match self
            .conn
            .execute("INSERT INTO player (name) VALUES (?1)", params![name])
        {
            Ok(_) => {
                log::info!("Created new player {name:?}");
                Ok(true)
            }
            Err(e) if is_constraint_violation(&e) => {
                log::warn!("Player {name:?} already exists; keeping existing record: {e}");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load the full saved session for `name`.  A player without a saved
    /// session, or whose saved session can't be decoded, gets a default
    /// session.
    pub(crate) fn load(&self, name: &str) -> Result<Session, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT level, score, length, body, food_x, food_y, food_weight
                 FROM session WHERE name = ?1",
                params![name],
                |row| {
                    Ok(RawSession {
                        level: row.get(0)?,
                        score: row.get(1)?,
                        length: row.get(2)?,
                        body: row.get(3)?,
                        food_x: row.get(4)?,
                        food_y: row.get(5)?,
                        food_weight: row.get(6)?,
                    })
                },
            )
            .optional()?;
        let Some(raw) = row else {
            log::info!("No saved session for {name:?}; starting fresh");
            return Ok(Session::default());
        };
        match raw.decode() {
            Ok(session) => Ok(session),
            Err(e) => {
                log::warn!("Ignoring malformed saved session for {name:?}: {e}");
                Ok(Session::default())
            }
        }
    }

    /// Save `session` as the current session for `name`, replacing any
    /// previous one
    pub(crate) fn save(&mut self, name: &str, session: &Session) -> Result<(), StoreError> {
        let body = serde_json::to_string(&session.body)?;
        let (food_x, food_y, food_weight) = session
            .food
            .map_or(NO_FOOD, |f| (f.pos.x, f.pos.y, f.weight.points()));
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO player (name) VALUES (?1)",
            params![name],
        )?;
        tx.execute(
            "INSERT INTO session (name, level, score, length, body, food_x, food_y, food_weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (name) DO UPDATE SET
                level = excluded.level,
                score = excluded.score,
                length = excluded.length,
                body = excluded.body,
                food_x = excluded.food_x,
                food_y = excluded.food_y,
                food_weight = excluded.food_weight",
            params![
                name,
                session.level,
                session.score,
                session.length,
                body,
                food_x,
                food_y,
                food_weight
            ],
        )?;
        tx.commit()?;
        log::debug!(
            "Saved session for {name:?}: level {}, score {}",
            session.level,
            session.score
        );
        Ok(())
    }

    /// Return the level & score in `name`'s saved session, if there is one
    fn progress(
        &self,
        name: &str,
    ) -> Result<Option<Result<(u32, u32), MalformedSession>>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT level, score FROM session WHERE name = ?1",
                params![name],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((level, score)) = row else {
            return Ok(None);
        };
        Ok(Some(decode_level(level).and_then(|level| {
            decode_int("score", score).map(|score| (level, score))
        })))
    }
}

fn is_constraint_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation
    )
}

/// A `session` row as stored, before validation
#[derive(Clone, Debug, Eq, PartialEq)]
struct RawSession {
    level: i64,
    score: i64,
    length: i64,
    body: String,
    food_x: i64,
    food_y: i64,
    food_weight: i64,
}

impl RawSession {
    fn decode(self) -> Result<Session, MalformedSession> {
        let level = decode_level(self.level)?;
        let score = decode_int("score", self.score)?;
        let length = usize::try_from(self.length)
            .ok()
            .filter(|&len| len > 0)
            .ok_or(MalformedSession::OutOfRange {
                field: "length",
                value: self.length,
            })?;
        let body =
            serde_json::from_str::<Vec<Coord>>(&self.body).map_err(MalformedSession::Body)?;
        if let Some(&cell) = body.iter().find(|c| !c.on_grid()) {
            return Err(MalformedSession::OffGrid(cell));
        }
        let no_food = (i64::from(NO_FOOD.0), i64::from(NO_FOOD.1));
        let food = if (self.food_x, self.food_y) == no_food {
            None
        } else {
            let pos = Coord::new(
                decode_int("food_x", self.food_x)?,
                decode_int("food_y", self.food_y)?,
            );
            let points = decode_int("food_weight", self.food_weight)?;
            match Weight::from_points(points) {
                Some(weight) if pos.on_grid() => Some(Food { pos, weight }),
                Some(_) => {
                    log::warn!("Dropping saved food at off-grid position {pos}");
                    None
                }
                None => {
                    log::warn!("Dropping saved food with unknown weight {points}");
                    None
                }
            }
        };
        Ok(Session {
            level,
            score,
            length,
            body,
            food,
        })
    }
}

fn decode_level(value: i64) -> Result<u32, MalformedSession> {
    u32::try_from(value)
        .ok()
        .filter(|&level| level > 0)
        .ok_or(MalformedSession::OutOfRange {
            field: "level",
            value,
        })
}

fn decode_int<T: TryFrom<i64>>(field: &'static str, value: i64) -> Result<T, MalformedSession> {
    T::try_from(value).map_err(|_| MalformedSession::OutOfRange { field, value })
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error("failed to create directory for session database")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to open session database")]
    Open(#[source] rusqlite::Error),
    #[error("failed to serialize snake body")]
    Encode(#[from] serde_json::Error),
    #[error("session database query failed")]
    Query(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
enum MalformedSession {
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("snake body is not a list of coordinate pairs")]
    Body(#[source] serde_json::Error),
    #[error("snake body cell {0} is not on the playfield grid")]
    OffGrid(Coord),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn count(store: &SessionStore, table: &str, name: &str) -> i64 {
        store
            .conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {table} WHERE name = ?1"),
                params![name],
                |row| row.get(0),
            )
            .unwrap()
    }

    fn sample_session() -> Session {
        Session {
            level: 3,
            score: 140,
            length: 4,
            body: vec![
                Coord::new(260, 300),
                Coord::new(280, 300),
                Coord::new(300, 300),
                Coord::new(300, 320),
            ],
            food: Some(Food {
                pos: Coord::new(100, 80),
                weight: Weight::Medium,
            }),
        }
    }

    #[test]
    fn get_or_create_new_player() {
        let mut store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.get_or_create("alice").unwrap(), (1, 0));
        assert_eq!(store.load("alice").unwrap(), Session::default());
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let first = store.get_or_create("alice").unwrap();
        let second = store.get_or_create("alice").unwrap();
        assert_eq!(first, second);
        assert_eq!(count(&store, "player", "alice"), 1);
        assert_eq!(count(&store, "session", "alice"), 1);
    }

    #[test]
    fn get_or_create_existing_player() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("bob", &sample_session()).unwrap();
        assert_eq!(store.get_or_create("bob").unwrap(), (3, 140));
    }

    #[test]
    fn duplicate_player_is_not_fatal() {
        let store = SessionStore::open_in_memory().unwrap();
        assert!(store.create_player("carol").unwrap());
        assert!(!store.create_player("carol").unwrap());
        assert_eq!(count(&store, "player", "carol"), 1);
    }

    #[test]
    fn player_without_session() {
        let mut store = SessionStore::open_in_memory().unwrap();
        assert!(store.create_player("dave").unwrap());
        assert_eq!(store.get_or_create("dave").unwrap(), (1, 0));
        assert_eq!(count(&store, "session", "dave"), 1);
    }

    #[test]
    fn load_unknown_player() {
        let store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.load("nobody").unwrap(), Session::default());
    }

    #[test]
    fn save_then_load() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let session = sample_session();
        store.save("alice", &session).unwrap();
        assert_eq!(store.load("alice").unwrap(), session);
    }

    #[test]
    fn save_then_load_without_food() {
        let mut store = SessionStore::open_in_memory().unwrap();
        let session = Session {
            food: None,
            ..sample_session()
        };
        store.save("alice", &session).unwrap();
        let (x, y): (i64, i64) = store
            .conn
            .query_row(
                "SELECT food_x, food_y FROM session WHERE name = 'alice'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((x, y), (-1, -1));
        assert_eq!(store.load("alice").unwrap(), session);
    }

    #[test]
    fn save_overwrites() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("alice", &sample_session()).unwrap();
        store.save("alice", &Session::default()).unwrap();
        assert_eq!(store.load("alice").unwrap(), Session::default());
        assert_eq!(count(&store, "session", "alice"), 1);
    }

    #[test]
    fn body_is_stored_as_pairs() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("alice", &sample_session()).unwrap();
        let body: String = store
            .conn
            .query_row("SELECT body FROM session WHERE name = 'alice'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(body, "[[260,300],[280,300],[300,300],[300,320]]");
    }

    #[test]
    fn malformed_body_loads_defaults() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute(
                "UPDATE session SET body = ?1 WHERE name = 'eve'",
                params!["__import__('os').system('true')"],
            )
            .unwrap();
        assert_eq!(store.load("eve").unwrap(), Session::default());
    }

    #[rstest]
    #[case("[[2147483640,300]]")]
    #[case("[[300,300],[-20,300]]")]
    #[case("[[300,600]]")]
    #[case("[[280,300],[310,300]]")]
    fn off_grid_body_loads_defaults(#[case] body: &str) {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute(
                "UPDATE session SET body = ?1 WHERE name = 'eve'",
                params![body],
            )
            .unwrap();
        assert_eq!(store.load("eve").unwrap(), Session::default());
    }

    #[test]
    fn off_grid_food_is_dropped() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute("UPDATE session SET food_x = 105 WHERE name = 'eve'", [])
            .unwrap();
        let session = store.load("eve").unwrap();
        assert_eq!(session.food, None);
        assert_eq!(session.body, sample_session().body);
    }

    #[test]
    fn get_or_create_keeps_malformed_row() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute("UPDATE session SET score = -5 WHERE name = 'eve'", [])
            .unwrap();
        assert_eq!(store.get_or_create("eve").unwrap(), (1, 0));
        let (score, body): (i64, String) = store
            .conn
            .query_row(
                "SELECT score, body FROM session WHERE name = 'eve'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(score, -5);
        assert_eq!(body, "[[260,300],[280,300],[300,300],[300,320]]");
        assert_eq!(count(&store, "player", "eve"), 1);
    }

    #[test]
    fn out_of_range_level_loads_defaults() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute("UPDATE session SET level = 0 WHERE name = 'eve'", [])
            .unwrap();
        assert_eq!(store.load("eve").unwrap(), Session::default());
    }

    #[test]
    fn unknown_food_weight_is_dropped() {
        let mut store = SessionStore::open_in_memory().unwrap();
        store.save("eve", &sample_session()).unwrap();
        store
            .conn
            .execute("UPDATE session SET food_weight = 20 WHERE name = 'eve'", [])
            .unwrap();
        let session = store.load("eve").unwrap();
        assert_eq!(session.food, None);
        assert_eq!(session.score, 140);
    }

    #[test]
    fn persists_across_reopen() {
        let tmpdir = tempfile::tempdir().unwrap();
        let path = tmpdir.path().join("nested").join("sessions.db");
        {
            let mut store = SessionStore::open(&path).unwrap();
            store.get_or_create("alice").unwrap();
            store.save("alice", &sample_session()).unwrap();
        }
        let mut store = SessionStore::open(&path).unwrap();
        assert_eq!(store.get_or_create("alice").unwrap(), (3, 140));
        assert_eq!(store.load("alice").unwrap(), sample_session());
    }
}
