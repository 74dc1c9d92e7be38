mod app;
mod command;
mod config;
mod consts;
mod coord;
mod game;
mod logging;
mod prompt;
mod session;
mod store;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::game::Game;
use crate::session::Session;
use crate::store::SessionStore;
use anyhow::Context;
use std::io::{self, ErrorKind};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("snakepit: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = load_config();
    match config.log_file() {
        Ok(path) => {
            if let Err(e) = logging::init(&path, config.logging.level) {
                eprintln!(
                    "snakepit: warning: logging disabled: {:#}",
                    anyhow::Error::new(e)
                );
            }
        }
        Err(e) => eprintln!("snakepit: warning: logging disabled: {e}"),
    }
    log::info!("Starting snakepit {}", env!("CARGO_PKG_VERSION"));

    let db = config.database()?;
    let mut store = SessionStore::open(&db)
        .with_context(|| format!("failed to open session store at {}", db.display()))?;
    log::debug!("Opened session store at {}", db.display());

    let Some(player) = prompt::player_name(io::stdin().lock(), io::stdout())? else {
        log::info!("No username entered; exiting");
        return Ok(());
    };
    let session = start_session(&mut store, &player);

    let terminal = ratatui::init();
    let r = App::new(Game::new(player, session), store).run(terminal);
    ratatui::restore();
    r?;
    Ok(())
}

/// Read the configuration file, falling back to the defaults if it can't be
/// read
fn load_config() -> Config {
    let r = Config::default_path().and_then(|path| Config::load(&path, true));
    r.unwrap_or_else(|e| {
        eprintln!(
            "snakepit: warning: using default configuration: {:#}",
            anyhow::Error::new(e)
        );
        Config::default()
    })
}

/// Make sure `player` is in the store and fetch their saved session.  Store
/// failures at this point only cost the player their saved progress.
fn start_session(store: &mut SessionStore, player: &str) -> Session {
    let r = store
        .get_or_create(player)
        .and_then(|(level, score)| {
            log::info!("Welcome {player:?}: level {level}, score {score}");
            store.load(player)
        });
    r.unwrap_or_else(|e| {
        log::error!(
            "Failed to load session for {player:?}; starting fresh: {:#}",
            anyhow::Error::new(e)
        );
        Session::default()
    })
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe)
}
