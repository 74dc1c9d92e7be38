use crate::game::{Effect, Game};
use crate::store::SessionStore;
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;

/// A running game together with the store its session is saved to
#[derive(Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng> {
    game: Game<R>,
    store: SessionStore,
}

impl<R> App<R> {
    pub(crate) fn new(game: Game<R>, store: SessionStore) -> App<R> {
        App { game, store }
    }

    fn apply(&mut self, effect: Effect) {
        let player = self.game.player();
        match self.store.save(player, &self.game.session()) {
            Ok(()) => log::info!("Saved session for {player:?}"),
            Err(e) => log::error!(
                "Failed to save session for {player:?}: {:#}",
                anyhow::Error::new(e)
            ),
        }
        if effect == Effect::Exit {
            log::info!("Exiting");
        }
    }
}

impl<R: Rng> App<R> {
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.game.terminated() {
            terminal.draw(|frame| self.game.draw(frame))?;
            if let Some(effect) = self.game.process_input()? {
                self.apply(effect);
            }
        }
        Ok(())
    }
}
