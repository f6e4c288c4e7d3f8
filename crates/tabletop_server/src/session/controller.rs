//! Turn and identity enforcement around a rule engine.
//!
//! The controller decides *who* may act and *when*; the wrapped engine
//! decides *what* is legal. Every accepted move pushes the previous state
//! onto a bounded history so the mover can take it back.

use super::history::{History, Snapshot};
use super::GameStatus;
use crate::error::GameError;
use crate::identity::PlayerToken;
use std::collections::HashMap;
use std::sync::Arc;
use tabletop_rules::{RuleEngine, SiegeColor, SiegeGame};

#[derive(Debug)]
pub struct TurnController<E: RuleEngine> {
    engine: Arc<E>,
    status: GameStatus,
    seats: HashMap<PlayerToken, E::Seat>,
    history: History<E>,
}

impl<E: RuleEngine> TurnController<E> {
    /// Creates a controller around a fresh engine.
    ///
    /// # Arguments
    ///
    /// * `history_depth` - Maximum number of moves that can be undone
    pub fn new(history_depth: usize) -> Self {
        Self {
            engine: Arc::new(E::default()),
            status: Self::initial_status(),
            seats: HashMap::new(),
            history: History::new(history_depth),
        }
    }

    fn initial_status() -> GameStatus {
        if E::VARIANT.has_lobby() {
            GameStatus::Waiting
        } else {
            GameStatus::Playing
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Seat bound to `token`, if any.
    pub fn seat_of(&self, token: Option<&PlayerToken>) -> Option<E::Seat> {
        token.and_then(|t| self.seats.get(t)).copied()
    }

    /// Whether the holder of `token` may act right now.
    pub fn is_turn_of(&self, token: Option<&PlayerToken>) -> bool {
        self.status == GameStatus::Playing
            && self
                .seat_of(token)
                .is_some_and(|seat| self.engine.is_turn_of(seat))
    }

    /// Binds `token` to `seat`. A token keeps the first seat it was given.
    ///
    /// # Returns
    ///
    /// The seat the token holds after the call.
    pub fn select_seat(&mut self, token: &PlayerToken, seat: E::Seat) -> E::Seat {
        *self.seats.entry(token.clone()).or_insert(seat)
    }

    /// Validates and applies one action on behalf of `token`.
    ///
    /// Checks run in a fixed order: game state, identity, turn, then the
    /// engine's own legality rules. Nothing changes unless all of them pass.
    pub fn apply(&mut self, token: Option<&PlayerToken>, action: E::Action) -> Result<(), GameError> {
        match self.status {
            GameStatus::Finished => return Err(GameError::GameOver),
            GameStatus::Waiting => return Err(GameError::GameNotStarted),
            GameStatus::Playing => {}
        }
        let token = token.ok_or(GameError::IdentityRequired)?;
        let seat = *self.seats.get(token).ok_or(GameError::IdentityRequired)?;
        if !self.engine.is_turn_of(seat) {
            return Err(GameError::NotYourTurn);
        }

        let mut next = E::clone(&self.engine);
        next.apply(seat, action)?;

        self.history.push(Snapshot {
            engine: Arc::clone(&self.engine),
            status: self.status,
            actor: token.clone(),
        });
        self.engine = Arc::new(next);
        if self.engine.outcome().is_over() {
            self.status = GameStatus::Finished;
        }
        Ok(())
    }

    /// Restores the state before the most recent move, provided `token`
    /// made that move.
    pub fn undo(&mut self, token: Option<&PlayerToken>) -> Result<(), GameError> {
        let token = token
            .filter(|t| self.seats.contains_key(*t))
            .ok_or(GameError::IdentityRequired)?;
        let last = self.history.last().ok_or(GameError::NoHistory)?;
        if last.actor != *token {
            return Err(GameError::NotYourLastMove);
        }
        if let Some(snapshot) = self.history.pop() {
            self.engine = snapshot.engine;
            self.status = snapshot.status;
        }
        Ok(())
    }

    /// Returns the board to its starting configuration.
    ///
    /// Lobby games also forget their roster; other games keep seat bindings.
    pub fn reset(&mut self) {
        self.engine = Arc::new(E::default());
        self.status = Self::initial_status();
        self.history.clear();
        if E::VARIANT.has_lobby() {
            self.seats.clear();
        }
    }
}

impl TurnController<SiegeGame> {
    /// Seats `token` in the lobby, or returns the seat it already holds.
    pub fn join(&mut self, token: &PlayerToken) -> Result<SiegeColor, GameError> {
        if self.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        if let Some(color) = self.seats.get(token) {
            return Ok(*color);
        }
        let color = Arc::make_mut(&mut self.engine).join()?;
        self.seats.insert(token.clone(), color);
        Ok(color)
    }

    /// Places every joined player and opens the first turn.
    pub fn start(&mut self) -> Result<(), GameError> {
        if self.status != GameStatus::Waiting {
            return Err(GameError::AlreadyStarted);
        }
        Arc::make_mut(&mut self.engine).start()?;
        self.status = GameStatus::Playing;
        Ok(())
    }
}
