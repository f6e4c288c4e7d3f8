//! Board identifiers

use crate::error::GameError;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// An 8-character alphanumeric token naming one board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub const LEN: usize = 8;

    /// Validates a client-supplied id.
    pub fn parse(raw: &str) -> Result<Self, GameError> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(GameError::InvalidBoardId)
        }
    }

    /// Draws a fresh id uniformly from `[A-Za-z0-9]`.
    pub fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(Self::LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for BoardId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
