//! # Tabletop Rules - Pure Game Logic
//!
//! Rule engines for the three board games hosted by the tabletop server:
//!
//! * [`LineGame`] - a 15x15 five-in-a-row game for two colors
//! * [`TriangleGame`] - lines drawn on a radius-3 hex grid capture triangles
//! * [`SiegeGame`] - up to five players move and build walls on a 5x5 grid
//!
//! ## Design Philosophy
//!
//! The engines contain **NO session, identity or concurrency logic**. They
//! decide whether a move is legal, apply it, and report the outcome. Who may
//! act, undo history and locking all live in the server crate, which drives
//! every engine through the [`RuleEngine`] trait.
//!
//! An engine never mutates itself when it rejects an action: every check runs
//! before the first write, so a `Err` return leaves the state exactly as it was.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

pub mod error;
pub mod hex;
pub mod line;
pub mod siege;
pub mod triangle;

pub use error::{BlockedBy, RuleError, RuleResult};
pub use hex::Hex;
pub use line::{LineGame, LineMove, Placement, Stone};
pub use siege::{Cell, Direction, Phase, SiegeAction, SiegeColor, SiegeGame, SiegePlayer, Wall};
pub use triangle::{TriangleColor, TriangleGame, TriangleMove};

/// The game variants a server instance can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Five in a row on a 15x15 grid
    Line,
    /// Triangle capture on a hex grid
    Triangle,
    /// Movement and wall building on a 5x5 grid
    Siege,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Line, Variant::Triangle, Variant::Siege];

    /// Stable lowercase name used in config files and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Line => "line",
            Variant::Triangle => "triangle",
            Variant::Siege => "siege",
        }
    }

    /// Display name shown to players.
    pub fn title(&self) -> &'static str {
        match self {
            Variant::Line => "Gomoku",
            Variant::Triangle => "Triangle Chain",
            Variant::Siege => "Siege",
        }
    }

    /// Port each variant listens on unless configured otherwise.
    pub fn default_port(&self) -> u16 {
        match self {
            Variant::Triangle => 35101,
            Variant::Line => 35102,
            Variant::Siege => 35103,
        }
    }

    /// Whether seats are handed out by a pre-game lobby (join + start)
    /// instead of free color selection.
    pub fn has_lobby(&self) -> bool {
        matches!(self, Variant::Siege)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "gomoku" | "gobang" => Ok(Variant::Line),
            "triangle" | "hexagon" => Ok(Variant::Triangle),
            "siege" => Ok(Variant::Siege),
            other => Err(format!(
                "unknown variant '{}', expected one of: line, triangle, siege",
                other
            )),
        }
    }
}

/// Result of evaluating a board after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<S> {
    InProgress,
    Winner(S),
    Draw,
}

impl<S> Outcome<S> {
    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Contract every game variant implements for the turn controller.
///
/// The controller resolves the requester to a `Seat`, asks [`RuleEngine::is_turn_of`]
/// whether that seat may act, then hands the action to [`RuleEngine::apply`].
/// Implementations must validate completely before mutating.
pub trait RuleEngine: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// A color or slot a participant is bound to.
    type Seat: Copy + Eq + Hash + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// A single turn-consuming action.
    type Action: fmt::Debug + Send;

    const VARIANT: Variant;

    /// Whether `seat` is allowed to act right now.
    fn is_turn_of(&self, seat: Self::Seat) -> bool;

    /// Validates and applies `action` on behalf of `seat`.
    fn apply(&mut self, seat: Self::Seat, action: Self::Action) -> RuleResult<()>;

    /// Win / draw evaluation of the current position.
    fn outcome(&self) -> Outcome<Self::Seat>;

    /// Human readable summary of the current position.
    fn message(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parsing_accepts_aliases() {
        assert_eq!("gomoku".parse::<Variant>(), Ok(Variant::Line));
        assert_eq!("Hexagon".parse::<Variant>(), Ok(Variant::Triangle));
        assert_eq!(" siege ".parse::<Variant>(), Ok(Variant::Siege));
        assert!("chess".parse::<Variant>().is_err());
    }

    #[test]
    fn test_variant_round_trips_through_serde() {
        for variant in Variant::ALL {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant.as_str()));
            let back: Variant = serde_json::from_str(&json).unwrap();
            assert_eq!(back, variant);
        }
    }

    #[test]
    fn test_only_siege_uses_a_lobby() {
        assert!(Variant::Siege.has_lobby());
        assert!(!Variant::Line.has_lobby());
        assert!(!Variant::Triangle.has_lobby());
    }
}
