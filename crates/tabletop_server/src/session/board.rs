//! One concrete game per variant, behind a single type.
//!
//! [`Board`] turns loosely typed request bodies into the typed actions each
//! engine expects and routes them to the matching [`TurnController`].

use super::controller::TurnController;
use super::GameStatus;
use crate::error::GameError;
use crate::identity::PlayerToken;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tabletop_rules::{
    Cell, Direction, LineGame, LineMove, Outcome, RuleEngine, SiegeAction, SiegeGame, Stone,
    TriangleColor, TriangleGame, TriangleMove, Variant,
};

#[derive(Debug, Deserialize)]
struct ColorBody {
    color: Value,
}

#[derive(Debug, Deserialize)]
struct SiegeMoveBody {
    target: Cell,
}

#[derive(Debug, Deserialize)]
struct BuildBody {
    wall: (i32, i32, Direction),
}

fn parse_body<T: DeserializeOwned>(body: Value) -> Result<T, GameError> {
    serde_json::from_value(body).map_err(|e| GameError::InvalidRequest(e.to_string()))
}

fn seat_json<S: serde::Serialize>(seat: S) -> Value {
    serde_json::to_value(seat).unwrap_or(Value::Null)
}

fn outcome_json<S: serde::Serialize>(outcome: Outcome<S>) -> Option<Value> {
    match outcome {
        Outcome::Winner(seat) => Some(seat_json(seat)),
        Outcome::Draw | Outcome::InProgress => None,
    }
}

#[derive(Debug)]
pub enum Board {
    Line(TurnController<LineGame>),
    Triangle(TurnController<TriangleGame>),
    Siege(TurnController<SiegeGame>),
}

impl Board {
    pub fn new(variant: Variant, history_depth: usize) -> Self {
        match variant {
            Variant::Line => Board::Line(TurnController::new(history_depth)),
            Variant::Triangle => Board::Triangle(TurnController::new(history_depth)),
            Variant::Siege => Board::Siege(TurnController::new(history_depth)),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Board::Line(_) => Variant::Line,
            Board::Triangle(_) => Variant::Triangle,
            Board::Siege(_) => Variant::Siege,
        }
    }

    pub fn status(&self) -> GameStatus {
        match self {
            Board::Line(c) => c.status(),
            Board::Triangle(c) => c.status(),
            Board::Siege(c) => c.status(),
        }
    }

    pub fn undo_depth(&self) -> usize {
        match self {
            Board::Line(c) => c.undo_depth(),
            Board::Triangle(c) => c.undo_depth(),
            Board::Siege(c) => c.undo_depth(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Board::Line(c) => c.engine().message(),
            Board::Triangle(c) => c.engine().message(),
            Board::Siege(c) => c.engine().message(),
        }
    }

    /// Winning seat as it appears on the wire, `None` while playing or on a draw.
    pub fn winner(&self) -> Option<Value> {
        match self {
            Board::Line(c) => outcome_json(c.engine().outcome()),
            Board::Triangle(c) => outcome_json(c.engine().outcome()),
            Board::Siege(c) => outcome_json(c.engine().outcome()),
        }
    }

    /// Seat bound to `token` as it appears on the wire.
    pub fn seat_of(&self, token: Option<&PlayerToken>) -> Option<Value> {
        match self {
            Board::Line(c) => c.seat_of(token).map(seat_json),
            Board::Triangle(c) => c.seat_of(token).map(seat_json),
            Board::Siege(c) => c.seat_of(token).map(seat_json),
        }
    }

    pub fn is_turn_of(&self, token: Option<&PlayerToken>) -> bool {
        match self {
            Board::Line(c) => c.is_turn_of(token),
            Board::Triangle(c) => c.is_turn_of(token),
            Board::Siege(c) => c.is_turn_of(token),
        }
    }

    /// Binds `token` to the color named in `body` (`{"color": ...}`).
    pub fn select_color(&mut self, token: &PlayerToken, body: Value) -> Result<Value, GameError> {
        let ColorBody { color } = parse_body(body)?;
        match self {
            Board::Line(c) => {
                let stone = color
                    .as_i64()
                    .and_then(|v| i8::try_from(v).ok())
                    .and_then(|v| Stone::try_from(v).ok())
                    .ok_or_else(|| GameError::InvalidColor(color.to_string()))?;
                Ok(seat_json(c.select_seat(token, stone)))
            }
            Board::Triangle(c) => {
                let choice = color
                    .as_str()
                    .and_then(TriangleColor::from_code)
                    .ok_or_else(|| GameError::InvalidColor(color.to_string()))?;
                Ok(seat_json(c.select_seat(token, choice)))
            }
            Board::Siege(_) => Err(GameError::UnsupportedOperation("color selection")),
        }
    }

    pub fn join(&mut self, token: &PlayerToken) -> Result<Value, GameError> {
        match self {
            Board::Siege(c) => c.join(token).map(seat_json),
            _ => Err(GameError::UnsupportedOperation("joining")),
        }
    }

    pub fn start(&mut self) -> Result<(), GameError> {
        match self {
            Board::Siege(c) => c.start(),
            _ => Err(GameError::UnsupportedOperation("starting")),
        }
    }

    /// Applies the variant's move action described by `body`.
    pub fn play(&mut self, token: Option<&PlayerToken>, body: Value) -> Result<(), GameError> {
        match self {
            Board::Line(c) => {
                let action: LineMove = parse_body(body)?;
                c.apply(token, action)
            }
            Board::Triangle(c) => {
                let action: TriangleMove = parse_body(body)?;
                c.apply(token, action)
            }
            Board::Siege(c) => {
                let SiegeMoveBody { target } = parse_body(body)?;
                c.apply(token, SiegeAction::Move { target })
            }
        }
    }

    /// Places a wall described by `{"wall": [x, y, direction]}`.
    pub fn build(&mut self, token: Option<&PlayerToken>, body: Value) -> Result<(), GameError> {
        match self {
            Board::Siege(c) => {
                let BuildBody { wall: (x, y, direction) } = parse_body(body)?;
                c.apply(
                    token,
                    SiegeAction::Build {
                        cell: Cell::new(x, y),
                        direction,
                    },
                )
            }
            _ => Err(GameError::UnsupportedOperation("wall building")),
        }
    }

    pub fn undo(&mut self, token: Option<&PlayerToken>) -> Result<(), GameError> {
        match self {
            Board::Line(c) => c.undo(token),
            Board::Triangle(c) => c.undo(token),
            Board::Siege(c) => c.undo(token),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Board::Line(c) => c.reset(),
            Board::Triangle(c) => c.reset(),
            Board::Siege(c) => c.reset(),
        }
    }
}
