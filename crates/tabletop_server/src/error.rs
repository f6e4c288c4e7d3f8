//! Error types for the tabletop server.
//!
//! [`GameError`] covers every request-scoped failure. All of them are
//! recoverable: the board is left exactly as it was and the caller receives a
//! 4xx response carrying the error kind and a readable message.
//! [`ServerError`] covers startup and runtime failures of the server itself.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tabletop_rules::RuleError;
use thiserror::Error;
use tracing::debug;

/// Request-scoped failures reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Invalid board id")]
    InvalidBoardId,

    #[error("Board does not exist")]
    BoardNotFound,

    #[error("Player not identified, choose a color or join the room first")]
    IdentityRequired,

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("The room is full")]
    RoomFull,

    #[error("The game has already started")]
    AlreadyStarted,

    #[error("The game is not in progress")]
    GameNotStarted,

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("The game is already over")]
    GameOver,

    #[error("There is nothing to undo")]
    NoHistory,

    #[error("You can only undo your own last move")]
    NotYourLastMove,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("This board does not support {0}")]
    UnsupportedOperation(&'static str),

    /// A move rejected by the rule engine
    #[error(transparent)]
    Rule(RuleError),
}

impl GameError {
    /// Stable machine-readable name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InvalidBoardId => "InvalidBoardId",
            GameError::BoardNotFound => "BoardNotFound",
            GameError::IdentityRequired => "IdentityRequired",
            GameError::InvalidColor(_) => "InvalidColor",
            GameError::RoomFull => "RoomFull",
            GameError::AlreadyStarted => "AlreadyStarted",
            GameError::GameNotStarted => "GameNotStarted",
            GameError::NotYourTurn => "NotYourTurn",
            GameError::GameOver => "GameOver",
            GameError::NoHistory => "NoHistory",
            GameError::NotYourLastMove => "NotYourLastMove",
            GameError::InvalidRequest(_) => "InvalidRequest",
            GameError::UnsupportedOperation(_) => "UnsupportedOperation",
            GameError::Rule(rule) => match rule {
                RuleError::OutOfBounds { .. } => "OutOfBounds",
                RuleError::CellOccupied { .. } => "CellOccupied",
                RuleError::NoMovement => "NoMovement",
                RuleError::NotStraightLine => "NotStraightLine",
                RuleError::InvalidDistance(_) => "InvalidDistance",
                RuleError::PathBlocked { .. } => "PathBlocked",
                RuleError::InvalidLineGeometry => "InvalidLineGeometry",
                RuleError::DuplicateLine => "DuplicateLine",
                RuleError::WallOutOfBounds => "WallOutOfBounds",
                RuleError::DuplicateWall => "DuplicateWall",
                RuleError::WrongPhase { .. } => "WrongPhase",
                RuleError::WrongPlayerCount { .. } => "WrongPlayerCount",
                // Converted to dedicated variants by `From<RuleError>`
                RuleError::NotYourTurn => "NotYourTurn",
                RuleError::GameOver => "GameOver",
                RuleError::NotStarted => "GameNotStarted",
                RuleError::AlreadyStarted => "AlreadyStarted",
                RuleError::RoomFull => "RoomFull",
                RuleError::UnknownSeat => "IdentityRequired",
            },
        }
    }

    /// HTTP status the error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GameError::BoardNotFound | GameError::UnsupportedOperation(_) => StatusCode::NOT_FOUND,
            GameError::IdentityRequired
            | GameError::NotYourTurn
            | GameError::NotYourLastMove
            | GameError::RoomFull
            | GameError::AlreadyStarted => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<RuleError> for GameError {
    fn from(error: RuleError) -> Self {
        match error {
            RuleError::NotYourTurn => GameError::NotYourTurn,
            RuleError::GameOver => GameError::GameOver,
            RuleError::NotStarted => GameError::GameNotStarted,
            RuleError::AlreadyStarted => GameError::AlreadyStarted,
            RuleError::RoomFull => GameError::RoomFull,
            RuleError::UnknownSeat => GameError::IdentityRequired,
            other => GameError::Rule(other),
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        debug!(kind = self.kind(), "Request rejected: {}", self);
        let body = json!({
            "error": self.to_string(),
            "kind": self.kind(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Binding or serving failed
    #[error("Network error: {0}")]
    Network(String),
    /// Anything else that stops the server
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabletop_rules::BlockedBy;

    #[test]
    fn test_rule_errors_keep_their_kind() {
        let error = GameError::from(RuleError::PathBlocked { by: BlockedBy::Wall });
        assert_eq!(error.kind(), "PathBlocked");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "Path is blocked by a wall");
    }

    #[test]
    fn test_turn_errors_become_dedicated_variants() {
        assert_eq!(GameError::from(RuleError::NotYourTurn), GameError::NotYourTurn);
        assert_eq!(GameError::from(RuleError::RoomFull), GameError::RoomFull);
        assert_eq!(GameError::from(RuleError::NotStarted), GameError::GameNotStarted);
        assert_eq!(GameError::NotYourTurn.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_lookup_errors_map_to_not_found() {
        assert_eq!(GameError::BoardNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(GameError::InvalidBoardId.status_code(), StatusCode::BAD_REQUEST);
    }
}
