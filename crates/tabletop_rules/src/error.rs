//! Rule violation types shared by all engines

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// What stopped a siege piece part-way along its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockedBy {
    Wall,
    Player,
}

impl fmt::Display for BlockedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockedBy::Wall => f.write_str("a wall"),
            BlockedBy::Player => f.write_str("another player"),
        }
    }
}

/// Reasons an engine refuses an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Position ({x}, {y}) is outside the board")]
    OutOfBounds { x: i32, y: i32 },

    #[error("Cell ({x}, {y}) is already occupied")]
    CellOccupied { x: i32, y: i32 },

    #[error("A piece must move at least one cell")]
    NoMovement,

    #[error("Pieces may only move in a straight line up, down, left or right")]
    NotStraightLine,

    #[error("Each move must cover 1 to 3 cells, requested {0}")]
    InvalidDistance(u32),

    #[error("Path is blocked by {by}")]
    PathBlocked { by: BlockedBy },

    #[error("Invalid move: choose two points that form a straight line of length 4")]
    InvalidLineGeometry,

    #[error("Invalid move: this line already exists")]
    DuplicateLine,

    #[error("Walls cannot be placed outside the board")]
    WallOutOfBounds,

    #[error("There is already a wall on that edge")]
    DuplicateWall,

    #[error("Expected a {expected} action")]
    WrongPhase { expected: &'static str },

    #[error("It is not your turn")]
    NotYourTurn,

    #[error("The game is already over")]
    GameOver,

    #[error("The game has not started yet")]
    NotStarted,

    #[error("The game has already started")]
    AlreadyStarted,

    #[error("The room is full")]
    RoomFull,

    #[error("A game needs 1 to {max} players, found {found}")]
    WrongPlayerCount { found: usize, max: usize },

    #[error("No player holds that seat")]
    UnknownSeat,
}

/// Convenience alias for engine results
pub type RuleResult<T> = Result<T, RuleError>;
