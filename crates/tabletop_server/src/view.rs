//! Serializable game-state views returned to clients.
//!
//! Every variant shares the same top-level fields; the board-specific data is
//! flattened alongside them.

use crate::identity::PlayerToken;
use crate::session::{Board, GameStatus, Session, SessionState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tabletop_rules::hex::Hex;
use tabletop_rules::line::{self, LineGame, Placement, Stone};
use tabletop_rules::siege::{self, Phase, SiegeColor, SiegeGame, SiegePlayer, Wall};
use tabletop_rules::triangle::{CapturedTriangle, DrawnLine, TriangleColor, TriangleGame};
use tabletop_rules::Variant;

/// Board bookkeeping shown with every state.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub board_id: String,
    pub variant: Variant,
    pub title: &'static str,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub version: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub your_turn: bool,
    pub my_color: Option<Value>,
    pub status: GameStatus,
    pub game_over: bool,
    pub winner: Option<Value>,
    pub message: String,
    pub online: u32,
    pub undo_depth: usize,
    pub metadata: Metadata,
    #[serde(flatten)]
    pub details: VariantView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum VariantView {
    Line(LineView),
    Triangle(TriangleView),
    Siege(SiegeView),
}

#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    /// Rows of `0`, `1` or `-1`, indexed `[y][x]`
    pub board: Vec<Vec<i8>>,
    pub board_size: usize,
    pub current_turn: Stone,
    pub last_move: Option<Placement>,
    pub move_history: Vec<Placement>,
    pub move_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TriangleView {
    pub players: Vec<TriangleColor>,
    pub points: Vec<Hex>,
    pub lines: Vec<DrawnLine>,
    pub captured_triangles: Vec<CapturedTriangle>,
    pub scores: BTreeMap<TriangleColor, u32>,
    pub line_counts: BTreeMap<TriangleColor, u32>,
    pub last_move_color: Option<TriangleColor>,
    pub total_triangles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiegeView {
    pub players: Vec<SiegePlayer>,
    pub current_turn: usize,
    pub phase: Phase,
    pub walls: Vec<Wall>,
    pub scores: BTreeMap<SiegeColor, u32>,
    pub board_size: i32,
}

impl From<&LineGame> for LineView {
    fn from(game: &LineGame) -> Self {
        Self {
            board: game.grid(),
            board_size: line::BOARD_SIZE,
            current_turn: game.next_color(),
            last_move: game.last_move().copied(),
            move_history: game.moves().to_vec(),
            move_count: game.moves().len(),
        }
    }
}

impl From<&TriangleGame> for TriangleView {
    fn from(game: &TriangleGame) -> Self {
        Self {
            players: TriangleColor::PALETTE.to_vec(),
            points: Hex::all_points(),
            lines: game.lines().to_vec(),
            captured_triangles: game.captured().to_vec(),
            scores: game.scores().clone(),
            line_counts: game.line_counts().clone(),
            last_move_color: game.last_move_color(),
            total_triangles: game.total_triangles(),
        }
    }
}

impl From<&SiegeGame> for SiegeView {
    fn from(game: &SiegeGame) -> Self {
        Self {
            players: game.players().to_vec(),
            current_turn: game.current_turn(),
            phase: game.phase(),
            walls: game.walls().to_vec(),
            scores: game.final_scores().iter().copied().collect(),
            board_size: siege::BOARD_SIZE,
        }
    }
}

impl GameView {
    /// Builds the view of `state` as seen by the holder of `token`.
    pub fn build(session: &Session, state: &SessionState, token: Option<&PlayerToken>) -> Self {
        let board = &state.board;
        let details = match board {
            Board::Line(c) => VariantView::Line(c.engine().into()),
            Board::Triangle(c) => VariantView::Triangle(c.engine().into()),
            Board::Siege(c) => VariantView::Siege(c.engine().into()),
        };
        let status = board.status();
        let variant = board.variant();

        Self {
            your_turn: board.is_turn_of(token),
            my_color: board.seat_of(token),
            status,
            game_over: status == GameStatus::Finished,
            winner: board.winner(),
            message: board.message(),
            online: session.online(),
            undo_depth: board.undo_depth(),
            metadata: Metadata {
                board_id: session.id().to_string(),
                variant,
                title: variant.title(),
                created_at: session.created_at(),
                last_updated: state.last_updated(),
                version: state.version(),
            },
            details,
        }
    }
}
