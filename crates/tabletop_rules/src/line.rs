//! Five-in-a-row on a 15x15 grid.
//!
//! Black always opens and colors strictly alternate. After each placement the
//! four axes through the new stone are scanned for a run of five or more.

use crate::error::{RuleError, RuleResult};
use crate::{Outcome, RuleEngine, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the grid.
pub const BOARD_SIZE: usize = 15;

/// Consecutive stones needed to win.
pub const WIN_LENGTH: usize = 5;

const AXES: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Stone colors. Serialized as `1` (black) and `-1` (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stone::Black => "Black",
            Stone::White => "White",
        }
    }
}

impl From<Stone> for i8 {
    fn from(stone: Stone) -> i8 {
        match stone {
            Stone::Black => 1,
            Stone::White => -1,
        }
    }
}

impl TryFrom<i8> for Stone {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stone::Black),
            -1 => Ok(Stone::White),
            other => Err(format!("invalid stone color {}, expected 1 or -1", other)),
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A requested placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineMove {
    pub x: i32,
    pub y: i32,
}

/// A stone that has been played, in move order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub x: usize,
    pub y: usize,
    pub color: Stone,
}

/// Complete state of one line game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineGame {
    cells: Vec<Option<Stone>>,
    moves: Vec<Placement>,
    winner: Option<Stone>,
    game_over: bool,
}

impl Default for LineGame {
    fn default() -> Self {
        Self {
            cells: vec![None; BOARD_SIZE * BOARD_SIZE],
            moves: Vec::new(),
            winner: None,
            game_over: false,
        }
    }
}

impl LineGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stone at `(x, y)`, `None` when empty or off the board.
    pub fn stone_at(&self, x: i32, y: i32) -> Option<Stone> {
        Self::index(x, y).and_then(|i| self.cells[i])
    }

    /// Color whose turn it is: black on an empty board, otherwise the
    /// opponent of whoever moved last.
    pub fn next_color(&self) -> Stone {
        self.moves
            .last()
            .map(|p| p.color.opponent())
            .unwrap_or(Stone::Black)
    }

    pub fn last_move(&self) -> Option<&Placement> {
        self.moves.last()
    }

    pub fn moves(&self) -> &[Placement] {
        &self.moves
    }

    pub fn winner(&self) -> Option<Stone> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Rows of the grid as `0`, `1` or `-1`, indexed `[y][x]`.
    pub fn grid(&self) -> Vec<Vec<i8>> {
        self.cells
            .chunks(BOARD_SIZE)
            .map(|row| row.iter().map(|c| c.map(i8::from).unwrap_or(0)).collect())
            .collect()
    }

    /// Places a stone of `color` at `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Grid coordinates, both in `0..15`
    /// * `color` - Must match [`LineGame::next_color`]
    ///
    /// # Returns
    ///
    /// `Ok(())` once the stone is down and the position has been evaluated.
    pub fn place(&mut self, x: i32, y: i32, color: Stone) -> RuleResult<()> {
        if self.game_over {
            return Err(RuleError::GameOver);
        }
        let index = Self::index(x, y).ok_or(RuleError::OutOfBounds { x, y })?;
        if self.cells[index].is_some() {
            return Err(RuleError::CellOccupied { x, y });
        }
        if color != self.next_color() {
            return Err(RuleError::NotYourTurn);
        }

        self.cells[index] = Some(color);
        self.moves.push(Placement {
            x: x as usize,
            y: y as usize,
            color,
        });

        if self.completes_run(x, y, color) {
            self.winner = Some(color);
            self.game_over = true;
        } else if self.moves.len() == BOARD_SIZE * BOARD_SIZE {
            self.game_over = true;
        }
        Ok(())
    }

    fn completes_run(&self, x: i32, y: i32, color: Stone) -> bool {
        AXES.iter().any(|&(dx, dy)| {
            let count = 1 + self.run_length(x, y, dx, dy, color) + self.run_length(x, y, -dx, -dy, color);
            count >= WIN_LENGTH
        })
    }

    fn run_length(&self, x: i32, y: i32, dx: i32, dy: i32, color: Stone) -> usize {
        let mut count = 0;
        let (mut cx, mut cy) = (x + dx, y + dy);
        while self.stone_at(cx, cy) == Some(color) {
            count += 1;
            cx += dx;
            cy += dy;
        }
        count
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(y as usize * BOARD_SIZE + x as usize)
        } else {
            None
        }
    }
}

impl RuleEngine for LineGame {
    type Seat = Stone;
    type Action = LineMove;

    const VARIANT: Variant = Variant::Line;

    fn is_turn_of(&self, seat: Stone) -> bool {
        !self.game_over && seat == self.next_color()
    }

    fn apply(&mut self, seat: Stone, action: LineMove) -> RuleResult<()> {
        self.place(action.x, action.y, seat)
    }

    fn outcome(&self) -> Outcome<Stone> {
        match (self.game_over, self.winner) {
            (false, _) => Outcome::InProgress,
            (true, Some(stone)) => Outcome::Winner(stone),
            (true, None) => Outcome::Draw,
        }
    }

    fn message(&self) -> String {
        match self.outcome() {
            Outcome::InProgress if self.moves.is_empty() => {
                "Choose a color to begin. Black moves first.".to_string()
            }
            Outcome::InProgress => format!("{} to move", self.next_color()),
            Outcome::Winner(stone) => format!("Game over: {} wins", stone),
            Outcome::Draw => "Game over: the board is full, it's a draw".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut LineGame, moves: &[(i32, i32)]) {
        for &(x, y) in moves {
            let color = game.next_color();
            game.place(x, y, color).unwrap();
        }
    }

    #[test]
    fn test_black_opens_and_colors_alternate() {
        let mut game = LineGame::new();
        assert_eq!(game.next_color(), Stone::Black);
        assert_eq!(game.place(7, 7, Stone::White), Err(RuleError::NotYourTurn));

        game.place(7, 7, Stone::Black).unwrap();
        assert_eq!(game.next_color(), Stone::White);
        assert!(game.is_turn_of(Stone::White));
        assert!(!game.is_turn_of(Stone::Black));
    }

    #[test]
    fn test_horizontal_five_wins() {
        let mut game = LineGame::new();
        play(
            &mut game,
            &[(7, 7), (0, 0), (8, 7), (0, 1), (9, 7), (0, 2), (10, 7), (0, 3)],
        );
        assert!(!game.is_over());

        game.place(11, 7, Stone::Black).unwrap();
        assert!(game.is_over());
        assert_eq!(game.outcome(), Outcome::Winner(Stone::Black));
        assert_eq!(game.place(12, 7, Stone::White), Err(RuleError::GameOver));
    }

    #[test]
    fn test_anti_diagonal_counts_both_directions() {
        let mut game = LineGame::new();
        // The winning stone lands in the middle of the run.
        play(
            &mut game,
            &[(3, 7), (0, 0), (4, 6), (0, 1), (6, 4), (0, 2), (7, 3), (0, 3)],
        );
        game.place(5, 5, Stone::Black).unwrap();
        assert_eq!(game.winner(), Some(Stone::Black));
    }

    #[test]
    fn test_four_in_a_row_does_not_win() {
        let mut game = LineGame::new();
        play(&mut game, &[(0, 0), (14, 14), (0, 1), (14, 13), (0, 2), (14, 12), (0, 3)]);
        assert!(!game.is_over());
        assert_eq!(game.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_rejects_occupied_and_out_of_bounds() {
        let mut game = LineGame::new();
        game.place(3, 3, Stone::Black).unwrap();
        let before = game.clone();

        assert_eq!(
            game.place(3, 3, Stone::White),
            Err(RuleError::CellOccupied { x: 3, y: 3 })
        );
        assert_eq!(
            game.place(15, 0, Stone::White),
            Err(RuleError::OutOfBounds { x: 15, y: 0 })
        );
        assert_eq!(
            game.place(0, -1, Stone::White),
            Err(RuleError::OutOfBounds { x: 0, y: -1 })
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_full_board_without_run_is_a_draw() {
        let mut game = LineGame::new();
        // Runs never exceed two stones along any axis with this coloring.
        let mut order = Vec::new();
        for y in 0..BOARD_SIZE as i32 {
            for x in 0..BOARD_SIZE as i32 {
                order.push((x, y));
            }
        }
        let color_of = |x: i32, y: i32| {
            if (x + 2 * y) % 4 < 2 {
                Stone::Black
            } else {
                Stone::White
            }
        };
        let (mut blacks, mut whites): (Vec<_>, Vec<_>) =
            order.into_iter().partition(|&(x, y)| color_of(x, y) == Stone::Black);
        assert_eq!(blacks.len(), whites.len() + 1);

        blacks.reverse();
        whites.reverse();
        while let Some((x, y)) = blacks.pop() {
            game.place(x, y, Stone::Black).unwrap();
            if let Some((x, y)) = whites.pop() {
                game.place(x, y, Stone::White).unwrap();
            }
        }
        assert!(game.is_over());
        assert_eq!(game.outcome(), Outcome::Draw);
    }

    #[test]
    fn test_grid_is_indexed_by_row() {
        let mut game = LineGame::new();
        game.place(4, 2, Stone::Black).unwrap();
        game.place(2, 4, Stone::White).unwrap();
        let grid = game.grid();
        assert_eq!(grid[2][4], 1);
        assert_eq!(grid[4][2], -1);
        assert_eq!(game.moves().len(), 2);
        assert_eq!(game.last_move().map(|p| (p.x, p.y)), Some((2, 4)));
    }

    #[test]
    fn test_stone_serializes_as_signed_integer() {
        assert_eq!(serde_json::to_string(&Stone::White).unwrap(), "-1");
        let stone: Stone = serde_json::from_str("1").unwrap();
        assert_eq!(stone, Stone::Black);
        assert!(serde_json::from_str::<Stone>("0").is_err());
    }
}
