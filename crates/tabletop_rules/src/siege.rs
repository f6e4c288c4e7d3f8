//! Siege: movement and wall building on a 5x5 grid.
//!
//! Every turn has two mandatory halves. The active player first slides their
//! piece 1 to 3 cells in a straight line, then places a wall on one edge of any
//! cell. Walls block crossing from both sides. The game ends when every player
//! is trapped or when the walls have split the players into separate regions;
//! the player who can reach the most empty cells wins.

use crate::error::{BlockedBy, RuleError, RuleResult};
use crate::{Outcome, RuleEngine, Variant};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;

pub const BOARD_SIZE: i32 = 5;
pub const MAX_PLAYERS: usize = 5;

/// Longest slide allowed in a single move.
pub const MAX_STEP: u32 = 3;

/// Starting cells keyed by player count.
fn start_positions(players: usize) -> &'static [Cell] {
    static ONE: [Cell; 1] = [Cell::new(0, 0)];
    static TWO: [Cell; 2] = [Cell::new(0, 0), Cell::new(4, 4)];
    static THREE: [Cell; 3] = [Cell::new(0, 0), Cell::new(4, 0), Cell::new(2, 4)];
    static FOUR: [Cell; 4] = [Cell::new(0, 0), Cell::new(4, 0), Cell::new(0, 4), Cell::new(4, 4)];
    static FIVE: [Cell; 5] = [
        Cell::new(0, 0),
        Cell::new(4, 0),
        Cell::new(0, 4),
        Cell::new(4, 4),
        Cell::new(2, 2),
    ];
    match players {
        1 => &ONE,
        2 => &TWO,
        3 => &THREE,
        4 => &FOUR,
        5 => &FIVE,
        _ => &[],
    }
}

/// Player colors are the numbers 1 to 5, handed out in join order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiegeColor(pub u8);

impl fmt::Display for SiegeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A grid cell, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    pub fn step(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    fn neighbors(self) -> impl Iterator<Item = Cell> {
        Direction::ALL
            .into_iter()
            .map(move |d| self.step(d))
            .filter(|c| c.in_bounds())
    }

    fn index(self) -> usize {
        (self.y * BOARD_SIZE + self.x) as usize
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Cell::new(x, y)
    }
}

impl From<Cell> for (i32, i32) {
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

/// Side of a cell a wall is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    /// Grid offset; `y` grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A placed wall, serialized as `[x, y, direction, owner]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "(i32, i32, Direction, SiegeColor)")]
pub struct Wall {
    pub cell: Cell,
    pub direction: Direction,
    pub owner: SiegeColor,
}

impl From<Wall> for (i32, i32, Direction, SiegeColor) {
    fn from(wall: Wall) -> Self {
        (wall.cell.x, wall.cell.y, wall.direction, wall.owner)
    }
}

/// One seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiegePlayer {
    pub color: SiegeColor,
    pub position: Option<Cell>,
    pub start_position: Option<Cell>,
    pub trapped: bool,
}

/// Which half of the turn the active player owes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    AwaitingMove,
    AwaitingBuild,
}

/// A turn-consuming siege action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiegeAction {
    Move { target: Cell },
    Build { cell: Cell, direction: Direction },
}

/// An unordered pair of adjacent cells.
type Edge = (Cell, Cell);

fn edge(a: Cell, b: Cell) -> Edge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Complete state of one siege room, lobby included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiegeGame {
    players: Vec<SiegePlayer>,
    walls: Vec<Wall>,
    blocked: HashSet<Edge>,
    current_turn: usize,
    phase: Phase,
    started: bool,
    finished: bool,
    winner: Option<SiegeColor>,
    last_builder: Option<SiegeColor>,
    final_scores: Vec<(SiegeColor, u32)>,
}

impl Default for SiegeGame {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            walls: Vec::new(),
            blocked: HashSet::new(),
            current_turn: 0,
            phase: Phase::AwaitingMove,
            started: false,
            finished: false,
            winner: None,
            last_builder: None,
            final_scores: Vec::new(),
        }
    }
}

impl SiegeGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[SiegePlayer] {
        &self.players
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn current_turn(&self) -> usize {
        self.current_turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<SiegeColor> {
        self.winner
    }

    /// Reachable-cell counts, filled in when the game ends.
    pub fn final_scores(&self) -> &[(SiegeColor, u32)] {
        &self.final_scores
    }

    /// Seats a new player with the lowest unused color.
    pub fn join(&mut self) -> RuleResult<SiegeColor> {
        if self.started {
            return Err(RuleError::AlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RuleError::RoomFull);
        }
        let color = (1..=MAX_PLAYERS as u8)
            .map(SiegeColor)
            .find(|c| self.players.iter().all(|p| p.color != *c))
            .ok_or(RuleError::RoomFull)?;
        self.players.push(SiegePlayer {
            color,
            position: None,
            start_position: None,
            trapped: false,
        });
        Ok(color)
    }

    /// Places every joined player on the starting layout for the room size.
    pub fn start(&mut self) -> RuleResult<()> {
        if self.started {
            return Err(RuleError::AlreadyStarted);
        }
        let layout = start_positions(self.players.len());
        if layout.is_empty() {
            return Err(RuleError::WrongPlayerCount {
                found: self.players.len(),
                max: MAX_PLAYERS,
            });
        }
        for (player, &cell) in self.players.iter_mut().zip(layout) {
            player.position = Some(cell);
            player.start_position = Some(cell);
        }
        self.started = true;
        self.current_turn = 0;
        self.phase = Phase::AwaitingMove;
        self.refresh_trapped();
        Ok(())
    }

    /// Checks whether the player at `index` may slide to `target`.
    pub fn validate_move(&self, index: usize, target: Cell) -> RuleResult<()> {
        let start = self
            .players
            .get(index)
            .and_then(|p| p.position)
            .ok_or(RuleError::UnknownSeat)?;

        if !target.in_bounds() {
            return Err(RuleError::OutOfBounds {
                x: target.x,
                y: target.y,
            });
        }
        if target == start {
            return Err(RuleError::NoMovement);
        }
        let (dx, dy) = (target.x - start.x, target.y - start.y);
        if dx != 0 && dy != 0 {
            return Err(RuleError::NotStraightLine);
        }
        let distance = (dx.abs() + dy.abs()) as u32;
        if !(1..=MAX_STEP).contains(&distance) {
            return Err(RuleError::InvalidDistance(distance));
        }

        let step = Cell::new(dx.signum(), dy.signum());
        let mut current = start;
        for _ in 0..distance {
            let next = Cell::new(current.x + step.x, current.y + step.y);
            if self.is_blocked(current, next) {
                return Err(RuleError::PathBlocked { by: BlockedBy::Wall });
            }
            if self.occupant(next).is_some_and(|i| i != index) {
                return Err(RuleError::PathBlocked {
                    by: BlockedBy::Player,
                });
            }
            current = next;
        }
        Ok(())
    }

    /// Checks whether a wall may be attached to `cell` on side `direction`.
    pub fn validate_wall(&self, cell: Cell, direction: Direction) -> RuleResult<()> {
        if !cell.in_bounds() {
            return Err(RuleError::WallOutOfBounds);
        }
        let other = cell.step(direction);
        if !other.in_bounds() {
            return Err(RuleError::WallOutOfBounds);
        }
        if self.blocked.contains(&edge(cell, other)) {
            return Err(RuleError::DuplicateWall);
        }
        Ok(())
    }

    /// Whether a wall separates two adjacent cells.
    pub fn is_blocked(&self, a: Cell, b: Cell) -> bool {
        self.blocked.contains(&edge(a, b))
    }

    /// Whether the player at `index` has no free neighboring cell.
    pub fn is_trapped(&self, index: usize) -> bool {
        let Some(position) = self.players.get(index).and_then(|p| p.position) else {
            return false;
        };
        position
            .neighbors()
            .all(|n| self.is_blocked(position, n) || self.occupant(n).is_some_and(|i| i != index))
    }

    /// Empty cells reachable from `start` without crossing walls or players,
    /// not counting `start` itself.
    pub fn reachable_cells(&self, start: Cell) -> u32 {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for next in cell.neighbors() {
                if self.is_blocked(cell, next) || self.occupant(next).is_some() {
                    continue;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        (seen.len() - 1) as u32
    }

    /// Whether the walls split the players into as many regions as there are
    /// players. Adjacent players share a region.
    pub fn players_isolated(&self) -> bool {
        let positions: Vec<Cell> = self.players.iter().filter_map(|p| p.position).collect();
        if positions.len() < 2 {
            return false;
        }
        let labels = self.region_labels();
        let regions: HashSet<usize> = positions.iter().map(|c| labels[c.index()]).collect();
        regions.len() == positions.len()
    }

    fn region_labels(&self) -> Vec<usize> {
        let size = (BOARD_SIZE * BOARD_SIZE) as usize;
        let mut labels = vec![usize::MAX; size];
        let mut next_label = 0;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let origin = Cell::new(x, y);
                if labels[origin.index()] != usize::MAX {
                    continue;
                }
                labels[origin.index()] = next_label;
                let mut queue = VecDeque::from([origin]);
                while let Some(cell) = queue.pop_front() {
                    for next in cell.neighbors() {
                        if labels[next.index()] == usize::MAX && !self.is_blocked(cell, next) {
                            labels[next.index()] = next_label;
                            queue.push_back(next);
                        }
                    }
                }
                next_label += 1;
            }
        }
        labels
    }

    fn occupant(&self, cell: Cell) -> Option<usize> {
        self.players.iter().position(|p| p.position == Some(cell))
    }

    fn seat_index(&self, color: SiegeColor) -> RuleResult<usize> {
        self.players
            .iter()
            .position(|p| p.color == color)
            .ok_or(RuleError::UnknownSeat)
    }

    fn refresh_trapped(&mut self) {
        let flags: Vec<bool> = (0..self.players.len()).map(|i| self.is_trapped(i)).collect();
        for (player, trapped) in self.players.iter_mut().zip(flags) {
            player.trapped = trapped;
        }
    }

    fn move_piece(&mut self, index: usize, target: Cell) -> RuleResult<()> {
        if self.phase != Phase::AwaitingMove {
            return Err(RuleError::WrongPhase { expected: "build" });
        }
        self.validate_move(index, target)?;
        self.players[index].position = Some(target);
        self.refresh_trapped();
        self.phase = Phase::AwaitingBuild;
        Ok(())
    }

    fn build_wall(&mut self, index: usize, cell: Cell, direction: Direction) -> RuleResult<()> {
        // A trapped player has no legal slide, so the move half is skipped.
        if self.phase == Phase::AwaitingMove && !self.is_trapped(index) {
            return Err(RuleError::WrongPhase { expected: "move" });
        }
        self.validate_wall(cell, direction)?;

        let owner = self.players[index].color;
        self.blocked.insert(edge(cell, cell.step(direction)));
        self.walls.push(Wall {
            cell,
            direction,
            owner,
        });
        self.last_builder = Some(owner);
        self.refresh_trapped();

        let all_trapped = self.players.iter().all(|p| p.trapped);
        if all_trapped || self.players_isolated() {
            self.finish(index);
        } else {
            self.current_turn = (self.current_turn + 1) % self.players.len();
            self.phase = Phase::AwaitingMove;
        }
        Ok(())
    }

    fn finish(&mut self, builder: usize) {
        self.final_scores = self
            .players
            .iter()
            .map(|p| (p.color, p.position.map(|c| self.reachable_cells(c)).unwrap_or(0)))
            .collect();
        let best = self.final_scores.iter().map(|&(_, s)| s).max().unwrap_or(0);
        let leaders: Vec<usize> = self
            .final_scores
            .iter()
            .enumerate()
            .filter(|&(_, &(_, score))| score == best)
            .map(|(i, _)| i)
            .collect();

        let winner = if leaders.contains(&builder) {
            builder
        } else {
            leaders.first().copied().unwrap_or(builder)
        };
        self.winner = Some(self.players[winner].color);
        self.finished = true;
    }
}

impl RuleEngine for SiegeGame {
    type Seat = SiegeColor;
    type Action = SiegeAction;

    const VARIANT: Variant = Variant::Siege;

    fn is_turn_of(&self, seat: SiegeColor) -> bool {
        self.started
            && !self.finished
            && self.players.get(self.current_turn).map(|p| p.color) == Some(seat)
    }

    fn apply(&mut self, seat: SiegeColor, action: SiegeAction) -> RuleResult<()> {
        if self.finished {
            return Err(RuleError::GameOver);
        }
        if !self.started {
            return Err(RuleError::NotStarted);
        }
        let index = self.seat_index(seat)?;
        if index != self.current_turn {
            return Err(RuleError::NotYourTurn);
        }
        match action {
            SiegeAction::Move { target } => self.move_piece(index, target),
            SiegeAction::Build { cell, direction } => self.build_wall(index, cell, direction),
        }
    }

    fn outcome(&self) -> Outcome<SiegeColor> {
        match (self.finished, self.winner) {
            (true, Some(color)) => Outcome::Winner(color),
            (true, None) => Outcome::Draw,
            (false, _) => Outcome::InProgress,
        }
    }

    fn message(&self) -> String {
        if !self.started {
            return format!(
                "Waiting for players to join... ({}/{})",
                self.players.len(),
                MAX_PLAYERS
            );
        }
        if let Some(winner) = self.winner {
            let best = self.final_scores.iter().map(|&(_, s)| s).max().unwrap_or(0);
            let tied = self.final_scores.iter().filter(|&&(_, s)| s == best).count() > 1;
            return match (tied, self.last_builder == Some(winner)) {
                (false, _) => format!("Game over: {} wins!", winner),
                (true, true) => format!("Game over: tie, last builder {} wins!", winner),
                (true, false) => format!("Game over: tie, {} wins!", winner),
            };
        }
        let active = self
            .players
            .get(self.current_turn)
            .map(|p| p.color.to_string())
            .unwrap_or_default();
        match self.phase {
            Phase::AwaitingMove => format!("{} to move", active),
            Phase::AwaitingBuild => format!("{} moved, waiting for a wall...", active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Cell {
        Cell::new(x, y)
    }

    fn started(players: usize) -> SiegeGame {
        let mut game = SiegeGame::new();
        for _ in 0..players {
            game.join().unwrap();
        }
        game.start().unwrap();
        game
    }

    fn place_wall(game: &mut SiegeGame, cell: Cell, direction: Direction) {
        game.blocked.insert(edge(cell, cell.step(direction)));
        game.walls.push(Wall {
            cell,
            direction,
            owner: SiegeColor(1),
        });
        game.refresh_trapped();
    }

    #[test]
    fn test_join_assigns_lowest_free_color_until_full() {
        let mut game = SiegeGame::new();
        for expected in 1..=5 {
            assert_eq!(game.join(), Ok(SiegeColor(expected)));
        }
        assert_eq!(game.join(), Err(RuleError::RoomFull));
        assert_eq!(game.players().len(), 5);
    }

    #[test]
    fn test_start_layouts() {
        let game = started(2);
        let positions: Vec<_> = game.players().iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![Some(c(0, 0)), Some(c(4, 4))]);

        let game = started(3);
        assert_eq!(game.players()[2].start_position, Some(c(2, 4)));

        let game = started(5);
        assert_eq!(game.players()[4].position, Some(c(2, 2)));

        let game = started(1);
        assert_eq!(game.players()[0].position, Some(c(0, 0)));
    }

    #[test]
    fn test_start_requires_players_and_happens_once() {
        let mut empty = SiegeGame::new();
        assert_eq!(
            empty.start(),
            Err(RuleError::WrongPlayerCount { found: 0, max: 5 })
        );

        let mut game = started(2);
        assert_eq!(game.start(), Err(RuleError::AlreadyStarted));
        assert_eq!(game.join(), Err(RuleError::AlreadyStarted));
    }

    #[test]
    fn test_move_validation_reports_distinct_causes() {
        let game = started(2);
        assert_eq!(
            game.validate_move(0, c(-1, 0)),
            Err(RuleError::OutOfBounds { x: -1, y: 0 })
        );
        assert_eq!(game.validate_move(0, c(0, 0)), Err(RuleError::NoMovement));
        assert_eq!(game.validate_move(0, c(1, 1)), Err(RuleError::NotStraightLine));
        assert_eq!(game.validate_move(0, c(0, 4)), Err(RuleError::InvalidDistance(4)));
        assert_eq!(game.validate_move(0, c(3, 0)), Ok(()));
    }

    #[test]
    fn test_path_blocked_by_player() {
        let mut game = started(2);
        game.players[1].position = Some(c(2, 0));
        assert_eq!(
            game.validate_move(0, c(3, 0)),
            Err(RuleError::PathBlocked {
                by: BlockedBy::Player
            })
        );
        assert_eq!(
            game.validate_move(0, c(2, 0)),
            Err(RuleError::PathBlocked {
                by: BlockedBy::Player
            })
        );
        assert_eq!(game.validate_move(0, c(1, 0)), Ok(()));
    }

    #[test]
    fn test_wall_blocks_from_both_sides() {
        let mut game = started(2);
        // Built from (1,0) facing left, crossed from (0,0) moving right.
        place_wall(&mut game, c(1, 0), Direction::Left);
        let before = game.clone();

        assert_eq!(
            game.apply(SiegeColor(1), SiegeAction::Move { target: c(2, 0) }),
            Err(RuleError::PathBlocked { by: BlockedBy::Wall })
        );
        assert_eq!(game, before);
        assert_eq!(
            game.validate_wall(c(0, 0), Direction::Right),
            Err(RuleError::DuplicateWall)
        );
    }

    #[test]
    fn test_walls_cannot_sit_on_the_border() {
        let game = started(2);
        assert_eq!(game.validate_wall(c(0, 0), Direction::Up), Err(RuleError::WallOutOfBounds));
        assert_eq!(game.validate_wall(c(4, 2), Direction::Right), Err(RuleError::WallOutOfBounds));
        assert_eq!(game.validate_wall(c(5, 2), Direction::Left), Err(RuleError::WallOutOfBounds));
        assert_eq!(game.validate_wall(c(2, 2), Direction::Down), Ok(()));
    }

    #[test]
    fn test_wall_at_extreme_coordinates_is_out_of_bounds() {
        let game = started(2);
        assert_eq!(
            game.validate_wall(c(i32::MAX, 0), Direction::Right),
            Err(RuleError::WallOutOfBounds)
        );
        assert_eq!(
            game.validate_wall(c(0, i32::MIN), Direction::Up),
            Err(RuleError::WallOutOfBounds)
        );
    }

    #[test]
    fn test_turn_is_move_then_build() {
        let mut game = started(2);
        let p1 = SiegeColor(1);
        let p2 = SiegeColor(2);

        assert_eq!(
            game.apply(p1, SiegeAction::Build { cell: c(2, 2), direction: Direction::Up }),
            Err(RuleError::WrongPhase { expected: "move" })
        );
        assert_eq!(
            game.apply(p2, SiegeAction::Move { target: c(4, 3) }),
            Err(RuleError::NotYourTurn)
        );

        game.apply(p1, SiegeAction::Move { target: c(0, 2) }).unwrap();
        assert_eq!(game.phase(), Phase::AwaitingBuild);
        assert_eq!(
            game.apply(p1, SiegeAction::Move { target: c(0, 3) }),
            Err(RuleError::WrongPhase { expected: "build" })
        );

        game.apply(p1, SiegeAction::Build { cell: c(2, 2), direction: Direction::Up })
            .unwrap();
        assert_eq!(game.current_turn(), 1);
        assert_eq!(game.phase(), Phase::AwaitingMove);
        assert!(game.is_turn_of(p2));
        assert_eq!(game.walls()[0].owner, p1);
    }

    #[test]
    fn test_trapped_player_builds_without_moving() {
        let mut game = started(2);
        game.players[1].position = Some(c(1, 0));
        place_wall(&mut game, c(0, 0), Direction::Down);
        assert!(game.players()[0].trapped);

        game.apply(
            SiegeColor(1),
            SiegeAction::Build {
                cell: c(3, 3),
                direction: Direction::Right,
            },
        )
        .unwrap();
        assert!(!game.is_finished());
        assert_eq!(game.current_turn(), 1);
    }

    #[test]
    fn test_isolation_ends_game_and_top_score_wins() {
        let mut game = started(2);
        for y in 0..4 {
            place_wall(&mut game, c(0, y), Direction::Right);
        }
        game.apply(SiegeColor(1), SiegeAction::Move { target: c(0, 1) })
            .unwrap();
        game.apply(
            SiegeColor(1),
            SiegeAction::Build {
                cell: c(0, 4),
                direction: Direction::Right,
            },
        )
        .unwrap();

        assert!(game.is_finished());
        assert_eq!(
            game.final_scores(),
            &[(SiegeColor(1), 4), (SiegeColor(2), 19)]
        );
        assert_eq!(game.outcome(), Outcome::Winner(SiegeColor(2)));
        assert_eq!(game.message(), "Game over: Player 2 wins!");
    }

    #[test]
    fn test_tied_scores_go_to_last_builder() {
        let mut game = started(2);
        for y in 0..5 {
            place_wall(&mut game, c(2, y), Direction::Right);
        }
        for y in 0..4 {
            place_wall(&mut game, c(1, y), Direction::Right);
        }
        game.apply(SiegeColor(1), SiegeAction::Move { target: c(0, 1) })
            .unwrap();
        game.apply(
            SiegeColor(1),
            SiegeAction::Build {
                cell: c(1, 4),
                direction: Direction::Right,
            },
        )
        .unwrap();

        assert!(game.is_finished());
        assert_eq!(
            game.final_scores(),
            &[(SiegeColor(1), 9), (SiegeColor(2), 9)]
        );
        assert_eq!(game.winner(), Some(SiegeColor(1)));
        assert!(game.message().contains("last builder"));
    }

    #[test]
    fn test_solo_game_ends_only_when_trapped() {
        let mut game = started(1);
        let me = SiegeColor(1);
        place_wall(&mut game, c(0, 3), Direction::Right);
        place_wall(&mut game, c(0, 3), Direction::Down);

        game.apply(me, SiegeAction::Move { target: c(0, 3) }).unwrap();
        game.apply(
            me,
            SiegeAction::Build {
                cell: c(3, 3),
                direction: Direction::Left,
            },
        )
        .unwrap();
        assert!(!game.is_finished());

        game.apply(me, SiegeAction::Move { target: c(0, 2) }).unwrap();
        game.apply(
            me,
            SiegeAction::Build {
                cell: c(0, 2),
                direction: Direction::Up,
            },
        )
        .unwrap();
        assert!(!game.is_finished());

        game.apply(me, SiegeAction::Move { target: c(0, 3) }).unwrap();
        game.apply(
            me,
            SiegeAction::Build {
                cell: c(0, 3),
                direction: Direction::Up,
            },
        )
        .unwrap();
        assert!(game.is_finished());
        assert_eq!(game.outcome(), Outcome::Winner(me));
        assert_eq!(
            game.apply(me, SiegeAction::Move { target: c(0, 2) }),
            Err(RuleError::GameOver)
        );
    }

    #[test]
    fn test_actions_before_start_are_rejected() {
        let mut game = SiegeGame::new();
        let color = game.join().unwrap();
        assert_eq!(
            game.apply(color, SiegeAction::Move { target: c(1, 0) }),
            Err(RuleError::NotStarted)
        );
        assert!(game.message().starts_with("Waiting for players"));
    }

    #[test]
    fn test_wall_serializes_as_tuple() {
        let wall = Wall {
            cell: c(1, 2),
            direction: Direction::Down,
            owner: SiegeColor(3),
        };
        assert_eq!(serde_json::to_string(&wall).unwrap(), r#"[1,2,"down",3]"#);
    }
}
