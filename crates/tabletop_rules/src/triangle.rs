//! Triangle capture on a radius-3 hex grid.
//!
//! Players draw straight lines spanning four points. Each line contributes
//! three unit segments; a small triangle whose three sides have all been drawn
//! is captured by whoever drew the completing line. When every triangle on the
//! board is owned the game ends and the player holding the most wins.

use crate::error::{RuleError, RuleResult};
use crate::hex::{Hex, DIRECTIONS};
use crate::{Outcome, RuleEngine, Variant};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// The fixed palette players choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TriangleColor {
    #[serde(rename = "#d9534f")]
    Red,
    #[serde(rename = "#428bca")]
    Blue,
    #[serde(rename = "#5cb85c")]
    Green,
    #[serde(rename = "#f0ad4e")]
    Orange,
    #[serde(rename = "#6e409e")]
    Purple,
}

impl TriangleColor {
    pub const PALETTE: [TriangleColor; 5] = [
        TriangleColor::Red,
        TriangleColor::Blue,
        TriangleColor::Green,
        TriangleColor::Orange,
        TriangleColor::Purple,
    ];

    /// CSS color code used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            TriangleColor::Red => "#d9534f",
            TriangleColor::Blue => "#428bca",
            TriangleColor::Green => "#5cb85c",
            TriangleColor::Orange => "#f0ad4e",
            TriangleColor::Purple => "#6e409e",
        }
    }

    pub fn from_code(code: &str) -> Option<TriangleColor> {
        Self::PALETTE
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for TriangleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TriangleColor::Red => "Red",
            TriangleColor::Blue => "Blue",
            TriangleColor::Green => "Green",
            TriangleColor::Orange => "Orange",
            TriangleColor::Purple => "Purple",
        };
        f.write_str(name)
    }
}

/// A requested line between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TriangleMove {
    pub p1: Hex,
    pub p2: Hex,
}

/// A line that has been drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawnLine {
    pub points: [Hex; 4],
    pub color: TriangleColor,
}

/// A triangle and the color that captured it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedTriangle {
    pub points: [Hex; 3],
    pub color: TriangleColor,
}

type Segment = (Hex, Hex);

fn segment(a: Hex, b: Hex) -> Segment {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every unit triangle on the board, each with its corners sorted.
static CANDIDATES: Lazy<Vec<[Hex; 3]>> = Lazy::new(|| {
    let mut triangles = Vec::new();
    for p in Hex::all_points() {
        for (d1, d2) in [(DIRECTIONS[0], DIRECTIONS[1]), (DIRECTIONS[0], DIRECTIONS[5])] {
            let (b, c) = (p + d1, p + d2);
            if b.on_board() && c.on_board() {
                let mut corners = [p, b, c];
                corners.sort();
                triangles.push(corners);
            }
        }
    }
    triangles.sort();
    triangles.dedup();
    triangles
});

pub fn candidate_triangles() -> &'static [[Hex; 3]] {
    &CANDIDATES
}

/// Complete state of one triangle game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriangleGame {
    drawn: HashSet<Segment>,
    segments: HashSet<Segment>,
    lines: Vec<DrawnLine>,
    owners: Vec<Option<TriangleColor>>,
    captures: Vec<CapturedTriangle>,
    scores: BTreeMap<TriangleColor, u32>,
    line_counts: BTreeMap<TriangleColor, u32>,
    last_move_color: Option<TriangleColor>,
}

impl Default for TriangleGame {
    fn default() -> Self {
        Self {
            drawn: HashSet::new(),
            segments: HashSet::new(),
            lines: Vec::new(),
            owners: vec![None; candidate_triangles().len()],
            captures: Vec::new(),
            scores: BTreeMap::new(),
            line_counts: BTreeMap::new(),
            last_move_color: None,
        }
    }
}

impl TriangleGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[DrawnLine] {
        &self.lines
    }

    /// Captured triangles in the order they were taken.
    pub fn captured(&self) -> &[CapturedTriangle] {
        &self.captures
    }

    pub fn scores(&self) -> &BTreeMap<TriangleColor, u32> {
        &self.scores
    }

    pub fn line_counts(&self) -> &BTreeMap<TriangleColor, u32> {
        &self.line_counts
    }

    pub fn last_move_color(&self) -> Option<TriangleColor> {
        self.last_move_color
    }

    pub fn total_triangles(&self) -> usize {
        self.owners.len()
    }

    pub fn is_over(&self) -> bool {
        self.captures.len() == self.owners.len()
    }

    /// Draws a line from `p1` to `p2` in `color` and captures every
    /// triangle it completes.
    ///
    /// # Returns
    ///
    /// The number of triangles captured by this line.
    pub fn draw_line(&mut self, p1: Hex, p2: Hex, color: TriangleColor) -> RuleResult<usize> {
        if self.is_over() {
            return Err(RuleError::GameOver);
        }
        let points = p1.line_to(p2).ok_or(RuleError::InvalidLineGeometry)?;
        let key = segment(p1, p2);
        if self.drawn.contains(&key) {
            return Err(RuleError::DuplicateLine);
        }
        if self.last_move_color == Some(color) {
            return Err(RuleError::NotYourTurn);
        }

        self.drawn.insert(key);
        for pair in points.windows(2) {
            self.segments.insert(segment(pair[0], pair[1]));
        }
        self.lines.push(DrawnLine { points, color });
        *self.line_counts.entry(color).or_insert(0) += 1;
        self.last_move_color = Some(color);

        // Full rescan: a single line may close several triangles at once.
        let mut captured = 0;
        for (index, corners) in candidate_triangles().iter().enumerate() {
            if self.owners[index].is_some() || !self.is_closed(corners) {
                continue;
            }
            self.owners[index] = Some(color);
            self.captures.push(CapturedTriangle {
                points: *corners,
                color,
            });
            captured += 1;
        }
        if captured > 0 {
            *self.scores.entry(color).or_insert(0) += captured as u32;
        }
        debug_assert!(self.captures.len() <= self.owners.len());
        Ok(captured)
    }

    fn is_closed(&self, [a, b, c]: &[Hex; 3]) -> bool {
        [segment(*a, *b), segment(*b, *c), segment(*a, *c)]
            .iter()
            .all(|s| self.segments.contains(s))
    }
}

impl RuleEngine for TriangleGame {
    type Seat = TriangleColor;
    type Action = TriangleMove;

    const VARIANT: Variant = Variant::Triangle;

    fn is_turn_of(&self, seat: TriangleColor) -> bool {
        !self.is_over() && self.last_move_color != Some(seat)
    }

    fn apply(&mut self, seat: TriangleColor, action: TriangleMove) -> RuleResult<()> {
        self.draw_line(action.p1, action.p2, seat).map(|_| ())
    }

    fn outcome(&self) -> Outcome<TriangleColor> {
        if !self.is_over() {
            return Outcome::InProgress;
        }
        let best = self.scores.values().copied().max().unwrap_or(0);
        let mut leaders = self.scores.iter().filter(|&(_, &score)| score == best);
        match (leaders.next(), leaders.next()) {
            (Some((&color, _)), None) => Outcome::Winner(color),
            _ => Outcome::Draw,
        }
    }

    fn message(&self) -> String {
        match (self.outcome(), self.last_move_color) {
            (Outcome::InProgress, None) => {
                "Welcome to the shared board! Pick a color to start drawing.".to_string()
            }
            (Outcome::InProgress, Some(last)) => format!(
                "{} drew the last line, {} of {} triangles captured",
                last,
                self.captures.len(),
                self.owners.len()
            ),
            (Outcome::Winner(color), _) => format!(
                "Game over: all triangles are filled. {} wins with {}",
                color,
                self.scores.get(&color).copied().unwrap_or(0)
            ),
            (Outcome::Draw, _) => "Game over: all triangles are filled. It's a draw".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(q: i32, r: i32) -> Hex {
        Hex::new(q, r)
    }

    #[test]
    fn test_radius_three_has_54_triangles() {
        assert_eq!(candidate_triangles().len(), 54);
        assert_eq!(TriangleGame::new().total_triangles(), 54);
    }

    #[test]
    fn test_duplicate_line_rejected_in_either_direction() {
        let mut game = TriangleGame::new();
        game.draw_line(h(-1, 0), h(2, 0), TriangleColor::Red).unwrap();

        assert_eq!(
            game.draw_line(h(-1, 0), h(2, 0), TriangleColor::Blue),
            Err(RuleError::DuplicateLine)
        );
        assert_eq!(
            game.draw_line(h(2, 0), h(-1, 0), TriangleColor::Blue),
            Err(RuleError::DuplicateLine)
        );
        assert_eq!(game.lines().len(), 1);
    }

    #[test]
    fn test_invalid_geometry_leaves_state_untouched() {
        let mut game = TriangleGame::new();
        let before = game.clone();
        assert_eq!(
            game.draw_line(h(0, 0), h(2, 1), TriangleColor::Red),
            Err(RuleError::InvalidLineGeometry)
        );
        assert_eq!(
            game.draw_line(h(0, 0), h(1, 0), TriangleColor::Red),
            Err(RuleError::InvalidLineGeometry)
        );
        assert_eq!(
            game.draw_line(h(i32::MIN, 0), h(0, 0), TriangleColor::Red),
            Err(RuleError::InvalidLineGeometry)
        );
        assert_eq!(game, before);
    }

    #[test]
    fn test_same_color_cannot_draw_twice_in_a_row() {
        let mut game = TriangleGame::new();
        game.draw_line(h(-1, 0), h(2, 0), TriangleColor::Red).unwrap();
        assert!(!game.is_turn_of(TriangleColor::Red));
        assert!(game.is_turn_of(TriangleColor::Green));
        assert_eq!(
            game.draw_line(h(0, -1), h(0, 2), TriangleColor::Red),
            Err(RuleError::NotYourTurn)
        );
    }

    #[test]
    fn test_completing_shared_edge_captures_both_triangles() {
        let mut game = TriangleGame::new();
        assert_eq!(game.draw_line(h(0, -1), h(0, 2), TriangleColor::Red), Ok(0));
        assert_eq!(game.draw_line(h(2, -1), h(-1, 2), TriangleColor::Blue), Ok(0));
        assert_eq!(game.draw_line(h(-1, 1), h(2, -2), TriangleColor::Red), Ok(0));
        assert_eq!(game.draw_line(h(1, -2), h(1, 1), TriangleColor::Blue), Ok(0));

        // The shared side (0,0)-(1,0) closes two triangles at once.
        assert_eq!(game.draw_line(h(-1, 0), h(2, 0), TriangleColor::Red), Ok(2));
        assert_eq!(game.scores().get(&TriangleColor::Red), Some(&2));
        assert_eq!(game.scores().get(&TriangleColor::Blue), None);
        assert_eq!(game.line_counts().get(&TriangleColor::Red), Some(&3));

        let captured: Vec<[Hex; 3]> = game.captured().iter().map(|t| t.points).collect();
        assert!(captured.contains(&[h(0, 0), h(0, 1), h(1, 0)]));
        assert!(captured.contains(&[h(0, 0), h(1, -1), h(1, 0)]));
    }

    #[test]
    fn test_drawing_every_line_fills_the_board() {
        let mut game = TriangleGame::new();
        let points = Hex::all_points();
        let mut color = TriangleColor::Red;

        for &a in &points {
            for &b in &points {
                if game.draw_line(a, b, color).is_ok() {
                    color = if color == TriangleColor::Red {
                        TriangleColor::Blue
                    } else {
                        TriangleColor::Red
                    };
                }
            }
        }

        assert!(game.is_over());
        assert_eq!(game.captured().len(), 54);
        assert_eq!(game.scores().values().sum::<u32>(), 54);
        assert!(game.outcome().is_over());
        assert!(game.message().starts_with("Game over"));
        assert_eq!(
            game.draw_line(h(-3, 0), h(0, 0), TriangleColor::Green),
            Err(RuleError::GameOver)
        );
    }

    #[test]
    fn test_palette_codes_round_trip() {
        for color in TriangleColor::PALETTE {
            assert_eq!(TriangleColor::from_code(color.code()), Some(color));
            let json = serde_json::to_string(&color).unwrap();
            assert_eq!(json, format!("\"{}\"", color.code()));
        }
        assert_eq!(TriangleColor::from_code("#000000"), None);
    }
}
