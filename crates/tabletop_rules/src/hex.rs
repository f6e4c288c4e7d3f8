//! Axial hex-grid coordinates

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Radius of the playing field: every point within this hex distance of
/// the origin is on the board.
pub const RADIUS: i32 = 3;

/// Hex distance between the two endpoints of a drawn line.
pub const LINE_SPAN: i32 = 3;

/// The six axial unit directions, counter-clockwise from east.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(1, 0),
    Hex::new(0, 1),
    Hex::new(-1, 1),
    Hex::new(-1, 0),
    Hex::new(0, -1),
    Hex::new(1, -1),
];

/// A point on the hex grid, serialized as a `[q, r]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Axial distance: `(|dq| + |dr| + |dq + dr|) / 2`.
    pub fn distance(self, other: Hex) -> i32 {
        let d = self - other;
        (d.q.abs() + d.r.abs() + (d.q + d.r).abs()) / 2
    }

    pub fn scale(self, factor: i32) -> Hex {
        Hex::new(self.q * factor, self.r * factor)
    }

    /// Coordinates are range-checked before any arithmetic, so arbitrary
    /// client input cannot overflow.
    pub fn on_board(self) -> bool {
        let span = -RADIUS..=RADIUS;
        span.contains(&self.q) && span.contains(&self.r) && self.distance(Hex::ORIGIN) <= RADIUS
    }

    /// Every on-board point, ordered by `(q, r)`.
    pub fn all_points() -> Vec<Hex> {
        let mut points = Vec::new();
        for q in -RADIUS..=RADIUS {
            let low = (-RADIUS).max(-q - RADIUS);
            let high = RADIUS.min(-q + RADIUS);
            for r in low..=high {
                points.push(Hex::new(q, r));
            }
        }
        points
    }

    /// The four collinear points of a line from `self` to `end`.
    ///
    /// Returns `None` unless both endpoints are on the board, exactly
    /// [`LINE_SPAN`] apart, and aligned with one of the [`DIRECTIONS`].
    pub fn line_to(self, end: Hex) -> Option<[Hex; 4]> {
        if !self.on_board() || !end.on_board() || self.distance(end) != LINE_SPAN {
            return None;
        }
        let delta = end - self;
        if delta.q % LINE_SPAN != 0 || delta.r % LINE_SPAN != 0 {
            return None;
        }
        let step = Hex::new(delta.q / LINE_SPAN, delta.r / LINE_SPAN);
        if !DIRECTIONS.contains(&step) {
            return None;
        }
        Some([self, self + step, self + step.scale(2), end])
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, rhs: Hex) -> Hex {
        Hex::new(self.q + rhs.q, self.r + rhs.r)
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, rhs: Hex) -> Hex {
        Hex::new(self.q - rhs.q, self.r - rhs.r)
    }
}

impl From<(i32, i32)> for Hex {
    fn from((q, r): (i32, i32)) -> Self {
        Hex::new(q, r)
    }
}

impl From<Hex> for (i32, i32) {
    fn from(hex: Hex) -> Self {
        (hex.q, hex.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_three_board_has_37_points() {
        let points = Hex::all_points();
        assert_eq!(points.len(), 37);
        assert!(points.iter().all(|p| p.on_board()));
        assert!(!Hex::new(3, 1).on_board());
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Hex::new(-3, 0);
        let b = Hex::new(0, 3);
        assert_eq!(a.distance(b), 3);
        assert_eq!(b.distance(a), 3);
        assert_eq!(Hex::new(2, -1).distance(Hex::new(-1, 2)), 3);
    }

    #[test]
    fn test_line_to_yields_four_collinear_points() {
        let line = Hex::new(-3, 0).line_to(Hex::new(0, 0)).unwrap();
        assert_eq!(
            line,
            [Hex::new(-3, 0), Hex::new(-2, 0), Hex::new(-1, 0), Hex::new(0, 0)]
        );

        let reversed = Hex::new(0, 0).line_to(Hex::new(-3, 0)).unwrap();
        assert_eq!(reversed[1], Hex::new(-1, 0));
    }

    #[test]
    fn test_line_to_rejects_bad_geometry() {
        // distance 3 but not along an axis
        assert_eq!(Hex::new(0, 0).line_to(Hex::new(2, 1)), None);
        // too short
        assert_eq!(Hex::new(0, 0).line_to(Hex::new(2, 0)), None);
        // endpoint off the board
        assert_eq!(Hex::new(1, 0).line_to(Hex::new(4, 0)), None);
    }

    #[test]
    fn test_extreme_coordinates_are_off_board() {
        assert!(!Hex::new(i32::MIN, 0).on_board());
        assert!(!Hex::new(0, i32::MAX).on_board());
        assert_eq!(Hex::new(i32::MIN, 0).line_to(Hex::ORIGIN), None);
        assert_eq!(Hex::ORIGIN.line_to(Hex::new(i32::MAX, i32::MIN)), None);
    }

    #[test]
    fn test_serializes_as_pair() {
        let json = serde_json::to_string(&Hex::new(-1, 2)).unwrap();
        assert_eq!(json, "[-1,2]");
        let hex: Hex = serde_json::from_str("[3,-3]").unwrap();
        assert_eq!(hex, Hex::new(3, -3));
    }
}
