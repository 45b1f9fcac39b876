use serde::Serialize;
use std::fmt;

use crate::Point;
use crate::colour::Colour;
use crate::coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Play,
    Pass,
}

/// The move a node carries, read from its `B`/`W` property.
///
/// This is a view computed on demand; nodes store only the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub kind: Move,
    pub colour: Colour,
    pub pos: Option<Point>,
    pub size: u8,
}

impl Turn {
    pub fn play(colour: Colour, point: Point, size: u8) -> Self {
        Turn {
            kind: Move::Play,
            colour,
            pos: Some(point),
            size,
        }
    }

    pub fn pass(colour: Colour, size: u8) -> Self {
        Turn {
            kind: Move::Pass,
            colour,
            pos: None,
            size,
        }
    }

    /// Interpret a raw `B`/`W` value; anything that is not an on-board point is a pass.
    pub fn from_sgf(colour: Colour, value: &str, size: u8) -> Self {
        match coord::point_from_sgf(value, size) {
            Some(point) => Turn::play(colour, point, size),
            None => Turn::pass(colour, size),
        }
    }

    pub fn is_pass(&self) -> bool {
        self.kind == Move::Pass
    }

    /// Human vertex (`D4`) or `pass`.
    pub fn vertex(&self) -> Option<String> {
        match self.pos {
            Some(point) => coord::human_from_point(point, self.size),
            None => Some("pass".to_string()),
        }
    }
}

/// Renders as `(B D4)`, `(W pass)`.
impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = self.colour.letter();
        match (self.kind, self.vertex()) {
            (Move::Pass, _) => write!(f, "({letter} pass)"),
            (Move::Play, Some(vertex)) => write!(f, "({letter} {vertex:<3})"),
            (Move::Play, None) => write!(f, "({letter} ?)"),
        }
    }
}

/// Display adapter for a node that may carry no move at all.
pub struct MoveDisplay(pub Option<Turn>);

impl fmt::Display for MoveDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(turn) => fmt::Display::fmt(turn, f),
            None => write!(f, "(none.)"),
        }
    }
}
