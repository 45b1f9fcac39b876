use serde_repr::Serialize_repr;
use std::fmt;
use std::ops::Neg;

/// Occupant of a board point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize_repr)]
#[repr(i8)]
pub enum Colour {
    #[default]
    Empty = 0,
    Black = 1,
    White = -1,
}

impl Colour {
    pub fn to_int(self) -> i8 {
        self as i8
    }

    pub fn opposite(self) -> Self {
        match self {
            Colour::Black => Colour::White,
            Colour::White => Colour::Black,
            Colour::Empty => Colour::Empty,
        }
    }

    pub fn is_stone(self) -> bool {
        self != Colour::Empty
    }

    /// The SGF / GTP letter for a stone colour. Empty has no letter of its own.
    pub fn letter(self) -> &'static str {
        match self {
            Colour::Black => "B",
            Colour::White => "W",
            Colour::Empty => "?",
        }
    }

    /// Property key of a move by this colour.
    pub(crate) fn move_key(self) -> &'static str {
        match self {
            Colour::White => "W",
            _ => "B",
        }
    }
}

impl Neg for Colour {
    type Output = Self;

    fn neg(self) -> Self {
        self.opposite()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Colour::Black => write!(f, "Black"),
            Colour::White => write!(f, "White"),
            Colour::Empty => write!(f, "Empty"),
        }
    }
}
