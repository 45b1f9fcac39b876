use std::fmt;

/// Why a text could not be loaded as a game record.
///
/// Every variant is a form of malformed input; positions are byte offsets
/// into the text after surrounding whitespace and the opening `(` are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SgfError {
    /// The text holds no node at all.
    NoNodes,
    /// `(`, `)` or a property value appeared before the first `;` of its group.
    UnexpectedChar { found: char, pos: usize },
    /// A property value with no key in front of it.
    ValueWithoutKey { pos: usize },
    /// A backslash as the very last character.
    DanglingEscape { pos: usize },
    /// A `[` whose `]` never comes.
    UnterminatedValue { pos: usize },
    /// Variations nested deeper than the parser follows.
    TooDeep { pos: usize },
}

impl fmt::Display for SgfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed SGF: ")?;
        match self {
            SgfError::NoNodes => write!(f, "no nodes found"),
            SgfError::UnexpectedChar { found, pos } => {
                write!(f, "'{found}' before any node at position {pos}")
            }
            SgfError::ValueWithoutKey { pos } => {
                write!(f, "value without a property key at position {pos}")
            }
            SgfError::DanglingEscape { pos } => {
                write!(f, "escape character at end of input (position {pos})")
            }
            SgfError::UnterminatedValue { pos } => {
                write!(f, "value opened at position {pos} is never closed")
            }
            SgfError::TooDeep { pos } => {
                write!(f, "variations nested too deeply at position {pos}")
            }
        }
    }
}

impl std::error::Error for SgfError {}
