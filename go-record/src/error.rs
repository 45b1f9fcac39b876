use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoError {
    OffBoard,
    Occupied,
    Ko,
    Suicide,
    /// A board-altering property was edited after its node was created.
    ImmutableProperty(String),
    /// A property key that SGF cannot carry: empty, or not all `A`-`Z`.
    InvalidKey(String),
}

impl fmt::Display for GoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoError::OffBoard => write!(f, "off board"),
            GoError::Occupied => write!(f, "occupied point"),
            GoError::Ko => write!(f, "ko"),
            GoError::Suicide => write!(f, "suicide"),
            GoError::ImmutableProperty(key) => write!(
                f,
                "board-altering property {key} is immutable after creation"
            ),
            GoError::InvalidKey(key) => write!(f, "invalid property key {key:?}"),
        }
    }
}

impl std::error::Error for GoError {}
