pub mod board;
pub mod colour;
pub mod coord;
pub mod error;
pub mod game_tree;
pub mod gtp;
pub mod props;
pub mod sgf;
pub mod turn;

/// Zero-based `(x, y)`: `x` is the column from the left, `y` the row from the top.
pub type Point = (u8, u8);

pub use board::{Board, DEFAULT_SIZE, MAX_SIZE};
pub use colour::Colour;
pub use error::GoError;
pub use game_tree::{GameTree, Node, NodeId};
pub use gtp::Command;
pub use props::Properties;
pub use sgf::{GameInfo, SgfError};
pub use turn::{Move, MoveDisplay, Turn};
