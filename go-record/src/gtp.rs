//! Go Text Protocol (GTP) command lists for driving an external engine.
//!
//! Nothing here talks to a process: the functions turn nodes of a
//! [`GameTree`] into the commands that recreate them, and read an engine's
//! principal-variation output back into moves. Sending and receiving is the
//! caller's job.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::colour::Colour;
use crate::coord;
use crate::game_tree::{GameTree, NodeId};
use crate::turn::Turn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    BoardSize { size: u8 },
    ClearBoard,
    /// `vertex` is a human vertex (`D4`) or `pass`.
    Play { colour: Colour, vertex: String },
    Undo,
}

impl Command {
    fn play(colour: Colour, vertex: impl Into<String>) -> Self {
        Command::Play {
            colour,
            vertex: vertex.into(),
        }
    }
}

/// The wire form: `boardsize 19`, `clear_board`, `play B D4`, `play W pass`, `undo`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::BoardSize { size } => write!(f, "boardsize {size}"),
            Command::ClearBoard => write!(f, "clear_board"),
            Command::Play { colour, vertex } => write!(f, "play {} {vertex}", colour.letter()),
            Command::Undo => write!(f, "undo"),
        }
    }
}

/// Commands that take an engine from the parent's position to this node's.
///
/// Order: `AB` stones, `AW` stones, then `B` and `W` moves. Setup points that
/// do not decode are skipped; moves that do not decode are passes. `AE` is
/// not translated.
pub fn step_commands(tree: &GameTree, id: NodeId) -> Vec<Command> {
    let size = tree.size();
    let props = tree.properties(id);
    let mut commands = Vec::new();

    for (key, colour) in [("AB", Colour::Black), ("AW", Colour::White)] {
        for value in props.raw(key) {
            let Some(point) = coord::point_from_sgf(value, size) else {
                continue;
            };
            match coord::human_from_point(point, size) {
                Some(vertex) => commands.push(Command::play(colour, vertex)),
                None => warn!("setup point {value} has no GTP vertex, skipping"),
            }
        }
    }

    for (key, colour) in [("B", Colour::Black), ("W", Colour::White)] {
        for value in props.raw(key) {
            match Turn::from_sgf(colour, value, size).vertex() {
                Some(vertex) => commands.push(Command::play(colour, vertex)),
                None => warn!("move {value} has no GTP vertex, skipping"),
            }
        }
    }

    commands
}

/// Commands that recreate the position at `id` on a fresh engine:
/// `boardsize`, `clear_board`, then every node's step commands from the root down.
pub fn full_commands(tree: &GameTree, id: NodeId) -> Vec<Command> {
    let mut commands = vec![
        Command::BoardSize { size: tree.size() },
        Command::ClearBoard,
    ];
    for node in tree.path_to(id) {
        commands.extend(step_commands(tree, node));
    }
    commands
}

/// The shortest command list that moves an engine showing `engine` to `target`.
///
/// One step up sends an `undo` per command the engine's node added; one step
/// down sends the target's step commands; anything else (including an engine
/// with no known position, or one on a node no longer in the tree) starts over
/// with [`full_commands`].
pub fn sync_commands(tree: &GameTree, engine: Option<NodeId>, target: NodeId) -> Vec<Command> {
    let engine = engine.filter(|&id| tree.contains(id));
    let Some(engine) = engine else {
        return full_commands(tree, target);
    };

    if engine == target {
        Vec::new()
    } else if tree.parent(engine) == Some(target) {
        vec![Command::Undo; step_commands(tree, engine).len()]
    } else if tree.parent(target) == Some(engine) {
        step_commands(tree, target)
    } else {
        full_commands(tree, target)
    }
}

/// Read the principal variation from one line of engine analysis output.
///
/// The line must have at least nine whitespace-separated tokens with `PV:` as
/// the eighth; the moves follow it. Colours alternate starting from
/// `next_colour`. Tokens that are neither `pass` nor a vertex are skipped and
/// do not consume a colour. Anything else yields an empty list.
pub fn parse_variation(line: &str, next_colour: Colour, size: u8) -> Vec<Turn> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 9 || tokens[7] != "PV:" {
        return Vec::new();
    }

    let mut colour = next_colour;
    let mut turns = Vec::new();
    for &token in &tokens[8..] {
        let turn = if token == "pass" {
            Turn::pass(colour, size)
        } else if let Some(point) = coord::point_from_human(token, size) {
            Turn::play(colour, point, size)
        } else {
            warn!("unreadable vertex {token:?} in engine variation");
            continue;
        };
        turns.push(turn);
        colour = colour.opposite();
    }
    turns
}
