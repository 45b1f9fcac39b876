//! Command-line operations over SGF game records.
//!
//! Each command takes SGF text and returns the text to print, so the binary
//! only deals with files and flags.

use anyhow::{Context, Result, bail};
use go_record::gtp::full_commands;
use go_record::{DEFAULT_SIZE, GameInfo, GameTree, MAX_SIZE, MoveDisplay, NodeId, coord};
use tracing::{debug, info};

/// Environment variable holding the board size for new records.
pub const SIZE_VAR: &str = "GO_RECORD_SIZE";

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "go_record=info,go_record_cli=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Board size for records created from scratch.
    pub size: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config { size: DEFAULT_SIZE }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_size_var(std::env::var(SIZE_VAR).ok().as_deref())
    }

    /// Build from the raw value of [`SIZE_VAR`], if set.
    pub fn from_size_var(value: Option<&str>) -> Result<Self> {
        let size = match value {
            Some(v) => parse_size(v).with_context(|| format!("bad {SIZE_VAR}"))?,
            None => DEFAULT_SIZE,
        };
        Ok(Config { size })
    }
}

pub fn parse_size(s: &str) -> Result<u8> {
    let size: u8 = s
        .trim()
        .parse()
        .with_context(|| format!("invalid board size {s:?}"))?;
    check_size(size)?;
    Ok(size)
}

fn check_size(size: u8) -> Result<()> {
    if !(1..=MAX_SIZE).contains(&size) {
        bail!("board size {size} is outside 1..={MAX_SIZE}");
    }
    Ok(())
}

pub fn load(text: &str) -> Result<GameTree> {
    GameTree::from_sgf(text).context("cannot read game record")
}

/// The node `steps` nodes down the main line, or the end of the main line.
pub fn main_line_node(tree: &GameTree, steps: Option<usize>) -> Result<NodeId> {
    let Some(steps) = steps else {
        return Ok(tree.end(tree.root()));
    };
    let mut id = tree.root();
    for taken in 0..steps {
        id = *tree
            .children(id)
            .first()
            .with_context(|| format!("main line ends after {taken} steps"))?;
    }
    Ok(id)
}

pub fn check(text: &str) -> Result<String> {
    let tree = load(text)?;
    let end = tree.end(tree.root());
    Ok(format!(
        "ok: {} nodes, {}x{} board, main line depth {}",
        tree.node_count(),
        tree.size(),
        tree.size(),
        tree.node(end).depth()
    ))
}

/// Board and move at a main-line node.
pub fn show(text: &str, steps: Option<usize>) -> Result<String> {
    let tree = load(text)?;
    let node = tree.node(main_line_node(&tree, steps)?);
    Ok(format!(
        "depth {} {}, {} to play\n{}",
        node.depth(),
        MoveDisplay(node.move_info()),
        node.next_colour(),
        node.board()
    ))
}

pub fn info(text: &str, json: bool) -> Result<String> {
    let tree = load(text)?;
    let info = GameInfo::from_tree(&tree);
    if json {
        return serde_json::to_string_pretty(&info).context("cannot render game info");
    }

    let mut lines = vec![
        info.players(),
        format!("size: {}", info.size),
        format!("moves: {}", info.move_count),
    ];
    let optional = [
        ("komi", info.komi.map(|k| k.to_string())),
        ("handicap", info.handicap.map(|h| h.to_string())),
        ("result", info.result.clone()),
        ("date", info.date.clone()),
        ("rules", info.rules.clone()),
        ("event", info.event.clone()),
        ("game", info.game_name.clone()),
    ];
    lines.extend(
        optional
            .into_iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))),
    );
    Ok(lines.join("\n"))
}

/// Re-serialize in canonical form.
pub fn fmt(text: &str) -> Result<String> {
    Ok(load(text)?.to_sgf())
}

/// GTP commands recreating a main-line node, one per line.
pub fn gtp(text: &str, steps: Option<usize>) -> Result<String> {
    let tree = load(text)?;
    let id = main_line_node(&tree, steps)?;
    let lines: Vec<String> = full_commands(&tree, id)
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(lines.join("\n"))
}

/// Play human vertices (`D4`, `pass`) in turn from the end of the main line.
///
/// Starts from `base` when given, else from an empty board of `size`.
/// Returns the resulting record as SGF.
pub fn play(size: u8, base: Option<&str>, moves: &[String]) -> Result<String> {
    let mut tree = match base {
        Some(text) => load(text)?,
        None => {
            check_size(size)?;
            GameTree::new(size)
        }
    };

    let mut id = tree.end(tree.root());
    for (n, vertex) in moves.iter().enumerate() {
        let colour = tree.next_colour(id);
        id = if vertex.eq_ignore_ascii_case("pass") {
            tree.try_pass(id, colour)
        } else {
            let point = coord::point_from_human(&vertex.to_ascii_uppercase(), tree.size())
                .with_context(|| format!("move {}: {vertex:?} is not on the board", n + 1))?;
            tree.try_move(id, colour, point)
                .with_context(|| format!("move {}: {colour} {vertex}", n + 1))?
        };
        debug!("played {} at node {id}", MoveDisplay(tree.move_info(id)));
    }
    info!("record has {} nodes", tree.node_count());
    Ok(tree.to_sgf())
}
