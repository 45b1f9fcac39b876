use serde::Serialize;

use crate::game_tree::GameTree;

/// Game-level facts read from the root node.
///
/// Values are unescaped; absent or unparseable properties are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameInfo {
    pub size: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub komi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handicap: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub black_rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white_rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    /// Nodes along the main line that carry a move.
    pub move_count: usize,
}

impl GameInfo {
    pub fn from_tree(tree: &GameTree) -> Self {
        let root = tree.properties(tree.root());
        let text = |key: &str| root.get(key).filter(|s| !s.trim().is_empty());
        let main_line = tree.path_to(tree.end(tree.root()));

        GameInfo {
            size: tree.size(),
            komi: text("KM").and_then(|s| s.trim().parse().ok()),
            handicap: text("HA").and_then(|s| s.trim().parse().ok()),
            black_name: text("PB"),
            white_name: text("PW"),
            black_rank: text("BR"),
            white_rank: text("WR"),
            result: text("RE"),
            date: text("DT"),
            rules: text("RU"),
            event: text("EV"),
            game_name: text("GN"),
            move_count: main_line
                .iter()
                .filter(|&&id| tree.move_info(id).is_some())
                .count(),
        }
    }

    /// `Black (rank) vs White (rank)`, with `?` for unknown names.
    pub fn players(&self) -> String {
        let side = |name: &Option<String>, rank: &Option<String>| {
            let name = name.as_deref().unwrap_or("?");
            match rank {
                Some(rank) => format!("{name} ({rank})"),
                None => name.to_string(),
            }
        };
        format!(
            "{} vs {}",
            side(&self.black_name, &self.black_rank),
            side(&self.white_name, &self.white_rank)
        )
    }
}
