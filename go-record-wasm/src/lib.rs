use go_record::{Colour, DEFAULT_SIZE, GameInfo, GameTree, MAX_SIZE, MoveDisplay, NodeId, gtp};
use wasm_bindgen::prelude::*;

/// Parse SGF text and return its game info as JSON.
/// Returns JSON: `{ size, komi?, handicap?, black_name?, ... }`
/// On parse error: `{ "error": "message" }`
#[wasm_bindgen]
pub fn parse_sgf_info(sgf_text: &str) -> String {
    match GameTree::from_sgf(sgf_text) {
        Ok(tree) => serde_json::to_string(&GameInfo::from_tree(&tree))
            .unwrap_or_else(|e| error_json(&e.to_string())),
        Err(e) => error_json(&e.to_string()),
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

/// A game record plus the node the viewer is looking at.
///
/// Also remembers which node an attached engine last saw so that
/// `sync_gtp` can send the shortest catch-up.
#[wasm_bindgen]
pub struct WasmRecord {
    tree: GameTree,
    current: NodeId,
    engine: Option<NodeId>,
}

#[wasm_bindgen]
impl WasmRecord {
    /// An empty record. Sizes outside 1..=52 fall back to 19.
    #[wasm_bindgen(constructor)]
    pub fn new(size: u8) -> Self {
        let size = if (1..=MAX_SIZE).contains(&size) {
            size
        } else {
            DEFAULT_SIZE
        };
        Self::from_tree(GameTree::new(size))
    }

    fn from_tree(tree: GameTree) -> Self {
        let current = tree.root();
        Self {
            tree,
            current,
            engine: None,
        }
    }

    // -- SGF import/export --

    /// Replace the record with parsed SGF text.
    /// Returns true on success; on error the record is untouched.
    pub fn load_sgf(&mut self, sgf_text: &str) -> bool {
        match GameTree::from_sgf(sgf_text) {
            Ok(tree) => {
                *self = Self::from_tree(tree);
                true
            }
            Err(_) => false,
        }
    }

    pub fn to_sgf(&self) -> String {
        self.tree.to_sgf()
    }

    pub fn info_json(&self) -> String {
        serde_json::to_string(&GameInfo::from_tree(&self.tree))
            .unwrap_or_else(|e| error_json(&e.to_string()))
    }

    // -- Moves --

    /// Play the side to move at (col, row) and step onto the result.
    /// Returns the rejection reason (`"ko"`, `"suicide"`, ...) or nothing.
    pub fn try_play(&mut self, col: u8, row: u8) -> Option<String> {
        let colour = self.tree.next_colour(self.current);
        match self.tree.try_move(self.current, colour, (col, row)) {
            Ok(id) => {
                self.current = id;
                None
            }
            Err(e) => Some(e.to_string()),
        }
    }

    pub fn pass(&mut self) {
        let colour = self.tree.next_colour(self.current);
        self.current = self.tree.try_pass(self.current, colour);
    }

    /// Delete the current node and its subtree, moving to its parent.
    pub fn delete_current(&mut self) -> bool {
        let Some(parent) = self.tree.parent(self.current) else {
            return false;
        };
        let removed = self.tree.remove_child(parent, self.current);
        self.current = parent;
        removed
    }

    // -- Navigation --

    pub fn back(&mut self) -> bool {
        match self.tree.parent(self.current) {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Step onto the first child.
    pub fn forward(&mut self) -> bool {
        match self.tree.children(self.current).first() {
            Some(&child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    pub fn to_start(&mut self) {
        self.current = self.tree.root();
    }

    pub fn to_end(&mut self) {
        self.current = self.tree.end(self.current);
    }

    /// Move to the next (`step` = 1) or previous (`step` = -1) sibling.
    pub fn switch_variation(&mut self, step: i32) -> bool {
        let Some(parent) = self.tree.parent(self.current) else {
            return false;
        };
        let siblings = self.tree.children(parent);
        let Some(index) = siblings.iter().position(|&c| c == self.current) else {
            return false;
        };
        let target = index as i64 + i64::from(step);
        match usize::try_from(target).ok().and_then(|i| siblings.get(i)) {
            Some(&sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn navigate_to(&mut self, node_id: usize) -> bool {
        if self.tree.contains(node_id) {
            self.current = node_id;
            true
        } else {
            false
        }
    }

    pub fn current_node_id(&self) -> usize {
        self.current
    }

    pub fn depth(&self) -> usize {
        self.tree.node(self.current).depth()
    }

    pub fn child_count(&self) -> usize {
        self.tree.children(self.current).len()
    }

    pub fn node_count(&self) -> usize {
        self.tree.node_count()
    }

    // -- Current position (WASM-friendly types) --

    /// Row-major cells: 1 = Black, -1 = White, 0 = empty.
    pub fn board(&self) -> js_sys::Int8Array {
        let cells: Vec<i8> = self
            .tree
            .board(self.current)
            .cells()
            .iter()
            .map(|c| c.to_int())
            .collect();
        js_sys::Int8Array::from(&cells[..])
    }

    pub fn size(&self) -> u8 {
        self.tree.size()
    }

    pub fn next_colour(&self) -> i8 {
        self.tree.next_colour(self.current).to_int()
    }

    /// The current node's move as text, e.g. `(B D4 )` or `(none.)`.
    pub fn move_text(&self) -> String {
        MoveDisplay(self.tree.move_info(self.current)).to_string()
    }

    /// Returns the current move as JSON, or `null`.
    pub fn move_json(&self) -> String {
        serde_json::to_string(&self.tree.move_info(self.current))
            .unwrap_or_else(|_| "null".to_string())
    }

    // -- Comments --

    pub fn comment(&self) -> String {
        self.tree
            .properties(self.current)
            .get("C")
            .unwrap_or_default()
    }

    /// Set the comment on the current node; empty text removes it.
    /// Returns an error message if the edit was refused.
    pub fn set_comment(&mut self, text: &str) -> Option<String> {
        self.set_property("C", text)
    }

    /// Set a non-board-altering property on the current node; empty text
    /// removes it. Returns an error message if the edit was refused.
    pub fn set_property(&mut self, key: &str, text: &str) -> Option<String> {
        let result = if text.is_empty() {
            self.tree.delete_key(self.current, key)
        } else {
            self.tree.set_value(self.current, key, text)
        };
        result.err().map(|e| e.to_string())
    }

    // -- Engine commands (JSON arrays of GTP strings) --

    pub fn full_gtp(&self) -> String {
        commands_json(&gtp::full_commands(&self.tree, self.current))
    }

    /// Commands bringing the engine to the current node; afterwards the
    /// engine is assumed to be there.
    pub fn sync_gtp(&mut self) -> String {
        let commands = gtp::sync_commands(&self.tree, self.engine, self.current);
        self.engine = Some(self.current);
        commands_json(&commands)
    }

    /// Forget the engine's position, e.g. after restarting it.
    pub fn reset_engine(&mut self) {
        self.engine = None;
    }

    /// Parse one line of engine analysis into a JSON array of moves
    /// starting with the side to move here.
    pub fn variation_json(&self, line: &str) -> String {
        let colour: Colour = self.tree.next_colour(self.current);
        let turns = gtp::parse_variation(line, colour, self.tree.size());
        serde_json::to_string(&turns).unwrap_or_else(|_| "[]".to_string())
    }
}

fn commands_json(commands: &[gtp::Command]) -> String {
    let lines: Vec<String> = commands.iter().map(ToString::to_string).collect();
    serde_json::to_string(&lines).unwrap_or_else(|_| "[]".to_string())
}
