use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::Point;
use crate::board::{Board, DEFAULT_SIZE, MAX_SIZE};
use crate::colour::Colour;
use crate::coord;
use crate::error::GoError;
use crate::props::{self, Properties};
use crate::sgf::{self, SgfError};
use crate::turn::Turn;

pub type NodeId = usize;

/// One position in the record: its properties and the board they lead to.
///
/// The board is derived when the node is created and never changes afterwards,
/// which is why the board-altering properties cannot be edited later.
#[derive(Debug, Clone)]
pub struct Node {
    properties: Properties,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    board: Board,
    depth: usize,
}

impl Node {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Distance from the root (the root is 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn same_board(&self, other: &Node) -> bool {
        self.board == other.board
    }

    /// The move this node carries: the first `B` value, else the first `W` value.
    pub fn move_info(&self) -> Option<Turn> {
        let size = self.board.size();
        [(Colour::Black, "B"), (Colour::White, "W")]
            .into_iter()
            .find_map(|(colour, key)| {
                self.properties
                    .raw(key)
                    .first()
                    .map(|value| Turn::from_sgf(colour, value, size))
            })
    }

    /// Colour to play after this node, judged from this node's own properties only.
    pub fn next_colour(&self) -> Colour {
        let has = |key| self.properties.contains_key(key);
        if has("B") {
            Colour::White
        } else if has("W") {
            Colour::Black
        } else if has("AB") {
            Colour::White
        } else if has("AW") {
            Colour::Black
        } else {
            Colour::Black
        }
    }
}

/// A game record: an arena of nodes linked by ids.
///
/// Children are owned through their parent's `children` list; `parent` is a plain
/// back-reference. Removed subtrees leave empty slots so ids are never reused.
#[derive(Debug, Clone)]
pub struct GameTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    size: u8,
}

impl GameTree {
    /// A fresh record with `SZ`, `GM[1]` and `FF[4]` on the root.
    ///
    /// Panics unless `1 <= size <= 52`.
    pub fn new(size: u8) -> Self {
        assert!(
            (1..=MAX_SIZE).contains(&size),
            "invalid board size {size}"
        );
        let props = Properties::from_pairs([
            ("SZ", size.to_string()),
            ("GM", "1".to_string()),
            ("FF", "4".to_string()),
        ]);
        Self::root_from(props)
    }

    /// A record whose root carries the given properties.
    ///
    /// The board size comes from `SZ` when it is a number in `1..=52`; otherwise
    /// it is 19 and `SZ[19]` is written into the root. Fails with `InvalidKey`
    /// if a key could not be written back as SGF.
    pub fn with_root(properties: Properties) -> Result<Self, GoError> {
        check_keys(&properties)?;
        Ok(Self::root_from(properties))
    }

    fn root_from(mut properties: Properties) -> Self {
        let size = resolve_size(&mut properties);
        let board = Board::derive(None, size, &properties);
        GameTree {
            nodes: vec![Some(Node {
                properties,
                parent: None,
                children: Vec::new(),
                board,
                depth: 0,
            })],
            root: 0,
            size,
        }
    }

    /// Build a tree from parsed nodes listed parents-first, root at index 0.
    /// Boards are derived top-down in that order. Ids match the list indices.
    pub(crate) fn from_bare(bare: Vec<(Option<NodeId>, Properties)>) -> Self {
        let mut nodes = bare.into_iter();
        let Some((_, root_props)) = nodes.next() else {
            return Self::new(DEFAULT_SIZE);
        };
        let mut tree = Self::root_from(root_props);
        for (parent, properties) in nodes {
            let parent = parent.unwrap_or(tree.root);
            tree.push_child(parent, properties);
        }
        tree
    }

    /// Parse SGF text.
    pub fn from_sgf(text: &str) -> Result<Self, SgfError> {
        sgf::parse(text)
    }

    /// Serialize the whole record as SGF text.
    pub fn to_sgf(&self) -> String {
        sgf::serialize(self)
    }

    // -- Accessors --

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Panics if `id` is not (or no longer) part of the tree.
    pub fn node(&self, id: NodeId) -> &Node {
        self.get(id)
            .unwrap_or_else(|| panic!("node {id} is not in the tree"))
    }

    pub fn board(&self, id: NodeId) -> &Board {
        self.node(id).board()
    }

    pub fn properties(&self, id: NodeId) -> &Properties {
        self.node(id).properties()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn move_info(&self, id: NodeId) -> Option<Turn> {
        self.node(id).move_info()
    }

    pub fn next_colour(&self, id: NodeId) -> Colour {
        self.node(id).next_colour()
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Live nodes with their ids, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|node| (id, node)))
    }

    // -- Navigation --

    /// Follow parent links up to the node without a parent.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Follow first children down to a leaf.
    pub fn end(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&first) = self.children(current).first() {
            current = first;
        }
        current
    }

    /// Walk parent links from node to root, return path (root-first order).
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(node);
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// True when both nodes exist and hold identical boards.
    pub fn same_board(&self, a: NodeId, b: NodeId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.same_board(b),
            _ => false,
        }
    }

    // -- Growing the tree --

    /// Create a child carrying arbitrary properties (setup stones included)
    /// and derive its board.
    pub fn add_node(&mut self, parent: NodeId, properties: Properties) -> Result<NodeId, GoError> {
        check_keys(&properties)?;
        Ok(self.push_child(parent, properties))
    }

    /// Play `colour` at `point` from `id`, returning the resulting child.
    ///
    /// An existing child with the same move is reused. Moves that recreate the
    /// position two plies back (`Ko`) or leave the played stone captured
    /// (`Suicide`) are rejected and leave the tree unchanged.
    ///
    /// Panics if `colour` is Empty.
    pub fn try_move(
        &mut self,
        id: NodeId,
        colour: Colour,
        point: Point,
    ) -> Result<NodeId, GoError> {
        assert!(colour.is_stone(), "try_move needs a stone colour");

        let board = self.board(id);
        if !board.on_board(point) {
            return Err(GoError::OffBoard);
        }
        if board.get(point) != Colour::Empty {
            return Err(GoError::Occupied);
        }

        let wanted = Turn::play(colour, point, self.size);
        if let Some(existing) = self.find_child(id, |turn| turn == wanted) {
            return Ok(existing);
        }

        let props = Properties::from_pairs([(colour.move_key(), coord::sgf_from_point(point))]);
        let candidate = self.push_child(id, props);

        if let Some(grandparent) = self.parent(id)
            && self.same_board(candidate, grandparent)
        {
            debug!("rejecting {wanted} at node {id}: ko");
            self.remove_child(id, candidate);
            return Err(GoError::Ko);
        }

        if self.board(candidate).get(point) == Colour::Empty {
            debug!("rejecting {wanted} at node {id}: suicide");
            self.remove_child(id, candidate);
            return Err(GoError::Suicide);
        }

        Ok(candidate)
    }

    /// Pass with `colour` from `id`, reusing an existing pass child of that colour.
    ///
    /// Panics if `colour` is Empty.
    pub fn try_pass(&mut self, id: NodeId, colour: Colour) -> NodeId {
        assert!(colour.is_stone(), "try_pass needs a stone colour");

        let same_pass = |turn: Turn| turn.is_pass() && turn.colour == colour;
        if let Some(existing) = self.find_child(id, same_pass) {
            return existing;
        }
        let props = Properties::from_pairs([(colour.move_key(), "")]);
        self.push_child(id, props)
    }

    /// Detach `child` from `parent` and drop its whole subtree.
    /// Returns false (and does nothing) if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(Some(node)) = self.nodes.get_mut(parent) else {
            return false;
        };
        let Some(pos) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(pos);

        let mut stack = vec![child];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.get_mut(id).and_then(Option::take) {
                stack.extend(removed.children);
            }
        }
        debug!("removed subtree {child} from node {parent}");
        true
    }

    // -- Guarded property edits --

    /// Add a value to a non-board-altering property.
    pub fn add_value(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), GoError> {
        self.props_mut(id, key)?.add(key, value);
        Ok(())
    }

    /// Replace the values of a non-board-altering property.
    pub fn set_value(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), GoError> {
        self.props_mut(id, key)?.set(key, value);
        Ok(())
    }

    pub fn delete_value(&mut self, id: NodeId, key: &str, value: &str) -> Result<(), GoError> {
        self.props_mut(id, key)?.delete_value(key, value);
        Ok(())
    }

    pub fn delete_key(&mut self, id: NodeId, key: &str) -> Result<(), GoError> {
        self.props_mut(id, key)?.delete_key(key);
        Ok(())
    }

    // -- Internal helpers --

    fn props_mut(&mut self, id: NodeId, key: &str) -> Result<&mut Properties, GoError> {
        if !props::is_valid_key(key) {
            return Err(GoError::InvalidKey(key.to_string()));
        }
        // The size is fixed when the tree is built.
        if props::is_mutor(key) || (id == self.root && key == "SZ") {
            return Err(GoError::ImmutableProperty(key.to_string()));
        }
        Ok(&mut self.node_mut(id).properties)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("node {id} is not in the tree"))
    }

    fn find_child(&self, id: NodeId, mut pred: impl FnMut(Turn) -> bool) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.move_info(child).is_some_and(&mut pred))
    }

    fn push_child(&mut self, parent: NodeId, properties: Properties) -> NodeId {
        let parent_node = self.node(parent);
        let board = Board::derive(Some(parent_node.board()), self.size, &properties);
        let depth = parent_node.depth + 1;

        let id = self.nodes.len();
        self.nodes.push(Some(Node {
            properties,
            parent: Some(parent),
            children: Vec::new(),
            board,
            depth,
        }));
        self.node_mut(parent).children.push(id);
        id
    }
}

fn check_keys(properties: &Properties) -> Result<(), GoError> {
    match properties.keys().find(|key| !props::is_valid_key(key)) {
        Some(key) => Err(GoError::InvalidKey(key.to_string())),
        None => Ok(()),
    }
}

fn resolve_size(properties: &mut Properties) -> u8 {
    let size = properties
        .get("SZ")
        .and_then(|s| s.trim().parse::<u8>().ok())
        .filter(|sz| (1..=MAX_SIZE).contains(sz));
    match size {
        Some(sz) => sz,
        None => {
            properties.set("SZ", &DEFAULT_SIZE.to_string());
            DEFAULT_SIZE
        }
    }
}

impl fmt::Display for GameTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sgf())
    }
}

impl FromStr for GameTree {
    type Err = SgfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        sgf::parse(s)
    }
}
