use tracing::warn;

use crate::game_tree::{GameTree, NodeId};
use crate::props::Properties;

use super::error::SgfError;

/// Deepest variation nesting followed before the input is rejected.
const MAX_NESTING: usize = 1_000;

/// Parse SGF text into a game tree.
///
/// Only the first game of a collection is read. Nodes are collected with their
/// raw (still escaped) properties first; boards are derived afterwards, root first.
pub fn parse(input: &str) -> Result<GameTree, SgfError> {
    let text = input.trim();
    // The scanner starts inside the outermost group.
    let text = text.strip_prefix('(').unwrap_or(text);

    let mut p = Parser::new(text);
    p.group(None, 0)?;

    if !text[p.pos..].trim().is_empty() {
        warn!(
            "ignoring {} bytes after the first game tree",
            text.len() - p.pos
        );
    }

    Ok(GameTree::from_bare(p.nodes))
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    /// Parsed nodes, parents before children: (parent, properties).
    nodes: Vec<(Option<NodeId>, Properties)>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Parser {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            nodes: Vec::new(),
        }
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.bytes.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }

    /// Parse one group whose `(` has already been consumed, up to and including
    /// its `)`, and return the id of its first node. That node becomes a child
    /// of `parent`; the outermost group passes `None` and yields the root.
    ///
    /// Input that ends before the `)` is accepted.
    fn group(&mut self, parent: Option<NodeId>, depth: usize) -> Result<NodeId, SgfError> {
        if depth > MAX_NESTING {
            return Err(SgfError::TooDeep { pos: self.pos });
        }

        let mut first: Option<NodeId> = None;
        let mut current: Option<NodeId> = None;
        let mut key = String::new();
        let mut key_complete = false;

        while let Some(b) = self.advance() {
            let at = self.pos - 1;
            match b {
                b'[' => {
                    let node = current.ok_or(SgfError::UnexpectedChar { found: '[', pos: at })?;
                    if key.is_empty() {
                        return Err(SgfError::ValueWithoutKey { pos: at });
                    }
                    let value = self.value(at)?;
                    self.nodes[node].1.add_escaped(&key, value.to_string());
                    key_complete = true;
                }
                b'(' => {
                    let node = current.ok_or(SgfError::UnexpectedChar { found: '(', pos: at })?;
                    self.group(Some(node), depth + 1)?;
                    key.clear();
                }
                b')' => {
                    return first.ok_or(SgfError::UnexpectedChar { found: ')', pos: at });
                }
                b';' => {
                    let id = self.nodes.len();
                    self.nodes.push((current.or(parent), Properties::new()));
                    first.get_or_insert(id);
                    current = Some(id);
                    key.clear();
                }
                b'A'..=b'Z' => {
                    if key_complete {
                        key.clear();
                        key_complete = false;
                    }
                    key.push(b as char);
                }
                // Whitespace and old-style lowercase key letters.
                _ => {}
            }
        }

        first.ok_or(SgfError::NoNodes)
    }

    /// Read a value whose `[` sits at `open`. Returns it still escaped.
    fn value(&mut self, open: usize) -> Result<&'a str, SgfError> {
        let start = self.pos;
        loop {
            match self.advance() {
                None => return Err(SgfError::UnterminatedValue { pos: open }),
                Some(b'\\') => {
                    if self.advance().is_none() {
                        return Err(SgfError::DanglingEscape { pos: self.pos - 1 });
                    }
                }
                Some(b']') => return Ok(&self.text[start..self.pos - 1]),
                Some(_) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;

    #[test]
    fn parse_minimal_tree() {
        let tree = parse("(;)").unwrap();
        assert_eq!(tree.node_count(), 1);
        // The root gets a size even when the file has none.
        assert_eq!(tree.properties(0).get("SZ").as_deref(), Some("19"));
    }

    #[test]
    fn parse_two_node_game() {
        let tree = parse("(;SZ[9];B[cc])").unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.size(), 9);
        let child = tree.children(0)[0];
        let board = tree.board(child);
        assert_eq!(board.get((2, 2)), Colour::Black);
        assert_eq!(board.count(Colour::Black), 1);
        assert_eq!(board.count(Colour::White), 0);
    }

    #[test]
    fn parse_multiple_values() {
        let tree = parse("(;SZ[9]AB[aa][bb] [cc]AW[dd])").unwrap();
        let props = tree.properties(0);
        assert_eq!(props.all("AB"), vec!["aa", "bb", "cc"]);
        assert_eq!(props.all("AW"), vec!["dd"]);
    }

    #[test]
    fn duplicate_values_are_dropped() {
        let tree = parse("(;AB[aa][aa][bb])").unwrap();
        assert_eq!(tree.properties(0).all("AB"), vec!["aa", "bb"]);
    }

    #[test]
    fn parse_variations() {
        let tree = parse("(;SZ[9];B[aa](;W[bb];B[dd])(;W[cc]))").unwrap();
        let first = tree.children(0)[0];
        let variations = tree.children(first);
        assert_eq!(variations.len(), 2);
        assert_eq!(tree.properties(variations[0]).get("W").as_deref(), Some("bb"));
        assert_eq!(tree.properties(variations[1]).get("W").as_deref(), Some("cc"));
        let deeper = tree.children(variations[0])[0];
        assert_eq!(tree.board(deeper).get((3, 3)), Colour::Black);
        assert_eq!(tree.board(deeper).get((1, 1)), Colour::White);
        assert_eq!(tree.board(variations[1]).get((1, 1)), Colour::Empty);
    }

    #[test]
    fn sequence_continues_after_variation() {
        // A node after a nested group continues from the node before the group.
        let tree = parse("(;SZ[9](;B[aa]);B[bb])").unwrap();
        let children = tree.children(0);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.properties(children[1]).get("B").as_deref(), Some("bb"));
    }

    #[test]
    fn deeply_nested_groups() {
        let depth = MAX_NESTING;
        let text = format!("(;SZ[9]{})", "(;C[x]".repeat(depth) + &")".repeat(depth));
        let tree = parse(&text).unwrap();
        assert_eq!(tree.node_count(), depth + 1);
        assert_eq!(tree.node(tree.end(0)).depth(), depth);
    }

    #[test]
    fn escaped_values_stay_escaped() {
        let tree = parse(r"(;C[a \] b \\ c])").unwrap();
        assert_eq!(tree.properties(0).raw("C"), &[r"a \] b \\ c".to_string()]);
        assert_eq!(tree.properties(0).get("C").as_deref(), Some(r"a ] b \ c"));
    }

    #[test]
    fn brackets_and_parens_inside_values() {
        let tree = parse("(;C[(;B[aa])])").unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.properties(0).get("C").as_deref(), Some("(;B[aa]"));
    }

    #[test]
    fn unicode_values() {
        let tree = parse("(;PB[본인방 슈사쿠]C[é\\]])").unwrap();
        assert_eq!(tree.properties(0).get("PB").as_deref(), Some("본인방 슈사쿠"));
        assert_eq!(tree.properties(0).get("C").as_deref(), Some("é]"));
    }

    #[test]
    fn whitespace_and_lowercase_are_ignored() {
        let tree = parse("  \n( ; SZ[9]\n ; AddBlack[cc] )  ").unwrap();
        let child = tree.children(0)[0];
        assert_eq!(tree.properties(child).all("AB"), vec!["cc"]);
        assert_eq!(tree.board(child).get((2, 2)), Colour::Black);
    }

    #[test]
    fn new_key_starts_after_value() {
        let tree = parse("(;GM[1]FF[4])").unwrap();
        let props = tree.properties(0);
        assert_eq!(props.get("GM").as_deref(), Some("1"));
        assert_eq!(props.get("FF").as_deref(), Some("4"));
        assert!(!props.contains_key("GMFF"));
    }

    #[test]
    fn missing_leading_paren_is_accepted() {
        let tree = parse(";SZ[9];B[ee])").unwrap();
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn missing_closing_paren_is_accepted() {
        let tree = parse("(;SZ[9];B[ee]").unwrap();
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn only_first_game_is_read() {
        let tree = parse("(;SZ[9];B[aa])(;SZ[13];B[bb];W[cc])").unwrap();
        assert_eq!(tree.size(), 9);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn pass_values() {
        let tree = parse("(;SZ[19];B[];W[tt])").unwrap();
        let b = tree.children(0)[0];
        let w = tree.children(b)[0];
        assert!(tree.move_info(b).unwrap().is_pass());
        assert!(tree.move_info(w).unwrap().is_pass());
        assert!(tree.board(w).is_empty());
    }

    #[test]
    fn captures_are_applied_while_loading() {
        let tree = parse("(;SZ[9]AB[ba][ab];W[aa])").unwrap();
        let w = tree.children(0)[0];
        // White's stone has no liberties and is removed again.
        assert_eq!(tree.board(w).get((0, 0)), Colour::Empty);

        let tree = parse("(;SZ[9]AW[aa][cb]AB[ab];B[ba])").unwrap();
        let b = tree.children(0)[0];
        assert_eq!(tree.board(b).get((0, 0)), Colour::Empty);
        assert_eq!(tree.board(b).get((1, 0)), Colour::Black);
    }

    #[test]
    fn error_empty_input() {
        assert!(matches!(parse(""), Err(SgfError::NoNodes)));
        assert!(matches!(parse("  \n "), Err(SgfError::NoNodes)));
        assert!(matches!(parse("(SZ"), Err(SgfError::NoNodes)));
    }

    #[test]
    fn error_nesting_too_deep() {
        let depth = MAX_NESTING + 1;
        let text = format!("(;SZ[9]{})", "(;C[x]".repeat(depth) + &")".repeat(depth));
        assert!(matches!(parse(&text), Err(SgfError::TooDeep { .. })));
    }

    #[test]
    fn error_dangling_escape() {
        assert!(matches!(
            parse(r"(;C[abc\"),
            Err(SgfError::DanglingEscape { .. })
        ));
    }

    #[test]
    fn error_unterminated_value() {
        assert!(matches!(
            parse("(;C[abc"),
            Err(SgfError::UnterminatedValue { .. })
        ));
    }

    #[test]
    fn error_close_before_node() {
        assert!(matches!(
            parse("()"),
            Err(SgfError::UnexpectedChar { found: ')', .. })
        ));
        assert!(matches!(
            parse("(;SZ[9]())"),
            Err(SgfError::UnexpectedChar { found: ')', .. })
        ));
    }

    #[test]
    fn error_group_before_node() {
        assert!(matches!(
            parse("((;B[aa]))"),
            Err(SgfError::UnexpectedChar { found: '(', .. })
        ));
    }

    #[test]
    fn error_value_before_node() {
        assert!(matches!(
            parse("(SZ[9];B[aa])"),
            Err(SgfError::UnexpectedChar { found: '[', .. })
        ));
    }

    #[test]
    fn error_value_without_key() {
        assert!(matches!(
            parse("(;[aa])"),
            Err(SgfError::ValueWithoutKey { pos: 1 })
        ));
        // Keys do not carry over into a new node.
        assert!(matches!(
            parse("(;B[aa];[bb])"),
            Err(SgfError::ValueWithoutKey { .. })
        ));
    }

    #[test]
    fn keys_do_not_cross_variations() {
        // Into a variation...
        assert!(matches!(
            parse("(;B[aa](;[bb]))"),
            Err(SgfError::ValueWithoutKey { .. })
        ));
        // ...or back out of one.
        assert!(matches!(
            parse("(;C[x](;B[aa])[y])"),
            Err(SgfError::ValueWithoutKey { .. })
        ));
        let tree = parse("(;C[x](;B[aa])C[y])").unwrap();
        assert_eq!(tree.properties(0).all("C"), vec!["x", "y"]);
    }
}
