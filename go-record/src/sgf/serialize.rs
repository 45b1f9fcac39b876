use crate::game_tree::{GameTree, Node, NodeId};

/// Serialize the whole tree, starting at its root.
pub fn serialize(tree: &GameTree) -> String {
    serialize_from(tree, tree.root())
}

/// Serialize the subtree below `id` as a standalone game tree.
///
/// Runs of single children are written as one sequence; a node with several
/// children closes its sequence with one parenthesised group per child.
pub fn serialize_from(tree: &GameTree, id: NodeId) -> String {
    let mut buf = String::new();
    let mut pending = vec![Step::Group(id)];

    while let Some(step) = pending.pop() {
        match step {
            Step::Close => buf.push(')'),
            Step::Group(start) => {
                buf.push('(');
                let mut current = start;
                loop {
                    write_node(tree.node(current), &mut buf);
                    match tree.children(current) {
                        [only] => current = *only,
                        children => {
                            pending.push(Step::Close);
                            pending.extend(children.iter().rev().map(|&c| Step::Group(c)));
                            break;
                        }
                    }
                }
            }
        }
    }
    buf
}

enum Step {
    Group(NodeId),
    Close,
}

fn write_node(node: &Node, buf: &mut String) {
    buf.push(';');
    for (key, values) in node.properties().iter() {
        buf.push_str(key);
        // Values are stored escaped already.
        for value in values {
            buf.push('[');
            buf.push_str(value);
            buf.push(']');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use crate::props::Properties;

    #[test]
    fn single_node() {
        let tree = GameTree::new(9);
        assert_eq!(serialize(&tree), "(;SZ[9]GM[1]FF[4])");
    }

    #[test]
    fn main_line_is_one_sequence() {
        let mut tree = GameTree::new(9);
        let b = tree.try_move(0, Colour::Black, (2, 2)).unwrap();
        tree.try_move(b, Colour::White, (6, 6)).unwrap();
        assert_eq!(serialize(&tree), "(;SZ[9]GM[1]FF[4];B[cc];W[gg])");
    }

    #[test]
    fn variations_become_groups() {
        let mut tree = GameTree::new(9);
        let b = tree.try_move(0, Colour::Black, (2, 2)).unwrap();
        let w1 = tree.try_move(b, Colour::White, (6, 6)).unwrap();
        tree.try_move(b, Colour::White, (2, 6)).unwrap();
        tree.try_move(w1, Colour::Black, (6, 2)).unwrap();
        assert_eq!(
            serialize(&tree),
            "(;SZ[9]GM[1]FF[4];B[cc](;W[gg];B[gc])(;W[cg]))"
        );
    }

    #[test]
    fn subtree_from_inner_node() {
        let mut tree = GameTree::new(9);
        let b = tree.try_move(0, Colour::Black, (2, 2)).unwrap();
        let w = tree.try_move(b, Colour::White, (6, 6)).unwrap();
        tree.try_move(w, Colour::Black, (6, 2)).unwrap();
        assert_eq!(serialize_from(&tree, w), "(;W[gg];B[gc])");
    }

    #[test]
    fn values_are_written_escaped() {
        let mut tree = GameTree::new(9);
        tree.add_value(0, "C", "a]b\\c").unwrap();
        assert_eq!(serialize(&tree), r"(;SZ[9]GM[1]FF[4]C[a\]b\\c])");
    }

    #[test]
    fn multiple_values_and_empty_values() {
        let props = Properties::from_pairs([("SZ", "9"), ("AB", "aa"), ("AB", "bb")]);
        let mut tree = GameTree::with_root(props).unwrap();
        tree.try_pass(0, Colour::White);
        assert_eq!(serialize(&tree), "(;SZ[9]AB[aa][bb];W[])");
    }
}
