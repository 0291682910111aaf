//! Tree walking utilities.
//!
//! Nodes store no parent pointer; anything that needs parent context
//! (paths, parents, pruned walks) reconstructs it here from the generic
//! field list, so no pass re-implements descent per kind.

use super::node::{Field, Node};

/// One step from a node into one of its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    pub field: &'static str,
    /// Position within a list field; `None` for single and optional fields.
    pub index: Option<usize>,
}

/// Walk a tree in pre-order, calling `visitor` for every node.
pub fn walk<V>(root: &Node, visitor: &mut V)
where
    V: FnMut(&Node),
{
    walk_pruned(root, &mut |node| {
        visitor(node);
        true
    });
}

/// Pre-order walk where the visitor decides whether to descend into a node.
pub fn walk_pruned<V>(root: &Node, visitor: &mut V)
where
    V: FnMut(&Node) -> bool,
{
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        if visitor(&node) {
            stack.extend(node.children().into_iter().rev());
        }
    }
}

/// Every node of the tree in pre-order, root first.
pub fn descendants(root: &Node) -> Vec<Node> {
    let mut nodes = Vec::new();
    walk(root, &mut |node| nodes.push(node.clone()));
    nodes
}

/// The steps leading from `root` to `target`, matched by identity.
pub fn path_to(root: &Node, target: &Node) -> Option<Vec<Step>> {
    let mut path = Vec::new();
    find_path(root, target, &mut path).then_some(path)
}

fn find_path(node: &Node, target: &Node, path: &mut Vec<Step>) -> bool {
    if node.is(target) {
        return true;
    }
    for (field, value) in node.fields() {
        let indexed = matches!(value, Field::List(_));
        for (index, child) in value.nodes().iter().enumerate() {
            path.push(Step {
                field,
                index: indexed.then_some(index),
            });
            if find_path(child, target, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}

/// The child reached by one step.
pub fn child_at(node: &Node, step: Step) -> Option<Node> {
    let field = node.field(step.field)?;
    match (field, step.index) {
        (Field::List(nodes), Some(index)) => nodes.get(index).cloned(),
        (Field::One(child), None) => Some(child),
        (Field::Optional(child), None) => child,
        _ => None,
    }
}

/// The node reached by following `path` from `root`.
pub fn node_at(root: &Node, path: &[Step]) -> Option<Node> {
    path.iter().try_fold(root.clone(), |node, &step| child_at(&node, step))
}

/// The parent of `target` within `root`'s tree.
pub fn parent_of(root: &Node, target: &Node) -> Option<Node> {
    let path = path_to(root, target)?;
    let (_, ancestors) = path.split_last()?;
    node_at(root, ancestors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::build;
    use crate::syntax::kind::NodeKind;

    fn sample() -> (Node, Node) {
        let arg = build::number("2").unwrap();
        let call = build::evaluate(build::reference("double").unwrap(), vec![arg.clone()]).unwrap();
        let root = build::block(vec![call]).unwrap();
        (root, arg)
    }

    #[test]
    fn test_pre_order() {
        let (root, _) = sample();
        let kinds: Vec<_> = descendants(&root).iter().map(Node::kind).collect();
        assert_eq!(kinds[0], NodeKind::Block);
        assert_eq!(kinds[2], NodeKind::Evaluate);
        assert_eq!(kinds[3], NodeKind::Reference);
    }

    #[test]
    fn test_path_round_trip() {
        let (root, arg) = sample();
        let path = path_to(&root, &arg).unwrap();
        assert_eq!(
            path,
            vec![
                Step { field: "statements", index: Some(0) },
                Step { field: "inputs", index: Some(0) },
            ]
        );
        assert!(node_at(&root, &path).unwrap().is(&arg));
    }

    #[test]
    fn test_path_uses_identity() {
        let (root, _) = sample();
        let lookalike = build::number("2").unwrap();
        assert!(path_to(&root, &lookalike).is_none());
    }

    #[test]
    fn test_parent_of() {
        let (root, arg) = sample();
        assert_eq!(parent_of(&root, &arg).unwrap().kind(), NodeKind::Evaluate);
        assert!(parent_of(&root, &root).is_none());
    }

    #[test]
    fn test_pruned_walk_skips_subtrees() {
        let (root, _) = sample();
        let mut seen = 0;
        walk_pruned(&root, &mut |node| {
            seen += 1;
            node.kind() != NodeKind::Evaluate
        });
        // block, `{`, evaluate, `}`
        assert_eq!(seen, 4);
    }
}
