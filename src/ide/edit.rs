//! Tree edits — replacing a node deep inside an immutable tree.
//!
//! Only the spine between the edited node and the chosen boundary is rebuilt;
//! every other subtree of the new tree is the same node as in the old one.

use crate::syntax::{EditError, Node, Replace, walk};

/// Replace `original` anywhere under `root`, rebuilding every ancestor.
///
/// `replacement: None` removes the original from its parent, which only
/// succeeds where the parent's grammar allows the field to be empty.
pub fn replace_in_tree(root: &Node, original: &Node, replacement: Option<Node>) -> Result<Node, EditError> {
    let depth = walk::path_to(root, original).ok_or(EditError::NotInTree)?.len();
    rebuild_up_to(root, original, replacement, depth)
}

/// Replace `original` and rebuild at most `levels` of its ancestors.
///
/// Returns the highest rebuilt ancestor: the new root when `levels` reaches
/// it, otherwise the new version of the ancestor `levels` steps above the
/// original. With `levels == 0` the replacement itself is returned.
pub fn rebuild_up_to(
    root: &Node,
    original: &Node,
    replacement: Option<Node>,
    levels: usize,
) -> Result<Node, EditError> {
    let path = walk::path_to(root, original).ok_or(EditError::NotInTree)?;

    let mut ancestors = Vec::with_capacity(path.len());
    let mut node = root.clone();
    for &step in &path {
        let child = walk::child_at(&node, step).ok_or(EditError::NotInTree)?;
        ancestors.push(std::mem::replace(&mut node, child));
    }

    let stop = path.len().saturating_sub(levels);
    let mut old = original.clone();
    let mut new = replacement;
    for (parent, step) in ancestors.iter().zip(&path).skip(stop).rev() {
        let rebuilt = parent.replace(
            step.field,
            Replace::Child {
                original: Some(old),
                replacement: new,
            },
        )?;
        old = parent.clone();
        new = Some(rebuilt);
    }

    tracing::trace!(depth = path.len(), levels, "rebuilt spine");
    new.ok_or(EditError::RemoveRoot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{NodeKind, Payload, build};

    /// `{ f(1, 2) x }`
    fn sample() -> (Node, Node, Node, Node) {
        let one = build::number("1").unwrap();
        let call = build::evaluate(build::reference("f").unwrap(), vec![one.clone(), build::number("2").unwrap()])
            .unwrap();
        let sibling = build::reference("x").unwrap();
        let root = build::block(vec![call.clone(), sibling.clone()]).unwrap();
        (root, call, one, sibling)
    }

    #[test]
    fn test_replace_shares_untouched_subtrees() {
        let (root, _, one, sibling) = sample();
        let three = build::number("3").unwrap();

        let edited = replace_in_tree(&root, &one, Some(three.clone())).unwrap();
        assert!(!edited.is(&root));
        assert!(walk::path_to(&edited, &three).is_some());
        assert!(walk::path_to(&edited, &sibling).is_some());
        // The old tree is unchanged.
        assert!(walk::path_to(&root, &one).is_some());
        assert!(walk::path_to(&root, &three).is_none());
    }

    #[test]
    fn test_remove_from_list() {
        let (root, call, one, _) = sample();
        let edited = replace_in_tree(&root, &one, None).unwrap();
        let new_call = walk::node_at(&edited, &walk::path_to(&root, &call).unwrap()).unwrap();
        let Payload::Evaluate(evaluate) = new_call.payload() else {
            panic!("expected evaluate");
        };
        assert_eq!(evaluate.inputs.len(), 1);
    }

    #[test]
    fn test_rebuild_stops_at_boundary() {
        let (root, call, one, _) = sample();
        let three = build::number("3").unwrap();

        let partial = rebuild_up_to(&root, &one, Some(three.clone()), 1).unwrap();
        assert_eq!(partial.kind(), NodeKind::Evaluate);
        assert!(!partial.is(&call));
        assert!(partial.children().iter().any(|child| child.is(&three)));

        let unchanged = rebuild_up_to(&root, &one, Some(three.clone()), 0).unwrap();
        assert!(unchanged.is(&three));
    }

    #[test]
    fn test_replace_root() {
        let (root, ..) = sample();
        let other = build::number("9").unwrap();
        assert!(replace_in_tree(&root, &root, Some(other.clone())).unwrap().is(&other));
        assert_eq!(replace_in_tree(&root, &root, None).unwrap_err(), EditError::RemoveRoot);
    }

    #[test]
    fn test_foreign_node() {
        let (root, ..) = sample();
        let stranger = build::number("1").unwrap();
        assert_eq!(
            replace_in_tree(&root, &stranger, None).unwrap_err(),
            EditError::NotInTree
        );
    }
}
