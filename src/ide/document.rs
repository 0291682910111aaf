//! Purpose filtering — separating evaluated code from documentation.
//!
//! Evaluators want the nodes that compute something and must skip prose
//! entirely; presentation tooling wants the reverse.

use crate::syntax::{Node, Purpose, walk};

/// Nodes that take part in evaluation, in pre-order.
///
/// Documentation subtrees are skipped whole, including any references
/// written inside them.
pub fn evaluated_nodes(root: &Node) -> Vec<Node> {
    let mut nodes = Vec::new();
    walk::walk_pruned(root, &mut |node| {
        if !node.purpose().is_evaluated() {
            return false;
        }
        nodes.push(node.clone());
        true
    });
    nodes
}

/// Top-level documentation subtrees, in pre-order.
pub fn document_nodes(root: &Node) -> Vec<Node> {
    let mut nodes = Vec::new();
    walk::walk_pruned(root, &mut |node| {
        if node.purpose() == Purpose::Document {
            nodes.push(node.clone());
            return false;
        }
        true
    });
    nodes
}

/// Every node with the given purpose, nested ones included.
pub fn nodes_with_purpose(root: &Node, purpose: Purpose) -> Vec<Node> {
    let mut nodes = Vec::new();
    walk::walk(root, &mut |node| {
        if node.purpose() == purpose {
            nodes.push(node.clone());
        }
    });
    nodes
}
