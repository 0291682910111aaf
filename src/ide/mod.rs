//! IDE features — helpers for editors working on immutable trees.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take nodes in, return nodes out
//! 2. **Structural sharing**: Edits rebuild only the spine they touch
//! 3. **Composable**: Built on the generic field walk in [`crate::syntax::walk`]

mod document;
mod edit;

pub use document::{document_nodes, evaluated_nodes, nodes_with_purpose};
pub use edit::{rebuild_up_to, replace_in_tree};
