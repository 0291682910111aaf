//! Foundation types for the Glyph toolchain.
//!
//! - [`NodeId`] - Identity handles for syntax nodes
//!
//! This module has NO dependencies on other glyph modules.

mod node_id;

pub use node_id::NodeId;
