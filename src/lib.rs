//! # glyph-base
//!
//! Core library for the Glyph language: immutable syntax trees, grammar
//! descriptors, clone-with-replacement editing and semantic conflicts.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → Editor helpers (spine rebuilding, purpose filtering)
//!   ↓
//! hir     → Semantic model: Program, Context, conflicts, cycle detection
//!   ↓
//! syntax  → Nodes, tokens, grammar descriptors, tree walking
//!   ↓
//! base    → Primitives (NodeId)
//! ```
//!
//! Rendering conflicts as text is left to a [`hir::Locales`] implementation
//! supplied by the caller.

/// Foundation types: node identities
pub mod base;

/// Immutable syntax trees and their grammar
pub mod syntax;

/// High-level IR: programs, resolution and conflicts
pub mod hir;

/// IDE features: tree edits and purpose filtering
pub mod ide;

pub use base::NodeId;
pub use hir::{Analysis, Conflict, Context, Program, analyze};
pub use syntax::{EditError, Node, NodeKind, Payload, Replace, ShapeError};
