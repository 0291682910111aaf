//! HIR — semantic model over immutable syntax trees.
//!
//! ## Key Types
//!
//! - [`Program`] — ordered set of sources analyzed together
//! - [`Context`] — read-only name resolution for one pass
//! - [`Scope`] — local bindings enclosing a node
//! - [`Conflict`] — a semantic problem with structured explanations
//! - [`DependencyGraph`] — which sources borrow from which
//! - [`Analysis`] — everything found in one program
//!
//! ## Usage
//!
//! ```ignore
//! use glyph::hir::{Program, analyze};
//!
//! let program = Program::from_sources(sources)?;
//! let analysis = analyze(&program);
//! if !analysis.is_executable() {
//!     for conflict in analysis.conflicts() { /* ... */ }
//! }
//! ```

mod analysis;
mod conflict;
mod context;
mod graph;
mod program;
mod scope;
mod validate;

pub use analysis::{Analysis, AnalysisOptions, analyze, analyze_with, check_source};
pub use conflict::{
    Conflict, ConflictCollector, Explanation, Locales, Role, Severity, Site, TemplateInput,
    TemplateRef, codes,
};
pub use context::{Context, ResolveResult};
pub use graph::{DependencyGraph, Edge, find_borrow_cycles};
pub use program::{Program, ProgramError};
pub use scope::{Binding, Scope, walk_scoped};
