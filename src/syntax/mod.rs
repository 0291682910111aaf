//! Syntax: immutable nodes, tokens and grammar descriptors.
//!
//! ## Key Types
//!
//! - [`Node`] — cheap handle to an immutable tree element
//! - [`Payload`] — one case per [`NodeKind`], carrying that kind's fields
//! - [`Grammar`] — per-kind field specs consulted by generic algorithms
//! - [`Purpose`] — what a node is for (evaluation vs. documentation)

pub mod build;
mod error;
pub mod grammar;
mod kind;
mod node;
mod nodes;
mod purpose;
mod token;
pub mod walk;

pub use error::{EditError, ShapeError};
pub use grammar::{FieldSpec, Grammar, Permit, Shape};
pub use kind::{NodeKind, Sym};
pub use node::{Field, Node, Replace};
pub use nodes::{
    BinaryEvaluate, Bind, Block, Borrow, Doc, Docs, Evaluate, Format, FunctionDefinition, Input,
    Names, NumberLiteral, Payload, Reference, Source, StreamDefinition, StructureDefinition,
    TextLiteral, Words,
};
pub use purpose::Purpose;
pub use token::Token;
