//! Construction and edit errors.
//!
//! These are programming errors (a parser or transformation produced an
//! ill-shaped node), never semantic conflicts.

use smol_str::SmolStr;
use thiserror::Error;

use super::kind::{NodeKind, Sym};

/// A node's fields violate its grammar descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("{kind}.{field}: expected {expected}, found {found}")]
    NotPermitted {
        kind: NodeKind,
        field: &'static str,
        expected: String,
        found: String,
    },
    #[error("{kind}.{field}: list must not be empty")]
    EmptyList { kind: NodeKind, field: &'static str },
    #[error("{kind}.{field}: required node is missing")]
    Missing { kind: NodeKind, field: &'static str },
    #[error("{kind}.{field}: must be present when `{sibling}` is present")]
    Unpaired {
        kind: NodeKind,
        field: &'static str,
        sibling: &'static str,
    },
    #[error("{kind}.{field}: expected a {expected} field")]
    FieldArity {
        kind: NodeKind,
        field: &'static str,
        expected: &'static str,
    },
    #[error("{kind}: expected {expected} fields, found {found}")]
    FieldCount {
        kind: NodeKind,
        expected: usize,
        found: usize,
    },
    #[error("invalid {sym:?} token text {text:?}")]
    InvalidToken { sym: Sym, text: SmolStr },
    #[error("{sym:?} has no canonical text")]
    NoCanonicalText { sym: Sym },
}

/// A replacement could not be applied to a node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{kind} has no field `{field}`")]
    UnknownField { kind: NodeKind, field: SmolStr },
    #[error("{kind}.{field} does not hold the original node")]
    OriginalNotFound { kind: NodeKind, field: &'static str },
    #[error("{kind}.{field} is not a list field")]
    NotAList { kind: NodeKind, field: &'static str },
    #[error("node is not part of the tree being edited")]
    NotInTree,
    #[error("cannot remove the root of the tree being edited")]
    RemoveRoot,
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
