//! Node purposes — what a node is for, independent of its kind.

use super::kind::NodeKind;

/// Closed classification of what a node contributes to a program.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Purpose {
    /// Module structure: sources and borrows.
    Source,
    /// Naming things: binds, names, named inputs.
    Bind,
    /// Declaring functions, structures and streams.
    Definitions,
    /// Computing something: evaluations and blocks.
    Evaluate,
    /// Literal values and references to them.
    Value,
    /// Documentation, never evaluated.
    Document,
}

impl Purpose {
    /// Whether nodes with this purpose matter for evaluation.
    pub fn is_evaluated(self) -> bool {
        self != Purpose::Document
    }
}

impl From<NodeKind> for Purpose {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Source | NodeKind::Borrow => Purpose::Source,
            NodeKind::Names | NodeKind::Bind | NodeKind::Input => Purpose::Bind,
            NodeKind::FunctionDefinition
            | NodeKind::StructureDefinition
            | NodeKind::StreamDefinition => Purpose::Definitions,
            NodeKind::Block | NodeKind::Evaluate | NodeKind::BinaryEvaluate => Purpose::Evaluate,
            NodeKind::Reference | NodeKind::NumberLiteral | NodeKind::TextLiteral => Purpose::Value,
            NodeKind::Docs | NodeKind::Doc | NodeKind::Words => Purpose::Document,
            // A token's purpose is its parent's; standing alone it is just a value.
            NodeKind::Token => Purpose::Value,
        }
    }
}
